//! Provider 公共辅助函数
//!
//! 模块结构：
//! - `config` - 端点与采样参数提取
//! - `response` - 响应处理和 JSON 清理
//! - `retry` - HTTP 请求发送与重试逻辑

pub mod config;
pub mod response;
pub mod retry;

pub use config::*;
pub use response::*;
pub use retry::send_llm_request;
