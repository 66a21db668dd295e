// 配置模块
//
// 分层加载：默认值 → 用户配置文件 → 项目配置文件 → 环境变量 → CLI 参数。

mod loader;
pub mod structs;

pub use loader::{
    PROJECT_CONFIG_FILE, get_config_dir, get_config_path, load_config, load_config_from,
};
pub use structs::*;

#[cfg(test)]
mod tests;
