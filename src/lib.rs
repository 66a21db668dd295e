//! # testgen-rs
//!
//! 把文本测试场景（Gherkin、自然语言或 user story）转换为可运行的
//! Playwright 或 pytest + requests 测试文件。生成由本地 Ollama 模型完成，
//! 可选地自动创建分支、提交、推送并打开 Pull Request。
//!
//! ## 功能
//! - **四个生成阶段**：Parser → Analyzer → Generator → Reviewer，每个阶段一次模型调用
//! - **两种测试风格**：Playwright（浏览器）与 pytest + requests（HTTP API）
//! - **容错**：模型输出无法解析时透传原文，代码提取有多级回退
//! - **Pull Request**：通过 `git` 与 `gh` CLI 完成分支、提交与 PR
//!
//! ## 快速开始
//!
//! ### 作为 CLI 使用
//! ```bash
//! ollama pull qwen2.5-coder:7b
//! testgen -i scenarios/login.feature --framework playwright
//! testgen -i scenarios/policies.txt --push-pr --base-branch develop
//! ```
//!
//! ### 作为库使用
//! ```no_run
//! use testgen_rs::config::AppConfig;
//! use testgen_rs::llm::provider::{create_provider, install_crypto_provider};
//! use testgen_rs::pipeline::TestPipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! install_crypto_provider();
//! let config = AppConfig::default();
//! let provider = create_provider(&config)?;
//!
//! let pipeline = TestPipeline::new(provider, config);
//! let result = pipeline
//!     .run("Feature: Login\n  Scenario: valid credentials\n", "login.feature")
//!     .await?;
//! println!("{} tests written", result.total_tests());
//! # Ok(())
//! # }
//! ```
//!
//! ## 核心模块
//! - [`agents`] - 五个 agent 的角色与 prompt
//! - [`pipeline`] - 阶段编排、代码提取、命名、语法检查与 PR 流程
//! - [`llm`] - LLM provider 接口和 Ollama 实现
//! - [`git`] - Git / GitHub CLI 操作抽象
//! - [`models`] - 阶段间传递的数据结构
//! - [`commands`] - CLI 命令实现
//! - [`config`] - 配置管理
//! - [`error`] - 统一错误类型
//! - [`ui`] - 用户界面工具
//!
//! ## 配置
//! 配置文件位置：
//! - Linux: `~/.config/testgen/config.toml`
//! - macOS: `~/Library/Application Support/testgen/config.toml`
//! - Windows: `%APPDATA%\testgen\config\config.toml`
//! - 项目级（可选）: `./testgen.toml`
//!
//! 示例配置：
//! ```toml
//! [llm]
//! model = "qwen2.5-coder:7b"
//! temperature = 0.3
//!
//! [generation]
//! framework = "api"
//! output_dir = "tests/generated"
//!
//! [github]
//! base_branch = "develop"
//! ```

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod ui;
