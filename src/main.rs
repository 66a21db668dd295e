// Re-export all library modules
use testgen_rs::*;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use commands::{ConfigOverrides, GenerateOptions};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // 根据 verbose 标志设置日志级别（默认只显示警告，保持终端 UI 整洁）
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // 初始化 tracing 日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // reqwest 使用 rustls-no-provider，需要在创建任何 HTTP client 之前安装
    llm::provider::install_crypto_provider();

    let mut config = match config::load_config() {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, true, cli.json),
    };

    // CLI 参数优先级最高
    ConfigOverrides::from_cli(&cli).apply(&mut config);

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let options = match GenerateOptions::from_cli(&cli) {
        Ok(options) => options,
        Err(e) => exit_with_error(&e, config.ui.colored, cli.json),
    };

    // 创建 tokio 运行时
    let rt = Runtime::new()?;

    rt.block_on(async {
        if let Err(e) = commands::generate::run(&options, &config).await {
            // JSON 模式下，错误已经输出过 JSON 了，直接退出
            if options.format.is_json() {
                std::process::exit(1);
            }
            exit_with_error(&e, config.ui.colored, false);
        }
        Ok(())
    })
}

/// 输出错误与解决建议后以状态码 1 退出
fn exit_with_error(e: &error::TestgenError, colored: bool, json: bool) -> ! {
    if json {
        let _ = commands::json::output_json_error::<models::WorkflowResult>(e);
    } else {
        ui::error(&e.to_string(), colored);
        if let Some(suggestion) = e.suggestion() {
            println!();
            println!("{}", ui::info(suggestion, colored));
        }
    }
    std::process::exit(1);
}
