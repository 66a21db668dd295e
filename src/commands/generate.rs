use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::commands::json;
use crate::commands::options::GenerateOptions;
use crate::commands::preflight;
use crate::config::AppConfig;
use crate::error::{Result, TestgenError};
use crate::git::{GhCli, GitOperations, PullRequestOps, repository::GitRepository};
use crate::llm::{LLMProvider, provider::create_provider};
use crate::models::{PrMetadata, WorkflowResult};
use crate::pipeline::publish::{self, PublishRequest, Publisher};
use crate::pipeline::{PipelineObserver, SilentObserver, TestPipeline, output};
use crate::ui;

/// 执行 generate 命令
///
/// # Arguments
/// * `options` - 命令选项（已应用到 `config`）
/// * `config` - 应用配置
pub async fn run(options: &GenerateOptions<'_>, config: &AppConfig) -> Result<()> {
    let outcome = execute(options, config).await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if options.format.is_json() {
                json::output_json_error::<WorkflowResult>(&e)?;
            }
            return Err(e);
        }
    };

    if options.format.is_json() {
        json::output_json(result.success, &result)?;
    }

    if result.success {
        Ok(())
    } else {
        Err(TestgenError::Generation(result.errors.join("; ")))
    }
}

async fn execute(options: &GenerateOptions<'_>, config: &AppConfig) -> Result<WorkflowResult> {
    config.validate()?;
    let provider = create_provider(config)?;

    // 仓库在生成前打开：工作目录不会因生成而改变
    let repo = if options.push_pr {
        GitRepository::open().map_err(|e| {
            tracing::debug!("No git repository: {}", e);
            e.to_string()
        })
    } else {
        Err(NO_REPOSITORY.to_string())
    };

    // gh 在仓库根目录运行，与 git push 使用同一个远程
    let gh = match repo {
        Ok(ref repo) => GhCli::new().with_workdir(repo.workdir()),
        Err(_) => GhCli::new(),
    };

    let repo = repo
        .as_ref()
        .map(|r| r as &dyn GitOperations)
        .map_err(String::as_str);
    run_with_deps(options, config, &provider, repo, &gh).await
}

const NO_REPOSITORY: &str = "Not a git repository (or any of the parent directories)";

/// 执行 generate 命令（可测试版本，接受 trait 对象）
///
/// `repo` 为 `Err(message)` 表示无法打开 git 仓库，`message` 会记录到 PR 结果中。
pub async fn run_with_deps(
    options: &GenerateOptions<'_>,
    config: &AppConfig,
    provider: &Arc<dyn LLMProvider>,
    repo: std::result::Result<&dyn GitOperations, &str>,
    pr_ops: &dyn PullRequestOps,
) -> Result<WorkflowResult> {
    let colored = options.format.effective_colored(config.ui.colored);
    let show_progress = options.show_progress();

    // 1. 读取输入（空输入在任何 LLM 调用之前被拒绝）
    let scenario = output::read_scenario(options.input)?;

    if show_progress {
        ui::banner(
            &config.llm.model,
            &config.generation.framework.to_string(),
            colored,
        );
    }

    // 2. 预检
    let mut preflight_warnings = Vec::new();
    if options.skip_checks {
        tracing::debug!("Preflight checks skipped");
    } else {
        let pr_ops = options.push_pr.then_some(pr_ops);
        preflight_warnings = preflight::run(provider.as_ref(), pr_ops).await?;
    }

    // 3. 生成
    let console = show_progress
        .then(|| Arc::new(ui::ConsoleObserver::new(colored, options.verbose, options.push_pr)));
    let observer: Arc<dyn PipelineObserver> = match console {
        Some(ref console) => console.clone() as Arc<dyn PipelineObserver>,
        None => Arc::new(SilentObserver),
    };

    let pipeline = TestPipeline::new(provider.clone(), config.clone()).with_observer(observer.clone());
    let input_name = options.input.display().to_string();
    let mut result = pipeline.run(&scenario, &input_name).await?;
    if !preflight_warnings.is_empty() {
        preflight_warnings.append(&mut result.warnings);
        result.warnings = preflight_warnings;
    }

    // 4. Pull Request
    if result.success && options.push_pr {
        let files: Vec<PathBuf> = result
            .generated_tests
            .iter()
            .map(|t| pipeline.output_dir().join(&t.filename))
            .collect();

        let meta = match repo {
            Ok(git) => {
                let request = PublishRequest {
                    files: &files,
                    feature_name: &result.feature_name,
                    scenarios_count: result.scenarios_count,
                    now: Local::now().naive_local(),
                };
                Publisher::new(provider.as_ref(), git, pr_ops, &config.github, observer.as_ref())
                    .publish(&request)
                    .await
            }
            Err(message) => publish::failed(&config.github.base_branch, &files, message),
        };

        if let Some(ref message) = meta.error_message {
            result.warn(format!("Pull request not created: {}", message));
        }
        result.pr_metadata = Some(meta);
    }

    if let Some(console) = console {
        console.finish();
    }

    if !options.format.is_json() {
        print_summary(&result, config, colored);
    }

    Ok(result)
}

fn print_summary(result: &WorkflowResult, config: &AppConfig, colored: bool) {
    println!();
    for test in &result.generated_tests {
        let path = config.generation.output_dir.join(&test.filename);
        let line = format!(
            "Generated {} ({} test{})",
            path.display(),
            test.test_count,
            if test.test_count == 1 { "" } else { "s" }
        );
        if test.is_valid {
            ui::success(&line, colored);
        } else {
            ui::warning(&format!("{} - needs manual review", line), colored);
        }
        for note in &test.review_notes {
            ui::detail(note, colored);
        }
    }

    for warning in &result.warnings {
        ui::warning(warning, colored);
    }
    for error in &result.errors {
        ui::error(error, colored);
    }

    if let Some(PrMetadata {
        success: true,
        pr_url: Some(url),
        ..
    }) = &result.pr_metadata
    {
        ui::success(&format!("Pull request: {}", url), colored);
    }
}
