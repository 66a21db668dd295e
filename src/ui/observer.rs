//! 终端进度输出：每个阶段一行步骤提示加一个 spinner

use std::sync::Mutex;

use super::{Spinner, step, success};
use crate::constants::ui::STAGE_PREVIEW_LENGTH;
use crate::llm::ProgressReporter;
use crate::llm::provider::base::truncate_to;
use crate::pipeline::{PipelineObserver, Stage};

/// 将阶段事件渲染到终端的 [`PipelineObserver`]
pub struct ConsoleObserver {
    colored: bool,
    verbose: bool,
    total_stages: usize,
    spinner: Mutex<Option<Spinner>>,
}

impl ConsoleObserver {
    /// # 参数
    /// - `with_publish`: 是否包含第 5 步（Pull Request）
    pub fn new(colored: bool, verbose: bool, with_publish: bool) -> Self {
        Self {
            colored,
            verbose,
            total_stages: if with_publish { 5 } else { 4 },
            spinner: Mutex::new(None),
        }
    }

    /// 清除仍在运行的 spinner
    pub fn finish(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(spinner) = guard.take()
        {
            spinner.finish_and_clear();
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn stage_started(&self, stage: Stage) {
        self.finish();
        step(
            &format!("{}/{}", stage.number(), self.total_stages),
            &format!("{} agent", stage.agent()),
            self.colored,
        );
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(Spinner::new(&format!("{}...", stage.activity())));
        }
    }

    fn stage_finished(&self, stage: Stage, output: &str) {
        self.finish();
        success(&format!("{} done", stage.activity()), self.colored);
        if self.verbose {
            super::detail(&truncate_to(output.trim(), STAGE_PREVIEW_LENGTH), self.colored);
        }
    }

    fn progress(&self) -> Option<&dyn ProgressReporter> {
        Some(self)
    }
}

impl ProgressReporter for ConsoleObserver {
    fn append_suffix(&self, suffix: &str) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(ref spinner) = *guard
        {
            spinner.append_suffix(suffix);
        }
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        self.finish();
    }
}
