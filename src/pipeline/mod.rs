//! The four generation stages and what happens around them.
//!
//! [`TestPipeline::run`] drives Parser → Analyzer → Generator → Reviewer, one
//! model call each, then picks the final code, names and checks it and writes
//! the file. The pull request flow lives in [`publish`].

pub mod extract;
pub mod naming;
pub mod output;
pub mod publish;
pub mod syntax;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::agents::{analyzer, generator, parser, reviewer, stage_context};
use crate::config::AppConfig;
use crate::error::{Result, TestgenError};
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::{GeneratedTest, WorkflowResult};

use extract::select_final_code;
use syntax::{SyntaxCheck, check_python_syntax};

/// A step of the run, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Analyze,
    Generate,
    Review,
    Publish,
}

impl Stage {
    /// The generation stages in execution order.
    pub const GENERATION: [Stage; 4] = [Stage::Parse, Stage::Analyze, Stage::Generate, Stage::Review];

    /// Position in the run, starting at 1.
    pub fn number(&self) -> usize {
        match self {
            Stage::Parse => 1,
            Stage::Analyze => 2,
            Stage::Generate => 3,
            Stage::Review => 4,
            Stage::Publish => 5,
        }
    }

    /// Name of the agent doing the work.
    pub fn agent(&self) -> &'static str {
        match self {
            Stage::Parse => "Parser",
            Stage::Analyze => "Analyzer",
            Stage::Generate => "Generator",
            Stage::Review => "Reviewer",
            Stage::Publish => "GitHub",
        }
    }

    /// Progress line shown while the stage runs.
    pub fn activity(&self) -> &'static str {
        match self {
            Stage::Parse => "Parsing scenario",
            Stage::Analyze => "Analyzing test requirements",
            Stage::Generate => "Generating test code",
            Stage::Review => "Reviewing generated code",
            Stage::Publish => "Creating pull request",
        }
    }
}

/// Receives stage events while a run is in progress.
///
/// All methods default to doing nothing.
pub trait PipelineObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage) {}

    /// Called with the stage's raw model output.
    fn stage_finished(&self, _stage: Stage, _output: &str) {}

    /// Reporter handed to the provider for retry feedback.
    fn progress(&self) -> Option<&dyn ProgressReporter> {
        None
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}

/// Runs the generation stages against one provider.
pub struct TestPipeline {
    provider: Arc<dyn LLMProvider>,
    config: AppConfig,
    observer: Arc<dyn PipelineObserver>,
}

impl TestPipeline {
    pub fn new(provider: Arc<dyn LLMProvider>, config: AppConfig) -> Self {
        Self {
            provider,
            config,
            observer: Arc::new(SilentObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Directory generated files are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.config.generation.output_dir.clone()
    }

    /// Turns `scenario_text` into a test file.
    ///
    /// Stage failures from the model server are errors. Everything the model
    /// gets wrong is recorded on the returned [`WorkflowResult`] instead; a run
    /// that produced no code at all comes back with `success == false`.
    pub async fn run(&self, scenario_text: &str, input_file: &str) -> Result<WorkflowResult> {
        if scenario_text.trim().is_empty() {
            return Err(TestgenError::EmptyInput);
        }

        let framework = self.config.generation.framework;
        let generation = &self.config.generation;
        let provider = self.provider.as_ref();
        let progress = self.observer.progress();
        let started = Instant::now();

        let mut result = WorkflowResult::new(input_file, naming::count_scenarios(scenario_text));
        tracing::info!(
            "Generating {} tests from {} with {}",
            framework,
            input_file,
            provider.name()
        );

        self.observer.stage_started(Stage::Parse);
        let parsed = parser::run(provider, framework, scenario_text, progress).await?;
        self.observer.stage_finished(Stage::Parse, &parsed.raw);
        let feature = naming::feature_name(scenario_text, parsed.parsed.as_ref());
        result.feature_name = feature.clone();
        if !parsed.is_parsed() {
            result.warn("Parser output is not valid JSON; passing raw text to the analyzer");
        }

        self.observer.stage_started(Stage::Analyze);
        let blueprint = analyzer::run(
            provider,
            framework,
            &stage_context(&parsed),
            generation,
            progress,
        )
        .await?;
        self.observer.stage_finished(Stage::Analyze, &blueprint.raw);
        if !blueprint.is_parsed() {
            result.warn("Analyzer output is not valid JSON; passing raw text to the generator");
        }

        let expected_methods = blueprint
            .parsed
            .as_ref()
            .map(|b| b.method_names())
            .unwrap_or_default();

        self.observer.stage_started(Stage::Generate);
        let generated = generator::run(
            provider,
            framework,
            &stage_context(&blueprint),
            &expected_methods,
            generation,
            progress,
        )
        .await?;
        self.observer.stage_finished(Stage::Generate, &generated);

        let draft = extract::extract_code(&generated).unwrap_or_else(|| generated.trim().to_string());

        self.observer.stage_started(Stage::Review);
        let review = reviewer::run(provider, framework, &draft, progress).await?;
        self.observer.stage_finished(Stage::Review, &review.raw);

        let Some(extracted) = select_final_code(&review.raw, review.parsed.as_ref(), &generated)
        else {
            result.fail("Failed to generate test code");
            return Ok(result);
        };
        if !extracted.source.from_reviewer() {
            result.warn("Reviewer returned no usable code; using the generator output");
        }

        let mut test = GeneratedTest::new(naming::test_filename(&feature), extracted.code);

        if let Some(outcome) = review.parsed {
            test.is_valid = outcome.is_valid;
            test.review_notes.extend(outcome.review_notes);
            test.review_notes.extend(
                outcome
                    .improvements_made
                    .into_iter()
                    .map(|i| format!("Improved: {}", i)),
            );
        }

        for import in framework.required_imports() {
            if !test.content.contains(import) {
                result.warn(format!("{} is missing `{}`", test.filename, import));
            }
        }

        if generation.syntax_check {
            match check_python_syntax(&test.content).await {
                SyntaxCheck::Valid => {}
                SyntaxCheck::Invalid(message) => {
                    test.is_valid = false;
                    test.review_notes.push(format!("Syntax error: {}", message));
                    result.warn(format!("{} does not parse: {}", test.filename, message));
                }
                SyntaxCheck::Unavailable(reason) => {
                    tracing::debug!("Syntax check unavailable: {}", reason);
                    test.review_notes.push("syntax check skipped".to_string());
                }
            }
        }

        let path = output::write_test_file(&generation.output_dir, &test)?;
        tracing::info!(
            "Wrote {} ({} tests) in {:.1}s",
            path.display(),
            test.test_count,
            started.elapsed().as_secs_f64()
        );
        result.generated_tests.push(test);

        Ok(result)
    }
}
