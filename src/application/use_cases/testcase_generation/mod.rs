mod llm_output;
mod prompts;

use llm_output::{extract_component, parse_markdown_table};
use prompts::build_test_case_prompt;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::test_case::GenerationSummary;
use crate::infrastructure::documents::extract_srs_text;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use crate::infrastructure::spreadsheet::fill_excel_template;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Row count the prompt asks for; not enforced on the parsed result.
const REQUESTED_MIN_TEST_CASES: usize = 200;

pub struct TestCaseGenerationUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl TestCaseGenerationUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Runs one job end to end: SRS document in, filled workbook out.
    /// The first failing stage aborts the job and nothing is written.
    pub async fn execute(
        &self,
        config: &LLMConfig,
        srs_path: &Path,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<GenerationSummary> {
        let srs_file = srs_path.to_path_buf();
        let srs_text = run_blocking(move || extract_srs_text(&srs_file)).await?;
        info!(srs = %srs_path.display(), chars = srs_text.len(), "Extracted SRS text");

        let prompt = build_test_case_prompt(&srs_text);

        let raw_output = self.llm_client.generate(config, &prompt).await?;
        info!(model = %config.model, chars = raw_output.len(), "Received test case table");

        let cleaned = clean_llm_response(&raw_output);
        let component = extract_component(&cleaned);
        let test_cases = parse_markdown_table(&cleaned)?;
        if test_cases.len() < REQUESTED_MIN_TEST_CASES {
            debug!(
                rows = test_cases.len(),
                requested = REQUESTED_MIN_TEST_CASES,
                "Model returned fewer test cases than requested"
            );
        }
        info!(component = %component, rows = test_cases.len(), "Parsed test cases");

        let test_case_count = test_cases.len();
        let template: PathBuf = template_path.to_path_buf();
        let output: PathBuf = output_path.to_path_buf();
        let label = component.clone();
        run_blocking(move || fill_excel_template(&test_cases, &template, &output, &label)).await?;

        Ok(GenerationSummary {
            component,
            test_case_count,
            output_path: output_path.display().to_string(),
        })
    }
}

/// Runs synchronous document and workbook I/O on tokio's blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::IoError(format!("Blocking task failed: {}", e)))?
}
