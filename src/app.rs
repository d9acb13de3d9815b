use crate::application::TestCaseGenerationUseCase;
use crate::domain::error::Result;
use crate::domain::test_case::GenerationSummary;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::{AnthropicClient, LLMClient};
use crate::infrastructure::storage::ensure_jobs_root;
use crate::interfaces::http::{start_server, HttpState};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured level; `info` when neither is set.
pub fn init_tracing(log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_use_case() -> Arc<TestCaseGenerationUseCase> {
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(AnthropicClient::new());
    Arc::new(TestCaseGenerationUseCase::new(llm_client))
}

pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    ensure_jobs_root(&config.storage.jobs_dir)?;
    if !config.storage.template_path.is_file() {
        warn!(
            template = %config.storage.template_path.display(),
            "Template workbook not found; jobs will fail until it exists"
        );
    }
    if config.llm.credential().is_none() {
        warn!("No API key configured; generation requests will be rejected");
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        jobs_dir = %config.storage.jobs_dir.display(),
        "Starting test case generation server"
    );

    let state = HttpState {
        use_case: build_use_case(),
        config: Arc::new(config),
        logs: Arc::new(Mutex::new(Vec::new())),
    };
    start_server(state)?.await
}

/// Runs a single job from local paths, without the HTTP layer.
pub async fn generate_once(
    config: &AppConfig,
    srs_path: &Path,
    template_path: &Path,
    output_path: &Path,
) -> Result<GenerationSummary> {
    build_use_case()
        .execute(&config.llm, srs_path, template_path, output_path)
        .await
}
