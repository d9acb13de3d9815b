use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

pub const DEFAULT_CONFIG_FILE: &str = "testforge.toml";
pub const ENV_PREFIX: &str = "TESTFORGE_";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StorageConfig {
    pub jobs_dir: PathBuf,
    pub template_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            jobs_dir: PathBuf::from("jobs"),
            template_path: PathBuf::from("templates/TestCases_Template.xlsx"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub llm: LLMConfig,
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub storage: StorageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

pub struct ConfigService;

impl ConfigService {
    /// Loads `testforge.toml` from the working directory (if present) layered
    /// under `TESTFORGE_*` environment variables.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<AppConfig> {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;

        if config.llm.credential().is_none() {
            config.llm.api_key = std::env::var(ANTHROPIC_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config
            .validate()
            .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))?;

        Ok(config)
    }
}
