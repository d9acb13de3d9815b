pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::{generate_once, init_tracing, serve};
pub use domain::error::{AppError, Result};
pub use infrastructure::config::{AppConfig, ConfigService};
