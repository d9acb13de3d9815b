use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use testforge_lib::{AppConfig, ConfigService};
use tracing::error;

#[derive(Parser)]
#[command(name = "testforge", version, about = "Generate test case spreadsheets from SRS documents")]
struct Cli {
    /// Configuration file (TOML). Environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the upload API (default).
    Serve,
    /// Generate one workbook from a local SRS document.
    Generate {
        #[arg(long)]
        srs: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Defaults to the configured template.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> testforge_lib::Result<AppConfig> {
    match path {
        Some(path) => ConfigService::load_from(path),
        None => ConfigService::load(),
    }
}

#[actix_web::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            testforge_lib::init_tracing(None);
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    testforge_lib::init_tracing(config.log_level.as_deref());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => match testforge_lib::serve(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Server stopped with an error");
                ExitCode::FAILURE
            }
        },
        Command::Generate {
            srs,
            output,
            template,
            json,
        } => {
            let template = template.unwrap_or_else(|| config.storage.template_path.clone());
            match testforge_lib::generate_once(&config, &srs, &template, &output).await {
                Ok(summary) if json => match serde_json::to_string_pretty(&summary) {
                    Ok(text) => {
                        println!("{}", text);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to encode summary");
                        ExitCode::FAILURE
                    }
                },
                Ok(summary) => {
                    println!("Component: {}", summary.component);
                    println!("Test cases: {}", summary.test_case_count);
                    println!("Output: {}", summary.output_path);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "Test case generation failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
