use crate::application::TestCaseGenerationUseCase;
use crate::domain::error::AppError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::{
    ensure_job_dir, ensure_jobs_root, sanitize_upload_name, OUTPUT_FILE_NAME,
};
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub use_case: Arc<TestCaseGenerationUseCase>,
    pub config: Arc<AppConfig>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

#[post("/generate-testcases")]
async fn generate_testcases(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    if body.is_empty() {
        add_log(&data.logs, "WARN", "HttpApi", "Rejected upload with empty body");
        return HttpResponse::BadRequest().body("Uploaded SRS document is empty");
    }

    let job_id = Uuid::new_v4().to_string();
    let upload_name = sanitize_upload_name(query.filename.as_deref());
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Job {} received {} ({} bytes)",
            job_id,
            upload_name,
            body.len()
        ),
    );

    let (srs_path, output_path) = match prepare_job(&data.config, &job_id, &upload_name, &body) {
        Ok(paths) => paths,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Job {} could not be prepared: {}", job_id, e),
            );
            return error_response(&e);
        }
    };

    let result = data
        .use_case
        .execute(
            &data.config.llm,
            &srs_path,
            &data.config.storage.template_path,
            &output_path,
        )
        .await;

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Job {} failed: {}", job_id, e),
            );
            return error_response(&e);
        }
    };

    match std::fs::read(&output_path) {
        Ok(bytes) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Job {} generated {} test cases for component '{}'",
                    job_id, summary.test_case_count, summary.component
                ),
            );
            HttpResponse::Ok()
                .content_type(XLSX_CONTENT_TYPE)
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(OUTPUT_FILE_NAME.to_string())],
                })
                .body(bytes)
        }
        Err(e) => {
            let err = AppError::from(e);
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Job {} output unreadable: {}", job_id, err),
            );
            error_response(&err)
        }
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    HttpResponse::Ok().json(logs)
}

/// Allocates `<jobs_dir>/<job_id>/`, stores the upload there and returns
/// (upload path, output path).
fn prepare_job(
    config: &AppConfig,
    job_id: &str,
    upload_name: &str,
    body: &[u8],
) -> crate::domain::error::Result<(PathBuf, PathBuf)> {
    let jobs_root = ensure_jobs_root(&config.storage.jobs_dir)?;
    let job_dir = ensure_job_dir(&jobs_root, job_id)?;
    let srs_path = job_dir.join(upload_name);
    std::fs::write(&srs_path, body)?;
    Ok((srs_path, job_dir.join(OUTPUT_FILE_NAME)))
}

fn error_response(err: &AppError) -> HttpResponse {
    let mut response = match err {
        AppError::DocumentRead(_) => HttpResponse::BadRequest(),
        e if e.is_upstream() => HttpResponse::BadGateway(),
        _ => HttpResponse::InternalServerError(),
    };
    response.body(err.to_string())
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

/// Records the entry for `/api/logs` and mirrors it to tracing.
pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(generate_testcases)
            .service(health)
            .service(get_logs),
    );
}

pub fn start_server(state: HttpState) -> std::io::Result<Server> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::testcase_generation::tests::{CannedClient, LOGIN_RESPONSE};
    use crate::domain::llm_config::LLMConfig;
    use crate::infrastructure::config::StorageConfig;
    use crate::infrastructure::documents::docx::tests::write_docx;
    use crate::infrastructure::llm_clients::{AnthropicClient, LLMClient};
    use crate::infrastructure::spreadsheet::tests::{cell_text, read_sheet, write_template};
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use std::path::Path;

    fn state_with(
        root: &Path,
        client: Arc<dyn LLMClient + Send + Sync>,
        llm: LLMConfig,
    ) -> web::Data<HttpState> {
        let template_path = write_template(root, Some((3, 2)));
        let config = AppConfig {
            llm,
            storage: StorageConfig {
                jobs_dir: root.join("jobs"),
                template_path,
            },
            ..Default::default()
        };
        web::Data::new(HttpState {
            use_case: Arc::new(TestCaseGenerationUseCase::new(client)),
            config: Arc::new(config),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn upload_bytes(root: &Path) -> Vec<u8> {
        let path = write_docx(root, "upload.docx", &["Login module", "Must support IPv4 and IPv6"]);
        std::fs::read(path).unwrap()
    }

    fn job_dirs(root: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(root.join("jobs"))
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default()
    }

    #[actix_web::test]
    async fn test_upload_returns_generated_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            Arc::new(CannedClient::replying(LOGIN_RESPONSE)),
            LLMConfig::default(),
        );
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-testcases?filename=SRS.docx")
            .set_payload(upload_bytes(dir.path()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("Generated_TestCases.xlsx"), "{}", disposition);

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"PK"));

        let downloaded = dir.path().join("downloaded.xlsx");
        std::fs::write(&downloaded, &body).unwrap();
        let range = read_sheet(&downloaded);
        assert_eq!(cell_text(&range, 2, 3), "Component: Login");
        assert_eq!(cell_text(&range, 6, 2), "TC001");

        let jobs = job_dirs(dir.path());
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].join("SRS.docx").is_file());
        assert!(jobs[0].join(OUTPUT_FILE_NAME).is_file());
    }

    #[actix_web::test]
    async fn test_empty_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            Arc::new(CannedClient::replying(LOGIN_RESPONSE)),
            LLMConfig::default(),
        );
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-testcases")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(job_dirs(dir.path()).is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_document_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            Arc::new(CannedClient::replying(LOGIN_RESPONSE)),
            LLMConfig::default(),
        );
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-testcases?filename=notes.docx")
            .set_payload("not a docx")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_generation_failure_is_bad_gateway_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            Arc::new(CannedClient::failing("API error (503 Service Unavailable)")),
            LLMConfig::default(),
        );
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-testcases?filename=SRS.docx")
            .set_payload(upload_bytes(dir.path()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("503"));

        let jobs = job_dirs(dir.path());
        assert_eq!(jobs.len(), 1);
        assert!(!jobs[0].join(OUTPUT_FILE_NAME).exists());

        let logs = state.logs.lock().unwrap();
        assert!(logs.iter().any(|entry| entry.level == "ERROR"));
    }

    #[actix_web::test]
    async fn test_missing_credential_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), Arc::new(AnthropicClient::new()), LLMConfig::default());
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-testcases?filename=SRS.docx")
            .set_payload(upload_bytes(dir.path()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("ANTHROPIC_API_KEY"));
    }

    #[actix_web::test]
    async fn test_health_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            Arc::new(CannedClient::replying(LOGIN_RESPONSE)),
            LLMConfig::default(),
        );
        add_log(&state.logs, "INFO", "Test", "hello");
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let logs: Vec<LogEntry> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/logs").to_request(),
        )
        .await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "hello");
    }

    #[actix_web::test]
    async fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log_entry(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
