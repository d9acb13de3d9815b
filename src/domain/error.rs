use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Document read error: {0}")]
    DocumentRead(String),
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Generation request error: {0}")]
    GenerationRequest(String),
    #[error("Markdown table header not found.")]
    TableNotFound,
    #[error("Incomplete markdown table.")]
    IncompleteTable,
    #[error("No test cases parsed.")]
    EmptyResult,
    #[error("Template structure error: {0}")]
    TemplateStructure(String),
    #[error("Workbook write error: {0}")]
    WorkbookWrite(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    /// True for failures caused by what the generation service returned,
    /// as opposed to local input or environment problems.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::GenerationRequest(_)
                | AppError::TableNotFound
                | AppError::IncompleteTable
                | AppError::EmptyResult
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
