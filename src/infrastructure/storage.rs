use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_UPLOAD_NAME: &str = "SRS.docx";
pub const OUTPUT_FILE_NAME: &str = "Generated_TestCases.xlsx";

pub fn ensure_jobs_root(jobs_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(jobs_dir)?;
    Ok(jobs_dir.to_path_buf())
}

pub fn ensure_job_dir(jobs_dir: &Path, job_id: &str) -> std::io::Result<PathBuf> {
    let job_dir = jobs_dir.join(job_id);
    ensure_dir(&job_dir)?;
    Ok(job_dir)
}

/// Reduces a client-supplied file name to its last path component so an
/// upload can never escape its job directory.
pub fn sanitize_upload_name(name: Option<&str>) -> String {
    name.map(|n| n.rsplit(['/', '\\']).next().unwrap_or("").trim())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string())
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
