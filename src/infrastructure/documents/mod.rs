pub mod docx;

pub use docx::extract_srs_text;
