use crate::domain::error::{AppError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// Reads the body paragraphs of a `.docx` file and joins the non-blank ones
/// with `\n`, in document order. Tables, images and styles are ignored.
pub fn extract_srs_text(doc_path: &Path) -> Result<String> {
    let file_bytes = fs::read(doc_path).map_err(|e| {
        error!(path = %doc_path.display(), error = %e, "Failed to read DOCX file");
        AppError::DocumentRead(format!("Failed to read DOCX file {}: {}", doc_path.display(), e))
    })?;
    let docx = docx_rs::read_docx(&file_bytes).map_err(|e| {
        error!(path = %doc_path.display(), error = %e, "Failed to parse DOCX file");
        AppError::DocumentRead(format!(
            "Failed to parse DOCX file {}: {}",
            doc_path.display(),
            e
        ))
    })?;

    let paragraphs = paragraph_texts(&docx);
    debug!(path = %doc_path.display(), paragraphs = paragraphs.len(), "Extracted SRS paragraphs");
    Ok(paragraphs.join("\n"))
}

fn paragraph_texts(docx: &docx_rs::Docx) -> Vec<String> {
    docx.document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect()
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut buffer);
    }
    buffer
}

fn push_paragraph_child(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => push_run(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                push_paragraph_child(link_child, buffer);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = insert_child {
                    push_run(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn push_run(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) | docx_rs::RunChild::PTab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            docx_rs::RunChild::Sym(sym) => buffer.push_str(&sym.char),
            _ => {}
        }
    }
}
