//! Resume text extraction from uploaded files.
//!
//! PDF goes through `pdf-extract`; plain text is read as UTF-8. Word documents are
//! rejected with a message asking for PDF instead.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No file provided")]
    MissingFile,

    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("Failed to process PDF file: {0}")]
    Pdf(String),

    #[error("Text file is not valid UTF-8")]
    Encoding,

    #[error("No readable text found in {0}")]
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
}

impl FileKind {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "txt" => Ok(FileKind::Text),
            "doc" | "docx" => Err(ExtractionError::UnsupportedFormat(
                "Word documents are not supported. Please convert to PDF or plain text."
                    .to_string(),
            )),
            "" => Err(ExtractionError::UnsupportedFormat(
                "File has no extension. Please upload a PDF or .txt file.".to_string(),
            )),
            other => Err(ExtractionError::UnsupportedFormat(format!(
                "Unsupported file format: .{other}. Please upload a PDF or .txt file."
            ))),
        }
    }
}

/// Returns the extracted text and the detected file kind.
pub fn extract_resume_text(
    filename: &str,
    content: &[u8],
    max_bytes: usize,
) -> Result<(String, FileKind), ExtractionError> {
    if filename.trim().is_empty() || content.is_empty() {
        return Err(ExtractionError::MissingFile);
    }
    if content.len() > max_bytes {
        return Err(ExtractionError::TooLarge {
            size: content.len(),
            limit: max_bytes,
        });
    }

    let kind = FileKind::from_filename(filename)?;
    let text = match kind {
        // pdf-extract panics on some malformed documents instead of returning an error.
        FileKind::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(content))
            .map_err(|_| ExtractionError::Pdf("document could not be parsed".to_string()))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
        FileKind::Text => String::from_utf8(content.to_vec()).map_err(|_| ExtractionError::Encoding)?,
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(ExtractionError::Empty(filename.to_string()));
    }
    debug!("Extracted {} chars from {filename} ({kind:?})", text.len());
    Ok((text, kind))
}

/// Trims each line and collapses runs of blank lines, keeping line structure for scoring.
fn normalize_whitespace(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
