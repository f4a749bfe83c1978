use paper_core::PaperError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Malformed PDF object: {0}")]
    ObjectError(String),

    #[error("Text extraction failed: {0}")]
    TextError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<PdfError> for PaperError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::ParseError(msg) => PaperError::PdfLoad(msg),
            PdfError::IoError(e) => PaperError::PdfLoad(e.to_string()),
            other => PaperError::PdfQuery(other.to_string()),
        }
    }
}
