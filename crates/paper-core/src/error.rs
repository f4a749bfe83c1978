use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperError {
    #[error("Failed to load PDF: {0}")]
    PdfLoad(String),

    #[error("PDF query failed: {0}")]
    PdfQuery(String),

    #[error("Title extraction failed: {0}")]
    TitleGuess(String),

    #[error("Metadata lookup failed: {0}")]
    MetadataLookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaperError>;
