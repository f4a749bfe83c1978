use paper_core::PaperError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArxivError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed Atom feed: {0}")]
    Feed(String),

    #[error("arXiv API error: {0}")]
    Api(String),
}

impl From<ArxivError> for PaperError {
    fn from(err: ArxivError) -> Self {
        PaperError::MetadataLookup(err.to_string())
    }
}
