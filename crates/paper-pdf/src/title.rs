//! Guessing a paper's title from the PDF itself

use std::path::Path;

use lopdf::Document;
use paper_core::{LocalTitleSource, PaperError, Result};
use tracing::debug;

use crate::objects::{check_page_tree, resolve, text_string};
use crate::text::{collect_chars, largest_text};

/// Title guess from the first page's largest text, then `/Info /Title`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTitleGuesser;

impl PdfTitleGuesser {
    pub fn new() -> Self {
        Self
    }

    /// Guess from bytes already in memory. An empty string means no guess.
    pub fn guess_from_bytes(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes).map_err(|e| PaperError::TitleGuess(e.to_string()))?;

        match check_page_tree(&doc).and_then(|()| collect_chars(bytes, Some(1))) {
            Ok(pages) => {
                if let Some(title) = pages.first().and_then(|chars| largest_text(chars)) {
                    return Ok(title);
                }
            }
            Err(e) => debug!(error = %e, "no text for title guess, trying /Info"),
        }

        Ok(info_title(&doc).unwrap_or_default())
    }
}

impl LocalTitleSource for PdfTitleGuesser {
    fn guess_title(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)
            .map_err(|e| PaperError::TitleGuess(format!("{}: {}", path.display(), e)))?;
        self.guess_from_bytes(&bytes)
    }
}

/// Non-blank `/Title` of the document information dictionary
pub fn info_title(doc: &Document) -> Option<String> {
    let info = resolve(doc, doc.trailer.get(b"Info").ok()?).ok()?;
    let title = text_string(doc, info.as_dict().ok()?, b"Title")?;
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
