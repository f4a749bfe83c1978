//! [`PdfBackend`] over lopdf for annotations and pdf-extract for text

use std::cell::OnceCell;
use std::path::Path;

use lopdf::{Document, ObjectId};
use paper_core::{AnnotationObject, PageRect, PageSize, PaperError, PdfBackend, Result};
use tracing::{debug, warn};

use crate::annotations::{page_annotations, PageFrame};
use crate::error::PdfError;
use crate::objects::{check_page_tree, media_box};
use crate::text::{collect_chars, text_in_rect, PositionedChar};

/// An opened PDF.
///
/// Positioned text is extracted for the whole document on the first text
/// query and reused for the rest of the handle's life. When extraction
/// fails the document stays usable and every text query answers "".
pub struct LopdfDocument {
    inner: Document,
    bytes: Vec<u8>,
    page_ids: Vec<ObjectId>,
    chars: OnceCell<Option<Vec<Vec<PositionedChar>>>>,
}

impl LopdfDocument {
    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> std::result::Result<Self, PdfError> {
        let inner = Document::load_mem(&bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
        let page_ids = inner.get_pages().into_values().collect();
        Ok(Self {
            inner,
            bytes,
            page_ids,
            chars: OnceCell::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub(crate) fn page_id(&self, page: usize) -> std::result::Result<ObjectId, PdfError> {
        self.page_ids.get(page).copied().ok_or_else(|| {
            PdfError::ObjectError(format!(
                "page {} out of range (document has {} pages)",
                page,
                self.page_ids.len()
            ))
        })
    }

    fn frame(&self, page: usize) -> std::result::Result<PageFrame, PdfError> {
        Ok(PageFrame::from_media_box(media_box(&self.inner, self.page_id(page)?)?))
    }

    /// Positioned text per page, `None` once extraction has failed.
    fn chars(&self) -> Option<&[Vec<PositionedChar>]> {
        self.chars.get_or_init(|| self.extract_chars()).as_deref()
    }

    fn extract_chars(&self) -> Option<Vec<Vec<PositionedChar>>> {
        let pages = check_page_tree(&self.inner).and_then(|()| collect_chars(&self.bytes, None));
        match pages {
            Ok(pages) => {
                if pages.len() != self.page_ids.len() {
                    warn!(
                        extracted = pages.len(),
                        expected = self.page_ids.len(),
                        "text extraction page count differs from page tree"
                    );
                }
                Some(pages)
            }
            Err(e) => {
                warn!(error = %e, "text extraction failed, highlights will have no text");
                None
            }
        }
    }
}

/// Stateless backend; every document handle owns its own data.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn open(&self, path: &Path) -> Result<LopdfDocument> {
        let bytes = std::fs::read(path)
            .map_err(|e| PaperError::PdfLoad(format!("{}: {}", path.display(), e)))?;
        let doc = LopdfDocument::from_bytes(bytes)
            .map_err(|e| PaperError::PdfLoad(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), pages = doc.page_count(), "opened PDF");
        Ok(doc)
    }

    fn page_count(&self, doc: &LopdfDocument) -> usize {
        doc.page_count()
    }

    fn page_size(&self, doc: &LopdfDocument, page: usize) -> Result<PageSize> {
        let [llx, lly, urx, ury] = media_box(&doc.inner, doc.page_id(page)?)?;
        Ok(PageSize {
            width: urx - llx,
            height: ury - lly,
        })
    }

    fn page_annotations(&self, doc: &LopdfDocument, page: usize) -> Result<Vec<AnnotationObject>> {
        let objects = page_annotations(&doc.inner, doc.page_id(page)?, doc.frame(page)?)?;
        Ok(objects)
    }

    fn text_in_rect(&self, doc: &LopdfDocument, page: usize, rect: &PageRect) -> Result<String> {
        doc.page_id(page)?;
        Ok(doc
            .chars()
            .and_then(|pages| pages.get(page))
            .map(|chars| text_in_rect(chars, rect))
            .unwrap_or_default())
    }
}
