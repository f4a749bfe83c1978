//! Annotation extraction
//!
//! Walks pages in order and annotation objects in page order, turning
//! highlight geometry into page-text queries.

use std::path::Path;

use tracing::debug;

use crate::backend::{AnnotationObject, ObjectKind, PageRect, PageSize, PdfBackend, Quad};
use crate::error::Result;
use crate::model::{Annotation, Rgb};

/// How an annotation object is handled, decided once per object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capability<'a> {
    Highlight(&'a [Quad]),
    FreeText,
    Unsupported,
}

impl<'a> Capability<'a> {
    pub fn of(object: &'a AnnotationObject) -> Self {
        match &object.kind {
            ObjectKind::Markup { quads } if !quads.is_empty() => Capability::Highlight(quads),
            ObjectKind::Note => Capability::FreeText,
            _ => Capability::Unsupported,
        }
    }
}

/// Open `path`, extract its annotations and release the handle.
pub fn read_annotations<B: PdfBackend>(backend: &B, path: &Path) -> Result<Vec<Annotation>> {
    let doc = backend.open(path)?;
    let annotations = extract_annotations(backend, &doc)?;
    debug!(
        "Extracted {} annotations from {}",
        annotations.len(),
        path.display()
    );
    Ok(annotations)
}

/// Extract annotations from an opened document, page by page.
pub fn extract_annotations<B: PdfBackend>(backend: &B, doc: &B::Document) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();

    for page in 0..backend.page_count(doc) {
        let objects = backend.page_annotations(doc, page)?;
        if objects.is_empty() {
            continue;
        }
        let size = backend.page_size(doc, page)?;

        for object in &objects {
            match Capability::of(object) {
                Capability::Highlight(quads) => {
                    let text = highlight_text(backend, doc, page, size, quads)?;
                    let annotation = Annotation::new(text)
                        .with_color(object.color.unwrap_or(Rgb::WHITE))
                        .with_comment(object.contents.clone());
                    annotations.push(annotation);
                }
                Capability::FreeText => {
                    if !object.contents.is_empty() {
                        annotations.push(Annotation::new(object.contents.clone()));
                    }
                }
                Capability::Unsupported => {}
            }
        }
    }

    Ok(annotations)
}

/// Page text under each quad, joined with single spaces.
pub(crate) fn highlight_text<B: PdfBackend>(
    backend: &B,
    doc: &B::Document,
    page: usize,
    size: PageSize,
    quads: &[Quad],
) -> Result<String> {
    let mut parts = Vec::with_capacity(quads.len());
    for quad in quads {
        let rect = PageRect::from_quad(quad, size);
        parts.push(backend.text_in_rect(doc, page, &rect)?);
    }
    Ok(parts.join(" "))
}
