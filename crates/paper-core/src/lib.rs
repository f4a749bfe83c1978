//! Annotation reports for folders of PDF papers
//!
//! This crate holds the library-independent core: the annotation and
//! document models, extraction over a [`PdfBackend`], batched title
//! resolution, and the collapsible folder-tree report.

pub mod backend;
pub mod error;
pub mod extract;
pub mod html;
pub mod inspect;
pub mod model;
pub mod report;
pub mod titles;

#[cfg(test)]
mod testing;

pub use backend::{AnnotationObject, ObjectKind, PageRect, PageSize, PdfBackend, Point, Quad};
pub use error::{PaperError, Result};
pub use extract::{extract_annotations, read_annotations, Capability};
pub use inspect::describe_annotations;
pub use model::{Annotation, Document, Rgb};
pub use report::TreeReporter;
pub use titles::{IdentifierTitleSource, LocalTitleSource, TitleRecord, TitleResolver};
