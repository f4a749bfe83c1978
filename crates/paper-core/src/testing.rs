//! In-memory stand-ins for the PDF library and the title sources.
//!
//! Files are keyed by base name so the same fakes work for bare names and
//! for paths inside temporary directories.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::backend::{AnnotationObject, PageRect, PageSize, PdfBackend};
use crate::error::{PaperError, Result};
use crate::titles::{IdentifierTitleSource, LocalTitleSource, TitleRecord};

fn key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct FakePage {
    size: PageSize,
    annotations: Vec<AnnotationObject>,
    text: Vec<(PageRect, String)>,
}

impl FakePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: PageSize { width, height },
            annotations: Vec::new(),
            text: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationObject) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Text whose centre lies at the centre of `region`
    pub fn with_text(mut self, region: PageRect, text: &str) -> Self {
        self.text.push((region, text.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakePdf {
    pages: Vec<FakePage>,
}

impl FakePdf {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self { pages }
    }
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pdfs: HashMap<String, FakePdf>,
    opened: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf(mut self, name: &str, pdf: FakePdf) -> Self {
        self.pdfs.insert(name.to_string(), pdf);
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    fn page<'d>(&self, doc: &'d FakePdf, page: usize) -> Result<&'d FakePage> {
        doc.pages
            .get(page)
            .ok_or_else(|| PaperError::PdfQuery(format!("page {} out of range", page)))
    }
}

impl PdfBackend for FakeBackend {
    type Document = FakePdf;

    fn open(&self, path: &Path) -> Result<FakePdf> {
        let name = key(path);
        self.opened.borrow_mut().push(name.clone());
        self.pdfs
            .get(&name)
            .cloned()
            .ok_or_else(|| PaperError::PdfLoad(format!("{}: not a PDF", path.display())))
    }

    fn page_count(&self, doc: &FakePdf) -> usize {
        doc.pages.len()
    }

    fn page_size(&self, doc: &FakePdf, page: usize) -> Result<PageSize> {
        Ok(self.page(doc, page)?.size)
    }

    fn page_annotations(&self, doc: &FakePdf, page: usize) -> Result<Vec<AnnotationObject>> {
        Ok(self.page(doc, page)?.annotations.clone())
    }

    fn text_in_rect(&self, doc: &FakePdf, page: usize, rect: &PageRect) -> Result<String> {
        let parts: Vec<&str> = self
            .page(doc, page)?
            .text
            .iter()
            .filter(|(region, _)| {
                rect.contains(
                    (region.left + region.right) / 2.0,
                    (region.top + region.bottom) / 2.0,
                )
            })
            .map(|(_, text)| text.as_str())
            .collect();
        Ok(parts.join(" "))
    }
}

/// Local titles by file name; unknown files guess an empty title
#[derive(Debug, Default)]
pub struct FakeLocalTitles {
    titles: HashMap<String, String>,
    failures: HashSet<String>,
}

impl FakeLocalTitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, name: &str, title: &str) -> Self {
        self.titles.insert(name.to_string(), title.to_string());
        self
    }

    pub fn with_failure(mut self, name: &str) -> Self {
        self.failures.insert(name.to_string());
        self
    }
}

impl LocalTitleSource for FakeLocalTitles {
    fn guess_title(&self, path: &Path) -> Result<String> {
        let name = key(path);
        if self.failures.contains(&name) {
            return Err(PaperError::TitleGuess(format!("cannot decode {}", name)));
        }
        Ok(self.titles.get(&name).cloned().unwrap_or_default())
    }
}

/// Identifier lookup answering in reverse request order
#[derive(Debug, Default)]
pub struct FakeIdentifierLookup {
    titles: HashMap<String, String>,
    fail: bool,
    requests: RefCell<Vec<Vec<String>>>,
}

impl FakeIdentifierLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, identifier: &str, title: &str) -> Self {
        self.titles.insert(identifier.to_string(), title.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.borrow().clone()
    }
}

impl IdentifierTitleSource for FakeIdentifierLookup {
    fn lookup_titles(&self, identifiers: &[String]) -> Result<Vec<TitleRecord>> {
        self.requests.borrow_mut().push(identifiers.to_vec());
        if self.fail {
            return Err(PaperError::MetadataLookup("service unavailable".into()));
        }
        Ok(identifiers
            .iter()
            .rev()
            .filter_map(|id| {
                let base = crate::titles::base_identifier(id);
                self.titles.get(base).map(|title| TitleRecord {
                    identifier: format!("{}v1", base),
                    title: title.clone(),
                })
            })
            .collect())
    }
}
