//! Folder tree report
//!
//! Each directory renders as one collapsible folder block holding its
//! documents followed by its sub-folders. Directories without any PDF below
//! them render to nothing and vanish from their parent.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::backend::PdfBackend;
use crate::error::{PaperError, Result};
use crate::extract::read_annotations;
use crate::html::{collapsible, escape_html, FOLDER_ID, REPORT_HEADER};
use crate::model::Document;
use crate::titles::TitleResolver;

pub struct TreeReporter<'a, B: PdfBackend> {
    backend: &'a B,
    titles: TitleResolver<'a>,
    use_identifiers: bool,
}

impl<'a, B: PdfBackend> TreeReporter<'a, B> {
    pub fn new(backend: &'a B, titles: TitleResolver<'a>, use_identifiers: bool) -> Self {
        Self {
            backend,
            titles,
            use_identifiers,
        }
    }

    /// Full report for `root`: page header followed by the folder tree.
    pub fn report(&self, root: &Path) -> Result<String> {
        let tree = self.render_dir(root)?;
        if tree.is_empty() {
            return Ok(REPORT_HEADER.to_string());
        }
        Ok(format!("{}{}\n", REPORT_HEADER, tree))
    }

    /// Folder block for `dir`, empty when nothing below it holds a PDF.
    pub fn render_dir(&self, dir: &Path) -> Result<String> {
        let (subdirs, pdfs) = list_entries(dir)?;
        debug!(
            "Scanning {}: {} PDFs, {} sub-folders",
            dir.display(),
            pdfs.len(),
            subdirs.len()
        );

        let mut folders = Vec::new();
        for subdir in &subdirs {
            match self.render_dir(subdir) {
                Ok(fragment) if fragment.is_empty() => {}
                Ok(fragment) => folders.push(fragment),
                Err(PaperError::Io(e)) => {
                    warn!("Skipping folder {}: {}", subdir.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        let titles = self.titles.resolve(&pdfs, self.use_identifiers)?;
        let mut documents = Vec::new();
        for (path, title) in pdfs.iter().zip(titles) {
            match read_annotations(self.backend, path) {
                Ok(annotations) => {
                    documents.push(Document::new(path.clone(), title, annotations).to_html())
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        if documents.is_empty() && folders.is_empty() {
            return Ok(String::new());
        }

        let body = documents
            .into_iter()
            .chain(folders)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(collapsible(
            Some(FOLDER_ID),
            &escape_html(&folder_name(dir)),
            &body,
        ))
    }
}

/// Sub-directories and PDF files of `dir`, each sorted by name.
///
/// Symlinked directories are not followed.
fn list_entries(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    let mut pdfs = Vec::new();
    for entry in entries {
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            subdirs.push(path);
        } else if is_pdf(&path) && (file_type.is_file() || path.is_file()) {
            pdfs.push(path);
        }
    }
    Ok((subdirs, pdfs))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
