//! Title resolution for a batch of PDF paths
//!
//! Files named after a preprint identifier (`1704.05018.pdf`) can be looked
//! up in one batched metadata query; every other file goes through a local,
//! per-file guess. Results are merged back into the batch order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, error, warn};

use crate::error::Result;

lazy_static! {
    /// Two numeric groups joined by a dot, optional version, `.pdf` suffix
    static ref IDENTIFIER_FILE_PATTERN: Regex =
        Regex::new(r"(?i)^(\d+\.\d+(?:v\d+)?)\.pdf$").unwrap();

    /// Trailing version marker of an identifier
    static ref VERSION_SUFFIX_PATTERN: Regex = Regex::new(r"v\d+$").unwrap();
}

/// Best-effort title extraction from a single file
pub trait LocalTitleSource {
    fn guess_title(&self, path: &Path) -> Result<String>;
}

/// Batched title lookup by identifier
pub trait IdentifierTitleSource {
    /// One request for all `identifiers`; records may come back in any order
    fn lookup_titles(&self, identifiers: &[String]) -> Result<Vec<TitleRecord>>;
}

/// A title as returned by the metadata service, not yet cleaned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    pub identifier: String,
    pub title: String,
}

/// Extract the identifier from an identifier-shaped file name.
pub fn identifier_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    IDENTIFIER_FILE_PATTERN
        .captures(name)
        .map(|caps| caps[1].to_string())
}

/// Identifier without its version marker, used to match lookup results
pub fn base_identifier(identifier: &str) -> &str {
    match VERSION_SUFFIX_PATTERN.find(identifier) {
        Some(m) => &identifier[..m.start()],
        None => identifier,
    }
}

/// Trim and collapse all whitespace, newlines included, to single spaces.
pub fn clean_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct TitleResolver<'a> {
    local: &'a dyn LocalTitleSource,
    identifiers: &'a dyn IdentifierTitleSource,
}

impl<'a> TitleResolver<'a> {
    pub fn new(local: &'a dyn LocalTitleSource, identifiers: &'a dyn IdentifierTitleSource) -> Self {
        Self { local, identifiers }
    }

    /// Resolve one title per path, in input order.
    ///
    /// Unresolvable titles are empty strings. Local failures are logged and
    /// swallowed; a failed identifier query fails the whole call.
    pub fn resolve(&self, paths: &[PathBuf], use_identifiers: bool) -> Result<Vec<String>> {
        if !use_identifiers {
            return Ok(paths.iter().map(|p| self.guess_local(p)).collect());
        }

        let mut identified: Vec<(usize, String)> = Vec::new();
        let mut local: Vec<(usize, &Path)> = Vec::new();
        for (idx, path) in paths.iter().enumerate() {
            match identifier_of(path) {
                Some(id) => identified.push((idx, id)),
                None => local.push((idx, path)),
            }
        }

        let mut titles = vec![String::new(); paths.len()];

        for (idx, path) in local {
            titles[idx] = self.guess_local(path);
        }

        if !identified.is_empty() {
            let ids: Vec<String> = identified.iter().map(|(_, id)| id.clone()).collect();
            debug!("Looking up {} identifiers", ids.len());

            let by_id: HashMap<String, String> = self
                .identifiers
                .lookup_titles(&ids)?
                .into_iter()
                .map(|record| {
                    (
                        base_identifier(&record.identifier).to_string(),
                        clean_title(&record.title),
                    )
                })
                .collect();

            for (idx, id) in identified {
                match by_id.get(base_identifier(&id)) {
                    Some(title) => titles[idx] = title.clone(),
                    None => warn!("No metadata returned for identifier {}", id),
                }
            }
        }

        Ok(titles)
    }

    fn guess_local(&self, path: &Path) -> String {
        match self.local.guess_title(path) {
            Ok(title) => title,
            Err(e) => {
                error!("Error guessing title for {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}
