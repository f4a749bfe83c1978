//! Page-by-page dump of the annotation objects in a single PDF

use std::fmt::Write as _;
use std::path::Path;

use crate::backend::{ObjectKind, PdfBackend};
use crate::error::Result;
use crate::extract::highlight_text;
use crate::model::Rgb;

/// Describe every annotation object of `path`, one banner per page.
pub fn describe_annotations<B: PdfBackend>(backend: &B, path: &Path) -> Result<String> {
    let doc = backend.open(path)?;
    let mut out = String::new();
    let mut total = 0usize;

    for page in 0..backend.page_count(&doc) {
        let _ = writeln!(out, "========= PAGE {} =========", page + 1);
        let objects = backend.page_annotations(&doc, page)?;
        if objects.is_empty() {
            continue;
        }
        let size = backend.page_size(&doc, page)?;

        for object in &objects {
            total += 1;
            match &object.kind {
                ObjectKind::Markup { quads } => {
                    let text = highlight_text(backend, &doc, page, size, quads)?;
                    let _ = writeln!(out, "{}", text);
                    let _ = writeln!(out, "[{}]", object.color.unwrap_or(Rgb::WHITE));
                    if !object.contents.is_empty() {
                        let _ = writeln!(out, "\t - {}", object.contents);
                    }
                }
                ObjectKind::Geometry { boundary } => {
                    let top_left = boundary.top_left();
                    let bottom_right = boundary.bottom_right();
                    let _ = writeln!(
                        out,
                        "region [{:.3}, {:.3}, {:.3}, {:.3}]",
                        top_left.x, top_left.y, bottom_right.x, bottom_right.y
                    );
                    if !object.contents.is_empty() {
                        let _ = writeln!(out, "{}", object.contents);
                    }
                }
                ObjectKind::Note => {
                    if !object.contents.is_empty() {
                        let _ = writeln!(out, "{}", object.contents);
                    }
                }
                ObjectKind::Other(_) => {}
            }
        }
    }

    if total == 0 {
        out.push_str("no annotations found\n");
    }
    Ok(out)
}
