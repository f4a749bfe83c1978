//! Reading a page's `/Annots` into annotation objects
//!
//! PDF stores annotation geometry in absolute user-space units with the
//! origin at the bottom-left of the media box. Everything handed to the core
//! is normalized to page fractions with the origin at the top-left.

use lopdf::{Dictionary, Document, Object, ObjectId};
use paper_core::{AnnotationObject, ObjectKind, Quad, Rgb};

use crate::error::PdfError;
use crate::objects::{number_array, resolve, text_string};

/// Text markup subtypes, all exposing `/QuadPoints`
const MARKUP_SUBTYPES: &[&str] = &["Highlight", "Underline", "StrikeOut", "Squiggly"];

/// Subtypes that only carry a textual note
const NOTE_SUBTYPES: &[&str] = &["Text", "FreeText"];

/// Shape subtypes covering a page region
const GEOMETRY_SUBTYPES: &[&str] = &["Square", "Circle"];

/// Maps absolute user-space coordinates onto normalized page fractions
#[derive(Debug, Clone, Copy)]
pub struct PageFrame {
    llx: f64,
    ury: f64,
    width: f64,
    height: f64,
}

impl PageFrame {
    pub fn from_media_box(media_box: [f64; 4]) -> Self {
        Self {
            llx: media_box[0],
            ury: media_box[3],
            width: media_box[2] - media_box[0],
            height: media_box[3] - media_box[1],
        }
    }

    /// Normalized quad spanning the bounding box of `xs`/`ys`
    fn quad_around(&self, xs: &[f64], ys: &[f64]) -> Quad {
        let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
        let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (width, height) = (self.width.max(f64::EPSILON), self.height.max(f64::EPSILON));
        Quad::from_corners(
            (min(xs) - self.llx) / width,
            (self.ury - max(ys)) / height,
            (max(xs) - self.llx) / width,
            (self.ury - min(ys)) / height,
        )
    }

    /// One quad per group of eight `/QuadPoints` numbers
    pub fn quads_from_points(&self, points: &[f64]) -> Vec<Quad> {
        points
            .chunks_exact(8)
            .map(|group| {
                let xs = [group[0], group[2], group[4], group[6]];
                let ys = [group[1], group[3], group[5], group[7]];
                self.quad_around(&xs, &ys)
            })
            .collect()
    }

    /// Quad for a `/Rect` array `[x1 y1 x2 y2]`
    pub fn quad_from_rect(&self, rect: &[f64]) -> Option<Quad> {
        if rect.len() != 4 {
            return None;
        }
        Some(self.quad_around(&[rect[0], rect[2]], &[rect[1], rect[3]]))
    }
}

/// Convert a `/C` colour array; alpha does not exist in PDF colour arrays.
pub fn color_from_components(components: &[f64]) -> Option<Rgb> {
    match components {
        [gray] => Some(Rgb::from_unit(*gray, *gray, *gray)),
        [r, g, b] => Some(Rgb::from_unit(*r, *g, *b)),
        [c, m, y, k] => Some(Rgb::from_unit(
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        )),
        _ => None,
    }
}

/// Annotation objects of one page in `/Annots` order.
///
/// Entries that are not dictionaries or cannot be resolved are skipped.
pub fn page_annotations(
    doc: &Document,
    page_id: ObjectId,
    frame: PageFrame,
) -> Result<Vec<AnnotationObject>, PdfError> {
    let page = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| PdfError::ObjectError(format!("failed to get page dictionary: {}", e)))?;

    let annots = match page.get(b"Annots") {
        Ok(obj) => resolve(doc, obj)?,
        Err(_) => return Ok(Vec::new()),
    };
    let annots = annots
        .as_array()
        .map_err(|e| PdfError::ObjectError(format!("/Annots is not an array: {}", e)))?;

    let mut objects = Vec::with_capacity(annots.len());
    for entry in annots {
        let dict = match resolve(doc, entry).and_then(|o| {
            o.as_dict()
                .map_err(|e| PdfError::ObjectError(e.to_string()))
        }) {
            Ok(dict) => dict,
            Err(_) => continue,
        };
        objects.push(annotation_object(doc, dict, frame));
    }
    Ok(objects)
}

fn annotation_object(doc: &Document, dict: &Dictionary, frame: PageFrame) -> AnnotationObject {
    let subtype = match dict.get(b"Subtype") {
        Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        _ => String::new(),
    };

    let rect = number_array(doc, dict, b"Rect").unwrap_or_default();
    let kind = if MARKUP_SUBTYPES.contains(&subtype.as_str()) {
        let mut quads = number_array(doc, dict, b"QuadPoints")
            .map(|points| frame.quads_from_points(&points))
            .unwrap_or_default();
        if quads.is_empty() {
            quads.extend(frame.quad_from_rect(&rect));
        }
        ObjectKind::Markup { quads }
    } else if NOTE_SUBTYPES.contains(&subtype.as_str()) {
        ObjectKind::Note
    } else if GEOMETRY_SUBTYPES.contains(&subtype.as_str()) {
        match frame.quad_from_rect(&rect) {
            Some(boundary) => ObjectKind::Geometry { boundary },
            None => ObjectKind::Other(subtype),
        }
    } else {
        ObjectKind::Other(subtype)
    };

    AnnotationObject {
        kind,
        color: number_array(doc, dict, b"C").and_then(|c| color_from_components(&c)),
        contents: text_string(doc, dict, b"Contents").unwrap_or_default(),
    }
}
