//! Small helpers over the lopdf object model

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::PdfError;

/// US Letter, used when no `/MediaBox` is found in the page tree
pub const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Follow an indirect reference, returning direct objects unchanged.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, PdfError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| PdfError::ObjectError(format!("failed to resolve {:?}: {}", id, e))),
        other => Ok(other),
    }
}

/// Convert a numeric object (Integer or Real) to f64.
pub fn object_to_f64(obj: &Object) -> Result<f64, PdfError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        _ => Err(PdfError::ObjectError(format!("expected number, got {:?}", obj))),
    }
}

/// Numbers of an array entry of `dict`, resolving references on the way.
pub fn number_array(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Vec<f64>> {
    let obj = resolve(doc, dict.get(key).ok()?).ok()?;
    let array = obj.as_array().ok()?;
    array
        .iter()
        .map(|item| resolve(doc, item).and_then(object_to_f64).ok())
        .collect()
}

/// Visit the page dictionary and its ancestors until `visit` returns a value.
///
/// A `/Parent` chain that revisits a node is an error.
fn walk_parents<'a, T>(
    doc: &'a Document,
    page_id: ObjectId,
    mut visit: impl FnMut(&'a Dictionary) -> Option<T>,
) -> Result<Option<T>, PdfError> {
    let mut visited = HashSet::new();
    let mut current = page_id;
    loop {
        if !visited.insert(current) {
            return Err(PdfError::ObjectError(format!(
                "cyclic /Parent chain at {:?}",
                current
            )));
        }
        let dict = doc
            .get_object(current)
            .and_then(|o| o.as_dict())
            .map_err(|e| PdfError::ObjectError(format!("failed to get page dictionary: {}", e)))?;

        if let Some(found) = visit(dict) {
            return Ok(Some(found));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current = parent
                    .as_reference()
                    .map_err(|e| PdfError::ObjectError(format!("invalid /Parent reference: {}", e)))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Look up a key on the page dictionary, walking up `/Parent` links.
pub fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, PdfError> {
    walk_parents(doc, page_id, |dict| dict.get(key).ok())
}

/// Fails when any page's `/Parent` chain is cyclic.
///
/// pdf-extract walks `/Parent` recursively without a guard, so documents
/// are checked before their bytes are handed to it.
pub fn check_page_tree(doc: &Document) -> Result<(), PdfError> {
    for page_id in doc.get_pages().into_values() {
        walk_parents(doc, page_id, |_| None::<()>)?;
    }
    Ok(())
}

/// `[llx, lly, urx, ury]` of a page, normalized so that ll < ur.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4], PdfError> {
    let Some(obj) = inherited(doc, page_id, b"MediaBox")? else {
        return Ok(DEFAULT_MEDIA_BOX);
    };
    let array = resolve(doc, obj)?
        .as_array()
        .map_err(|e| PdfError::ObjectError(format!("/MediaBox is not an array: {}", e)))?;
    if array.len() != 4 {
        return Err(PdfError::ObjectError(format!(
            "expected 4-element /MediaBox, got {}",
            array.len()
        )));
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = object_to_f64(resolve(doc, item)?)?;
    }
    Ok([
        values[0].min(values[2]),
        values[1].min(values[3]),
        values[0].max(values[2]),
        values[1].max(values[3]),
    ])
}

/// Decode a PDF text string entry of `dict`.
///
/// Handles UTF-16BE (with BOM), UTF-8 and falls back to Latin-1.
pub fn text_string(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = resolve(doc, dict.get(key).ok()?).ok()?;
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
