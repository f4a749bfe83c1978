//! Atom feed parsing for arXiv query responses

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ArxivError;

/// One `<entry>` of a query response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedEntry {
    /// Identifier with version suffix, e.g. `1704.05018v1`
    pub identifier: String,
    pub title: String,
    pub summary: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Other,
}

/// Parse the entries of an arXiv Atom response, in feed order.
///
/// The API reports bad queries as a single entry whose id points at its
/// error namespace; those become [`ArxivError::Api`].
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, ArxivError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field = Field::Other;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => current = Some(FeedEntry::default()),
                b"id" => field = Field::Id,
                b"title" => field = Field::Title,
                b"summary" => field = Field::Summary,
                _ => field = Field::Other,
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    if let Some(entry) = current.take() {
                        if entry.identifier.contains("/api/errors") {
                            return Err(ArxivError::Api(entry.summary));
                        }
                        entries.push(FeedEntry {
                            identifier: identifier_from_id(&entry.identifier).to_string(),
                            ..entry
                        });
                    }
                }
                field = Field::Other;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| ArxivError::Feed(e.to_string()))?;
                append(current.as_mut(), field, &text);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                append(current.as_mut(), field, &String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ArxivError::Feed(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Ok(entries)
}

fn append(entry: Option<&mut FeedEntry>, field: Field, text: &str) {
    let Some(entry) = entry else {
        return;
    };
    let target = match field {
        Field::Id => &mut entry.identifier,
        Field::Title => &mut entry.title,
        Field::Summary => &mut entry.summary,
        Field::Other => return,
    };
    target.push_str(text);
}

/// `http://arxiv.org/abs/1704.05018v1` -> `1704.05018v1`
pub fn identifier_from_id(id: &str) -> &str {
    match id.rfind("/abs/") {
        Some(pos) => &id[pos + "/abs/".len()..],
        None => id.trim(),
    }
}
