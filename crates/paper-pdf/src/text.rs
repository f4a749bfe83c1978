//! Positioned glyphs from pdf-extract and rectangle text queries over them
//!
//! pdf-extract drives an [`OutputDev`] with one call per glyph. The collector
//! keeps each glyph's position in top-left page units so that queries match
//! the geometry produced by the annotation reader.

use std::panic::{self, AssertUnwindSafe};

use paper_core::PageRect;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::debug;

use crate::error::PdfError;

/// Horizontal gap, in multiples of the font size, treated as a word break
const WORD_GAP: f64 = 0.15;

/// Baseline shift, in multiples of the font size, treated as a line break
const LINE_SHIFT: f64 = 0.5;

/// One glyph in top-left page units
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedChar {
    pub text: String,
    /// Left edge of the glyph
    pub x: f64,
    /// Baseline, measured down from the top of the page
    pub baseline: f64,
    /// Advance width
    pub width: f64,
    /// Effective font size after the text matrix
    pub size: f64,
}

impl PositionedChar {
    fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.baseline - self.size * 0.35)
    }
}

/// Collects glyphs per page, optionally stopping after `page_limit` pages.
#[derive(Debug, Default)]
pub struct CharCollector {
    pages: Vec<Vec<PositionedChar>>,
    origin: (f64, f64),
    page_limit: Option<u32>,
    stopped: bool,
}

impl CharCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_limit(limit: u32) -> Self {
        Self {
            page_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn into_pages(self) -> Vec<Vec<PositionedChar>> {
        self.pages
    }
}

impl OutputDev for CharCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        if self.page_limit.is_some_and(|limit| page_num > limit) {
            // output_doc has no cancellation; an error is the only way out
            self.stopped = true;
            return Err(OutputError::FormatError(std::fmt::Error));
        }
        self.origin = (media_box.llx.min(media_box.urx), media_box.ury.max(media_box.lly));
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let Some(page) = self.pages.last_mut() else {
            return Ok(());
        };
        let x_scale = (trm.m11 * trm.m11 + trm.m12 * trm.m12).sqrt();
        let y_scale = (trm.m21 * trm.m21 + trm.m22 * trm.m22).sqrt();
        page.push(PositionedChar {
            text: char.to_string(),
            x: trm.m31 - self.origin.0,
            baseline: self.origin.1 - trm.m32,
            width: width * font_size * x_scale,
            size: font_size * y_scale,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Collect the glyphs of every page (or the first `page_limit` pages).
///
/// pdf-extract can panic on malformed content streams, so the walk runs
/// inside `catch_unwind`.
pub fn collect_chars(
    data: &[u8],
    page_limit: Option<u32>,
) -> Result<Vec<Vec<PositionedChar>>, PdfError> {
    let doc = pdf_extract::Document::load_mem(data)
        .map_err(|e| PdfError::ParseError(e.to_string()))?;
    let mut collector = match page_limit {
        Some(limit) => CharCollector::with_page_limit(limit),
        None => CharCollector::new(),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::output_doc(&doc, &mut collector)
    }));
    match result {
        Ok(Ok(())) => {}
        Ok(Err(_)) if collector.stopped => {}
        Ok(Err(e)) => return Err(PdfError::TextError(format!("{:?}", e))),
        Err(_) => {
            return Err(PdfError::TextError(
                "text extraction panicked (malformed document)".into(),
            ))
        }
    }

    let pages = collector.into_pages();
    debug!(
        pages = pages.len(),
        chars = pages.iter().map(Vec::len).sum::<usize>(),
        "collected positioned text"
    );
    Ok(pages)
}

/// Text of the glyphs whose centres fall inside `rect`, in content order.
///
/// Spaces are inserted where the glyph stream jumps by more than a small
/// fraction of the font size, then whitespace is collapsed.
pub fn text_in_rect(chars: &[PositionedChar], rect: &PageRect) -> String {
    let mut raw = String::new();
    let mut previous: Option<&PositionedChar> = None;

    for ch in chars {
        let (cx, cy) = ch.center();
        if !rect.contains(cx, cy) {
            continue;
        }
        if let Some(prev) = previous {
            let size = prev.size.max(ch.size).max(f64::EPSILON);
            let gap = ch.x - (prev.x + prev.width);
            let shift = (ch.baseline - prev.baseline).abs();
            if shift > LINE_SHIFT * size || gap > WORD_GAP * size || gap < -size {
                raw.push(' ');
            }
        }
        raw.push_str(&ch.text);
        previous = Some(ch);
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text at the largest font size on a page.
///
/// Sizes within half a point of the maximum count as the same size. Returns
/// `None` when that text has fewer than two non-space characters.
pub fn largest_text(chars: &[PositionedChar]) -> Option<String> {
    let max = chars
        .iter()
        .filter(|c| !c.text.trim().is_empty())
        .map(|c| c.size)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }

    let selected: Vec<PositionedChar> = chars
        .iter()
        .filter(|c| c.size >= max - 0.5)
        .cloned()
        .collect();
    let everywhere = PageRect {
        left: f64::NEG_INFINITY,
        top: f64::NEG_INFINITY,
        right: f64::INFINITY,
        bottom: f64::INFINITY,
    };
    let text = text_in_rect(&selected, &everywhere);
    if text.chars().filter(|c| !c.is_whitespace()).count() < 2 {
        return None;
    }
    Some(text)
}
