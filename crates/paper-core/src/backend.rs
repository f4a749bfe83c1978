//! The seam to a PDF rendering library.
//!
//! Geometry crossing this boundary uses two spaces:
//! - normalized page fractions in [0, 1], origin top-left, y growing down
//!   (annotation quads and boundaries)
//! - absolute page units with the same orientation (text queries)

use std::path::Path;

use crate::error::Result;
use crate::model::Rgb;

/// A point in normalized page-fraction coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Four corners of one highlighted span, ordered top-left, top-right,
/// bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    /// Axis-aligned quad spanning two opposite corners
    pub fn from_corners(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            points: [
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
        }
    }

    pub fn top_left(&self) -> Point {
        self.points[0]
    }

    pub fn bottom_right(&self) -> Point {
        self.points[2]
    }
}

/// Page dimensions in page units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Rectangle in absolute page units, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PageRect {
    /// Scale a normalized quad to absolute units using its top-left and
    /// bottom-right corners.
    pub fn from_quad(quad: &Quad, size: PageSize) -> Self {
        let top_left = quad.top_left();
        let bottom_right = quad.bottom_right();
        Self {
            left: top_left.x * size.width,
            top: top_left.y * size.height,
            right: bottom_right.x * size.width,
            bottom: bottom_right.y * size.height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left.min(self.right)
            && x <= self.left.max(self.right)
            && y >= self.top.min(self.bottom)
            && y <= self.top.max(self.bottom)
    }
}

/// What an annotation object can do, as exposed by the library
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Text markup covering one or more quads
    Markup { quads: Vec<Quad> },
    /// Stand-alone note carrying only text
    Note,
    /// Shape annotation covering a region of the page
    Geometry { boundary: Quad },
    /// Any other annotation subtype
    Other(String),
}

/// One annotation object as reported for a page
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationObject {
    pub kind: ObjectKind,
    /// Foreground colour, alpha already dropped
    pub color: Option<Rgb>,
    /// Free-text contents, empty when absent
    pub contents: String,
}

/// Read-only access to an opened PDF.
///
/// `Document` is the handle returned by [`PdfBackend::open`]; it is owned by
/// the caller and released when dropped. Pages are 0-indexed.
pub trait PdfBackend {
    type Document;

    fn open(&self, path: &Path) -> Result<Self::Document>;

    fn page_count(&self, doc: &Self::Document) -> usize;

    fn page_size(&self, doc: &Self::Document, page: usize) -> Result<PageSize>;

    /// Annotation objects in the order the page lists them
    fn page_annotations(&self, doc: &Self::Document, page: usize) -> Result<Vec<AnnotationObject>>;

    /// Text whose glyphs fall inside `rect`
    fn text_in_rect(&self, doc: &Self::Document, page: usize, rect: &PageRect) -> Result<String>;
}
