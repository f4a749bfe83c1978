//! Annotation and document models
//!
//! Both are built once during a scan and never mutated afterwards. Rendering
//! is pure: the same value always produces the same HTML fragment.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::html::{collapsible, escape_html};

/// 8-bit RGB colour of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Convert unit-range channels (as stored in PDF colour arrays).
    /// Out-of-range values are clamped.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

fn unit_to_byte(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// One reader-authored marking extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    text: String,
    color: Rgb,
    comment: String,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Rgb::WHITE,
            comment: String::new(),
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// The attached note, `None` when empty
    pub fn comment(&self) -> Option<&str> {
        if self.comment.is_empty() {
            None
        } else {
            Some(&self.comment)
        }
    }

    /// Render as a coloured inline span, wrapped in a titled `<div>`
    /// carrying the comment when there is one.
    pub fn to_html(&self) -> String {
        let span = format!(
            "<span style=\"background-color:rgb{}\">{}</span>",
            self.color,
            escape_html(&self.text)
        );
        match self.comment() {
            Some(comment) => format!("<div title=\"{}\">{}</div>", escape_html(comment), span),
            None => span,
        }
    }
}

/// One PDF file with its resolved title and annotations in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    title: String,
    annotations: Vec<Annotation>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            annotations,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Base name of the file, used as link text and title fallback
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Resolved title, or the file name when resolution came back empty
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            self.file_name()
        } else {
            self.title.clone()
        }
    }

    pub fn to_html(&self) -> String {
        let link = format!(
            "<a href=\"{}\">{}</a><br>",
            escape_html(&self.path.display().to_string()),
            escape_html(&self.file_name())
        );
        let body = if self.annotations.is_empty() {
            link
        } else {
            let items = self
                .annotations
                .iter()
                .map(|a| format!("- {}", a.to_html()))
                .collect::<Vec<_>>()
                .join("<br>\n");
            format!("{}\n{}", link, items)
        };
        collapsible(None, &escape_html(&self.display_title()), &body)
    }
}
