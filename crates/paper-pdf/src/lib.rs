//! lopdf and pdf-extract implementation of the paper-core PDF seam
//!
//! - [`LopdfBackend`]: annotations, page geometry and positioned text
//! - [`PdfTitleGuesser`]: local title guesses for the title resolver

pub mod annotations;
pub mod backend;
pub mod error;
pub mod objects;
pub mod text;
pub mod title;

pub use backend::{LopdfBackend, LopdfDocument};
pub use error::PdfError;
pub use text::PositionedChar;
pub use title::PdfTitleGuesser;
