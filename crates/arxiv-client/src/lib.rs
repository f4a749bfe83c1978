//! arXiv metadata lookup
//!
//! One HTTP request per batch of identifiers; the Atom response is parsed
//! with quick-xml and handed to the title resolver as [`TitleRecord`]s.
//!
//! [`TitleRecord`]: paper_core::TitleRecord

pub mod client;
pub mod error;
pub mod feed;

pub use client::{ArxivClient, ArxivConfig, DEFAULT_API_URL};
pub use error::ArxivError;
pub use feed::{parse_feed, FeedEntry};
