//! Data extraction from the class finder page.
//!
//! - [`script`]: parse the page and pull the map literal out of its inline
//!   scripts.
//! - [`text`]: flatten markup-laden fields to plain text.

pub mod script;
pub mod text;

pub use script::{locate_literal, parse_document, script_bodies};
pub use text::markup_text;
