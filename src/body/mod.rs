//! Body extraction: MIME-part tree to a canonical plain-text body.
//!
//! Pure and infallible: a tree with nothing decodable yields
//! [`NO_CONTENT`] instead of an error.

mod extract;
pub mod html;
mod part;
pub mod whitespace;

pub use extract::{MAX_NESTED_DESCENT, NO_CONTENT, extract_body};
pub use html::html_to_text;
pub use part::{InlineBody, MimePart};
pub use whitespace::normalize_whitespace;
