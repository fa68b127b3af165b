//! Frontmatter documents: a `---` delimited `key: value` block followed by a
//! free-form body.

mod parse;
mod serialize;
mod token;

pub use parse::parse;
pub use serialize::serialize;

/// Metadata values: strings, numbers, booleans, string arrays and nested
/// objects.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

pub(crate) const DELIMITER: &str = "---";

/// A parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}
