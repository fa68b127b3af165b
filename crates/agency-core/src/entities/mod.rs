//! Typed content items and the conversions between them, frontmatter
//! documents, and index entries.

mod brief;
mod notes;
mod post;
mod signal;
pub mod status;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::frontmatter::{Document, Metadata};
use crate::identity::Identity;

pub use brief::Brief;
pub use notes::{extract_notes, render_notes, DistributionNotes};
pub use post::{Post, Template};
pub use signal::Signal;
pub use status::{BriefStatus, FunnelStage, PostStatus, SignalStatus, Status};

/// Sub-collection an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Signals,
    Briefs,
    Posts,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Signals, Category::Briefs, Category::Posts];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Signals => "signals",
            Category::Briefs => "briefs",
            Category::Posts => "posts",
        }
    }

    /// Whether the category maintains an `_index` document.
    #[must_use]
    pub fn has_index(self) -> bool {
        matches!(self, Category::Briefs | Category::Posts)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signals" | "signal" => Ok(Category::Signals),
            "briefs" | "brief" => Ok(Category::Briefs),
            "posts" | "post" => Ok(Category::Posts),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// A content item that can be stored locally and remotely.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    type Status: Status + Send + Sync;

    const CATEGORY: Category;

    fn id(&self) -> &str;

    /// The key used for duplicate detection.
    fn identity(&self) -> Identity;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Fill the fields collaborators may omit (id, timestamps, defaults).
    /// `now` is an RFC 3339 timestamp.
    fn fill_defaults(&mut self, now: &str);

    /// Field-level validation run before any write.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Summary entry for the category index, if the category keeps one.
    fn index_entry(&self) -> Option<Value>;

    /// Render as a local frontmatter document: `content` becomes the body.
    fn to_document(&self) -> Document {
        let (metadata, content) = split_content(self);
        Document {
            metadata,
            body: content,
        }
    }

    /// Build from a local frontmatter document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if the metadata does not
    /// describe this entity type.
    fn from_document(doc: Document) -> Result<Self, ValidationError> {
        join_content(doc.metadata, doc.body)
    }
}

/// Serialize `entity` and pull its `content` field out as the body.
pub(crate) fn split_content<E: Serialize>(entity: &E) -> (Metadata, String) {
    let mut metadata = match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => map,
        _ => Metadata::new(),
    };
    let content = match metadata.remove("content") {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    (metadata, content)
}

/// Inverse of [`split_content`], tolerant of what hand-edited frontmatter
/// produces: empty values are treated as absent and numeric ids are read as
/// strings.
pub(crate) fn join_content<E: DeserializeOwned>(
    mut metadata: Metadata,
    body: String,
) -> Result<E, ValidationError> {
    metadata.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
    for (key, value) in &mut metadata {
        if key == "word_count" {
            continue;
        }
        stringify_numbers(value);
    }
    metadata.insert("content".to_string(), Value::String(body));

    serde_json::from_value(Value::Object(metadata)).map_err(|e| ValidationError::InvalidField {
        field: "document",
        reason: e.to_string(),
    })
}

/// Every entity field except `word_count` is textual; the parser's integer
/// coercion is undone for them.
fn stringify_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => *value = Value::String(n.to_string()),
        Value::Array(items) => items.iter_mut().for_each(stringify_numbers),
        Value::Object(map) => map.values_mut().for_each(stringify_numbers),
        _ => {}
    }
}

/// Insert `value` under `key` when present.
pub(crate) fn put<T: Serialize>(entry: &mut Metadata, key: &str, value: Option<T>) {
    if let Some(v) = value.and_then(|v| serde_json::to_value(v).ok()) {
        entry.insert(key.to_string(), v);
    }
}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField { entity, field })
    } else {
        Ok(())
    }
}
