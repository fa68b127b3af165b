//! Identity keys and id generation.
//!
//! Signals are identified by their literal `url`; briefs and posts by an
//! explicit `id`. Ids double as the last segment of a store path, so they are
//! validated to be path-safe.

use std::fmt;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::index::INDEX_DOC_ID;

const MAX_SLUG_LEN: usize = 48;
const SUFFIX_LEN: usize = 6;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The field and value used to detect whether a record already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Exact-match url, no normalization.
    Url(String),
    /// Explicit entity id.
    Id(String),
}

impl Identity {
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Identity::Url(_) => "url",
            Identity::Id(_) => "id",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Identity::Url(v) | Identity::Id(v) => v,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field(), self.value())
    }
}

/// URL-safe slug of a title: lowercase ASCII alphanumerics joined by `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.len() <= MAX_SLUG_LEN {
        return slug;
    }
    slug[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
}

/// New brief/post id: title slug plus a random suffix.
#[must_use]
pub fn generate_id(title: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())]))
        .collect();

    let slug = slugify(title);
    if slug.is_empty() {
        format!("item-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

/// Deterministic document id for a signal url: the first 16 hex characters
/// of SHA-256(url).
#[must_use]
pub fn signal_id_for_url(url: &str) -> String {
    let hash = Sha256::digest(url.as_bytes());
    hash[..8].iter().map(|b| format!("{b:02x}")).collect()
}

/// Check that `value` can be used as a single store path segment.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidField`] for empty values, values with a
/// `/`, a leading `.`, surrounding whitespace, or the reserved index id.
pub fn validate_path_segment(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let reason = if value.is_empty() {
        Some("must not be empty".to_string())
    } else if value.contains('/') || value.contains('\\') {
        Some(format!("'{value}' must not contain path separators"))
    } else if value.starts_with('.') {
        Some(format!("'{value}' must not start with '.'"))
    } else if value != value.trim() {
        Some(format!("'{value}' must not have surrounding whitespace"))
    } else if value == INDEX_DOC_ID {
        Some(format!("'{INDEX_DOC_ID}' is reserved for the category index"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidField { field, reason }),
        None => Ok(()),
    }
}
