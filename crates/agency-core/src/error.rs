use thiserror::Error;

/// Errors raised while loading configuration. Always fatal, and always
/// raised before any store I/O happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Malformed arguments or entity fields. Fatal for the one operation that
/// raised it; a batch moves on to its next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {entity} status '{value}'; expected one of: {allowed}")]
    InvalidStatus {
        entity: &'static str,
        value: String,
        allowed: String,
    },

    #[error("{entity} is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unknown category '{0}'; expected signals, briefs, or posts")]
    UnknownCategory(String),
}

/// Structural problems found while reading a frontmatter document.
///
/// Never returned from [`crate::frontmatter::parse`]; the parser logs it and
/// degrades to treating the whole input as body text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("document has no opening '---' delimiter")]
    MissingOpeningDelimiter,

    #[error("frontmatter opened on line 1 is never closed")]
    UnclosedFrontmatter,
}
