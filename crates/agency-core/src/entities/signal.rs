use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::SignalStatus;
use super::{Category, Entity};
use crate::error::ValidationError;
use crate::identity::{signal_id_for_url, validate_path_segment, Identity};

/// A harvested external content item used as raw material for briefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub signal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default)]
    pub status: SignalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_in_brief: Option<String>,
}

impl Signal {
    /// Minimal signal for a url; everything else defaulted.
    #[must_use]
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            signal_type: None,
            title: None,
            content: content.into(),
            author: None,
            url: url.into(),
            date_posted: None,
            date_added: None,
            status: SignalStatus::default(),
            used_in_brief: None,
        }
    }

    /// Apply a status and keep `used_in_brief` consistent with it: recorded
    /// when marking used with a brief, cleared when returning to unused.
    pub fn apply_status(&mut self, status: SignalStatus, brief: Option<&str>) {
        self.status = status;
        match status {
            SignalStatus::Used => {
                if let Some(brief) = brief {
                    self.used_in_brief = Some(brief.to_string());
                }
            }
            SignalStatus::Unused => self.used_in_brief = None,
            SignalStatus::Rejected => {}
        }
    }
}

impl Entity for Signal {
    type Status = SignalStatus;

    const CATEGORY: Category = Category::Signals;

    fn id(&self) -> &str {
        &self.id
    }

    fn identity(&self) -> Identity {
        Identity::Url(self.url.clone())
    }

    fn status(&self) -> SignalStatus {
        self.status
    }

    fn set_status(&mut self, status: SignalStatus) {
        self.apply_status(status, None);
    }

    fn fill_defaults(&mut self, now: &str) {
        if self.id.is_empty() {
            self.id = signal_id_for_url(&self.url);
        }
        if self.date_added.is_none() {
            self.date_added = Some(now.to_string());
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "signal",
                field: "url",
            });
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ValidationError::InvalidField {
                field: "url",
                reason: format!("'{}' is not an http(s) url", self.url),
            });
        }
        validate_path_segment("id", &self.id)
    }

    fn index_entry(&self) -> Option<Value> {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_ingestion_candidate_with_defaults() {
        let signal: Signal = serde_json::from_value(json!({
            "type": "linkedin_post",
            "title": "Ops hiring",
            "content": "hello",
            "author": "Dana",
            "url": "https://x.com/p/1",
            "date_posted": "2025-02-01"
        }))
        .unwrap();
        assert_eq!(signal.signal_type.as_deref(), Some("linkedin_post"));
        assert_eq!(signal.status, SignalStatus::Unused);
        assert!(signal.id.is_empty());
    }

    #[test]
    fn fill_defaults_derives_id_from_url_and_stamps_date_added() {
        let mut signal = Signal::new("https://x.com/p/1", "hello");
        signal.fill_defaults("2025-03-01T10:00:00Z");
        assert_eq!(signal.id, signal_id_for_url("https://x.com/p/1"));
        assert_eq!(signal.date_added.as_deref(), Some("2025-03-01T10:00:00Z"));

        signal.fill_defaults("2030-01-01T00:00:00Z");
        assert_eq!(signal.date_added.as_deref(), Some("2025-03-01T10:00:00Z"));
    }

    #[test]
    fn validate_requires_http_url() {
        let mut signal = Signal::new("", "x");
        signal.fill_defaults("now");
        assert!(matches!(
            signal.validate(),
            Err(ValidationError::MissingField { field: "url", .. })
        ));

        let mut signal = Signal::new("ftp://x", "x");
        signal.fill_defaults("now");
        assert!(matches!(
            signal.validate(),
            Err(ValidationError::InvalidField { field: "url", .. })
        ));
    }

    #[test]
    fn apply_status_tracks_used_in_brief() {
        let mut signal = Signal::new("https://x.com/p/1", "hello");
        signal.apply_status(SignalStatus::Used, Some("b1"));
        assert_eq!(signal.used_in_brief.as_deref(), Some("b1"));

        signal.apply_status(SignalStatus::Rejected, None);
        assert_eq!(signal.used_in_brief.as_deref(), Some("b1"));

        signal.apply_status(SignalStatus::Unused, None);
        assert!(signal.used_in_brief.is_none());
    }

    #[test]
    fn serializes_type_field_name() {
        let mut signal = Signal::new("https://x.com/p/1", "hello");
        signal.signal_type = Some("tweet".to_string());
        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["type"], json!("tweet"));
        assert_eq!(value["status"], json!("unused"));
        assert!(value.get("author").is_none());
    }

    #[test]
    fn document_round_trip_keeps_content_as_body() {
        let mut signal = Signal::new("https://x.com/p/1", "line one\nline two\n");
        signal.fill_defaults("2025-03-01T10:00:00Z");
        let doc = signal.to_document();
        assert_eq!(doc.body, "line one\nline two\n");
        assert!(!doc.metadata.contains_key("content"));
        assert_eq!(Signal::from_document(doc).unwrap(), signal);
    }
}
