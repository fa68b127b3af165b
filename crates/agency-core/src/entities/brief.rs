use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::notes::{extract_notes, render_notes, DistributionNotes};
use super::status::{BriefStatus, FunnelStage};
use super::{join_content, put, require_text, split_content, Category, Entity};
use crate::error::ValidationError;
use crate::frontmatter::{Document, Metadata};
use crate::identity::{generate_id, validate_path_segment, Identity};

/// A structured writing assignment synthesized from one or more signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: BriefStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pillar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_stage: Option<FunnelStage>,
    /// Soft references to `Signal::url`; they need not resolve.
    #[serde(default)]
    pub signals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pov: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_notes: Option<DistributionNotes>,
}

impl Entity for Brief {
    type Status = BriefStatus;

    const CATEGORY: Category = Category::Briefs;

    fn id(&self) -> &str {
        &self.id
    }

    fn identity(&self) -> Identity {
        Identity::Id(self.id.clone())
    }

    fn status(&self) -> BriefStatus {
        self.status
    }

    fn set_status(&mut self, status: BriefStatus) {
        self.status = status;
    }

    fn fill_defaults(&mut self, now: &str) {
        if self.id.is_empty() {
            self.id = generate_id(&self.title);
        }
        if self.created_at.is_none() {
            self.created_at = Some(now.to_string());
        }
        if self.distribution_notes.as_ref().is_some_and(DistributionNotes::is_empty) {
            self.distribution_notes = None;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_path_segment("id", &self.id)?;
        require_text("brief", "title", &self.title)
    }

    fn index_entry(&self) -> Option<Value> {
        let mut entry = Metadata::new();
        entry.insert("id".to_string(), Value::String(self.id.clone()));
        entry.insert("title".to_string(), Value::String(self.title.clone()));
        put(&mut entry, "status", Some(self.status));
        put(&mut entry, "founder", self.founder.as_ref());
        put(&mut entry, "content_pillar", self.content_pillar.as_ref());
        put(&mut entry, "funnel_stage", self.funnel_stage);
        put(&mut entry, "created_at", self.created_at.as_ref());
        Some(Value::Object(entry))
    }

    /// Distribution notes are written as a trailing body section rather than
    /// metadata, matching how authors edit briefs by hand.
    fn to_document(&self) -> Document {
        let (mut metadata, content) = split_content(self);
        metadata.remove("distribution_notes");
        let body = match &self.distribution_notes {
            Some(notes) if !notes.is_empty() => render_notes(&content, notes),
            _ => content,
        };
        Document { metadata, body }
    }

    fn from_document(doc: Document) -> Result<Self, ValidationError> {
        let (content, notes) = extract_notes(&doc.body);
        let mut brief: Brief = join_content(doc.metadata, content)?;
        if notes.is_some() {
            brief.distribution_notes = notes;
        }
        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::frontmatter::{parse, serialize};

    fn sample() -> Brief {
        Brief {
            id: "ops-hiring-abc123".to_string(),
            title: "Ops hiring is broken".to_string(),
            status: BriefStatus::Draft,
            founder: Some("Sam".to_string()),
            content_pillar: Some("Hiring".to_string()),
            funnel_stage: Some(FunnelStage::Tofu),
            signals: vec!["https://x.com/p/1".to_string()],
            pov: Some("Most teams hire too late".to_string()),
            target_persona: Some("Seed-stage CEO".to_string()),
            created_at: Some("2025-03-01T10:00:00Z".to_string()),
            content: "## Angle\n\nLead with the cost of waiting.".to_string(),
            distribution_notes: None,
        }
    }

    #[test]
    fn parses_author_edited_file_with_distribution_notes() {
        let text = "---\n\
id: ops-hiring-abc123\n\
title: Ops hiring is broken\n\
status: used\n\
funnel_stage: MOFU\n\
signals:\n  - https://x.com/p/1\n  - https://x.com/p/2\n\
---\n\
Draft body.\n\n\
## Distribution Notes\n\n\
- https://linkedin.com/post/9\n\n\
**Best posting time:** Wed 8am\n\
**Tags:** #hiring\n";
        let brief = Brief::from_document(parse(text)).unwrap();
        assert_eq!(brief.status, BriefStatus::Used);
        assert_eq!(brief.funnel_stage, Some(FunnelStage::Mofu));
        assert_eq!(brief.signals.len(), 2);
        assert_eq!(brief.content, "Draft body.");
        let notes = brief.distribution_notes.unwrap();
        assert_eq!(notes.comment_links, vec!["https://linkedin.com/post/9".to_string()]);
        assert_eq!(notes.best_posting_time.as_deref(), Some("Wed 8am"));
        assert_eq!(notes.tags.as_deref(), Some("#hiring"));
    }

    #[test]
    fn local_file_round_trip() {
        let mut brief = sample();
        brief.distribution_notes = Some(DistributionNotes {
            comment_links: vec!["https://a.example/1".to_string()],
            best_posting_time: Some("Thu".to_string()),
            tags: None,
        });
        let doc = brief.to_document();
        assert!(!doc.metadata.contains_key("distribution_notes"));
        let text = serialize(&doc.metadata, &doc.body);
        assert_eq!(Brief::from_document(parse(&text)).unwrap(), brief);
    }

    #[test]
    fn round_trip_without_notes_keeps_content_exactly() {
        let mut brief = sample();
        brief.content = "Body with trailing newline\n".to_string();
        let doc = brief.to_document();
        let text = serialize(&doc.metadata, &doc.body);
        assert_eq!(Brief::from_document(parse(&text)).unwrap(), brief);
    }

    #[test]
    fn empty_optional_fields_in_frontmatter_are_absent() {
        let text = "---\nid: b1\ntitle: T\npov:\nsignals:\nfunnel_stage:\n---\nbody";
        let brief = Brief::from_document(parse(text)).unwrap();
        assert!(brief.pov.is_none());
        assert!(brief.signals.is_empty());
        assert!(brief.funnel_stage.is_none());
        assert_eq!(brief.status, BriefStatus::Draft);
    }

    #[test]
    fn numeric_id_in_frontmatter_is_read_as_text() {
        let brief = Brief::from_document(parse("---\nid: 1042\ntitle: T\n---\n")).unwrap();
        assert_eq!(brief.id, "1042");
    }

    #[test]
    fn unknown_status_in_file_is_rejected() {
        let err = Brief::from_document(parse("---\nid: b1\ntitle: T\nstatus: archived\n---\n"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "document", .. }));
    }

    #[test]
    fn fill_defaults_assigns_slug_id_and_created_at() {
        let mut brief = sample();
        brief.id.clear();
        brief.created_at = None;
        brief.fill_defaults("2025-04-01T00:00:00Z");
        assert!(brief.id.starts_with("ops-hiring-is-broken-"));
        assert_eq!(brief.created_at.as_deref(), Some("2025-04-01T00:00:00Z"));
    }

    #[test]
    fn validate_rejects_reserved_id_and_blank_title() {
        let mut brief = sample();
        brief.id = "_index".to_string();
        assert!(brief.validate().is_err());

        let mut brief = sample();
        brief.title = "  ".to_string();
        assert_eq!(
            brief.validate(),
            Err(ValidationError::MissingField {
                entity: "brief",
                field: "title"
            })
        );
    }

    #[test]
    fn index_entry_has_summary_fields_only() {
        let entry = sample().index_entry().unwrap();
        assert_eq!(
            entry,
            json!({
                "id": "ops-hiring-abc123",
                "title": "Ops hiring is broken",
                "status": "draft",
                "founder": "Sam",
                "content_pillar": "Hiring",
                "funnel_stage": "TOFU",
                "created_at": "2025-03-01T10:00:00Z"
            })
        );
    }
}
