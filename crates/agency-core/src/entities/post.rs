use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::notes::{extract_notes, DistributionNotes};
use super::status::{FunnelStage, PostStatus};
use super::{join_content, put, require_text, Category, Entity};
use crate::error::ValidationError;
use crate::frontmatter::{Document, Metadata};
use crate::identity::{generate_id, validate_path_segment, Identity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
}

/// A finished content artifact generated from a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Id of the one brief this post was generated from.
    pub source_brief: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pillar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_stage: Option<FunnelStage>,
    #[serde(default)]
    pub signals_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pov: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_notes: Option<DistributionNotes>,
}

impl Entity for Post {
    type Status = PostStatus;

    const CATEGORY: Category = Category::Posts;

    fn id(&self) -> &str {
        &self.id
    }

    fn identity(&self) -> Identity {
        Identity::Id(self.id.clone())
    }

    fn status(&self) -> PostStatus {
        self.status
    }

    fn set_status(&mut self, status: PostStatus) {
        self.status = status;
    }

    fn fill_defaults(&mut self, now: &str) {
        if self.id.is_empty() {
            self.id = generate_id(&self.title);
        }
        if self.created_at.is_none() {
            self.created_at = Some(now.to_string());
        }
        if self.word_count.is_none() {
            let words = self.content.split_whitespace().count();
            self.word_count = u32::try_from(words).ok();
        }
        if self.distribution_notes.as_ref().is_some_and(DistributionNotes::is_empty) {
            self.distribution_notes = None;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_path_segment("id", &self.id)?;
        require_text("post", "title", &self.title)?;
        require_text("post", "source_brief", &self.source_brief)?;
        validate_path_segment("source_brief", &self.source_brief)
    }

    fn index_entry(&self) -> Option<Value> {
        let mut entry = Metadata::new();
        entry.insert("id".to_string(), Value::String(self.id.clone()));
        entry.insert("title".to_string(), Value::String(self.title.clone()));
        entry.insert(
            "source_brief".to_string(),
            Value::String(self.source_brief.clone()),
        );
        put(&mut entry, "status", Some(self.status));
        put(&mut entry, "founder", self.founder.as_ref());
        put(&mut entry, "content_pillar", self.content_pillar.as_ref());
        put(&mut entry, "funnel_stage", self.funnel_stage);
        put(&mut entry, "word_count", self.word_count);
        put(&mut entry, "created_at", self.created_at.as_ref());
        Some(Value::Object(entry))
    }

    /// Notes normally live in metadata; a trailing notes section in the body
    /// is honoured when the metadata has none.
    fn from_document(doc: Document) -> Result<Self, ValidationError> {
        let Document { metadata, body } = doc;
        if metadata.contains_key("distribution_notes") {
            return join_content(metadata, body);
        }
        let (content, notes) = extract_notes(&body);
        let mut post: Post = join_content(metadata, content)?;
        post.distribution_notes = notes;
        Ok(post)
    }
}
