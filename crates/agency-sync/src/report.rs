//! Per-item and per-run result values.

use agency_core::Category;
use serde::Serialize;

/// Why an item was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Duplicate,
}

/// What happened to one item of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Created,
    Replaced,
    Skipped {
        reason: SkipReason,
        existing_id: String,
    },
    WouldCreate,
    WouldReplace,
    Failed {
        reason: String,
    },
}

impl ItemOutcome {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Created => "created",
            ItemOutcome::Replaced => "replaced",
            ItemOutcome::Skipped { .. } => "skipped",
            ItemOutcome::WouldCreate => "would_create",
            ItemOutcome::WouldReplace => "would_replace",
            ItemOutcome::Failed { .. } => "failed",
        }
    }
}

/// Result of writing to one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StoreOutcome {
    Updated,
    WouldUpdate,
    NotFound,
    Failed { reason: String },
    NotApplicable,
}

impl StoreOutcome {
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, StoreOutcome::Updated)
    }

    fn counts_as_success(&self) -> bool {
        matches!(self, StoreOutcome::Updated | StoreOutcome::WouldUpdate)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StoreOutcome::Updated => "updated",
            StoreOutcome::WouldUpdate => "would_update",
            StoreOutcome::NotFound => "not_found",
            StoreOutcome::Failed { .. } => "failed",
            StoreOutcome::NotApplicable => "n/a",
        }
    }
}

/// One line of an upload run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File the candidate was read from, when it came from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
    /// Local copy written alongside the remote one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<StoreOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_updated: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ItemReport {
    #[must_use]
    pub fn new(id: impl Into<String>, outcome: ItemOutcome) -> Self {
        Self {
            id: id.into(),
            url: None,
            source: None,
            outcome,
            local: None,
            index_updated: None,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::new(
            id,
            ItemOutcome::Failed {
                reason: reason.to_string(),
            },
        )
    }

    /// Whether any part of the item (remote, local copy, or index) failed.
    #[must_use]
    pub fn has_failure(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed { .. })
            || matches!(self.local, Some(StoreOutcome::Failed { .. }))
            || self.index_updated == Some(false)
    }
}

/// Summary of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub category: Category,
    pub dry_run: bool,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    #[must_use]
    pub fn new(category: Category, dry_run: bool) -> Self {
        Self {
            category,
            dry_run,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ItemReport) {
        match item.outcome {
            ItemOutcome::Skipped { .. } => self.skipped += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
            _ => self.succeeded += 1,
        }
        self.items.push(item);
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.items.iter().any(ItemReport::has_failure)
    }
}

/// Result of applying a status to one entity in both stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChangeReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: String,
    pub local: StoreOutcome,
    pub remote: StoreOutcome,
    pub local_updated: bool,
    pub remote_updated: bool,
    pub index_updated: bool,
    pub success: bool,
}

impl StatusChangeReport {
    pub(crate) fn new(
        id: impl Into<String>,
        status: &str,
        local: StoreOutcome,
        remote: StoreOutcome,
        index_updated: bool,
    ) -> Self {
        Self {
            id: id.into(),
            url: None,
            status: status.to_string(),
            local_updated: local.is_updated(),
            remote_updated: remote.is_updated(),
            index_updated,
            success: local.counts_as_success() || remote.counts_as_success(),
            local,
            remote,
        }
    }

    /// A change refused before either store was touched, such as an invalid id.
    #[must_use]
    pub fn rejected(id: impl Into<String>, status: &str, reason: impl ToString) -> Self {
        let failed = StoreOutcome::Failed {
            reason: reason.to_string(),
        };
        Self::new(id, status, failed.clone(), failed, false)
    }
}
