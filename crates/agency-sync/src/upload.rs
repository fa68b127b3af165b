//! Batch uploads to the remote store.
//!
//! Items are processed one at a time: each item's identity check and write
//! finish before the next item starts. A failing item is recorded and the
//! batch continues.

use agency_core::{
    Brief, BriefStatus, Category, Entity, Identity, Post, PostStatus, Signal, SignalStatus,
};
use agency_db::DocumentStore;
use serde_json::Value;

use crate::context::{now, SyncContext};
use crate::dedup::{resolve_duplicate, Resolution};
use crate::error::SyncError;
use crate::index::update_index;
use crate::report::{ItemOutcome, ItemReport, RunSummary, SkipReason, StoreOutcome};

/// Upload behaviour that differs between entity types.
pub trait Upload: Entity {
    /// Whether the entity also has a local file copy.
    const KEEPS_LOCAL_COPY: bool = true;

    /// A remote document this item points at, checked before the write.
    fn reference(&self) -> Option<(Category, &str)> {
        None
    }
}

impl Upload for Signal {
    const KEEPS_LOCAL_COPY: bool = false;
}

impl Upload for Brief {}

impl Upload for Post {
    fn reference(&self) -> Option<(Category, &str)> {
        Some((Category::Briefs, self.source_brief.as_str()))
    }
}

/// One item to upload and, if it came from disk, where it was read from.
#[derive(Debug, Clone)]
pub struct Candidate<E> {
    pub entity: E,
    pub source: Option<String>,
}

impl<E> Candidate<E> {
    pub fn new(entity: E) -> Self {
        Self {
            entity,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UploadOptions<St> {
    /// Resolve identities and report intended writes without persisting.
    pub dry_run: bool,
    /// Also write the local file copy (briefs and posts).
    pub also_local: bool,
    /// Status applied to every candidate before upload.
    pub status: Option<St>,
}

impl<St> Default for UploadOptions<St> {
    fn default() -> Self {
        Self {
            dry_run: false,
            also_local: false,
            status: None,
        }
    }
}

/// Upload a batch of candidates of one entity type.
pub async fn upload<E: Upload, S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidates: Vec<Candidate<E>>,
    options: &UploadOptions<E::Status>,
) -> RunSummary {
    let mut summary = RunSummary::new(E::CATEGORY, options.dry_run);
    let now = now();

    for candidate in candidates {
        let item = upload_one(ctx, candidate, options, &now).await;
        summary.push(item);
    }

    tracing::info!(
        category = %E::CATEGORY,
        dry_run = options.dry_run,
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        "upload finished"
    );
    summary
}

pub async fn upload_signals<S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidates: Vec<Candidate<Signal>>,
    options: &UploadOptions<SignalStatus>,
) -> RunSummary {
    upload(ctx, candidates, options).await
}

pub async fn upload_briefs<S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidates: Vec<Candidate<Brief>>,
    options: &UploadOptions<BriefStatus>,
) -> RunSummary {
    upload(ctx, candidates, options).await
}

pub async fn upload_posts<S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidates: Vec<Candidate<Post>>,
    options: &UploadOptions<PostStatus>,
) -> RunSummary {
    upload(ctx, candidates, options).await
}

async fn upload_one<E: Upload, S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidate: Candidate<E>,
    options: &UploadOptions<E::Status>,
    now: &str,
) -> ItemReport {
    let Candidate { mut entity, source } = candidate;
    if let Some(status) = options.status {
        entity.set_status(status);
    }
    entity.fill_defaults(now);

    let identity = entity.identity();
    let mut report = ItemReport::new(entity.id(), ItemOutcome::Created);
    report.source = source;
    if let Identity::Url(url) = &identity {
        report.url = Some(url.clone());
    }

    if let Err(e) = entity.validate() {
        tracing::warn!(category = %E::CATEGORY, id = %entity.id(), error = %e, "rejecting invalid item");
        report.outcome = ItemOutcome::Failed {
            reason: e.to_string(),
        };
        return report;
    }

    let replacing = match resolve_duplicate(ctx, &entity).await {
        Ok(Resolution::Match(existing_id)) if matches!(identity, Identity::Url(_)) => {
            tracing::info!(%identity, existing_id = %existing_id, "duplicate; skipping");
            report.outcome = ItemOutcome::Skipped {
                reason: SkipReason::Duplicate,
                existing_id,
            };
            return report;
        }
        Ok(Resolution::Match(_)) => true,
        Ok(Resolution::NoMatch) => false,
        Err(e) => {
            tracing::warn!(%identity, error = %e, "identity lookup failed");
            report.outcome = ItemOutcome::Failed {
                reason: e.to_string(),
            };
            return report;
        }
    };

    if let Identity::Url(url) = &identity {
        let conflict = match id_conflict(ctx, &entity, url).await {
            Ok(conflict) => conflict,
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = conflict {
            tracing::warn!(
                category = %E::CATEGORY,
                id = %entity.id(),
                %reason,
                "id taken by another url"
            );
            report.outcome = ItemOutcome::Failed { reason };
            return report;
        }
    }

    if let Some(warning) = check_reference(ctx, &entity).await {
        report.warnings.push(warning);
    }

    let write_local = options.also_local && E::KEEPS_LOCAL_COPY;

    if options.dry_run {
        report.outcome = if replacing {
            ItemOutcome::WouldReplace
        } else {
            ItemOutcome::WouldCreate
        };
        if write_local {
            report.local = Some(StoreOutcome::WouldUpdate);
        }
        return report;
    }

    report.outcome = match ctx.upsert_remote(&entity).await {
        Ok(()) if replacing => ItemOutcome::Replaced,
        Ok(()) => ItemOutcome::Created,
        Err(e) => {
            tracing::warn!(category = %E::CATEGORY, id = %entity.id(), error = %e, "remote write failed");
            ItemOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    if !matches!(report.outcome, ItemOutcome::Failed { .. }) {
        tracing::info!(category = %E::CATEGORY, id = %entity.id(), outcome = report.outcome.label(), "uploaded");
        if let Some(entry) = entity.index_entry() {
            report.index_updated = Some(match update_index(ctx, E::CATEGORY, vec![entry]).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(category = %E::CATEGORY, id = %entity.id(), error = %e, "index update failed");
                    report.warnings.push(format!("index update failed: {e}"));
                    false
                }
            });
        }
    }

    if write_local {
        report.local = Some(match ctx.local().upsert(&entity) {
            Ok(_) => StoreOutcome::Updated,
            Err(e) => {
                tracing::warn!(category = %E::CATEGORY, id = %entity.id(), error = %e, "local write failed");
                StoreOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        });
    }

    report
}

/// A url-keyed item whose id already names a document for another url.
/// Writing it would replace that other document.
async fn id_conflict<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    entity: &E,
    url: &str,
) -> Result<Option<String>, SyncError> {
    let path = ctx.doc_path(E::CATEGORY, entity.id());
    let Some(existing) = ctx.store().get(&path).await? else {
        return Ok(None);
    };
    let held = existing.get("url").and_then(Value::as_str).unwrap_or_default();
    Ok((held != url).then(|| {
        format!(
            "id '{}' is already used by a different url '{held}'",
            entity.id()
        )
    }))
}

/// Warn when the referenced document is missing. Never blocks the upload.
async fn check_reference<E: Upload, S: DocumentStore>(
    ctx: &SyncContext<S>,
    entity: &E,
) -> Option<String> {
    let (category, id) = entity.reference()?;
    let path = ctx.doc_path(category, id);
    match ctx.store().get(&path).await {
        Ok(Some(_)) => None,
        Ok(None) => {
            tracing::warn!(id = %entity.id(), reference = %path, "referenced document not found");
            Some(format!("{category} '{id}' not found in remote store"))
        }
        Err(e) => {
            tracing::warn!(id = %entity.id(), reference = %path, error = %e, "could not check reference");
            Some(format!("could not check {category} '{id}': {e}"))
        }
    }
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
