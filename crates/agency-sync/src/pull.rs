//! Remote to local reconciliation, and read-only lookups.

use std::path::PathBuf;

use agency_core::identity::validate_path_segment;
use agency_core::{Brief, Entity, Post, Signal};
use agency_db::DocumentStore;
use serde::Serialize;

use crate::context::SyncContext;
use crate::dedup::{resolve_duplicate, Resolution};
use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullReport {
    pub id: String,
    pub path: PathBuf,
}

/// Copy the remote version of `id` over the local file.
///
/// # Errors
///
/// Returns [`SyncError::NotFound`] if there is no remote copy, and
/// [`SyncError::Remote`] / [`SyncError::Local`] on store failures.
pub async fn pull<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
) -> Result<PullReport, SyncError> {
    validate_path_segment("id", id)?;
    let entity = ctx
        .read_remote::<E>(id)
        .await?
        .ok_or_else(|| SyncError::NotFound {
            category: E::CATEGORY,
            key: id.to_string(),
        })?;
    let path = ctx.local().upsert(&entity)?;
    tracing::info!(category = %E::CATEGORY, id, path = %path.display(), "pulled remote copy");
    Ok(PullReport {
        id: id.to_string(),
        path,
    })
}

/// # Errors
///
/// See [`pull`].
pub async fn pull_brief<S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
) -> Result<PullReport, SyncError> {
    pull::<Brief, S>(ctx, id).await
}

/// # Errors
///
/// See [`pull`].
pub async fn pull_post<S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
) -> Result<PullReport, SyncError> {
    pull::<Post, S>(ctx, id).await
}

/// Dedup lookup for a url without writing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalCheck {
    pub url: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<String>,
}

/// Report whether a signal with exactly this url is already stored.
///
/// # Errors
///
/// Returns [`SyncError::Remote`] if the lookup fails.
pub async fn check_signal<S: DocumentStore>(
    ctx: &SyncContext<S>,
    url: &str,
) -> Result<SignalCheck, SyncError> {
    let lookup = Signal::new(url, "");
    let existing_id = match resolve_duplicate(ctx, &lookup).await? {
        Resolution::Match(id) => Some(id),
        Resolution::NoMatch => None,
    };
    Ok(SignalCheck {
        url: url.to_string(),
        exists: existing_id.is_some(),
        existing_id,
    })
}

#[cfg(test)]
mod tests {
    use agency_core::Category;
    use agency_db::{MemoryStore, TenantPath};
    use serde_json::json;

    use super::*;
    use crate::local::LocalStore;

    #[tokio::test]
    async fn pull_overwrites_local_with_remote_copy() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SyncContext::new(
            MemoryStore::new(),
            TenantPath::new("clients", "acme"),
            LocalStore::new(dir.path()),
        );
        let stale: Brief =
            serde_json::from_value(json!({"id": "b1", "title": "Old"})).unwrap();
        ctx.local().upsert(&stale).unwrap();
        ctx.store()
            .set(
                &ctx.doc_path(Category::Briefs, "b1"),
                &json!({"id": "b1", "title": "New", "status": "used"}),
            )
            .await
            .unwrap();

        let report = pull_brief(&ctx, "b1").await.unwrap();
        assert_eq!(report.path, dir.path().join("briefs").join("b1.md"));

        let local: Brief = ctx.read_local_by_id("b1").unwrap().unwrap();
        assert_eq!(local.title, "New");
    }

    #[tokio::test]
    async fn pull_of_missing_remote_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SyncContext::new(
            MemoryStore::new(),
            TenantPath::new("clients", "acme"),
            LocalStore::new(dir.path()),
        );
        assert!(matches!(
            pull_post(&ctx, "p404").await,
            Err(SyncError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn check_signal_reports_existing_id() {
        let ctx = SyncContext::new(
            MemoryStore::new(),
            TenantPath::new("clients", "acme"),
            LocalStore::new("unused"),
        );
        let url = "https://x.com/p/1";
        assert!(!check_signal(&ctx, url).await.unwrap().exists);

        ctx.store()
            .set(
                &ctx.doc_path(Category::Signals, "s1"),
                &json!({"id": "s1", "url": url}),
            )
            .await
            .unwrap();
        let check = check_signal(&ctx, url).await.unwrap();
        assert!(check.exists);
        assert_eq!(check.existing_id.as_deref(), Some("s1"));
    }
}
