//! Applying status changes to the local and remote copies of an entity.
//!
//! The target status is validated before either store is touched. The
//! local copy is updated first, then the remote one; each store's outcome
//! is reported on its own and neither write is undone if the other fails.

use agency_core::identity::validate_path_segment;
use agency_core::{
    parse_status, transition, Brief, Category, Entity, Post, Signal, SignalStatus, Status,
};
use agency_db::DocumentStore;

use crate::context::SyncContext;
use crate::error::SyncError;
use crate::index::update_index;
use crate::report::{StatusChangeReport, StoreOutcome};

/// Set a brief's status in both stores.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] if the status or id is invalid; nothing
/// is written in that case.
pub async fn set_brief_status<S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
    status: &str,
    dry_run: bool,
) -> Result<StatusChangeReport, SyncError> {
    let status = parse_status(status)?;
    set_status::<Brief, S>(ctx, id, status, dry_run).await
}

/// Set a post's status in both stores.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] if the status or id is invalid.
pub async fn set_post_status<S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
    status: &str,
    dry_run: bool,
) -> Result<StatusChangeReport, SyncError> {
    let status = parse_status(status)?;
    set_status::<Post, S>(ctx, id, status, dry_run).await
}

/// Apply `status` to the entity `id` in the local and then the remote store.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] if `id` is not a valid document id.
/// Store failures are reported in the returned [`StatusChangeReport`].
pub async fn set_status<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
    status: E::Status,
    dry_run: bool,
) -> Result<StatusChangeReport, SyncError> {
    validate_path_segment("id", id)?;

    let local = apply_local::<E, S>(ctx, id, status, dry_run);
    let (remote, index_updated) = apply_remote::<E, S>(ctx, id, status, dry_run).await;

    let report = StatusChangeReport::new(id, status.as_str(), local, remote, index_updated);
    log_report(E::CATEGORY, &report);
    Ok(report)
}

fn apply_local<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
    status: E::Status,
    dry_run: bool,
) -> StoreOutcome {
    let mut entity = match ctx.read_local_by_id::<E>(id) {
        Ok(Some(entity)) => entity,
        Ok(None) => return StoreOutcome::NotFound,
        Err(e) => return failed(E::CATEGORY, id, "local", &e),
    };
    if let Err(e) = transition(entity.status(), status) {
        return failed(E::CATEGORY, id, "local", &e);
    }
    if dry_run {
        return StoreOutcome::WouldUpdate;
    }
    entity.set_status(status);
    match ctx.local().upsert(&entity) {
        Ok(_) => StoreOutcome::Updated,
        Err(e) => failed(E::CATEGORY, id, "local", &e),
    }
}

async fn apply_remote<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    id: &str,
    status: E::Status,
    dry_run: bool,
) -> (StoreOutcome, bool) {
    let mut entity = match ctx.read_remote::<E>(id).await {
        Ok(Some(entity)) => entity,
        Ok(None) => return (StoreOutcome::NotFound, false),
        Err(e) => return (failed(E::CATEGORY, id, "remote", &e), false),
    };
    if let Err(e) = transition(entity.status(), status) {
        return (failed(E::CATEGORY, id, "remote", &e), false);
    }
    if dry_run {
        return (StoreOutcome::WouldUpdate, false);
    }
    entity.set_status(status);
    if let Err(e) = ctx.upsert_remote(&entity).await {
        return (failed(E::CATEGORY, id, "remote", &e), false);
    }

    let index_updated = match entity.index_entry() {
        Some(entry) => match update_index(ctx, E::CATEGORY, vec![entry]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(category = %E::CATEGORY, id, error = %e, "index update failed");
                false
            }
        },
        None => false,
    };
    (StoreOutcome::Updated, index_updated)
}

/// Set a signal's status. Signals are addressed by url and live only in the
/// remote store. Marking a signal `used` records `brief` when given;
/// returning it to `unused` clears any recorded brief.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] if the status is not a signal status.
pub async fn set_signal_status<S: DocumentStore>(
    ctx: &SyncContext<S>,
    url: &str,
    status: &str,
    brief: Option<&str>,
    dry_run: bool,
) -> Result<StatusChangeReport, SyncError> {
    let status: SignalStatus = parse_status(status)?;

    let (id, remote) = match find_signal(ctx, url).await {
        Ok(Some(signal)) => {
            let id = signal.id.clone();
            (id, apply_signal(ctx, signal, status, brief, dry_run).await)
        }
        Ok(None) => (url.to_string(), StoreOutcome::NotFound),
        Err(e) => (url.to_string(), failed(Category::Signals, url, "remote", &e)),
    };

    let mut report =
        StatusChangeReport::new(id, status.as_str(), StoreOutcome::NotApplicable, remote, false);
    report.url = Some(url.to_string());
    log_report(Category::Signals, &report);
    Ok(report)
}

async fn find_signal<S: DocumentStore>(
    ctx: &SyncContext<S>,
    url: &str,
) -> Result<Option<Signal>, SyncError> {
    let Some(doc) = ctx
        .query_remote_by_field(Category::Signals, "url", url)
        .await?
        .into_iter()
        .next()
    else {
        return Ok(None);
    };
    serde_json::from_value(doc.data)
        .map(Some)
        .map_err(|e| SyncError::document(ctx.doc_path(Category::Signals, &doc.id), e))
}

async fn apply_signal<S: DocumentStore>(
    ctx: &SyncContext<S>,
    mut signal: Signal,
    status: SignalStatus,
    brief: Option<&str>,
    dry_run: bool,
) -> StoreOutcome {
    if let Err(e) = transition(signal.status, status) {
        return failed(Category::Signals, &signal.url, "remote", &e);
    }
    if dry_run {
        return StoreOutcome::WouldUpdate;
    }
    signal.apply_status(status, brief);
    match ctx.upsert_remote(&signal).await {
        Ok(()) => StoreOutcome::Updated,
        Err(e) => failed(Category::Signals, &signal.url, "remote", &e),
    }
}

fn failed(
    category: Category,
    key: &str,
    store: &'static str,
    error: &dyn std::fmt::Display,
) -> StoreOutcome {
    tracing::warn!(category = %category, key, store, error = %error, "status update failed");
    StoreOutcome::Failed {
        reason: error.to_string(),
    }
}

fn log_report(category: Category, report: &StatusChangeReport) {
    tracing::info!(
        category = %category,
        id = %report.id,
        status = %report.status,
        local = report.local.label(),
        remote = report.remote.label(),
        success = report.success,
        "status change applied"
    );
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
