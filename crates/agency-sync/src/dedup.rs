//! Identity resolution against the remote store.
//!
//! Signals are keyed by their literal url; a match means the candidate must
//! not be written. Briefs and posts are keyed by id; a match only tells the
//! caller the write will replace an existing document.

use agency_core::{Entity, Identity};
use agency_db::{DbError, DocumentStore};

use crate::context::SyncContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Match(String),
    NoMatch,
}

/// Look up `candidate`'s identity in the remote store. Always reads current
/// state.
///
/// # Errors
///
/// Returns [`DbError`] if the lookup fails.
pub async fn resolve_duplicate<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    candidate: &E,
) -> Result<Resolution, DbError> {
    match candidate.identity() {
        Identity::Url(url) => find_by_url::<E, S>(ctx, &url).await,
        Identity::Id(id) => {
            let path = ctx.doc_path(E::CATEGORY, &id);
            Ok(match ctx.store().get(&path).await? {
                Some(_) => Resolution::Match(id),
                None => Resolution::NoMatch,
            })
        }
    }
}

async fn find_by_url<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    url: &str,
) -> Result<Resolution, DbError> {
    let hits = ctx.query_remote_by_field(E::CATEGORY, "url", url).await?;
    if hits.len() > 1 {
        tracing::warn!(url, count = hits.len(), "multiple records share one url");
    }
    Ok(hits
        .into_iter()
        .next()
        .map_or(Resolution::NoMatch, |doc| Resolution::Match(doc.id)))
}
