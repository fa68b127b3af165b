//! Synchronization of signals, briefs and posts between the local file store
//! and the remote document store.
//!
//! Every operation takes a [`SyncContext`] holding the store client, tenant
//! path and local root. Operations return result values (`RunSummary`,
//! `StatusChangeReport`) rather than failing on the first bad item.

pub mod context;
pub mod dedup;
pub mod error;
pub mod index;
pub mod input;
pub mod local;
pub mod pull;
pub mod report;
pub mod status;
pub mod upload;

pub use context::SyncContext;
pub use dedup::{resolve_duplicate, Resolution};
pub use error::SyncError;
pub use index::{list_index, rebuild_index, update_index};
pub use input::{load_entity, load_signals, LoadedSignal};
pub use local::LocalStore;
pub use pull::{check_signal, pull, pull_brief, pull_post, PullReport, SignalCheck};
pub use report::{
    ItemOutcome, ItemReport, RunSummary, SkipReason, StatusChangeReport, StoreOutcome,
};
pub use status::{set_brief_status, set_post_status, set_signal_status, set_status};
pub use upload::{
    upload, upload_briefs, upload_posts, upload_signals, Candidate, Upload, UploadOptions,
};
