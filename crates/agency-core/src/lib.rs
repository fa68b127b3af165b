//! Core types for the content synchronization engine: configuration, the
//! signal/brief/post model and its status lifecycle, frontmatter documents,
//! identity helpers, and the category index merge.

pub mod app_config;
pub mod config;
pub mod entities;
pub mod error;
pub mod frontmatter;
pub mod identity;
pub mod index;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use entities::status::{parse_status, transition};
pub use entities::{
    Brief, BriefStatus, Category, DistributionNotes, Entity, FunnelStage, Post, PostStatus,
    Signal, SignalStatus, Status, Template,
};
pub use error::{ConfigError, ParseError, ValidationError};
pub use frontmatter::{Document, Metadata};
pub use identity::Identity;
pub use index::{merge_index, IndexDocument, INDEX_DOC_ID};
