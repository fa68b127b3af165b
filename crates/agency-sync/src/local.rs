//! Local file backend: one frontmatter document per entity at
//! `{root}/{category}/{id}.md`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use agency_core::frontmatter;
use agency_core::identity::validate_path_segment;
use agency_core::{Category, Entity};

use crate::error::SyncError;

const EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, category: Category, id: &str) -> PathBuf {
        self.root
            .join(category.as_str())
            .join(format!("{id}.{EXTENSION}"))
    }

    /// Write `entity` as a frontmatter document, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] if the id is not path-safe and
    /// [`SyncError::Local`] on I/O failure.
    pub fn upsert<E: Entity>(&self, entity: &E) -> Result<PathBuf, SyncError> {
        validate_path_segment("id", entity.id())?;
        let path = self.path_for(E::CATEGORY, entity.id());
        let doc = entity.to_document();
        let text = frontmatter::serialize(&doc.metadata, &doc.body);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SyncError::Local {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, text).map_err(|source| SyncError::Local {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "wrote local file");
        Ok(path)
    }

    /// Read the entity stored under `id`, `None` if no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Local`] on I/O failure and
    /// [`SyncError::Document`] if the file does not describe an `E`.
    pub fn read<E: Entity>(&self, id: &str) -> Result<Option<E>, SyncError> {
        validate_path_segment("id", id)?;
        let path = self.path_for(E::CATEGORY, id);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let entity = E::from_document(frontmatter::parse(&text))
                    .map_err(|e| SyncError::document(path.display(), e))?;
                Ok(Some(entity))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SyncError::Local { path, source }),
        }
    }
}
