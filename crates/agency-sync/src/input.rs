//! Reading upload candidates from files.
//!
//! Signal files are JSON, either one object or an array of objects. Brief and
//! post files are frontmatter documents, or JSON when the extension is
//! `.json`.

use std::fs;
use std::path::Path;

use agency_core::{frontmatter, Entity, Signal};
use serde_json::Value;

use crate::error::SyncError;
use crate::upload::Candidate;

/// One decoded element of a signal file, or why it could not be decoded.
pub type LoadedSignal = Result<Candidate<Signal>, SyncError>;

/// Read signal candidates from a JSON file, one result per element.
///
/// # Errors
///
/// Returns [`SyncError::Local`] if the file cannot be read and
/// [`SyncError::Document`] if it is not JSON. Elements that are not signals
/// come back as per-element [`SyncError::Document`] errors.
pub fn load_signals(path: &Path) -> Result<Vec<LoadedSignal>, SyncError> {
    let text = read(path)?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| SyncError::document(path.display(), e))?;
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let source = format!("{}[{i}]", path.display());
            serde_json::from_value::<Signal>(item)
                .map(|signal| Candidate::new(signal).with_source(source.clone()))
                .map_err(|e| SyncError::document(source, e))
        })
        .collect())
}

/// Read one brief or post candidate from a file.
///
/// # Errors
///
/// Returns [`SyncError::Local`] if the file cannot be read and
/// [`SyncError::Document`] if it does not describe an `E`.
pub fn load_entity<E: Entity>(path: &Path) -> Result<Candidate<E>, SyncError> {
    let text = read(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let entity = if is_json {
        serde_json::from_str::<E>(&text).map_err(|e| SyncError::document(path.display(), e))?
    } else {
        E::from_document(frontmatter::parse(&text))
            .map_err(|e| SyncError::document(path.display(), e))?
    };
    Ok(Candidate::new(entity).with_source(path.display().to_string()))
}

fn read(path: &Path) -> Result<String, SyncError> {
    fs::read_to_string(path).map_err(|source| SyncError::Local {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use agency_core::{Brief, FunnelStage, Post};

    use super::*;

    #[test]
    fn signal_file_may_hold_one_object_or_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("one.json");
        let many = dir.path().join("many.json");
        fs::write(&one, r#"{"url": "https://x.com/p/1", "content": "hi"}"#).unwrap();
        fs::write(
            &many,
            r#"[{"url": "https://x.com/p/1"}, {"url": "https://x.com/p/2", "type": "tweet"}]"#,
        )
        .unwrap();

        assert_eq!(load_signals(&one).unwrap().len(), 1);
        let loaded = load_signals(&many).unwrap();
        assert_eq!(loaded.len(), 2);
        let second = loaded[1].as_ref().unwrap();
        assert_eq!(second.entity.signal_type.as_deref(), Some("tweet"));
        assert!(second.source.as_deref().unwrap().ends_with("many.json[1]"));
    }

    #[test]
    fn signal_without_url_fails_only_its_own_element() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        fs::write(
            &path,
            r#"[{"url": "https://x.com/p/1"}, {"content": "no url"}, {"url": "https://x.com/p/3"}]"#,
        )
        .unwrap();

        let loaded = load_signals(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].as_ref().unwrap().entity.url, "https://x.com/p/1");
        assert!(matches!(
            &loaded[1],
            Err(SyncError::Document { path, .. }) if path.ends_with("mixed.json[1]")
        ));
        assert_eq!(loaded[2].as_ref().unwrap().entity.url, "https://x.com/p/3");
    }

    #[test]
    fn signal_file_that_is_not_json_fails_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_signals(&path),
            Err(SyncError::Document { .. })
        ));
    }

    #[test]
    fn brief_loads_from_markdown_with_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b1.md");
        fs::write(
            &path,
            "---\nid: b1\ntitle: Caching\nfunnel_stage: TOFU\nsignals:\n  - https://x.com/p/1\n---\nOutline here.\n",
        )
        .unwrap();

        let brief: Brief = load_entity(&path).unwrap().entity;
        assert_eq!(brief.id, "b1");
        assert_eq!(brief.funnel_stage, Some(FunnelStage::Tofu));
        assert_eq!(brief.signals, vec!["https://x.com/p/1".to_string()]);
        assert_eq!(brief.content, "Outline here.\n");
    }

    #[test]
    fn post_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p1.json");
        fs::write(
            &path,
            r#"{"id": "p1", "title": "T", "source_brief": "b1", "template": {"id": "t1", "name": "Story"}}"#,
        )
        .unwrap();

        let post: Post = load_entity(&path).unwrap().entity;
        assert_eq!(post.template.unwrap().name, "Story");
    }

    #[test]
    fn missing_file_is_a_local_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_entity::<Brief>(&dir.path().join("nope.md")),
            Err(SyncError::Local { .. })
        ));
    }
}
