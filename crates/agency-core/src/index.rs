//! Category index: one denormalized document listing summary entries for
//! every entity in a category, so listing never needs a collection scan.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved document id holding a category's index.
pub const INDEX_DOC_ID: &str = "_index";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub count: usize,
    pub items: Vec<Value>,
}

impl IndexDocument {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Merge `new` entries into `existing`, keyed by `id`.
///
/// A new entry replaces an existing one with the same id in place. The result
/// is sorted newest first by `created_at` (ISO-8601 string comparison);
/// entries without `created_at` go last in their input order. Entries without
/// a string `id` are dropped.
#[must_use]
pub fn merge_index(existing: Vec<Value>, new: Vec<Value>) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(existing.len() + new.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in existing.into_iter().chain(new) {
        let Some(id) = entry_id(&entry).map(str::to_owned) else {
            tracing::warn!(entry = %entry, "dropping index entry without an id");
            continue;
        };
        match positions.get(&id) {
            Some(&pos) => merged[pos] = entry,
            None => {
                positions.insert(id, merged.len());
                merged.push(entry);
            }
        }
    }

    merged.sort_by(newest_first);
    merged
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

fn created_at(entry: &Value) -> Option<&str> {
    entry
        .get("created_at")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn newest_first(a: &Value, b: &Value) -> Ordering {
    match (created_at(a), created_at(b)) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ids(entries: &[Value]) -> Vec<&str> {
        entries.iter().filter_map(entry_id).collect()
    }

    fn sample() -> Vec<Value> {
        vec![
            json!({"id": "old", "created_at": "2025-01-01T00:00:00Z"}),
            json!({"id": "undated-1"}),
            json!({"id": "new", "created_at": "2025-03-01T00:00:00Z"}),
            json!({"id": "undated-2"}),
            json!({"id": "mid", "created_at": "2025-02-01T00:00:00Z"}),
        ]
    }

    #[test]
    fn sorts_newest_first_with_undated_last_in_input_order() {
        let merged = merge_index(sample(), vec![]);
        assert_eq!(ids(&merged), vec!["new", "mid", "old", "undated-1", "undated-2"]);
    }

    #[test]
    fn merging_nothing_is_a_sort() {
        let sorted = merge_index(sample(), vec![]);
        assert_eq!(merge_index(sorted.clone(), vec![]), sorted);
    }

    #[test]
    fn merging_with_itself_is_a_sort() {
        let sorted = merge_index(sample(), vec![]);
        assert_eq!(merge_index(sample(), sample()), sorted);
    }

    #[test]
    fn new_entry_wins_on_collision() {
        let merged = merge_index(vec![json!({"id": "a", "v": 1})], vec![json!({"id": "a", "v": 2})]);
        assert_eq!(merged, vec![json!({"id": "a", "v": 2})]);
    }

    #[test]
    fn override_keeps_position_among_undated_entries() {
        let merged = merge_index(
            vec![json!({"id": "x"}), json!({"id": "y"}), json!({"id": "z"})],
            vec![json!({"id": "y", "title": "updated"}), json!({"id": "w"})],
        );
        assert_eq!(ids(&merged), vec!["x", "y", "z", "w"]);
        assert_eq!(merged[1]["title"], json!("updated"));
    }

    #[test]
    fn entries_without_id_are_dropped() {
        let merged = merge_index(vec![json!({"title": "no id"}), json!({"id": 5})], vec![]);
        assert!(merged.is_empty());
    }

    #[test]
    fn empty_created_at_counts_as_missing() {
        let merged = merge_index(
            vec![json!({"id": "blank", "created_at": ""}), json!({"id": "dated", "created_at": "2024-06-01"})],
            vec![],
        );
        assert_eq!(ids(&merged), vec!["dated", "blank"]);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let first = serde_json::to_vec(&IndexDocument::new(merge_index(sample(), sample()))).unwrap();
        let second = serde_json::to_vec(&IndexDocument::new(merge_index(sample(), sample()))).unwrap();
        assert_eq!(first, second);
    }
}
