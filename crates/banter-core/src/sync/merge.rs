//! Deduplicating, order-preserving merge of a locally held sequence
//! with a freshly fetched batch.
//!
//! Pure functions, no I/O and no timers. The engine trusts two things
//! about the backend: each page is internally sorted oldest-first, and
//! forward polls always refetch from skip 0 (the whole recent window),
//! so a global re-sort is never needed. Ids are authoritative: a
//! duplicate id with a differing payload keeps the already-held
//! payload.

use std::collections::HashSet;

use crate::models::Record;

/// Merge a forward-poll batch (fetched from skip 0) into `existing`.
///
/// Items whose id is already present are dropped; the remainder is
/// appended in the order received. Given the page-order assumption
/// above, the result stays sorted and unique, and an already-placed
/// item never moves.
pub fn merge_newer<T: Record>(existing: Vec<T>, incoming: Vec<T>) -> Vec<T> {
    if incoming.is_empty() {
        return existing;
    }
    let seen: HashSet<String> = existing.iter().map(|r| r.record_id().to_string()).collect();
    let mut merged = existing;
    merged.extend(
        incoming
            .into_iter()
            .filter(|r| !seen.contains(r.record_id())),
    );
    merged
}

/// Merge a load-older batch into `existing`, prepending it before the
/// currently held range.
///
/// No cross-validation of ordering between the two ranges is done; if
/// new items arrived between the initial load and the older fetch the
/// boundary may overlap in time. That behavior is preserved as-is
/// pending product input.
pub fn merge_older<T: Record>(existing: Vec<T>, incoming: Vec<T>) -> Vec<T> {
    if incoming.is_empty() {
        return existing;
    }
    let seen: HashSet<String> = existing.iter().map(|r| r.record_id().to_string()).collect();
    let mut merged: Vec<T> = incoming
        .into_iter()
        .filter(|r| !seen.contains(r.record_id()))
        .collect();
    merged.extend(existing);
    merged
}

/// Whether `candidate` should replace `current` in a single-item view
/// (the last-message preview). Ties replace, so a refetch of the same
/// item is a no-op in effect; an older item never wins.
pub fn supersedes<T: Record>(candidate: &T, current: &T) -> bool {
    candidate.created_at() >= current.created_at()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        at: u64,
        payload: &'static str,
    }

    impl Record for Item {
        fn record_id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> u64 {
            self.at
        }
    }

    fn item(id: &str, at: u64) -> Item {
        Item {
            id: id.to_string(),
            at,
            payload: "",
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_merge_newer_appends_only_unseen_ids() {
        let existing = vec![item("a", 1), item("b", 2)];
        let incoming = vec![item("a", 1), item("b", 2), item("c", 3)];

        let merged = merge_newer(existing, incoming);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_newer_empty_batch_is_identity() {
        let existing = vec![item("a", 1), item("b", 2)];
        let merged = merge_newer(existing.clone(), vec![]);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_newer_full_duplicate_batch_is_identity() {
        let existing = vec![item("a", 1), item("b", 2)];
        let merged = merge_newer(existing.clone(), existing.clone());
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_newer_keeps_held_payload_on_id_collision() {
        // Edit-in-place is not supported: id is authoritative, a
        // later-arriving payload for a known id is ignored.
        let existing = vec![Item {
            id: "a".to_string(),
            at: 1,
            payload: "original",
        }];
        let incoming = vec![Item {
            id: "a".to_string(),
            at: 1,
            payload: "edited",
        }];

        let merged = merge_newer(existing, incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].payload, "original");
    }

    #[test]
    fn test_merge_newer_preserves_placed_positions() {
        // Ties on created_at must not flip an already-placed item.
        let existing = vec![item("a", 5), item("b", 5)];
        let incoming = vec![item("b", 5), item("a", 5), item("c", 5)];

        let merged = merge_newer(existing, incoming);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_newer_is_id_superset_of_existing() {
        let existing = vec![item("a", 1), item("b", 2)];
        let incoming = vec![item("c", 3), item("d", 4)];

        let merged = merge_newer(existing.clone(), incoming);
        for held in &existing {
            assert!(merged.iter().any(|m| m.id == held.id));
        }
    }

    #[test]
    fn test_merge_older_prepends_filtered_batch() {
        let existing = vec![item("c", 3), item("d", 4)];
        let incoming = vec![item("a", 1), item("b", 2), item("c", 3)];

        let merged = merge_older(existing, incoming);
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_older_empty_batch_is_identity() {
        let existing = vec![item("a", 1)];
        let merged = merge_older(existing.clone(), vec![]);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_older_then_newer_reintroduces_nothing() {
        let existing = vec![item("c", 3)];
        let older = vec![item("a", 1), item("b", 2)];

        let merged = merge_older(existing, older.clone());
        let merged = merge_newer(merged, older);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_supersedes_newer_and_tied_win_older_loses() {
        let held = item("x", 100);
        assert!(supersedes(&item("y", 101), &held));
        assert!(supersedes(&item("y", 100), &held));
        assert!(!supersedes(&item("y", 90), &held));
    }
}
