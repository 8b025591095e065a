//! Per-team priority queues feeding automatic selection.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

/// Error raised when a queue replacement repeats a player id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("queue repeats player `{id}`")]
pub struct DuplicateQueueEntry {
    /// The repeated player id.
    pub id: String,
}

/// Ordered player preferences per team.
///
/// Entries are not validated for availability when stored: a queued
/// player drafted by someone else simply gets skipped when the queue is
/// consulted, so teams never need to groom their list mid-draft.
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    queues: HashMap<Uuid, Vec<String>>,
}

impl QueueStore {
    /// Replace the whole queue for a team, rejecting duplicate ids.
    pub fn set(&mut self, team: Uuid, ids: Vec<String>) -> Result<(), DuplicateQueueEntry> {
        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(DuplicateQueueEntry { id: id.clone() });
            }
        }
        self.queues.insert(team, ids);
        Ok(())
    }

    /// Current queue for a team, in priority order. Unknown teams have an
    /// empty queue.
    pub fn get(&self, team: Uuid) -> &[String] {
        self.queues.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First queued player that still satisfies `available`, in priority
    /// order. Stale entries are skipped, not removed.
    pub fn first_available(
        &self,
        team: Uuid,
        mut available: impl FnMut(&str) -> bool,
    ) -> Option<&str> {
        self.get(team)
            .iter()
            .map(String::as_str)
            .find(|id| available(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_and_get_preserves_order() {
        let mut store = QueueStore::default();
        let team = Uuid::new_v4();

        store
            .set(team, vec!["p9".into(), "p7".into(), "p1".into()])
            .unwrap();
        assert_eq!(store.get(team), ["p9", "p7", "p1"]);

        store.set(team, vec!["p2".into()]).unwrap();
        assert_eq!(store.get(team), ["p2"]);
    }

    #[test]
    fn duplicate_ids_are_rejected_without_clobbering() {
        let mut store = QueueStore::default();
        let team = Uuid::new_v4();
        store.set(team, vec!["p1".into()]).unwrap();

        let err = store
            .set(team, vec!["p2".into(), "p3".into(), "p2".into()])
            .unwrap_err();
        assert_eq!(err.id, "p2");
        assert_eq!(store.get(team), ["p1"]);
    }

    #[test]
    fn unknown_team_has_empty_queue() {
        let store = QueueStore::default();
        assert!(store.get(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn first_available_skips_stale_entries() {
        let mut store = QueueStore::default();
        let team = Uuid::new_v4();
        store
            .set(team, vec!["p9".into(), "p7".into()])
            .unwrap();

        // p9 already drafted elsewhere: the queue falls through to p7.
        assert_eq!(store.first_available(team, |id| id != "p9"), Some("p7"));
        assert_eq!(store.first_available(team, |_| false), None);
    }
}
