//! Session-scoped search statistics.
//!
//! The store maps each visited canonical position (by [`StateKey`]) to its
//! prior policy and visit count, with a nested per-action table of edge
//! statistics. Entries are only ever added or updated, never removed, for as
//! long as the caller keeps the store; a store can be reused across searches
//! from the same or later positions.
//!
//! Invariants maintained here:
//! - an edge entry exists only after a backup through it;
//! - `visit_count(s) == sum of edge visit counts of s`;
//! - a state is expanded exactly once, before any backup through it.

use std::collections::{BTreeMap, HashMap};

use engine_core::{Action, StateKey};
use thiserror::Error;

/// Errors raised by [`StatsStore`] on contract violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("State {0} has not been expanded")]
    NotExpanded(StateKey),

    #[error("State {0} has already been expanded")]
    AlreadyExpanded(StateKey),

    #[error("Action {action} is outside the prior of length {len}")]
    ActionOutOfRange { action: Action, len: usize },
}

/// Statistics of one (state, action) edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStats {
    /// Running mean of values backed up through this edge, from the
    /// perspective of the player to move at the source state.
    pub action_value: f32,
    /// Number of backups through this edge (always >= 1).
    pub visit_count: u32,
}

/// Statistics of one expanded state.
#[derive(Debug, Clone)]
pub struct StateStats {
    /// Completed simulations that passed through this state.
    pub visit_count: u32,
    /// Masked, normalised oracle policy. Immutable after expansion.
    pub prior: Vec<f32>,
    /// Edges taken at least once, ordered by action.
    pub edges: BTreeMap<Action, EdgeStats>,
}

/// Summary counters for debugging and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub states: usize,
    pub edges: usize,
    pub edge_visits: u64,
}

/// Statistics graph owned by one search session.
#[derive(Debug, Default)]
pub struct StatsStore {
    states: HashMap<StateKey, StateStats>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has been expanded.
    #[inline]
    pub fn has_state(&self, key: &StateKey) -> bool {
        self.states.contains_key(key)
    }

    /// Full statistics of an expanded state.
    pub fn state(&self, key: &StateKey) -> Option<&StateStats> {
        self.states.get(key)
    }

    /// Prior probability of `action` at an expanded state.
    pub fn prior(&self, key: &StateKey, action: Action) -> Result<f32, StoreError> {
        let state = self.expanded(key)?;
        state
            .prior
            .get(action)
            .copied()
            .ok_or(StoreError::ActionOutOfRange {
                action,
                len: state.prior.len(),
            })
    }

    /// Visit count of a state (0 if unknown).
    #[inline]
    pub fn state_visits(&self, key: &StateKey) -> u32 {
        self.states.get(key).map_or(0, |s| s.visit_count)
    }

    /// Mean backed-up value of an edge, if it was ever traversed.
    #[inline]
    pub fn edge_value(&self, key: &StateKey, action: Action) -> Option<f32> {
        self.edge(key, action).map(|e| e.action_value)
    }

    /// Visit count of an edge (0 if never traversed).
    #[inline]
    pub fn edge_visits(&self, key: &StateKey, action: Action) -> u32 {
        self.edge(key, action).map_or(0, |e| e.visit_count)
    }

    /// Edge statistics, if the edge was ever traversed.
    pub fn edge(&self, key: &StateKey, action: Action) -> Option<&EdgeStats> {
        self.states.get(key).and_then(|s| s.edges.get(&action))
    }

    /// Traversed edges of a state in ascending action order.
    pub fn edges(&self, key: &StateKey) -> impl Iterator<Item = (Action, &EdgeStats)> + '_ {
        self.states
            .get(key)
            .into_iter()
            .flat_map(|s| s.edges.iter().map(|(a, e)| (*a, e)))
    }

    /// Register a freshly evaluated state with its prior.
    pub fn record_expansion(&mut self, key: StateKey, prior: Vec<f32>) -> Result<(), StoreError> {
        use std::collections::hash_map::Entry;

        match self.states.entry(key) {
            Entry::Occupied(entry) => Err(StoreError::AlreadyExpanded(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(StateStats {
                    visit_count: 0,
                    prior,
                    edges: BTreeMap::new(),
                });
                Ok(())
            }
        }
    }

    /// Fold `value` into the running mean of edge (key, action) and count the
    /// visit on both the edge and the state.
    pub fn record_backup(
        &mut self,
        key: &StateKey,
        action: Action,
        value: f32,
    ) -> Result<(), StoreError> {
        let state = self
            .states
            .get_mut(key)
            .ok_or_else(|| StoreError::NotExpanded(key.clone()))?;

        state
            .edges
            .entry(action)
            .and_modify(|edge| {
                let n = edge.visit_count as f32;
                edge.action_value = (n * edge.action_value + value) / (n + 1.0);
                edge.visit_count += 1;
            })
            .or_insert(EdgeStats {
                action_value: value,
                visit_count: 1,
            });
        state.visit_count += 1;

        Ok(())
    }

    /// Number of expanded states.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop all statistics, starting a fresh session.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Get statistics about the store for debugging.
    pub fn stats(&self) -> StoreStats {
        self.states
            .values()
            .fold(StoreStats::default(), |mut acc, state| {
                acc.states += 1;
                acc.edges += state.edges.len();
                acc.edge_visits += state.edges.values().map(|e| e.visit_count as u64).sum::<u64>();
                acc
            })
    }

    fn expanded(&self, key: &StateKey) -> Result<&StateStats, StoreError> {
        self.states
            .get(key)
            .ok_or_else(|| StoreError::NotExpanded(key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::from(s)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = StatsStore::new();
        assert!(store.is_empty());
        assert!(!store.has_state(&key("root")));
        assert_eq!(store.state_visits(&key("root")), 0);
        assert_eq!(store.edge_visits(&key("root"), 0), 0);
        assert_eq!(store.edge_value(&key("root"), 0), None);
    }

    #[test]
    fn test_prior_before_expansion_fails() {
        let store = StatsStore::new();
        assert_eq!(
            store.prior(&key("root"), 0),
            Err(StoreError::NotExpanded(key("root")))
        );
    }

    #[test]
    fn test_record_expansion() {
        let mut store = StatsStore::new();
        store
            .record_expansion(key("root"), vec![0.25, 0.75, 0.0])
            .unwrap();

        assert!(store.has_state(&key("root")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.state_visits(&key("root")), 0);
        assert!((store.prior(&key("root"), 1).unwrap() - 0.75).abs() < 1e-6);
        assert_eq!(
            store.prior(&key("root"), 3),
            Err(StoreError::ActionOutOfRange { action: 3, len: 3 })
        );
    }

    #[test]
    fn test_double_expansion_fails() {
        let mut store = StatsStore::new();
        store.record_expansion(key("root"), vec![1.0]).unwrap();

        let err = store.record_expansion(key("root"), vec![0.5]).unwrap_err();
        assert_eq!(err, StoreError::AlreadyExpanded(key("root")));

        // The stored prior is untouched.
        assert_eq!(store.prior(&key("root"), 0).unwrap(), 1.0);
    }

    #[test]
    fn test_backup_before_expansion_fails() {
        let mut store = StatsStore::new();
        assert_eq!(
            store.record_backup(&key("root"), 0, 1.0),
            Err(StoreError::NotExpanded(key("root")))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_backup_running_mean() {
        let mut store = StatsStore::new();
        store.record_expansion(key("s"), vec![0.5, 0.5]).unwrap();

        store.record_backup(&key("s"), 1, 1.0).unwrap();
        assert_eq!(store.edge_value(&key("s"), 1), Some(1.0));
        assert_eq!(store.edge_visits(&key("s"), 1), 1);

        store.record_backup(&key("s"), 1, 0.0).unwrap();
        store.record_backup(&key("s"), 1, -0.5).unwrap();
        let q = store.edge_value(&key("s"), 1).unwrap();
        assert!((q - 0.5 / 3.0).abs() < 1e-6);
        assert_eq!(store.edge_visits(&key("s"), 1), 3);

        // Untouched edge stays absent.
        assert_eq!(store.edge_value(&key("s"), 0), None);
        assert_eq!(store.state_visits(&key("s")), 3);
    }

    #[test]
    fn test_state_visits_equal_edge_visit_sum() {
        let mut store = StatsStore::new();
        store
            .record_expansion(key("s"), vec![0.2, 0.3, 0.5])
            .unwrap();

        for (action, value) in [(0, 1.0), (2, -1.0), (2, 0.5), (1, 0.0), (2, 0.0)] {
            store.record_backup(&key("s"), action, value).unwrap();
        }

        let edge_sum: u32 = store.edges(&key("s")).map(|(_, e)| e.visit_count).sum();
        assert_eq!(edge_sum, store.state_visits(&key("s")));
        for (action, edge) in store.edges(&key("s")) {
            assert!(edge.visit_count <= store.state_visits(&key("s")));
            assert!(action < 3);
        }

        let actions: Vec<Action> = store.edges(&key("s")).map(|(a, _)| a).collect();
        assert_eq!(actions, vec![0, 1, 2]);
    }

    #[test]
    fn test_stats_and_clear() {
        let mut store = StatsStore::new();
        store.record_expansion(key("a"), vec![1.0, 0.0]).unwrap();
        store.record_expansion(key("b"), vec![0.0, 1.0]).unwrap();
        store.record_backup(&key("a"), 0, 1.0).unwrap();
        store.record_backup(&key("a"), 0, 1.0).unwrap();
        store.record_backup(&key("b"), 1, -1.0).unwrap();

        let stats = store.stats();
        assert_eq!(stats.states, 2);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.edge_visits, 3);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.stats(), StoreStats::default());
    }
}
