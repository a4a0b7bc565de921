//! Policy extraction from root visit counts.
//!
//! Converts the visit counts accumulated at the root into an action
//! distribution, sharpened or flattened by a temperature:
//! - `T == 0`: one-hot on the most-visited action (first index on ties)
//! - `T == 1`: visits normalised as-is
//! - otherwise: `n^(1/T)` normalised

use engine_core::{Action, StateKey};
use rand::Rng;
use thiserror::Error;

use crate::store::StatsStore;

/// Errors from turning visit counts into a policy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Cannot apply temperature {0}: no root action has been visited")]
    DegenerateTemperature(f32),

    #[error("Invalid temperature: {0}")]
    InvalidTemperature(f32),

    #[error("Policy has no probability mass")]
    EmptyPolicy,
}

/// Visit counts of every action at `key`, 0 for untraversed edges.
pub fn root_visits(store: &StatsStore, key: &StateKey, action_size: usize) -> Vec<u32> {
    let mut visits = vec![0; action_size];
    for (action, edge) in store.edges(key) {
        if let Some(slot) = visits.get_mut(action) {
            *slot = edge.visit_count;
        }
    }
    visits
}

/// Index of the first maximal entry. `None` for an empty slice.
pub fn first_argmax(visits: &[u32]) -> Option<Action> {
    visits
        .iter()
        .enumerate()
        // Strict comparison keeps the earliest maximum.
        .fold(None, |best: Option<(Action, u32)>, (action, &n)| match best {
            Some((_, best_n)) if n <= best_n => best,
            _ => Some((action, n)),
        })
        .map(|(action, _)| action)
}

/// Turn visit counts into a probability vector.
pub fn visits_to_policy(visits: &[u32], temperature: f32) -> Result<Vec<f32>, PolicyError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(PolicyError::InvalidTemperature(temperature));
    }

    if temperature == 0.0 {
        return Ok(one_hot(visits));
    }

    let total: u64 = visits.iter().map(|&n| n as u64).sum();
    if total == 0 {
        return Err(PolicyError::DegenerateTemperature(temperature));
    }

    let scaled: Vec<f64> = if temperature == 1.0 {
        visits.iter().map(|&n| n as f64).collect()
    } else {
        let exponent = 1.0 / temperature as f64;
        visits.iter().map(|&n| (n as f64).powf(exponent)).collect()
    };

    let sum: f64 = scaled.iter().sum();
    if !sum.is_finite() {
        // n^(1/T) overflowed: the limit is the greedy policy.
        return Ok(one_hot(visits));
    }

    Ok(scaled.iter().map(|&v| (v / sum) as f32).collect())
}

fn one_hot(visits: &[u32]) -> Vec<f32> {
    let mut policy = vec![0.0; visits.len()];
    if let Some(best) = first_argmax(visits) {
        policy[best] = 1.0;
    }
    policy
}

/// Sample an action from a probability distribution.
pub fn sample_action<R: Rng>(policy: &[f32], rng: &mut R) -> Result<Action, PolicyError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i);
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    policy
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or(PolicyError::EmptyPolicy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_temperature_one_is_proportional() {
        let policy = visits_to_policy(&[30, 70, 0], 1.0).unwrap();
        assert!((policy[0] - 0.3).abs() < 1e-6);
        assert!((policy[1] - 0.7).abs() < 1e-6);
        assert_eq!(policy[2], 0.0);
    }

    #[test]
    fn test_temperature_zero_is_greedy() {
        let policy = visits_to_policy(&[3, 9, 1], 0.0).unwrap();
        assert_eq!(policy, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_greedy_ties_pick_lowest_index() {
        let policy = visits_to_policy(&[0, 5, 2, 5], 0.0).unwrap();
        assert_eq!(policy, vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(first_argmax(&[4, 4, 4]), Some(0));
        assert_eq!(first_argmax(&[]), None);
    }

    #[test]
    fn test_greedy_with_no_visits_picks_first_action() {
        let policy = visits_to_policy(&[0, 0, 0], 0.0).unwrap();
        assert_eq!(policy, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_low_temperature_sharpens() {
        let visits = [2, 4, 4, 10];
        let warm = visits_to_policy(&visits, 1.0).unwrap();
        let cold = visits_to_policy(&visits, 0.5).unwrap();

        assert!(cold[3] > warm[3]);
        assert!(cold[0] < warm[0]);
        let sum: f32 = cold.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        // n^2 normalised: 4, 16, 16, 100 over 136
        assert!((cold[3] - 100.0 / 136.0).abs() < 1e-6);
    }

    #[test]
    fn test_high_temperature_flattens() {
        let visits = [1, 9];
        let hot = visits_to_policy(&visits, 10.0).unwrap();
        let warm = visits_to_policy(&visits, 1.0).unwrap();
        assert!(hot[0] > warm[0]);
        assert!(hot[1] < warm[1]);
    }

    #[test]
    fn test_tiny_temperature_converges_to_greedy() {
        let policy = visits_to_policy(&[10, 12, 3], 1e-3).unwrap();
        assert_eq!(policy, vec![0.0, 1.0, 0.0]);
        assert!(policy.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_zero_visits_with_temperature_is_degenerate() {
        assert_eq!(
            visits_to_policy(&[0, 0, 0], 0.5),
            Err(PolicyError::DegenerateTemperature(0.5))
        );
    }

    #[test]
    fn test_invalid_temperature() {
        assert!(matches!(
            visits_to_policy(&[1, 2], -1.0),
            Err(PolicyError::InvalidTemperature(_))
        ));
        assert!(matches!(
            visits_to_policy(&[1, 2], f32::NAN),
            Err(PolicyError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_root_visits_reads_store() {
        let mut store = StatsStore::new();
        let key = StateKey::from("root");
        store.record_expansion(key.clone(), vec![0.5, 0.0, 0.5]).unwrap();
        store.record_backup(&key, 2, 1.0).unwrap();
        store.record_backup(&key, 2, 0.0).unwrap();
        store.record_backup(&key, 0, 0.0).unwrap();

        assert_eq!(root_visits(&store, &key, 3), vec![1, 0, 2]);
        assert_eq!(root_visits(&store, &StateKey::from("other"), 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_sample_action() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let policy = vec![0.0, 0.5, 0.3, 0.2, 0.0];

        // Sample many times and check distribution
        let mut counts = [0u32; 5];
        for _ in 0..1000 {
            let action = sample_action(&policy, &mut rng).unwrap();
            counts[action] += 1;
        }

        // Action 0 and 4 should never be selected
        assert_eq!(counts[0], 0);
        assert_eq!(counts[4], 0);

        // Action 1 should be most common (~500), action 2 (~300), action 3 (~200)
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);
    }

    #[test]
    fn test_sample_empty_policy() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(
            sample_action(&[0.0, 0.0], &mut rng),
            Err(PolicyError::EmptyPolicy)
        );
    }
}
