//! MCTS configuration parameters.

use thiserror::Error;

/// Errors from validating a [`MctsConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid MCTS config: {0}")]
    Invalid(String),
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per call to `get_action_probabilities`.
    pub num_simulations: u32,

    /// Exploration constant C in the UCB formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Temperature applied to root visit counts when extracting the policy.
    /// 1.0 = proportional to visit counts
    /// 0.0 = one-hot on the most-visited action
    pub temperature: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 30,
            c_puct: 1.0,
            temperature: 1.0,
        }
    }
}

impl MctsConfig {
    /// Create config for training (visit-proportional policy).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Create config for evaluation/inference (greedy selection).
    pub fn for_evaluation() -> Self {
        Self {
            temperature: 0.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 16,
            c_puct: 1.0,
            temperature: 0.0,
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    /// Reject values the search cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "c_puct must be finite and >= 0, got {}",
                self.c_puct
            )));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "temperature must be finite and >= 0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
