use serde::{Deserialize, Serialize};

use crate::options::{ResultOption, ResultOptions};

/// Parameters of one DBSCAN compute request.
///
/// The result options are fixed once the descriptor is handed to an engine:
/// [`ComputeEngine::compute`](super::ComputeEngine::compute) only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Neighborhood radius (inclusive).
    epsilon: f64,
    /// Minimum (weighted) neighborhood size for a core point, the point itself included.
    min_observations: usize,
    /// Optional outputs the engine must expose.
    result_options: ResultOptions,
}

impl Descriptor {
    /// Create a descriptor requesting only [`ResultOption::Responses`].
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_observations` - Neighborhood weight a point needs to be core.
    pub fn new(epsilon: f64, min_observations: usize) -> Self {
        Self {
            epsilon,
            min_observations,
            result_options: ResultOptions::only(ResultOption::Responses),
        }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the density threshold.
    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }

    /// Replace the requested outputs.
    pub fn with_result_options(mut self, options: impl Into<ResultOptions>) -> Self {
        self.result_options = options.into();
        self
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Density threshold.
    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// Outputs the engine must expose, and only those.
    pub fn result_options(&self) -> &ResultOptions {
        &self.result_options
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}
