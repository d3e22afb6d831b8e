use super::EngineError;
use crate::options::{ResultOption, ResultOptions};
use crate::table::Table;

/// Output of one compute request.
///
/// Each optional output sits behind an accessor that fails with
/// [`EngineError::ResultNotRequested`] when the output was not materialized.
/// `cluster_count` is always available.
#[derive(Debug, Clone)]
pub struct ComputeResult {
    options: ResultOptions,
    cluster_count: usize,
    responses: Option<Table<i32>>,
    core_flags: Option<Table<bool>>,
    core_observations: Option<Table<f64>>,
    core_observation_indices: Option<Table<usize>>,
}

impl ComputeResult {
    /// An empty result for a request with the given options.
    pub fn new(options: ResultOptions, cluster_count: usize) -> Self {
        Self {
            options,
            cluster_count,
            responses: None,
            core_flags: None,
            core_observations: None,
            core_observation_indices: None,
        }
    }

    /// Attach cluster labels (`n × 1`, `-1` for noise).
    pub fn with_responses(mut self, responses: Table<i32>) -> Self {
        self.responses = Some(responses);
        self
    }

    /// Attach core flags (`n × 1`).
    pub fn with_core_flags(mut self, core_flags: Table<bool>) -> Self {
        self.core_flags = Some(core_flags);
        self
    }

    /// Attach core point coordinates (`core_count × d`).
    pub fn with_core_observations(mut self, core_observations: Table<f64>) -> Self {
        self.core_observations = Some(core_observations);
        self
    }

    /// Attach core point indices (`core_count × 1`).
    pub fn with_core_observation_indices(mut self, indices: Table<usize>) -> Self {
        self.core_observation_indices = Some(indices);
        self
    }

    /// The options of the request that produced this result.
    pub fn options(&self) -> &ResultOptions {
        &self.options
    }

    /// Number of non-noise clusters found.
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Cluster label per row, [`NOISE`](super::NOISE) for noise.
    pub fn responses(&self) -> Result<&Table<i32>, EngineError> {
        gated(ResultOption::Responses, &self.responses)
    }

    /// Core-point flag per row.
    pub fn core_flags(&self) -> Result<&Table<bool>, EngineError> {
        gated(ResultOption::CoreFlags, &self.core_flags)
    }

    /// Core points, one row each, in input order.
    pub fn core_observations(&self) -> Result<&Table<f64>, EngineError> {
        gated(ResultOption::CoreObservations, &self.core_observations)
    }

    /// Input-order row index of each core point.
    pub fn core_observation_indices(&self) -> Result<&Table<usize>, EngineError> {
        gated(
            ResultOption::CoreObservationIndices,
            &self.core_observation_indices,
        )
    }

    /// Query one output by name, discarding the value.
    pub fn query(&self, option: ResultOption) -> Result<(), EngineError> {
        match option {
            ResultOption::Responses => self.responses().map(drop),
            ResultOption::CoreFlags => self.core_flags().map(drop),
            ResultOption::CoreObservations => self.core_observations().map(drop),
            ResultOption::CoreObservationIndices => self.core_observation_indices().map(drop),
        }
    }
}

fn gated<T>(option: ResultOption, field: &Option<T>) -> Result<&T, EngineError> {
    field
        .as_ref()
        .ok_or(EngineError::ResultNotRequested { option })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_outputs_are_gated() {
        let result = ComputeResult::new(ResultOptions::only(ResultOption::Responses), 1)
            .with_responses(Table::column(vec![0, 0]));

        assert_eq!(result.responses().unwrap().as_slice(), &[0, 0]);
        assert_eq!(
            result.core_flags().unwrap_err(),
            EngineError::ResultNotRequested {
                option: ResultOption::CoreFlags
            }
        );
        assert!(result.core_observations().is_err());
        assert!(result.core_observation_indices().is_err());
        assert_eq!(result.cluster_count(), 1);
    }

    #[test]
    fn query_dispatches_by_option() {
        let result = ComputeResult::new(ResultOptions::all(), 0)
            .with_core_observation_indices(Table::column(Vec::new()));
        assert!(result.query(ResultOption::CoreObservationIndices).is_ok());
        assert!(result.query(ResultOption::Responses).is_err());
    }
}
