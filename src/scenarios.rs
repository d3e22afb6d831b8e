//! The scenario catalog.
//!
//! Scripted scenarios carry their data and expected labels inline and are
//! checked with the exact tier. External scenarios name a dataset file and a
//! reference Davies–Bouldin score; loading the file is up to the caller.

use std::path::PathBuf;

use tracing::debug;

use crate::cluster::ComputeEngine;
use crate::config::OracleConfig;
use crate::error::{Result, ScenarioContext};
use crate::options::{ResultOption, ResultOptions};
use crate::oracle::{
    ComputeOracle, Dataset, ExactMatch, MaskReport, Precision, QualityOutcome, Verdict,
};
use crate::table::Table;

/// Three 5-dimensional points, far apart relative to the scripted epsilon.
pub const MODE_CHECK_DATA: [f64; 15] = [
    0.0, 5.0, 0.0, 0.0, 0.0, //
    1.0, 1.0, 4.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, 5.0, 1.0,
];

const CHAIN: [f64; 7] = [0.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0];
const PAIR: [f64; 2] = [0.0, 1.0];
const TRIPLE: [f64; 3] = [0.0, 1.0, 1.0];

/// A scripted scenario with exact expected labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelScenario {
    /// Scenario identity, reported on failure.
    pub name: &'static str,
    /// Row-major observations.
    pub data: &'static [f64],
    /// Dimensionality of each observation.
    pub columns: usize,
    /// Per-row weights, or unit weight when absent.
    pub weights: Option<&'static [f64]>,
    /// Neighborhood radius.
    pub epsilon: f64,
    /// Density threshold.
    pub min_observations: usize,
    /// Reference labels, one per row.
    pub expected: &'static [i32],
}

impl LabelScenario {
    /// The observations as an `n × columns` table.
    pub fn data(&self) -> Result<Table<f64>> {
        let rows = self.data.len() / self.columns.max(1);
        Ok(Table::wrap(self.data, rows, self.columns)?)
    }

    /// The weights as an `n × 1` table.
    pub fn weights(&self) -> Option<Table<f64>> {
        self.weights.map(|w| Table::column(w.to_vec()))
    }

    /// The reference labels as an `n × 1` table.
    pub fn expected(&self) -> Table<i32> {
        Table::column(self.expected)
    }

    /// Run through the exact tier.
    pub fn run<E: ComputeEngine>(&self, oracle: &ComputeOracle<E>) -> Result<Verdict<ExactMatch>> {
        let data = self.data()?;
        let weights = self.weights();
        let mut dataset = Dataset::new(self.name, &data);
        if let Some(w) = weights.as_ref() {
            dataset = dataset.with_weights(w);
        }
        oracle.check_responses(dataset, self.epsilon, self.min_observations, &self.expected())
    }
}

const fn scripted(
    name: &'static str,
    data: &'static [f64],
    weights: Option<&'static [f64]>,
    epsilon: f64,
    min_observations: usize,
    expected: &'static [i32],
) -> LabelScenario {
    LabelScenario {
        name,
        data,
        columns: 1,
        weights,
        epsilon,
        min_observations,
        expected,
    }
}

/// Every scripted exact-match scenario.
pub const LABEL_SCENARIOS: &[LabelScenario] = &[
    LabelScenario {
        name: "degenerate",
        data: &MODE_CHECK_DATA,
        columns: 5,
        weights: Some(&[1.0, 1.1, 1.0]),
        epsilon: 0.01,
        min_observations: 1,
        expected: &[0, 1, 2],
    },
    LabelScenario {
        name: "noise pair",
        data: &[0.0, 0.0, 3.0, 4.0],
        columns: 2,
        weights: None,
        epsilon: 4.9,
        min_observations: 2,
        expected: &[-1, -1],
    },
    scripted("boundary pair", &PAIR, None, 2.0, 2, &[0, 0]),
    scripted("boundary at epsilon", &TRIPLE, None, 1.0, 2, &[0, 0, 0]),
    scripted("boundary below epsilon", &TRIPLE, None, 0.999, 2, &[-1, 0, 0]),
    scripted("weights absent", &PAIR, None, 0.5, 6, &[-1, -1]),
    scripted("weights 5,5", &PAIR, Some(&[5.0, 5.0]), 0.5, 6, &[-1, -1]),
    scripted("weights 6,5", &PAIR, Some(&[6.0, 5.0]), 0.5, 6, &[0, -1]),
    scripted("weights 6,6", &PAIR, Some(&[6.0, 6.0]), 0.5, 6, &[0, 1]),
    scripted("core chain min 1", &CHAIN, None, 1.0, 1, &[0, 1, 1, 1, 2, 3, 4]),
    scripted("core chain min 2", &CHAIN, None, 1.0, 2, &[-1, 0, 0, 0, -1, -1, -1]),
    scripted("core chain min 3", &CHAIN, None, 1.0, 3, &[-1, 0, 0, 0, -1, -1, -1]),
    scripted("core chain min 4", &CHAIN, None, 1.0, 4, &[-1, -1, -1, -1, -1, -1, -1]),
];

/// Run every scripted scenario independently, keeping each outcome.
pub fn run_label_scenarios<E: ComputeEngine>(
    oracle: &ComputeOracle<E>,
) -> Vec<(&'static str, Result<Verdict<ExactMatch>>)> {
    LABEL_SCENARIOS
        .iter()
        .map(|s| (s.name, s.run(oracle)))
        .collect()
}

/// The masks exercised by the mode check: each single option, then all of them.
pub fn mode_check_options() -> Vec<ResultOptions> {
    ResultOption::ALL
        .into_iter()
        .map(ResultOptions::only)
        .chain(std::iter::once(ResultOptions::all()))
        .collect()
}

/// Run the mask tier on [`MODE_CHECK_DATA`] for each of `masks`.
pub fn run_mode_checks<E: ComputeEngine>(
    oracle: &ComputeOracle<E>,
    masks: impl IntoIterator<Item = ResultOptions>,
) -> Result<Vec<Verdict<MaskReport>>> {
    let data = Table::wrap(MODE_CHECK_DATA, 3, 5)?;
    masks
        .into_iter()
        .map(|mask| oracle.check_modes(Dataset::new("mode check", &data), 0.01, 1, mask))
        .collect()
}

/// A large-dataset scenario compared through the quality score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScenario {
    /// Scenario identity, reported on failure.
    pub name: &'static str,
    /// Path relative to [`OracleConfig::dataset_root`].
    pub path: &'static str,
    /// Neighborhood radius.
    pub epsilon: f64,
    /// Density threshold.
    pub min_observations: usize,
    /// Published Davies–Bouldin index.
    pub reference_score: f64,
    /// Relative tolerance for the comparison.
    pub tolerance: f64,
    /// Precisions the reference score holds for.
    pub precisions: &'static [Precision],
}

const BOTH: &[Precision] = &[Precision::Single, Precision::Double];

impl QualityScenario {
    /// Whether a reference score exists at `precision`.
    pub fn has_reference(&self, precision: Precision) -> bool {
        self.precisions.contains(&precision)
    }

    /// Where the dataset lives, or `None` when external scenarios are disabled.
    pub fn locate(&self, config: &OracleConfig) -> Option<PathBuf> {
        config.resolve(self.path)
    }

    /// Compare the engine's clustering of `data` against the reference score.
    ///
    /// Without a reference at the oracle's precision the engine is not run and
    /// the outcome is [`QualityOutcome::NoReference`].
    pub fn run<E: ComputeEngine>(
        &self,
        oracle: &ComputeOracle<E>,
        data: &Table<f64>,
    ) -> Result<Verdict<QualityOutcome>> {
        let precision = oracle.precision();
        if !self.has_reference(precision) {
            debug!(scenario = self.name, %precision, "no reference score, skipping");
            return Ok(Verdict {
                context: ScenarioContext {
                    dataset: self.name.to_string(),
                    epsilon: self.epsilon,
                    min_observations: self.min_observations,
                },
                outcome: QualityOutcome::NoReference { precision },
            });
        }
        oracle.check_quality(
            Dataset::new(self.name, data),
            self.epsilon,
            self.min_observations,
            self.reference_score,
            Some(self.tolerance),
        )
    }
}

/// External-dataset scenarios with published reference scores.
pub const EXTERNAL_SCENARIOS: &[QualityScenario] = &[
    QualityScenario {
        name: "mnist: samples=10K, epsilon=1.7e3, min_observations=3",
        path: "workloads/mnist/dataset/mnist_test.csv",
        epsilon: 1.7e3,
        min_observations: 3,
        reference_score: 1.584515,
        tolerance: 1.0e-3,
        // The f64 result is a known divergence; only the f32 score is published.
        precisions: &[Precision::Single],
    },
    QualityScenario {
        name: "hepmass: samples=10K, epsilon=5, min_observations=3",
        path: "workloads/hepmass/dataset/hepmass_10t_test.csv",
        epsilon: 5.0,
        min_observations: 3,
        reference_score: 0.78373,
        tolerance: 1.0e-3,
        precisions: BOTH,
    },
    QualityScenario {
        name: "road_network: samples=20K, epsilon=1.0e3, min_observations=220",
        path: "workloads/road_network/dataset/road_network_20t_cluster.csv",
        epsilon: 1.0e3,
        min_observations: 220,
        reference_score: 0.00036,
        tolerance: 1.0e-1,
        precisions: BOTH,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_shapes_are_consistent() {
        for s in LABEL_SCENARIOS {
            let data = s.data().unwrap();
            assert_eq!(data.row_count(), s.expected.len(), "{}", s.name);
            if let Some(w) = s.weights() {
                assert_eq!(w.row_count(), data.row_count(), "{}", s.name);
            }
        }
    }

    #[test]
    fn mode_check_masks() {
        let masks = mode_check_options();
        assert_eq!(masks.len(), 5);
        assert!(masks[..4].iter().all(|m| m.len() == 1));
        assert_eq!(masks[4], ResultOptions::all());
    }

    #[test]
    fn mnist_has_no_double_reference() {
        let mnist = EXTERNAL_SCENARIOS[0];
        assert!(mnist.has_reference(Precision::Single));
        assert!(!mnist.has_reference(Precision::Double));
        assert!(EXTERNAL_SCENARIOS[1..]
            .iter()
            .all(|s| s.has_reference(Precision::Double)));
    }

    #[test]
    fn external_paths_need_a_root() {
        let disabled = OracleConfig::default();
        assert!(EXTERNAL_SCENARIOS[0].locate(&disabled).is_none());

        let enabled = OracleConfig::default().with_dataset_root("/data");
        assert_eq!(
            EXTERNAL_SCENARIOS[1].locate(&enabled),
            Some(PathBuf::from("/data/workloads/hepmass/dataset/hepmass_10t_test.csv"))
        );
    }
}
