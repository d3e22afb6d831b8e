//! The compute oracle: build a request, run the engine once, route the result.

use std::fmt;

use tracing::{debug, info_span, warn};

use super::exact::{self, ExactMatch, StructuralMatch};
use super::mask::{self, MaskReport};
use super::metric;
use super::tolerance::{self, ToleranceCheck};
use crate::cluster::{ComputeEngine, ComputeResult, Descriptor};
use crate::config::OracleConfig;
use crate::error::{Error, Result, ScenarioContext};
use crate::options::{ResultOption, ResultOptions};
use crate::table::Table;

/// A named input dataset with optional per-row weights.
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    /// Identity reported with every failure.
    pub name: &'a str,
    /// `n × d` observations.
    pub data: &'a Table<f64>,
    /// `n × 1` weights; `None` means unit weight.
    pub weights: Option<&'a Table<f64>>,
}

impl<'a> Dataset<'a> {
    /// An unweighted dataset.
    pub fn new(name: &'a str, data: &'a Table<f64>) -> Self {
        Self {
            name,
            data,
            weights: None,
        }
    }

    /// Attach per-row weights.
    pub fn with_weights(mut self, weights: &'a Table<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// A passed check together with the inputs it ran on.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict<T> {
    /// The scenario inputs.
    pub context: ScenarioContext,
    /// What the check observed.
    pub outcome: T,
}

/// Floating-point precision a score is computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// `f32`.
    Single,
    /// `f64`.
    Double,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Single => "f32",
            Precision::Double => "f64",
        })
    }
}

/// Outcome of a quality-score comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityOutcome {
    /// Fewer than two clusters: the score is undefined and was not compared.
    Skipped { cluster_count: usize },
    /// No reference score exists at this precision; the engine was not run.
    NoReference { precision: Precision },
    /// The score was computed and agreed with the reference.
    Compared {
        cluster_count: usize,
        check: ToleranceCheck,
    },
}

impl QualityOutcome {
    /// True when no comparison took place.
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            QualityOutcome::Skipped { .. } | QualityOutcome::NoReference { .. }
        )
    }
}

/// Labels of a result whose request named [`ResultOption::Responses`].
fn requested_responses(result: &ComputeResult) -> Result<&Table<i32>> {
    result
        .responses()
        .map_err(|e| Error::ContractViolation {
            option: ResultOption::Responses,
            requested: true,
            detail: format!("requested output was not accessible: {e}"),
        })
}

/// Drives a [`ComputeEngine`] through validation scenarios.
#[derive(Debug, Clone)]
pub struct ComputeOracle<E> {
    engine: E,
    config: OracleConfig,
}

impl<E: ComputeEngine> ComputeOracle<E> {
    /// Create an oracle with the default configuration.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: OracleConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: OracleConfig) -> Self {
        self.config = config;
        self
    }

    /// The engine under test.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The active configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Precision of the tables handed to the engine and of every score.
    pub fn precision(&self) -> Precision {
        Precision::Double
    }

    /// Invoke the engine exactly once.
    ///
    /// Engine failures are returned as [`Error::Upstream`] wrapped in scenario
    /// context; they are never retried.
    pub fn run(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
        options: ResultOptions,
    ) -> Result<ComputeResult> {
        let context = Self::context(dataset, epsilon, min_observations);
        let span = info_span!(
            "clump_oracle::compute",
            dataset = dataset.name,
            epsilon,
            min_observations
        );
        let _enter = span.enter();

        let descriptor = Descriptor::new(epsilon, min_observations).with_result_options(options);
        debug!(
            rows = dataset.data.row_count(),
            columns = dataset.data.column_count(),
            weighted = dataset.weights.is_some(),
            options = %descriptor.result_options(),
            "invoking compute engine"
        );

        match self.engine.compute(&descriptor, dataset.data, dataset.weights) {
            Ok(result) => {
                debug!(cluster_count = result.cluster_count(), "compute finished");
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "compute engine failed");
                Err(Error::Upstream(e).with_context(&context))
            }
        }
    }

    fn context(dataset: Dataset<'_>, epsilon: f64, min_observations: usize) -> ScenarioContext {
        ScenarioContext {
            dataset: dataset.name.to_string(),
            epsilon,
            min_observations,
        }
    }

    fn labels(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
    ) -> Result<ComputeResult> {
        self.run(
            dataset,
            epsilon,
            min_observations,
            ResultOptions::only(ResultOption::Responses),
        )
    }

    /// Exact tier: labels must equal `reference` row for row.
    pub fn check_responses(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
        reference: &Table<i32>,
    ) -> Result<Verdict<ExactMatch>> {
        let context = Self::context(dataset, epsilon, min_observations);
        let result = self.labels(dataset, epsilon, min_observations)?;
        let outcome = requested_responses(&result)
            .and_then(|responses| exact::validate(responses, reference))
            .map_err(|e| e.with_context(&context))?;
        Ok(Verdict { context, outcome })
    }

    /// Structural tier: labels must equal `reference` up to relabeling.
    pub fn check_structure(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
        reference: &[i32],
    ) -> Result<Verdict<StructuralMatch>> {
        let context = Self::context(dataset, epsilon, min_observations);
        let result = self.labels(dataset, epsilon, min_observations)?;
        let outcome = requested_responses(&result)
            .and_then(|responses| exact::read_labels(responses, "computed label columns"))
            .and_then(|labels| exact::validate_structure(&labels, reference))
            .map_err(|e| e.with_context(&context))?;
        Ok(Verdict { context, outcome })
    }

    /// Statistical tier: the Davies–Bouldin index must match `reference_score`.
    ///
    /// `tolerance` defaults to [`OracleConfig::default_relative_tolerance`] and
    /// must be finite and positive. Results with fewer than two clusters are
    /// skipped, not scored.
    pub fn check_quality(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
        reference_score: f64,
        tolerance: Option<f64>,
    ) -> Result<Verdict<QualityOutcome>> {
        let context = Self::context(dataset, epsilon, min_observations);
        let relative_tolerance = tolerance.unwrap_or(self.config.default_relative_tolerance);
        if !tolerance::is_valid_tolerance(relative_tolerance) {
            return Err(Error::InvalidTolerance {
                value: relative_tolerance,
            }
            .with_context(&context));
        }
        let result = self.labels(dataset, epsilon, min_observations)?;

        let cluster_count = result.cluster_count();
        if cluster_count < 2 {
            debug!(
                dataset = dataset.name,
                cluster_count, "quality score undefined, skipping comparison"
            );
            return Ok(Verdict {
                context,
                outcome: QualityOutcome::Skipped { cluster_count },
            });
        }

        let outcome = requested_responses(&result)
            .and_then(|responses| {
                let labels = exact::read_labels(responses, "computed label columns")?;
                let centroids = metric::centers_of_mass(dataset.data, &labels)?;
                let score = metric::davies_bouldin_index(dataset.data, &centroids, &labels)?;
                tolerance::check_tolerance(score, reference_score, relative_tolerance)
            })
            .map(|check| QualityOutcome::Compared {
                cluster_count,
                check,
            })
            .map_err(|e| e.with_context(&context))?;
        Ok(Verdict { context, outcome })
    }

    /// Mask tier: outputs outside `options` must be refused, outputs inside readable.
    pub fn check_modes(
        &self,
        dataset: Dataset<'_>,
        epsilon: f64,
        min_observations: usize,
        options: ResultOptions,
    ) -> Result<Verdict<MaskReport>> {
        let context = Self::context(dataset, epsilon, min_observations);
        let result = self.run(dataset, epsilon, min_observations, options.clone())?;
        let outcome = mask::enforce(&options, &result).map_err(|e| e.with_context(&context))?;
        Ok(Verdict { context, outcome })
    }
}
