//! Brute-force weighted DBSCAN, the reference compute engine.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density:
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors
//!   (inclusive: `dist <= ε`).
//! - **min_observations**: Minimum neighborhood weight for a point to be
//!   "core". The point's own weight counts. Without weights every point
//!   weighs 1, so this is the usual MinPts.
//! - **Core point**: Neighborhood weight `>= min_observations`.
//! - **Border point**: Not core, but within ε of a core point.
//! - **Noise point**: Neither core nor border. Labeled [`NOISE`].
//!
//! ## Labeling
//!
//! Rows are scanned in input order. The first unlabeled core point seeds the
//! next cluster id (0, 1, 2, ...), and the cluster is grown through every
//! density-reachable point. A border point keeps the first cluster that
//! reaches it. This makes labels deterministic for a given row order, which
//! is what exact-match scenarios rely on.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) distance evaluations.
//! - **Space**: O(n) beyond the outputs.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use tracing::debug;

use super::traits::ComputeEngine;
use super::util::squared_euclidean;
use super::{ComputeResult, Descriptor, EngineError};
use crate::options::ResultOption;
use crate::table::Table;

/// Label of a point outside every cluster.
pub const NOISE: i32 = -1;

// Not yet reached by any cluster.
const UNCLASSIFIED: i32 = -2;

/// Brute-force DBSCAN over a dense table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl BruteForce {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    fn validate(
        descriptor: &Descriptor,
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
    ) -> Result<(), EngineError> {
        let n = data.row_count();
        if n == 0 {
            return Err(EngineError::EmptyInput);
        }

        if data.column_count() == 0 {
            return Err(EngineError::InvalidParameter {
                name: "data",
                message: "must have at least one column",
            });
        }

        if data.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidParameter {
                name: "data",
                message: "must be finite",
            });
        }

        let epsilon = descriptor.epsilon();
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "epsilon",
                message: "must be finite and non-negative",
            });
        }

        if descriptor.min_observations() == 0 {
            return Err(EngineError::InvalidParameter {
                name: "min_observations",
                message: "must be at least 1",
            });
        }

        if let Some(w) = weights {
            if w.row_count() != n || w.column_count() != 1 {
                return Err(EngineError::WeightShape {
                    expected_rows: n,
                    rows: w.row_count(),
                    columns: w.column_count(),
                });
            }
            if w.as_slice().iter().any(|v| !v.is_finite()) {
                return Err(EngineError::InvalidParameter {
                    name: "weights",
                    message: "must be finite",
                });
            }
        }

        Ok(())
    }

    /// All rows within epsilon of `point_idx`, including itself.
    fn region_query(data: &Table<f64>, eps_sq: f64, point_idx: usize) -> Vec<usize> {
        let point = data.row(point_idx);
        data.rows()
            .enumerate()
            .filter(|(_, other)| squared_euclidean(point, other) <= eps_sq)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Per-row core flags from (weighted) neighborhood sizes.
    fn core_flags(
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
        eps_sq: f64,
        min_observations: usize,
    ) -> Vec<bool> {
        let threshold = min_observations as f64;
        let weight = |i: usize| weights.map_or(1.0, |w| w.as_slice()[i]);
        (0..data.row_count())
            .map(|i| {
                let point = data.row(i);
                let total: f64 = data
                    .rows()
                    .enumerate()
                    .filter(|(_, other)| squared_euclidean(point, other) <= eps_sq)
                    .map(|(j, _)| weight(j))
                    .sum();
                total >= threshold
            })
            .collect()
    }

    /// Grow cluster `cluster_id` from the core point `seed`.
    fn expand_cluster(
        data: &Table<f64>,
        eps_sq: f64,
        core: &[bool],
        seed: usize,
        labels: &mut [i32],
        cluster_id: i32,
    ) {
        labels[seed] = cluster_id;

        // Explicit stack to avoid deep recursion on long chains.
        let mut to_process = Self::region_query(data, eps_sq, seed);

        while let Some(idx) = to_process.pop() {
            if labels[idx] != UNCLASSIFIED {
                continue;
            }
            labels[idx] = cluster_id;

            if core[idx] {
                to_process.extend(
                    Self::region_query(data, eps_sq, idx)
                        .into_iter()
                        .filter(|&nn| labels[nn] == UNCLASSIFIED),
                );
            }
        }
    }

    /// Labels and core flags for every row, plus the cluster count.
    fn label(
        descriptor: &Descriptor,
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
    ) -> (Vec<i32>, Vec<bool>, usize) {
        let eps_sq = descriptor.epsilon() * descriptor.epsilon();
        let core = Self::core_flags(data, weights, eps_sq, descriptor.min_observations());

        let n = data.row_count();
        let mut labels = vec![UNCLASSIFIED; n];
        let mut cluster_id: i32 = 0;

        for idx in 0..n {
            if labels[idx] != UNCLASSIFIED || !core[idx] {
                continue;
            }
            Self::expand_cluster(data, eps_sq, &core, idx, &mut labels, cluster_id);
            cluster_id += 1;
        }

        for l in labels.iter_mut() {
            if *l == UNCLASSIFIED {
                *l = NOISE;
            }
        }

        (labels, core, cluster_id as usize)
    }
}

impl ComputeEngine for BruteForce {
    fn compute(
        &self,
        descriptor: &Descriptor,
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
    ) -> Result<ComputeResult, EngineError> {
        Self::validate(descriptor, data, weights)?;

        let (labels, core, cluster_count) = Self::label(descriptor, data, weights);
        let options = descriptor.result_options();
        let core_indices: Vec<usize> = (0..core.len()).filter(|&i| core[i]).collect();

        debug!(
            rows = data.row_count(),
            cluster_count,
            core_count = core_indices.len(),
            options = %options,
            "brute-force dbscan finished"
        );

        let mut result = ComputeResult::new(options.clone(), cluster_count);

        if options.contains(ResultOption::Responses) {
            result = result.with_responses(Table::column(labels));
        }
        if options.contains(ResultOption::CoreObservations) {
            let d = data.column_count();
            let mut values = Vec::with_capacity(core_indices.len() * d);
            for &i in &core_indices {
                values.extend_from_slice(data.row(i));
            }
            result = result.with_core_observations(Table::wrap(values, core_indices.len(), d)?);
        }
        if options.contains(ResultOption::CoreFlags) {
            result = result.with_core_flags(Table::column(core));
        }
        if options.contains(ResultOption::CoreObservationIndices) {
            result = result.with_core_observation_indices(Table::column(core_indices));
        }

        Ok(result)
    }
}
