//! Davies–Bouldin index: a relabeling-invariant clustering quality score.
//!
//! For clusters `1..k` with centroids `c_i` and dispersions
//! `s_i = mean_{x ∈ C_i} ||x - c_i||`:
//!
//! ```text
//! R_ij = (s_i + s_j) / ||c_i - c_j||
//! D_i  = max_{j != i} R_ij
//! DB   = (1/k) Σ_i D_i
//! ```
//!
//! Lower is better (tighter, better-separated clusters); the index is
//! bounded below by 0. Noise rows (negative labels) are ignored.
//!
//! The index is undefined for fewer than two clusters and for two clusters
//! whose centroids coincide. Both cases surface as
//! [`Error::UndefinedMetric`]; they are never reported as a score.
//!
//! # References
//!
//! Davies & Bouldin (1979). "A Cluster Separation Measure." IEEE TPAMI.

use std::collections::BTreeSet;

use crate::cluster::util::euclidean;
use crate::error::{Error, Result, UndefinedReason};
use crate::table::Table;

/// Number of distinct non-noise labels.
pub fn cluster_count(labels: &[i32]) -> usize {
    labels
        .iter()
        .filter(|&&l| l >= 0)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Per-cluster centers of mass, ordered by ascending label.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroids {
    labels: Vec<i32>,
    sizes: Vec<usize>,
    centers: Table<f64>,
}

impl Centroids {
    /// Cluster labels, ascending. Row `i` of [`Centroids::centers`] belongs to `labels()[i]`.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Member count per cluster.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// `k × d` table of centers.
    pub fn centers(&self) -> &Table<f64> {
        &self.centers
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no clusters.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Center of cluster `label`.
    pub fn center(&self, label: i32) -> Option<&[f64]> {
        self.slot(label).map(|i| self.centers.row(i))
    }

    fn slot(&self, label: i32) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }
}

fn check_labels(points: &Table<f64>, labels: &[i32]) -> Result<()> {
    if labels.len() != points.row_count() {
        return Err(Error::Shape {
            what: "label count",
            expected: points.row_count(),
            found: labels.len(),
        });
    }
    Ok(())
}

/// Arithmetic mean of each cluster's members. Noise rows are excluded.
pub fn centers_of_mass(points: &Table<f64>, labels: &[i32]) -> Result<Centroids> {
    check_labels(points, labels)?;

    let ids: Vec<i32> = labels
        .iter()
        .copied()
        .filter(|&l| l >= 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let d = points.column_count();
    let k = ids.len();

    let mut sums = vec![0.0f64; k * d];
    let mut sizes = vec![0usize; k];
    for (point, &label) in points.rows().zip(labels) {
        if label < 0 {
            continue;
        }
        let Ok(c) = ids.binary_search(&label) else {
            continue;
        };
        sizes[c] += 1;
        for (acc, &v) in sums[c * d..(c + 1) * d].iter_mut().zip(point) {
            *acc += v;
        }
    }
    for (c, &size) in sizes.iter().enumerate() {
        for acc in &mut sums[c * d..(c + 1) * d] {
            *acc /= size as f64;
        }
    }

    Ok(Centroids {
        labels: ids,
        sizes,
        centers: Table::wrap(sums, k, d)?,
    })
}

/// Davies–Bouldin index of `labels` over `points`, given precomputed centroids.
pub fn davies_bouldin_index(points: &Table<f64>, centroids: &Centroids, labels: &[i32]) -> Result<f64> {
    check_labels(points, labels)?;
    if centroids.centers.column_count() != points.column_count() {
        return Err(Error::Shape {
            what: "centroid dimension",
            expected: points.column_count(),
            found: centroids.centers.column_count(),
        });
    }

    let k = centroids.len();
    if k < 2 {
        return Err(Error::UndefinedMetric(UndefinedReason::TooFewClusters {
            cluster_count: k,
        }));
    }

    // Dispersion: mean distance of members to their centroid.
    let mut scatter = vec![0.0f64; k];
    let mut sizes = vec![0usize; k];
    for (point, &label) in points.rows().zip(labels) {
        if label < 0 {
            continue;
        }
        let c = centroids
            .slot(label)
            .ok_or(Error::UndefinedMetric(UndefinedReason::MissingCentroid {
                cluster: label,
            }))?;
        scatter[c] += euclidean(point, centroids.centers.row(c));
        sizes[c] += 1;
    }
    for (s, &size) in scatter.iter_mut().zip(&sizes) {
        if size > 0 {
            *s /= size as f64;
        }
    }

    let mut total = 0.0f64;
    for i in 0..k {
        let mut worst = 0.0f64;
        for j in 0..k {
            if i == j {
                continue;
            }
            let separation = euclidean(centroids.centers.row(i), centroids.centers.row(j));
            if separation == 0.0 {
                return Err(Error::UndefinedMetric(UndefinedReason::CoincidentCentroids {
                    first: centroids.labels[i.min(j)],
                    second: centroids.labels[i.max(j)],
                }));
            }
            worst = worst.max((scatter[i] + scatter[j]) / separation);
        }
        total += worst;
    }

    Ok(total / k as f64)
}

/// Centroids and Davies–Bouldin index in one step.
pub fn score(points: &Table<f64>, labels: &[i32]) -> Result<f64> {
    let centroids = centers_of_mass(points, labels)?;
    davies_bouldin_index(points, &centroids, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn two_symmetric_clusters() {
        // Clusters {0, 2} and {10, 12}: centroids 1 and 11, scatter 1 each.
        let points = Table::column(vec![0.0, 2.0, 10.0, 12.0]);
        let labels = [0, 0, 1, 1];
        // R = (1 + 1) / 10 for both clusters.
        assert!(approx(score(&points, &labels).unwrap(), 0.2));
    }

    #[test]
    fn worst_pair_is_taken() {
        // Cluster a near b, c far away.
        let points = Table::column(vec![0.0, 2.0, 4.0, 6.0, 100.0, 102.0]);
        let labels = [0, 0, 1, 1, 2, 2];
        // centroids 1, 5, 101; all scatters 1.
        // D_0 = max(2/4, 2/100) = 0.5
        // D_1 = max(2/4, 2/96) = 0.5
        // D_2 = max(2/100, 2/96) = 2/96
        let expected = (0.5 + 0.5 + 2.0 / 96.0) / 3.0;
        assert!(approx(score(&points, &labels).unwrap(), expected));
    }

    #[test]
    fn noise_and_label_values_are_ignored() {
        let points = Table::column(vec![0.0, 2.0, 50.0, 10.0, 12.0]);
        let relabeled = [7, 7, -1, 3, 3];
        assert!(approx(score(&points, &relabeled).unwrap(), 0.2));
    }

    #[test]
    fn single_point_clusters_score_zero() {
        let points = Table::from_rows(&[[0.0, 5.0], [1.0, 1.0], [1.0, 0.0]]).unwrap();
        assert_eq!(score(&points, &[0, 1, 2]).unwrap(), 0.0);
    }

    #[test]
    fn centers_of_mass_per_label() {
        let points = Table::from_rows(&[[0.0, 0.0], [2.0, 2.0], [9.0, 9.0], [10.0, 0.0]]).unwrap();
        let c = centers_of_mass(&points, &[4, 4, -1, 1]).unwrap();
        assert_eq!(c.labels(), &[1, 4]);
        assert_eq!(c.sizes(), &[1, 2]);
        assert_eq!(c.center(4), Some(&[1.0, 1.0][..]));
        assert_eq!(c.center(1), Some(&[10.0, 0.0][..]));
        assert_eq!(c.center(-1), None);
    }

    #[test]
    fn fewer_than_two_clusters_is_undefined() {
        let points = Table::column(vec![0.0, 1.0, 2.0]);
        for labels in [[-1, -1, -1], [0, 0, -1]] {
            let err = score(&points, &labels).unwrap_err();
            assert!(err.is_undefined_metric(), "{err}");
        }
        assert!(matches!(
            score(&points, &[0, 0, 0]),
            Err(Error::UndefinedMetric(UndefinedReason::TooFewClusters {
                cluster_count: 1
            }))
        ));
    }

    #[test]
    fn coincident_centroids_are_undefined() {
        let points = Table::column(vec![-1.0, 1.0, 0.0]);
        assert!(matches!(
            score(&points, &[0, 0, 1]),
            Err(Error::UndefinedMetric(UndefinedReason::CoincidentCentroids {
                first: 0,
                second: 1
            }))
        ));
    }

    #[test]
    fn shape_is_checked() {
        let points = Table::column(vec![0.0, 1.0]);
        assert!(matches!(
            score(&points, &[0]),
            Err(Error::Shape {
                what: "label count",
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn foreign_centroids_are_rejected() {
        let points = Table::column(vec![0.0, 1.0, 5.0]);
        let centroids = centers_of_mass(&points, &[0, 0, 1]).unwrap();
        assert!(matches!(
            davies_bouldin_index(&points, &centroids, &[0, 0, 2]),
            Err(Error::UndefinedMetric(UndefinedReason::MissingCentroid { cluster: 2 }))
        ));
    }
}
