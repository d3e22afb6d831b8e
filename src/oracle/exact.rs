//! Label-sequence comparison: exact and up to relabeling.
//!
//! [`validate`] demands identical labels row by row and is only meaningful
//! when the reference was produced with the same tie-breaking as the engine
//! under test. [`validate_structure`] accepts any bijective renaming of
//! cluster ids and requires the same rows to be noise.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Mismatch, Result, RowMismatch, StructuralConflict};
use crate::table::Table;

/// A passed exact comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactMatch {
    /// Rows compared.
    pub rows: usize,
}

/// A passed structural comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMatch {
    /// Rows compared.
    pub rows: usize,
    /// Computed cluster id → reference cluster id.
    pub mapping: BTreeMap<i32, i32>,
}

impl StructuralMatch {
    /// Number of paired clusters.
    pub fn cluster_count(&self) -> usize {
        self.mapping.len()
    }
}

fn single_column(table: &Table<i32>, what: &'static str) -> Result<()> {
    if table.column_count() != 1 {
        return Err(Error::Shape {
            what,
            expected: 1,
            found: table.column_count(),
        });
    }
    Ok(())
}

/// All rows of a single-column label table.
pub(crate) fn read_labels(table: &Table<i32>, what: &'static str) -> Result<Vec<i32>> {
    single_column(table, what)?;
    Ok(table.pull_rows(0..table.row_count())?)
}

/// Compare two single-column label tables row by row.
pub fn validate(computed: &Table<i32>, reference: &Table<i32>) -> Result<ExactMatch> {
    let computed = read_labels(computed, "computed label columns")?;
    let reference = read_labels(reference, "reference label columns")?;
    validate_labels(&computed, &reference)
}

/// Compare two label sequences row by row.
///
/// Every row is compared; on failure the error lists all disagreeing rows.
pub fn validate_labels(computed: &[i32], reference: &[i32]) -> Result<ExactMatch> {
    if computed.len() != reference.len() {
        return Err(Error::Shape {
            what: "label rows",
            expected: reference.len(),
            found: computed.len(),
        });
    }

    let rows: Vec<RowMismatch> = computed
        .iter()
        .zip(reference)
        .enumerate()
        .filter(|(_, (c, r))| c != r)
        .map(|(index, (&computed, &reference))| RowMismatch {
            index,
            computed,
            reference,
        })
        .collect();

    if rows.is_empty() {
        debug!(rows = computed.len(), "labels match exactly");
        return Ok(ExactMatch {
            rows: computed.len(),
        });
    }

    for row in &rows {
        warn!(
            index = row.index,
            computed = row.computed,
            reference = row.reference,
            "label mismatch"
        );
    }
    Err(Error::Mismatch(Mismatch::Rows {
        total: computed.len(),
        rows,
    }))
}

/// Compare two partitions up to a bijection between their cluster ids.
///
/// Negative labels are noise and must coincide exactly.
pub fn validate_structure(computed: &[i32], reference: &[i32]) -> Result<StructuralMatch> {
    if computed.len() != reference.len() {
        return Err(Error::Shape {
            what: "label rows",
            expected: reference.len(),
            found: computed.len(),
        });
    }

    let mut forward: BTreeMap<i32, i32> = BTreeMap::new();
    let mut backward: BTreeMap<i32, i32> = BTreeMap::new();

    for (index, (&c, &r)) in computed.iter().zip(reference).enumerate() {
        let row = RowMismatch {
            index,
            computed: c,
            reference: r,
        };
        let conflict = match (c < 0, r < 0) {
            (true, true) => continue,
            (true, false) | (false, true) => Some(StructuralConflict::Noise),
            (false, false) => match (forward.get(&c), backward.get(&r)) {
                (Some(&prev_r), _) if prev_r != r => {
                    Some(StructuralConflict::Split { previous: prev_r })
                }
                (_, Some(&prev_c)) if prev_c != c => {
                    Some(StructuralConflict::Merge { previous: prev_c })
                }
                _ => {
                    forward.insert(c, r);
                    backward.insert(r, c);
                    None
                }
            },
        };

        if let Some(conflict) = conflict {
            warn!(index, computed = c, reference = r, ?conflict, "partitions differ");
            return Err(Error::Mismatch(Mismatch::Structure { row, conflict }));
        }
    }

    debug!(
        rows = computed.len(),
        clusters = forward.len(),
        "partitions are equivalent up to relabeling"
    );
    Ok(StructuralMatch {
        rows: computed.len(),
        mapping: forward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_labels_pass() {
        let a = Table::column(vec![0, 1, 1, 1, 2, 3, 4]);
        assert_eq!(validate(&a, &a.clone()).unwrap(), ExactMatch { rows: 7 });
    }

    #[test]
    fn every_mismatch_is_reported() {
        let computed = [0, 1, 0, -1];
        let reference = [0, 0, 1, -1];
        let err = validate_labels(&computed, &reference).unwrap_err();
        match err {
            Error::Mismatch(Mismatch::Rows { total, rows }) => {
                assert_eq!(total, 4);
                assert_eq!(
                    rows,
                    vec![
                        RowMismatch {
                            index: 1,
                            computed: 1,
                            reference: 0
                        },
                        RowMismatch {
                            index: 2,
                            computed: 0,
                            reference: 1
                        },
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn labels_are_read_row_by_row() {
        let t = Table::column(vec![2, -1, 0]);
        assert_eq!(read_labels(&t, "labels").unwrap(), vec![2, -1, 0]);
        assert!(read_labels(&Table::column(Vec::<i32>::new()), "labels")
            .unwrap()
            .is_empty());

        let wide = Table::wrap(vec![0, 1], 1, 2).unwrap();
        assert!(matches!(
            read_labels(&wide, "labels"),
            Err(Error::Shape {
                what: "labels",
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn shape_preconditions() {
        let one = Table::column(vec![0, 0]);
        let two = Table::wrap(vec![0, 0, 0, 0], 2, 2).unwrap();
        assert!(matches!(
            validate(&two, &one),
            Err(Error::Shape {
                what: "computed label columns",
                ..
            })
        ));
        assert!(matches!(
            validate(&one, &Table::column(vec![0])),
            Err(Error::Shape {
                what: "label rows",
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn relabeling_is_structurally_equal() {
        let computed = [0, 1, 1, -1, 2];
        let reference = [5, 3, 3, -1, 0];
        let m = validate_structure(&computed, &reference).unwrap();
        assert_eq!(m.cluster_count(), 3);
        assert_eq!(m.mapping.get(&1), Some(&3));
        // Exact comparison still fails.
        assert!(validate_labels(&computed, &reference).is_err());
    }

    #[test]
    fn noise_must_coincide() {
        let err = validate_structure(&[0, -1], &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::Mismatch(Mismatch::Structure {
                conflict: StructuralConflict::Noise,
                row: RowMismatch { index: 1, .. }
            })
        ));
    }

    #[test]
    fn split_and_merge_are_detected() {
        // Computed cluster 0 covers two reference clusters.
        let split = validate_structure(&[0, 0], &[0, 1]).unwrap_err();
        assert!(matches!(
            split,
            Error::Mismatch(Mismatch::Structure {
                conflict: StructuralConflict::Split { previous: 0 },
                ..
            })
        ));

        // Two computed clusters map onto one reference cluster.
        let merge = validate_structure(&[0, 1], &[4, 4]).unwrap_err();
        assert!(matches!(
            merge,
            Error::Mismatch(Mismatch::Structure {
                conflict: StructuralConflict::Merge { previous: 0 },
                ..
            })
        ));
    }
}
