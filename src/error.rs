use std::fmt;

use thiserror::Error;

use crate::cluster::EngineError;
use crate::options::ResultOption;
use crate::table::TableError;

/// Errors returned by the validators and the oracle in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An output was accessible although it was not requested, or inaccessible
    /// although it was.
    #[error("contract violation on `{option}` (requested: {requested}): {detail}")]
    ContractViolation {
        /// The output whose availability broke the contract.
        option: ResultOption,
        /// Whether the output was part of the request.
        requested: bool,
        /// Human-readable explanation.
        detail: String,
    },

    /// An exact, structural or tolerance comparison failed.
    #[error("mismatch: {0}")]
    Mismatch(Mismatch),

    /// The quality metric has no defined value for this partition.
    #[error("quality metric undefined: {0}")]
    UndefinedMetric(UndefinedReason),

    /// A relative tolerance was zero, negative or non-finite.
    #[error("relative tolerance must be finite and positive, got {value}")]
    InvalidTolerance {
        /// The rejected value.
        value: f64,
    },

    /// Validator inputs have incompatible shapes.
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    Shape {
        /// What was being measured.
        what: &'static str,
        /// Expected extent.
        expected: usize,
        /// Found extent.
        found: usize,
    },

    /// A table could not be built or read.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The compute engine failed. Carried verbatim.
    #[error(transparent)]
    Upstream(#[from] EngineError),

    /// A failure raised while running a scenario, with the inputs needed to reproduce it.
    #[error("{context}: {source}")]
    Scenario {
        /// Scenario inputs.
        context: ScenarioContext,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach scenario context. Already-contextualized errors are returned unchanged.
    pub fn with_context(self, context: &ScenarioContext) -> Self {
        match self {
            Error::Scenario { .. } => self,
            other => Error::Scenario {
                context: context.clone(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any scenario context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::Scenario { source, .. } => source.root(),
            other => other,
        }
    }

    /// Scenario context, if this error was raised inside an oracle run.
    pub fn context(&self) -> Option<&ScenarioContext> {
        match self {
            Error::Scenario { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The engine error, if the compute engine itself failed.
    pub fn upstream(&self) -> Option<&EngineError> {
        match self.root() {
            Error::Upstream(e) => Some(e),
            _ => None,
        }
    }

    /// True for [`Error::ContractViolation`], with or without context.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self.root(), Error::ContractViolation { .. })
    }

    /// True for [`Error::Mismatch`], with or without context.
    pub fn is_mismatch(&self) -> bool {
        matches!(self.root(), Error::Mismatch(_))
    }

    /// True for [`Error::UndefinedMetric`], with or without context.
    pub fn is_undefined_metric(&self) -> bool {
        matches!(self.root(), Error::UndefinedMetric(_))
    }

    /// True when the compute engine itself failed.
    pub fn is_upstream(&self) -> bool {
        self.upstream().is_some()
    }
}

/// Inputs identifying one validation scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioContext {
    /// Dataset identity.
    pub dataset: String,
    /// Neighborhood radius.
    pub epsilon: f64,
    /// Density threshold.
    pub min_observations: usize,
}

impl fmt::Display for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dataset `{}` (epsilon={}, min_observations={})",
            self.dataset, self.epsilon, self.min_observations
        )
    }
}

/// One row where computed and reference labels disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMismatch {
    /// Row index in input order.
    pub index: usize,
    /// Label produced by the engine.
    pub computed: i32,
    /// Expected label.
    pub reference: i32,
}

/// Why two partitions are not equal up to relabeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralConflict {
    /// Exactly one side marks the row as noise.
    Noise,
    /// The computed cluster was already paired with `previous` in the reference.
    Split {
        /// Reference label seen earlier for the same computed cluster.
        previous: i32,
    },
    /// The reference cluster was already paired with `previous` in the computed labels.
    Merge {
        /// Computed label seen earlier for the same reference cluster.
        previous: i32,
    },
}

/// Payload of a failed comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// Exact label comparison: every disagreeing row.
    Rows {
        /// Number of rows compared.
        total: usize,
        /// All disagreeing rows, in input order.
        rows: Vec<RowMismatch>,
    },
    /// Structural comparison: the first row that breaks the bijection.
    Structure {
        /// Offending row.
        row: RowMismatch,
        /// What went wrong at that row.
        conflict: StructuralConflict,
    },
    /// Scalar comparison outside the relative tolerance.
    Tolerance {
        /// Computed value.
        value: f64,
        /// Reference value.
        reference: f64,
        /// `|value - reference| / max(|value|, |reference|)`.
        ratio: f64,
        /// Allowed relative tolerance (exclusive).
        tolerance: f64,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Rows { total, rows } => {
                write!(f, "{} of {} rows differ", rows.len(), total)?;
                for row in rows {
                    write!(
                        f,
                        "; row {}: computed {}, reference {}",
                        row.index, row.computed, row.reference
                    )?;
                }
                Ok(())
            }
            Mismatch::Structure { row, conflict } => {
                write!(
                    f,
                    "partitions differ at row {} (computed {}, reference {}): ",
                    row.index, row.computed, row.reference
                )?;
                match conflict {
                    StructuralConflict::Noise => write!(f, "noise disagreement"),
                    StructuralConflict::Split { previous } => write!(
                        f,
                        "computed cluster {} already maps to reference cluster {}",
                        row.computed, previous
                    ),
                    StructuralConflict::Merge { previous } => write!(
                        f,
                        "reference cluster {} already maps to computed cluster {}",
                        row.reference, previous
                    ),
                }
            }
            Mismatch::Tolerance {
                value,
                reference,
                ratio,
                tolerance,
            } => write!(
                f,
                "value {value} vs reference {reference}: relative difference {ratio} is not below {tolerance}"
            ),
        }
    }
}

/// Why the quality metric has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndefinedReason {
    /// Fewer than two non-noise clusters.
    #[error("need at least two clusters, found {cluster_count}")]
    TooFewClusters {
        /// Number of non-noise clusters present.
        cluster_count: usize,
    },
    /// Two distinct clusters share a centroid position.
    #[error("clusters {first} and {second} have coincident centroids")]
    CoincidentCentroids {
        /// First cluster label.
        first: i32,
        /// Second cluster label.
        second: i32,
    },
    /// A labeled point has no centroid in the supplied centroid set.
    #[error("no centroid for cluster {cluster}")]
    MissingCentroid {
        /// The label without a centroid.
        cluster: i32,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
