use thiserror::Error;

use crate::options::ResultOption;
use crate::table::TableError;

/// Errors raised by a compute engine or by a [`ComputeResult`](super::ComputeResult) accessor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Input table has no rows.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Weights are not an `n × 1` table.
    #[error("weights must be {expected_rows}x1, got {rows}x{columns}")]
    WeightShape {
        /// Row count of the data table.
        expected_rows: usize,
        /// Row count of the weights table.
        rows: usize,
        /// Column count of the weights table.
        columns: usize,
    },

    /// An optional output was queried but not materialized.
    #[error("result option `{option}` was not requested")]
    ResultNotRequested {
        /// The queried output.
        option: ResultOption,
    },

    /// A result table could not be assembled.
    #[error(transparent)]
    Table(#[from] TableError),
}
