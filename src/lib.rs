//! Correctness oracle for density-based clustering.
//!
//! `clump-oracle` validates the output of a DBSCAN-style compute engine whose
//! labels are only meaningful up to renaming, and whose optional outputs must
//! stay hidden unless requested.
//!
//! The primary public API:
//! - [`cluster`]: the engine boundary ([`ComputeEngine`], [`Descriptor`],
//!   [`ComputeResult`]) and the [`BruteForce`] reference engine
//! - [`oracle`]: exact, structural and statistical validators, result-option
//!   enforcement, and the [`ComputeOracle`] that drives them
//! - [`scenarios`]: the scripted and external scenario catalog
//!
//! ```rust
//! use clump_oracle::{BruteForce, ComputeOracle, Dataset, ResultOptions, Table};
//!
//! let data = Table::column(vec![0.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0]);
//! let oracle = ComputeOracle::new(BruteForce);
//!
//! let expected = Table::column(vec![-1, 0, 0, 0, -1, -1, -1]);
//! oracle
//!     .check_responses(Dataset::new("chain", &data), 1.0, 2, &expected)
//!     .unwrap();
//!
//! oracle
//!     .check_modes(Dataset::new("chain", &data), 1.0, 2, ResultOptions::none())
//!     .unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod options;
pub mod oracle;
pub mod scenarios;
pub mod table;

/// Target prefix of every tracing span and event emitted by this crate.
///
/// ```text
/// RUST_LOG=clump_oracle=debug
/// ```
pub const TARGET: &str = "clump_oracle";

pub use cluster::{BruteForce, ComputeEngine, ComputeResult, Descriptor, EngineError, NOISE};
pub use config::{ConfigError, OracleConfig};
pub use error::{Error, Result, ScenarioContext};
pub use options::{ResultOption, ResultOptions};
pub use oracle::{ComputeOracle, Dataset, Precision, QualityOutcome, Verdict};
pub use table::{Table, TableError};
