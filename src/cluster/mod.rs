//! The compute-engine boundary.
//!
//! The oracle never computes clusters itself. It hands a [`Descriptor`] and a
//! dataset to a [`ComputeEngine`] and inspects the [`ComputeResult`] it gets
//! back.
//!
//! ## Result options
//!
//! A descriptor names the optional outputs the engine must expose (see
//! [`ResultOptions`](crate::ResultOptions)). Every output the request did not
//! name must stay unobservable: its accessor on [`ComputeResult`] fails with
//! [`EngineError::ResultNotRequested`].
//!
//! ## Reference engine
//!
//! [`BruteForce`] is an O(n²) weighted DBSCAN with deterministic,
//! input-order labeling. It exists so scenarios can run end to end; other
//! backends plug in through the same trait.
//!
//! ## Usage
//!
//! ```rust
//! use clump_oracle::cluster::{BruteForce, ComputeEngine, Descriptor, NOISE};
//! use clump_oracle::{ResultOption, Table};
//!
//! let data = Table::column(vec![0.0, 2.0, 3.0, 4.0, 6.0]);
//! let desc = Descriptor::new(1.0, 2)
//!     .with_result_options(ResultOption::Responses | ResultOption::CoreFlags);
//!
//! let result = BruteForce.compute(&desc, &data, None).unwrap();
//! assert_eq!(result.responses().unwrap().as_slice(), &[NOISE, 0, 0, 0, NOISE]);
//! assert!(result.core_observations().is_err());
//! ```

mod dbscan;
mod descriptor;
mod error;
mod result;
mod traits;
pub(crate) mod util;

pub use dbscan::{BruteForce, NOISE};
pub use descriptor::Descriptor;
pub use error::EngineError;
pub use result::ComputeResult;
pub use traits::ComputeEngine;
