//! Validators for clustering results whose labels are only meaningful up to renaming.
//!
//! ## Tiers
//!
//! - **Exact** ([`exact::validate`]): labels equal row for row. Only valid
//!   when the reference was produced with the engine's own tie-breaking,
//!   i.e. small scripted inputs without label ambiguity.
//! - **Structural** ([`exact::validate_structure`]): labels equal up to a
//!   bijection of cluster ids, with identical noise rows.
//! - **Statistical** ([`metric::score`] + [`tolerance::within_tolerance`]):
//!   the Davies–Bouldin index of the computed partition matches a reference
//!   score within a relative tolerance. Used for large datasets where exact
//!   agreement cannot be expected across implementations or hardware.
//!
//! Orthogonal to these, [`mask::enforce`] checks that a result exposes
//! exactly the outputs its request named.
//!
//! [`ComputeOracle`] ties it together: it builds the request, runs the
//! engine once, and routes the result to one of the validators.

mod compute;
pub mod exact;
pub mod mask;
pub mod metric;
pub mod tolerance;

pub use compute::{ComputeOracle, Dataset, Precision, QualityOutcome, Verdict};
pub use exact::{ExactMatch, StructuralMatch};
pub use mask::{Availability, MaskReport};
pub use metric::Centroids;
pub use tolerance::{is_valid_tolerance, within_tolerance, ToleranceCheck};
