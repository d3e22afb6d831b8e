use super::{ComputeResult, Descriptor, EngineError};
use crate::table::Table;

/// A clustering backend that turns a descriptor and a dataset into a result.
///
/// Implementations must only materialize the outputs named in
/// [`Descriptor::result_options`]; the oracle checks this.
pub trait ComputeEngine {
    /// Run one computation.
    ///
    /// `weights`, when present, is an `n × 1` table of per-row weights; `None`
    /// means every row has unit weight.
    fn compute(
        &self,
        descriptor: &Descriptor,
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
    ) -> Result<ComputeResult, EngineError>;
}

impl<E: ComputeEngine + ?Sized> ComputeEngine for &E {
    fn compute(
        &self,
        descriptor: &Descriptor,
        data: &Table<f64>,
        weights: Option<&Table<f64>>,
    ) -> Result<ComputeResult, EngineError> {
        (**self).compute(descriptor, data, weights)
    }
}
