//! Enforcement of the result-option contract.
//!
//! For every known [`ResultOption`]: if the request named it, querying the
//! result must succeed; if not, the query must fail with
//! [`EngineError::ResultNotRequested`]. Actual values are not inspected.

use tracing::{debug, warn};

use crate::cluster::{ComputeResult, EngineError};
use crate::error::{Error, Result};
use crate::options::{ResultOption, ResultOptions};

/// Observed availability of one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Requested and readable.
    Available,
    /// Not requested and refused.
    Refused,
}

/// A passed enforcement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskReport {
    /// The options checked against.
    pub options: ResultOptions,
    /// One entry per known option, in [`ResultOption::ALL`] order.
    pub outcomes: Vec<(ResultOption, Availability)>,
}

fn check_one(requested: bool, option: ResultOption, result: &ComputeResult) -> Result<Availability> {
    let violation = |detail: String| Error::ContractViolation {
        option,
        requested,
        detail,
    };

    match (requested, result.query(option)) {
        (true, Ok(())) => Ok(Availability::Available),
        (true, Err(e)) => Err(violation(format!("requested output was not accessible: {e}"))),
        (false, Err(EngineError::ResultNotRequested { .. })) => Ok(Availability::Refused),
        (false, Err(e)) => Err(violation(format!(
            "unrequested output failed with an unexpected error: {e}"
        ))),
        (false, Ok(())) => Err(violation("unrequested output was accessible".to_string())),
    }
}

/// Check every known output of `result` against `options`.
///
/// All options are checked; the first violation (in [`ResultOption::ALL`]
/// order) is returned, and every violation is logged.
pub fn enforce(options: &ResultOptions, result: &ComputeResult) -> Result<MaskReport> {
    let mut outcomes = Vec::with_capacity(ResultOption::ALL.len());
    let mut first_violation = None;

    for option in ResultOption::ALL {
        match check_one(options.contains(option), option, result) {
            Ok(availability) => outcomes.push((option, availability)),
            Err(e) => {
                warn!(%option, error = %e, "result option contract violated");
                first_violation.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_violation {
        return Err(e);
    }

    debug!(options = %options, "result option contract holds");
    Ok(MaskReport {
        options: options.clone(),
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn full_result(options: ResultOptions) -> ComputeResult {
        ComputeResult::new(options, 1)
            .with_responses(Table::column(vec![0]))
            .with_core_flags(Table::column(vec![true]))
            .with_core_observations(Table::column(vec![0.0]))
            .with_core_observation_indices(Table::column(vec![0]))
    }

    #[test]
    fn honest_result_passes() {
        let options = ResultOption::Responses | ResultOption::CoreObservations;
        let result = ComputeResult::new(options.clone(), 1)
            .with_responses(Table::column(vec![0]))
            .with_core_observations(Table::column(vec![0.0]));

        let report = enforce(&options, &result).unwrap();
        assert_eq!(
            report.outcomes,
            vec![
                (ResultOption::Responses, Availability::Available),
                (ResultOption::CoreFlags, Availability::Refused),
                (ResultOption::CoreObservations, Availability::Available),
                (ResultOption::CoreObservationIndices, Availability::Refused),
            ]
        );
    }

    #[test]
    fn leaked_output_is_a_violation() {
        let options = ResultOptions::only(ResultOption::Responses);
        let err = enforce(&options, &full_result(options.clone())).unwrap_err();
        assert!(matches!(
            err,
            Error::ContractViolation {
                option: ResultOption::CoreFlags,
                requested: false,
                ..
            }
        ));
    }

    #[test]
    fn missing_output_is_a_violation() {
        let options = ResultOption::Responses | ResultOption::CoreObservationIndices;
        let result = ComputeResult::new(options.clone(), 1).with_responses(Table::column(vec![0]));
        let err = enforce(&options, &result).unwrap_err();
        assert!(matches!(
            err,
            Error::ContractViolation {
                option: ResultOption::CoreObservationIndices,
                requested: true,
                ..
            }
        ));
    }

    #[test]
    fn empty_mask_refuses_everything() {
        let options = ResultOptions::none();
        let report = enforce(&options, &ComputeResult::new(options.clone(), 0)).unwrap();
        assert!(report
            .outcomes
            .iter()
            .all(|(_, a)| *a == Availability::Refused));
    }
}
