//! Result options: which optional outputs a compute request asks for.
//!
//! A [`ResultOptions`] value is a set of named [`ResultOption`]s rather than a
//! bit pattern, so adding an output never reinterprets existing masks.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// One optional output of a clustering computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOption {
    /// Cluster label per input row.
    Responses,
    /// Whether each input row is a core point.
    CoreFlags,
    /// Coordinates of the core points.
    CoreObservations,
    /// Input-order indices of the core points.
    CoreObservationIndices,
}

impl ResultOption {
    /// Every known option, in declaration order.
    pub const ALL: [ResultOption; 4] = [
        ResultOption::Responses,
        ResultOption::CoreFlags,
        ResultOption::CoreObservations,
        ResultOption::CoreObservationIndices,
    ];

    /// Stable snake_case name, as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            ResultOption::Responses => "responses",
            ResultOption::CoreFlags => "core_flags",
            ResultOption::CoreObservations => "core_observations",
            ResultOption::CoreObservationIndices => "core_observation_indices",
        }
    }
}

impl fmt::Display for ResultOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of requested outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultOptions {
    set: BTreeSet<ResultOption>,
}

impl ResultOptions {
    /// The empty set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every known option.
    pub fn all() -> Self {
        ResultOption::ALL.into_iter().collect()
    }

    /// Exactly one option.
    pub fn only(option: ResultOption) -> Self {
        Self::none().with(option)
    }

    /// Add an option.
    #[must_use]
    pub fn with(mut self, option: ResultOption) -> Self {
        self.set.insert(option);
        self
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &ResultOptions) -> Self {
        self.set.union(&other.set).copied().collect()
    }

    /// Whether `option` is requested.
    pub fn contains(&self, option: ResultOption) -> bool {
        self.set.contains(&option)
    }

    /// Number of requested options.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// True when nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Requested options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ResultOption> + '_ {
        self.set.iter().copied()
    }

    /// All `2^n` subsets of [`ResultOption::ALL`], starting from the empty set.
    pub fn subsets() -> impl Iterator<Item = ResultOptions> {
        let n = ResultOption::ALL.len();
        (0..1usize << n).map(move |bits| {
            ResultOption::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, o)| *o)
                .collect()
        })
    }
}

impl FromIterator<ResultOption> for ResultOptions {
    fn from_iter<I: IntoIterator<Item = ResultOption>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl From<ResultOption> for ResultOptions {
    fn from(option: ResultOption) -> Self {
        Self::only(option)
    }
}

impl BitOr for ResultOption {
    type Output = ResultOptions;

    fn bitor(self, rhs: ResultOption) -> ResultOptions {
        ResultOptions::only(self).with(rhs)
    }
}

impl BitOr<ResultOption> for ResultOptions {
    type Output = ResultOptions;

    fn bitor(self, rhs: ResultOption) -> ResultOptions {
        self.with(rhs)
    }
}

impl BitOr for ResultOptions {
    type Output = ResultOptions;

    fn bitor(self, rhs: ResultOptions) -> ResultOptions {
        self.union(&rhs)
    }
}

impl fmt::Display for ResultOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.set.is_empty() {
            return f.write_str("none");
        }
        for (i, option) in self.set.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(option.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_union_of_every_option() {
        let folded = ResultOption::ALL
            .into_iter()
            .fold(ResultOptions::none(), |acc, o| acc | o);
        assert_eq!(folded, ResultOptions::all());
        assert_eq!(ResultOptions::all().len(), ResultOption::ALL.len());
    }

    #[test]
    fn union_composes() {
        let a = ResultOption::Responses | ResultOption::CoreFlags;
        let b = ResultOptions::only(ResultOption::CoreFlags).with(ResultOption::CoreObservations);
        let u = a.union(&b);
        assert_eq!(u.len(), 3);
        assert!(u.contains(ResultOption::CoreObservations));
        assert!(!u.contains(ResultOption::CoreObservationIndices));
    }

    #[test]
    fn subsets_cover_power_set() {
        let subsets: Vec<_> = ResultOptions::subsets().collect();
        assert_eq!(subsets.len(), 16);
        assert!(subsets[0].is_empty());
        assert_eq!(subsets[15], ResultOptions::all());
        let unique: std::collections::HashSet<_> = subsets.iter().cloned().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn display_lists_names() {
        assert_eq!(ResultOptions::none().to_string(), "none");
        assert_eq!(
            (ResultOption::CoreFlags | ResultOption::Responses).to_string(),
            "responses|core_flags"
        );
    }

    #[test]
    fn serde_uses_snake_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            options: ResultOptions,
        }
        let w: Wrapper =
            toml::from_str(r#"options = ["responses", "core_observation_indices"]"#).unwrap();
        assert_eq!(
            w.options,
            ResultOption::Responses | ResultOption::CoreObservationIndices
        );
    }
}
