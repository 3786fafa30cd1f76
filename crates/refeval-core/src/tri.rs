//! Tri-valued logic for predicates over uncertain values
//!
//! Queries against a reference value whose runtime type is not fully known
//! cannot always be answered with a boolean. `TriValue` adds the honest
//! middle answer, and [`TriValue::reduce`] collapses per-candidate results
//! into a single verdict.

use std::fmt;

/// Outcome of a predicate evaluated over an uncertain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriValue {
    /// Provably true for every possible runtime value.
    Always,
    /// Cannot be proven either way.
    Maybe,
    /// Provably false for every possible runtime value.
    Never,
}

impl TriValue {
    /// Collapse per-candidate results into one verdict.
    ///
    /// If every candidate agrees, the aggregate is that shared verdict; any
    /// disagreement reduces to [`TriValue::Maybe`]. An empty input also
    /// yields `Maybe`, since nothing was proven.
    pub fn reduce(results: impl IntoIterator<Item = TriValue>) -> TriValue {
        let mut iter = results.into_iter();
        let first = match iter.next() {
            Some(first) => first,
            None => return TriValue::Maybe,
        };
        if iter.all(|result| result == first) {
            first
        } else {
            TriValue::Maybe
        }
    }

    pub fn is_always(self) -> bool {
        self == TriValue::Always
    }

    pub fn is_maybe(self) -> bool {
        self == TriValue::Maybe
    }

    pub fn is_never(self) -> bool {
        self == TriValue::Never
    }
}

impl fmt::Display for TriValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TriValue::Always => "always",
            TriValue::Maybe => "maybe",
            TriValue::Never => "never",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_single_result() {
        assert_eq!(TriValue::reduce([TriValue::Always]), TriValue::Always);
        assert_eq!(TriValue::reduce([TriValue::Never]), TriValue::Never);
        assert_eq!(TriValue::reduce([TriValue::Maybe]), TriValue::Maybe);
    }

    #[test]
    fn test_reduce_agreement() {
        let results = [TriValue::Never, TriValue::Never, TriValue::Never];
        assert_eq!(TriValue::reduce(results), TriValue::Never);
    }

    #[test]
    fn test_reduce_disagreement() {
        let results = [TriValue::Always, TriValue::Never];
        assert_eq!(TriValue::reduce(results), TriValue::Maybe);

        let results = [TriValue::Always, TriValue::Maybe, TriValue::Always];
        assert_eq!(TriValue::reduce(results), TriValue::Maybe);
    }

    #[test]
    fn test_reduce_empty() {
        assert_eq!(TriValue::reduce([]), TriValue::Maybe);
    }

    #[test]
    fn test_predicates() {
        assert!(TriValue::Always.is_always());
        assert!(TriValue::Maybe.is_maybe());
        assert!(TriValue::Never.is_never());
        assert!(!TriValue::Always.is_never());
    }

    #[test]
    fn test_display() {
        assert_eq!(TriValue::Always.to_string(), "always");
        assert_eq!(TriValue::Maybe.to_string(), "maybe");
        assert_eq!(TriValue::Never.to_string(), "never");
    }
}
