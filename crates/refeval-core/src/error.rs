//! Contract violations inside the reference-value lattice

use thiserror::Error;

/// A broken invariant in the type hierarchy or the caller.
///
/// These are not recoverable conditions. Continuing past one would feed
/// unsound type information into downstream optimization decisions, so the
/// analysis of the current code unit must stop instead. Legitimate
/// uncertainty is never an error; it is modeled as the `Maybe` answer of
/// [`crate::tri::TriValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// A multi-typed value was constructed from an empty candidate set.
    #[error("multi-typed reference value requires at least one potential type")]
    EmptyPotentialTypes,

    /// Folding a candidate set produced something other than a
    /// single-typed value, meaning the hierarchy's join is broken.
    #[error("generalized type is not a single-typed reference value: {variant}")]
    UnexpectedJoinResult {
        /// Variant name of the offending join result.
        variant: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LatticeError::EmptyPotentialTypes.to_string(),
            "multi-typed reference value requires at least one potential type"
        );
        assert_eq!(
            LatticeError::UnexpectedJoinResult { variant: "unknown" }.to_string(),
            "generalized type is not a single-typed reference value: unknown"
        );
    }
}
