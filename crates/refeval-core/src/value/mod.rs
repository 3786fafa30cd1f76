//! Reference-value lattice for the partial evaluator
//!
//! This module implements the value domain the evaluator uses for
//! reference-typed slots:
//! - [`TypedReferenceValue`] - a value pinned to exactly one named type
//! - [`MultiTypedReferenceValue`] - a value carrying a set of potential types
//! - [`ReferenceValue::Unknown`] - the top element, nothing known at all
//!
//! The [`ReferenceValue::generalize`] join is applied at every control-flow
//! merge point; its results flow back into interpreter slots and are later
//! queried to drive dead-code elimination, devirtualization, and null-check
//! removal.

mod factory;
mod multi;
mod typed;

pub use factory::{MultiTypedValueFactory, ValueFactory};
pub use multi::MultiTypedReferenceValue;
pub use typed::{TypedReferenceValue, OBJECT_TYPE};

use crate::hierarchy::ClassRef;
use crate::tri::TriValue;
use std::fmt;

/// A reference-typed value as seen by the interpreter.
///
/// The closed set of variants makes the generalization protocol an
/// exhaustive match: every ordered pairing is handled by construction and
/// there is no runtime fallback for an unknown pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceValue {
    /// Exactly one known type.
    Typed(TypedReferenceValue),
    /// A set of potential types.
    Multi(MultiTypedReferenceValue),
    /// Top of the lattice: all type information has been discarded.
    Unknown,
}

impl ReferenceValue {
    /// Least upper bound of two reference values.
    ///
    /// Symmetric in its arguments: every pairing routes both orders to the
    /// same candidate-set union, so `a.generalize(b) == b.generalize(a)`.
    pub fn generalize(&self, other: &ReferenceValue) -> ReferenceValue {
        use ReferenceValue::*;
        match (self, other) {
            (Unknown, Unknown) => Unknown,
            // Joining with the unknown value keeps the type set and only
            // raises the "may have lost information" flag.
            (Multi(multi), Unknown) | (Unknown, Multi(multi)) => {
                Multi(multi.generalize_unknown())
            }
            (Typed(typed), Unknown) | (Unknown, Typed(typed)) => {
                Multi(MultiTypedReferenceValue::from_single(typed.clone(), true))
            }
            (Multi(a), Multi(b)) => Multi(a.generalize_multi(b)),
            (Multi(multi), Typed(typed)) | (Typed(typed), Multi(multi)) => {
                Multi(multi.generalize_typed(typed))
            }
            (Typed(a), Typed(b)) => {
                Multi(MultiTypedReferenceValue::from_single(a.clone(), false).generalize_typed(b))
            }
        }
    }

    pub fn is_null(&self) -> TriValue {
        match self {
            ReferenceValue::Typed(typed) => typed.is_null(),
            ReferenceValue::Multi(multi) => multi.is_null(),
            ReferenceValue::Unknown => TriValue::Maybe,
        }
    }

    pub fn instance_of(&self, other_type: &str, other_class: Option<&ClassRef>) -> TriValue {
        match self {
            ReferenceValue::Typed(typed) => typed.instance_of(other_type, other_class),
            ReferenceValue::Multi(multi) => multi.instance_of(other_type, other_class),
            ReferenceValue::Unknown => TriValue::Maybe,
        }
    }

    pub fn may_be_extension(&self) -> bool {
        match self {
            ReferenceValue::Typed(typed) => typed.may_be_extension(),
            ReferenceValue::Multi(multi) => multi.may_be_extension(),
            ReferenceValue::Unknown => true,
        }
    }

    /// Whether this value may be the same object as `other`.
    pub fn equal(&self, other: &ReferenceValue) -> TriValue {
        match (self, other) {
            (ReferenceValue::Unknown, _) | (_, ReferenceValue::Unknown) => TriValue::Maybe,
            (ReferenceValue::Typed(a), ReferenceValue::Typed(b)) => a.equal(b),
            (ReferenceValue::Multi(multi), other) | (other, ReferenceValue::Multi(multi)) => {
                multi.equal(other)
            }
        }
    }

    /// The named type of this value, when one is known. Multi-typed values
    /// answer with their cached generalized type.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ReferenceValue::Typed(typed) => Some(typed.type_name()),
            ReferenceValue::Multi(multi) => Some(multi.type_name()),
            ReferenceValue::Unknown => None,
        }
    }

    /// Internal descriptor of this value's type; the unknown value answers
    /// with the hierarchy root.
    pub fn internal_type(&self) -> &str {
        match self {
            ReferenceValue::Typed(typed) => typed.internal_type(),
            ReferenceValue::Multi(multi) => multi.internal_type(),
            ReferenceValue::Unknown => OBJECT_TYPE,
        }
    }

    pub fn referenced_class(&self) -> Option<&ClassRef> {
        match self {
            ReferenceValue::Typed(typed) => typed.referenced_class(),
            ReferenceValue::Multi(multi) => multi.referenced_class(),
            ReferenceValue::Unknown => None,
        }
    }

    /// Narrow this value to the type asserted by a cast instruction.
    pub fn cast(
        &self,
        type_name: &str,
        referenced_class: Option<&ClassRef>,
        factory: &dyn ValueFactory,
        always_cast: bool,
    ) -> ReferenceValue {
        match self {
            ReferenceValue::Multi(multi) => {
                multi.cast(type_name, referenced_class, factory, always_cast)
            }
            ReferenceValue::Typed(typed) => {
                if typed.instance_of(type_name, referenced_class) == TriValue::Always {
                    self.clone()
                } else {
                    factory.create_reference_value(
                        type_name,
                        referenced_class.cloned(),
                        typed.may_be_extension(),
                        typed.is_null() != TriValue::Never,
                    )
                }
            }
            ReferenceValue::Unknown => {
                factory.create_reference_value(type_name, referenced_class.cloned(), true, true)
            }
        }
    }

    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            ReferenceValue::Typed(_) => "single-typed",
            ReferenceValue::Multi(_) => "multi-typed",
            ReferenceValue::Unknown => "unknown",
        }
    }
}

/// Equality of one candidate against an arbitrary reference value.
pub(crate) fn equal_typed(candidate: &TypedReferenceValue, other: &ReferenceValue) -> TriValue {
    match other {
        ReferenceValue::Typed(typed) => candidate.equal(typed),
        ReferenceValue::Multi(multi) => TriValue::reduce(
            multi
                .potential_types()
                .iter()
                .map(|typed| candidate.equal(typed)),
        ),
        ReferenceValue::Unknown => TriValue::Maybe,
    }
}

impl fmt::Display for ReferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceValue::Typed(typed) => write!(f, "{typed}"),
            ReferenceValue::Multi(multi) => write!(f, "{multi}"),
            ReferenceValue::Unknown => f.write_str("unknown"),
        }
    }
}
