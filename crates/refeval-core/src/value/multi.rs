//! Reference value tracking a set of potential runtime types

use crate::error::LatticeError;
use crate::hierarchy::ClassRef;
use crate::tri::TriValue;
use crate::value::factory::ValueFactory;
use crate::value::typed::TypedReferenceValue;
use crate::value::{equal_typed, ReferenceValue};
use indexmap::IndexSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// A reference value that may have one of several runtime types.
///
/// After evaluating `Shape s = flag ? new Circle() : new Square()`, the
/// slot for `s` holds the potential types `{Circle, Square}` while the
/// cached generalized type is their nearest common supertype `Shape`.
/// Keeping the full set instead of only the supertype is what lets
/// downstream queries still prove facts like "never a Triangle".
#[derive(Debug, Clone)]
pub struct MultiTypedReferenceValue {
    /// Every concrete type this value might have at runtime. Never empty.
    potential_types: IndexSet<TypedReferenceValue>,
    /// Least upper bound of `potential_types`, computed at construction
    /// and never mutated afterwards.
    generalized_type: TypedReferenceValue,
    /// Whether the value may have lost all type information by joining
    /// with an unknown value at some point.
    may_be_unknown: bool,
}

impl MultiTypedReferenceValue {
    /// Promote a single-typed value to a one-candidate multi-typed value.
    pub fn from_single(ty: TypedReferenceValue, may_be_unknown: bool) -> Self {
        let mut potential_types = IndexSet::new();
        potential_types.insert(ty.clone());
        Self {
            potential_types,
            generalized_type: ty,
            may_be_unknown,
        }
    }

    /// Build a value from a candidate set.
    ///
    /// # Panics
    ///
    /// Panics when `types` is empty or when folding the set produces a
    /// non-single-typed join result. Both are broken contracts, not
    /// runtime conditions; see [`LatticeError`].
    pub fn from_set(types: IndexSet<TypedReferenceValue>, may_be_unknown: bool) -> Self {
        match Self::try_from_set(types, may_be_unknown) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`Self::from_set`] for hosts that abort the
    /// analysis of the current unit via `?` instead of unwinding.
    pub fn try_from_set(
        types: IndexSet<TypedReferenceValue>,
        may_be_unknown: bool,
    ) -> Result<Self, LatticeError> {
        let generalized_type = Self::generalize_set(&types)?;
        Ok(Self {
            potential_types: types,
            generalized_type,
            may_be_unknown,
        })
    }

    /// Fold the hierarchy join over the candidate set.
    ///
    /// The fold order is whatever the set yields; the single-typed join is
    /// associative and commutative, so the result does not depend on it.
    fn generalize_set(
        types: &IndexSet<TypedReferenceValue>,
    ) -> Result<TypedReferenceValue, LatticeError> {
        let mut iter = types.iter();
        let mut generalized = iter
            .next()
            .cloned()
            .ok_or(LatticeError::EmptyPotentialTypes)?;
        for ty in iter {
            generalized = match generalized.generalize(ty) {
                ReferenceValue::Typed(joined) => joined,
                other => {
                    return Err(LatticeError::UnexpectedJoinResult {
                        variant: other.variant_name(),
                    })
                }
            };
        }
        // Prefer an already-recorded candidate with the same identity so
        // its nullability and extension flags survive the fold.
        Ok(types.get(&generalized).cloned().unwrap_or(generalized))
    }

    /// Read-only view of every type this value might have at runtime.
    pub fn potential_types(&self) -> &IndexSet<TypedReferenceValue> {
        &self.potential_types
    }

    /// The cached least upper bound of the candidate set.
    pub fn generalized_type(&self) -> &TypedReferenceValue {
        &self.generalized_type
    }

    pub fn may_be_unknown(&self) -> bool {
        self.may_be_unknown
    }

    pub fn type_name(&self) -> &str {
        self.generalized_type.type_name()
    }

    pub fn internal_type(&self) -> &str {
        self.generalized_type.internal_type()
    }

    pub fn referenced_class(&self) -> Option<&ClassRef> {
        self.generalized_type.referenced_class()
    }

    pub fn is_null(&self) -> TriValue {
        TriValue::reduce(self.potential_types.iter().map(TypedReferenceValue::is_null))
    }

    pub fn instance_of(&self, other_type: &str, other_class: Option<&ClassRef>) -> TriValue {
        TriValue::reduce(
            self.potential_types
                .iter()
                .map(|ty| ty.instance_of(other_type, other_class)),
        )
    }

    /// Whether any candidate may really be a strict subtype of its named
    /// type. A monotone fact, so candidates are OR-ed rather than reduced.
    pub fn may_be_extension(&self) -> bool {
        self.potential_types
            .iter()
            .any(TypedReferenceValue::may_be_extension)
    }

    /// Whether this value may be the same object as `other`.
    pub fn equal(&self, other: &ReferenceValue) -> TriValue {
        TriValue::reduce(
            self.potential_types
                .iter()
                .map(|candidate| equal_typed(candidate, other)),
        )
    }

    /// Narrow this value to the type asserted by a cast instruction.
    ///
    /// A value that provably already satisfies the target is returned
    /// unchanged. Otherwise the representation collapses to a single fresh
    /// candidate carrying the current extension and nullability facts; the
    /// `may_be_unknown` flag is carried forward.
    pub fn cast(
        &self,
        type_name: &str,
        referenced_class: Option<&ClassRef>,
        _factory: &dyn ValueFactory,
        _always_cast: bool,
    ) -> ReferenceValue {
        if self.instance_of(type_name, referenced_class) == TriValue::Always {
            return ReferenceValue::Multi(self.clone());
        }
        ReferenceValue::Multi(Self::from_single(
            TypedReferenceValue::new(
                type_name,
                referenced_class.cloned(),
                self.may_be_extension(),
                self.is_null() != TriValue::Never,
            ),
            self.may_be_unknown,
        ))
    }

    /// Join with another multi-typed value: the union of both candidate
    /// sets, with `may_be_unknown` OR-ed.
    pub fn generalize_multi(&self, other: &MultiTypedReferenceValue) -> MultiTypedReferenceValue {
        if self == other {
            // Idempotent join; reuse the existing value.
            return self.clone();
        }
        let mut union = self.potential_types.clone();
        // Inserting an already-present identity keeps the recorded
        // candidate, so the left operand's flags win on a clash.
        union.extend(other.potential_types.iter().cloned());
        trace!(candidates = union.len(), "joined multi-typed values");
        Self::from_set(union, self.may_be_unknown || other.may_be_unknown)
    }

    /// Join with a single-typed value by promoting it first.
    pub fn generalize_typed(&self, other: &TypedReferenceValue) -> MultiTypedReferenceValue {
        self.generalize_multi(&Self::from_single(other.clone(), false))
    }

    /// Join with the unknown value: the type set is kept, only the
    /// "may have lost information" flag is raised.
    pub fn generalize_unknown(&self) -> MultiTypedReferenceValue {
        Self {
            may_be_unknown: true,
            ..self.clone()
        }
    }
}

/// Equality requires identical candidate sets and identical
/// `may_be_unknown`; the generalized type is derived data and deliberately
/// not compared.
impl PartialEq for MultiTypedReferenceValue {
    fn eq(&self, other: &Self) -> bool {
        self.may_be_unknown == other.may_be_unknown
            && self.potential_types == other.potential_types
    }
}

impl Eq for MultiTypedReferenceValue {}

impl Hash for MultiTypedReferenceValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.may_be_unknown.hash(state);
        // Candidate hashes are combined order-independently so equal sets
        // hash alike regardless of insertion order.
        let mut combined: u64 = 0;
        for ty in &self.potential_types {
            let mut hasher = DefaultHasher::new();
            ty.hash(&mut hasher);
            combined ^= hasher.finish();
        }
        combined.hash(state);
    }
}

impl fmt::Display for MultiTypedReferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "potential_types=[")?;
        for (i, ty) in self.potential_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, "], generalized_type={}", self.generalized_type)?;
        if self.may_be_unknown {
            write!(f, " (may be unknown)")?;
        }
        Ok(())
    }
}
