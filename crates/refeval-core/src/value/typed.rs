//! Reference value pinned to exactly one named type

use crate::hierarchy::{common_superclass, ClassRef};
use crate::tri::TriValue;
use crate::value::ReferenceValue;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Descriptor of the hierarchy root, used when a join cannot be resolved
/// any further.
pub const OBJECT_TYPE: &str = "java/lang/Object";

/// A reference value known to have a single named type.
///
/// Evaluating `Shape s = flag ? new Circle() : new Square()` pins each
/// branch to one of these; the control-flow join of the two branches is
/// where [`crate::value::MultiTypedReferenceValue`] takes over.
#[derive(Debug, Clone)]
pub struct TypedReferenceValue {
    type_name: String,
    referenced_class: Option<ClassRef>,
    may_be_extension: bool,
    may_be_null: bool,
}

impl TypedReferenceValue {
    /// Create a value of the named type.
    ///
    /// `referenced_class` is `None` when the name does not resolve to a
    /// class in the hierarchy; queries against such a value degrade to
    /// `Maybe` instead of guessing.
    pub fn new(
        type_name: impl Into<String>,
        referenced_class: Option<ClassRef>,
        may_be_extension: bool,
        may_be_null: bool,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            referenced_class,
            may_be_extension,
            may_be_null,
        }
    }

    /// The internal type descriptor this value is pinned to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Internal descriptor form of the type. Identical to [`Self::type_name`]
    /// for class types.
    pub fn internal_type(&self) -> &str {
        &self.type_name
    }

    /// Resolved class identity, when the type names a known class.
    pub fn referenced_class(&self) -> Option<&ClassRef> {
        self.referenced_class.as_ref()
    }

    /// Whether the actual runtime type may be a strict subtype of the
    /// named type.
    pub fn may_be_extension(&self) -> bool {
        self.may_be_extension
    }

    pub fn may_be_null(&self) -> bool {
        self.may_be_null
    }

    pub fn is_null(&self) -> TriValue {
        if self.may_be_null {
            TriValue::Maybe
        } else {
            TriValue::Never
        }
    }

    /// Whether this value is an instance of the given type.
    pub fn instance_of(&self, other_type: &str, other_class: Option<&ClassRef>) -> TriValue {
        // A null reference is an instance of nothing, so a maybe-null
        // value can answer at most Maybe.
        let positive = if self.may_be_null {
            TriValue::Maybe
        } else {
            TriValue::Always
        };
        if self.type_name == other_type {
            return positive;
        }
        match &self.referenced_class {
            Some(class) if class.extends_or_implements(other_type) => positive,
            Some(_) => {
                // The named type does not reach the target; a strict
                // subtype still might.
                if self.may_be_extension {
                    TriValue::Maybe
                } else {
                    TriValue::Never
                }
            }
            None => {
                // Unresolved named class: the only provable negative is a
                // target strictly below this exact type.
                if !self.may_be_extension
                    && other_class
                        .is_some_and(|class| class.extends_or_implements(&self.type_name))
                {
                    TriValue::Never
                } else {
                    TriValue::Maybe
                }
            }
        }
    }

    /// Whether this value may be the same object as `other`.
    pub fn equal(&self, other: &TypedReferenceValue) -> TriValue {
        if self.may_be_null && other.may_be_null {
            // Both sides might be the same null reference.
            return TriValue::Maybe;
        }
        let disjoint = match (&self.referenced_class, &other.referenced_class) {
            (Some(a), Some(b)) => {
                !self.may_be_extension
                    && !other.may_be_extension
                    && !a.extends_or_implements(&other.type_name)
                    && !b.extends_or_implements(&self.type_name)
            }
            _ => false,
        };
        if disjoint {
            // Non-null references of provably disjoint types never alias.
            TriValue::Never
        } else {
            TriValue::Maybe
        }
    }

    /// Hierarchy least-upper-bound join with another single-typed value.
    ///
    /// Associative and commutative; [`crate::value::MultiTypedReferenceValue`]
    /// relies on both when folding its candidate set in arbitrary order.
    pub fn generalize(&self, other: &TypedReferenceValue) -> ReferenceValue {
        let may_be_null = self.may_be_null || other.may_be_null;
        if self == other {
            // Same (type, class); only the flags need widening.
            return ReferenceValue::Typed(TypedReferenceValue::new(
                self.type_name.clone(),
                self.referenced_class.clone(),
                self.may_be_extension || other.may_be_extension,
                may_be_null,
            ));
        }
        match (&self.referenced_class, &other.referenced_class) {
            (Some(a), Some(b)) => match common_superclass(a, b) {
                Some(sup) => {
                    // The runtime type sits strictly below the join on at
                    // least one side.
                    let type_name = sup.name().to_string();
                    ReferenceValue::Typed(TypedReferenceValue::new(
                        type_name,
                        Some(sup),
                        true,
                        may_be_null,
                    ))
                }
                None => Self::object_fallback(may_be_null),
            },
            _ => Self::object_fallback(may_be_null),
        }
    }

    /// Join result when no common supertype can be resolved.
    fn object_fallback(may_be_null: bool) -> ReferenceValue {
        ReferenceValue::Typed(TypedReferenceValue::new(OBJECT_TYPE, None, true, may_be_null))
    }
}

/// Identity is `(type_name, referenced_class)` only. The nullability and
/// extension flags are informational and deliberately excluded, so that
/// set membership and deduplication keep previously recorded flags.
impl PartialEq for TypedReferenceValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.referenced_class == other.referenced_class
    }
}

impl Eq for TypedReferenceValue {}

impl Hash for TypedReferenceValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.referenced_class.hash(state);
    }
}

impl fmt::Display for TypedReferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if !self.may_be_extension {
            // Exactly this type.
            write!(f, "=")?;
        }
        if !self.may_be_null {
            // Provably non-null.
            write!(f, "!")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ClassPool;

    fn sample_pool() -> (ClassPool, ClassRef, ClassRef, ClassRef, ClassRef) {
        let mut pool = ClassPool::new();
        let object = pool.add_class(OBJECT_TYPE, &[]);
        let shape = pool.add_class("Shape", &[object.clone()]);
        let circle = pool.add_class("Circle", &[shape.clone()]);
        let square = pool.add_class("Square", &[shape.clone()]);
        (pool, object, shape, circle, square)
    }

    fn concrete(class: &ClassRef) -> TypedReferenceValue {
        TypedReferenceValue::new(class.name(), Some(class.clone()), false, false)
    }

    fn expect_typed(value: ReferenceValue) -> TypedReferenceValue {
        match value {
            ReferenceValue::Typed(typed) => typed,
            other => panic!("expected a single-typed value, got {other:?}"),
        }
    }

    #[test]
    fn test_is_null() {
        let (_, _, shape, _, _) = sample_pool();
        let non_null = concrete(&shape);
        assert_eq!(non_null.is_null(), TriValue::Never);

        let nullable = TypedReferenceValue::new("Shape", Some(shape), false, true);
        assert_eq!(nullable.is_null(), TriValue::Maybe);
    }

    #[test]
    fn test_instance_of_same_type() {
        let (_, _, shape, _, _) = sample_pool();
        assert_eq!(concrete(&shape).instance_of("Shape", Some(&shape)), TriValue::Always);
    }

    #[test]
    fn test_instance_of_supertype() {
        let (_, object, shape, circle, _) = sample_pool();
        let value = concrete(&circle);
        assert_eq!(value.instance_of("Shape", Some(&shape)), TriValue::Always);
        assert_eq!(value.instance_of(OBJECT_TYPE, Some(&object)), TriValue::Always);
    }

    #[test]
    fn test_instance_of_unrelated() {
        let (_, _, _, circle, square) = sample_pool();
        assert_eq!(concrete(&circle).instance_of("Square", Some(&square)), TriValue::Never);
    }

    #[test]
    fn test_instance_of_maybe_null_weakens_answer() {
        let (_, _, shape, circle, _) = sample_pool();
        let value = TypedReferenceValue::new("Circle", Some(circle), false, true);
        assert_eq!(value.instance_of("Shape", Some(&shape)), TriValue::Maybe);
    }

    #[test]
    fn test_instance_of_extension_keeps_possibility_open() {
        let (_, _, shape, circle, _) = sample_pool();
        // The value may really be some Shape subtype that is a Circle.
        let value = TypedReferenceValue::new("Shape", Some(shape), true, false);
        assert_eq!(value.instance_of("Circle", Some(&circle)), TriValue::Maybe);
    }

    #[test]
    fn test_instance_of_unresolved_class() {
        let value = TypedReferenceValue::new("Mystery", None, false, false);
        assert_eq!(value.instance_of("Shape", None), TriValue::Maybe);
    }

    #[test]
    fn test_instance_of_unresolved_class_with_narrower_target() {
        let mut pool = ClassPool::new();
        let mystery = pool.add_class("Mystery", &[]);
        let narrower = pool.add_class("Narrower", &[mystery]);
        // The value is exactly Mystery, so it cannot be the stricter type.
        let value = TypedReferenceValue::new("Mystery", None, false, false);
        assert_eq!(value.instance_of("Narrower", Some(&narrower)), TriValue::Never);
    }

    #[test]
    fn test_equal_disjoint_types() {
        let (_, _, _, circle, square) = sample_pool();
        assert_eq!(concrete(&circle).equal(&concrete(&square)), TriValue::Never);
    }

    #[test]
    fn test_equal_related_types() {
        let (_, _, shape, circle, _) = sample_pool();
        assert_eq!(concrete(&circle).equal(&concrete(&shape)), TriValue::Maybe);
    }

    #[test]
    fn test_equal_both_nullable() {
        let (_, _, _, circle, square) = sample_pool();
        let a = TypedReferenceValue::new("Circle", Some(circle), false, true);
        let b = TypedReferenceValue::new("Square", Some(square), false, true);
        // Disjoint types, but both might be the null reference.
        assert_eq!(a.equal(&b), TriValue::Maybe);
    }

    #[test]
    fn test_generalize_same_type_widens_flags() {
        let (_, _, shape, _, _) = sample_pool();
        let exact = TypedReferenceValue::new("Shape", Some(shape.clone()), false, false);
        let nullable = TypedReferenceValue::new("Shape", Some(shape), true, true);

        let joined = expect_typed(exact.generalize(&nullable));
        assert_eq!(joined.type_name(), "Shape");
        assert!(joined.may_be_extension());
        assert!(joined.may_be_null());
    }

    #[test]
    fn test_generalize_siblings_to_common_superclass() {
        let (_, _, _, circle, square) = sample_pool();
        let joined = expect_typed(concrete(&circle).generalize(&concrete(&square)));
        assert_eq!(joined.type_name(), "Shape");
        assert!(joined.may_be_extension());
        assert_eq!(joined.is_null(), TriValue::Never);
    }

    #[test]
    fn test_generalize_commutative_on_diamond_hierarchy() {
        let mut pool = ClassPool::new();
        let object = pool.add_class(OBJECT_TYPE, &[]);
        let walks = pool.add_class("Walks", &[object.clone()]);
        let feline = pool.add_class("Feline", &[object.clone()]);
        let cat = pool.add_class("Cat", &[feline, walks.clone()]);
        let dog = pool.add_class("Dog", &[object, walks]);

        // Cat and Dog share both Walks and the root, at different
        // distances through different parents.
        let left = expect_typed(concrete(&cat).generalize(&concrete(&dog)));
        let right = expect_typed(concrete(&dog).generalize(&concrete(&cat)));
        assert_eq!(left, right);
        assert_eq!(left.type_name(), "Walks");
        assert_eq!(left.may_be_extension(), right.may_be_extension());
        assert_eq!(left.may_be_null(), right.may_be_null());
    }

    #[test]
    fn test_generalize_unresolved_falls_back_to_object() {
        let (_, _, _, circle, _) = sample_pool();
        let unresolved = TypedReferenceValue::new("Mystery", None, false, true);
        let joined = expect_typed(concrete(&circle).generalize(&unresolved));
        assert_eq!(joined.type_name(), OBJECT_TYPE);
        assert!(joined.referenced_class().is_none());
        assert_eq!(joined.is_null(), TriValue::Maybe);
    }

    #[test]
    fn test_identity_ignores_flags() {
        let (_, _, shape, _, _) = sample_pool();
        let a = TypedReferenceValue::new("Shape", Some(shape.clone()), false, false);
        let b = TypedReferenceValue::new("Shape", Some(shape), true, true);
        assert_eq!(a, b);

        let c = TypedReferenceValue::new("Shape", None, false, false);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_markers() {
        let (_, _, shape, _, _) = sample_pool();
        let exact_non_null = TypedReferenceValue::new("Shape", Some(shape.clone()), false, false);
        assert_eq!(exact_non_null.to_string(), "Shape=!");

        let extension_nullable = TypedReferenceValue::new("Shape", Some(shape), true, true);
        assert_eq!(extension_nullable.to_string(), "Shape");
    }
}
