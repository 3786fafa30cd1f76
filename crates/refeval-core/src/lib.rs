//! # Refeval Core
//!
//! Reference-value type lattice for a bytecode partial evaluator.
//!
//! While walking a method, the evaluator tracks for every reference-typed
//! slot the set of runtime types the value might have. At each control-flow
//! merge point it joins the values of both paths with
//! [`ReferenceValue::generalize`]; later it asks tri-valued questions
//! (is-null, instance-of, equality) whose `Always`/`Never` answers license
//! optimizations such as null-check removal and devirtualization.
//!
//! ## Modules
//!
//! - **[`tri`]** - Three-valued results and the per-candidate reducer
//! - **[`hierarchy`]** - Class-hierarchy contract and a minimal class pool
//! - **[`value`]** - The reference-value variants and their join protocol
//! - **[`error`]** - Contract violations (broken invariants, never
//!   legitimate uncertainty)
//!
//! ## Quick Start
//!
//! ```rust
//! use refeval_core::{ClassPool, ReferenceValue, TriValue, TypedReferenceValue};
//!
//! let mut pool = ClassPool::new();
//! let object = pool.add_class("java/lang/Object", &[]);
//! let shape = pool.add_class("Shape", &[object]);
//! let circle = pool.add_class("Circle", &[shape.clone()]);
//! let square = pool.add_class("Square", &[shape.clone()]);
//!
//! // Shape s = flag ? new Circle() : new Square();
//! let a = ReferenceValue::Typed(TypedReferenceValue::new("Circle", Some(circle), false, false));
//! let b = ReferenceValue::Typed(TypedReferenceValue::new("Square", Some(square), false, false));
//! let s = a.generalize(&b);
//!
//! assert_eq!(s.instance_of("Shape", Some(&shape)), TriValue::Always);
//! assert_eq!(s.instance_of("Circle", None), TriValue::Maybe);
//! assert_eq!(s.is_null(), TriValue::Never);
//! ```

pub mod error;
pub mod hierarchy;
pub mod tri;
pub mod value;

pub use error::LatticeError;
pub use hierarchy::{common_superclass, ClassPool, ClassRef, Clazz};
pub use tri::TriValue;
pub use value::{
    MultiTypedReferenceValue, MultiTypedValueFactory, ReferenceValue, TypedReferenceValue,
    ValueFactory, OBJECT_TYPE,
};
