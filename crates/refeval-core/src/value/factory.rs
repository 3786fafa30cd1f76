//! Pluggable construction of cast results

use crate::hierarchy::ClassRef;
use crate::value::multi::MultiTypedReferenceValue;
use crate::value::typed::TypedReferenceValue;
use crate::value::ReferenceValue;

/// Manufactures reference values on behalf of `cast`.
///
/// The lattice constructs its own values everywhere else; this seam exists
/// so the host interpreter decides the representation of values it asserts
/// through cast instructions.
pub trait ValueFactory {
    fn create_reference_value(
        &self,
        type_name: &str,
        referenced_class: Option<ClassRef>,
        may_be_extension: bool,
        may_be_null: bool,
    ) -> ReferenceValue;
}

/// Default factory: every created value is a one-candidate multi-typed
/// value, keeping the whole analysis inside the multi-typed lattice.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiTypedValueFactory;

impl ValueFactory for MultiTypedValueFactory {
    fn create_reference_value(
        &self,
        type_name: &str,
        referenced_class: Option<ClassRef>,
        may_be_extension: bool,
        may_be_null: bool,
    ) -> ReferenceValue {
        ReferenceValue::Multi(MultiTypedReferenceValue::from_single(
            TypedReferenceValue::new(type_name, referenced_class, may_be_extension, may_be_null),
            false,
        ))
    }
}
