//! Property gate: whether and how to check a single property

use super::groups;
use crate::config::ValidatorOptions;
use crate::core::metadata::{ConstraintDeclaration, PropertyConstraintSet};
use serde_json::{Map, Value};

/// Outcome of gating one property
#[derive(Debug)]
pub struct GateDecision<'m> {
    /// Nothing about this property is checked (constraints nor nesting)
    pub skip: bool,

    /// Declarations to run, in declaration order
    pub active: Vec<&'m ConstraintDeclaration>,
}

impl GateDecision<'_> {
    fn skipped() -> Self {
        Self {
            skip: true,
            active: Vec::new(),
        }
    }
}

/// Whether the skip options exclude `value`
///
/// `None` is an undefined (absent) value, `Some(Null)` an explicit null.
pub fn is_skipped(value: Option<&Value>, options: &ValidatorOptions) -> bool {
    match value {
        None => options.skip_undefined_properties || options.skip_missing_properties,
        Some(Value::Null) => options.skip_null_properties || options.skip_missing_properties,
        Some(_) => false,
    }
}

/// Gate `set` for the current object
pub fn decide<'m>(
    value: Option<&Value>,
    set: &'m PropertyConstraintSet,
    object: &Map<String, Value>,
    options: &ValidatorOptions,
) -> GateDecision<'m> {
    if is_skipped(value, options) {
        return GateDecision::skipped();
    }

    if !set.conditions.iter().all(|c| c.holds(object, value)) {
        return GateDecision::skipped();
    }

    GateDecision {
        skip: false,
        active: set
            .constraints
            .iter()
            .filter(|decl| groups::is_active(decl, options))
            .collect(),
    }
}
