//! Error shaping: the last step before a failure leaves the engine

use super::report::ValidationError;
use crate::config::ValidatorOptions;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Collected outcome of one property
#[derive(Debug, Default)]
pub struct PropertyFailures {
    pub constraints: IndexMap<String, Option<String>>,
    pub contexts: IndexMap<String, Value>,
    pub children: Vec<ValidationError>,
}

impl PropertyFailures {
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.children.is_empty()
    }
}

/// Build the record for `property`, exposing target and value per options
pub fn build(
    property: &str,
    value: Option<&Value>,
    target: &Map<String, Value>,
    failures: PropertyFailures,
    options: &ValidatorOptions,
) -> ValidationError {
    build_for_target(
        property,
        value,
        || Value::Object(target.clone()),
        failures,
        options,
    )
}

/// Same as [`build`] for targets that are not objects (array elements)
pub fn build_for_target(
    property: &str,
    value: Option<&Value>,
    target: impl FnOnce() -> Value,
    failures: PropertyFailures,
    options: &ValidatorOptions,
) -> ValidationError {
    ValidationError {
        target: options.validation_error.target.then(target),
        property: property.to_string(),
        value: if options.validation_error.value {
            value.cloned()
        } else {
            None
        },
        constraints: failures.constraints,
        children: failures.children,
        contexts: failures.contexts,
        is_element: false,
    }
}

/// Record for element `index` of a nested array
pub fn build_element(
    index: usize,
    item: &Value,
    items: &[Value],
    failures: PropertyFailures,
    options: &ValidatorOptions,
) -> ValidationError {
    ValidationError {
        is_element: true,
        ..build_for_target(
            &index.to_string(),
            Some(item),
            || Value::Array(items.to_vec()),
            failures,
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failures() -> PropertyFailures {
        let mut failures = PropertyFailures::default();
        failures
            .constraints
            .insert("min".to_string(), Some("too small".to_string()));
        failures
    }

    fn target() -> Map<String, Value> {
        json!({ "age": 15 }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_exposes_target_and_value() {
        let value = json!(15);
        let err = build("age", Some(&value), &target(), failures(), &ValidatorOptions::default());

        assert_eq!(err.target, Some(json!({ "age": 15 })));
        assert_eq!(err.value, Some(json!(15)));
        assert_eq!(err.message("min"), Some("too small"));
    }

    #[test]
    fn test_hidden_target_and_value() {
        let value = json!(15);
        let options = ValidatorOptions::new().with_validation_error(false, false);
        let err = build("age", Some(&value), &target(), failures(), &options);

        assert_eq!(err.target, None);
        assert_eq!(err.value, None);
        assert_eq!(err.property, "age");
    }

    #[test]
    fn test_undefined_value_stays_absent() {
        let err = build("age", None, &target(), failures(), &ValidatorOptions::default());
        assert_eq!(err.value, None);
    }

    #[test]
    fn test_build_element() {
        let items = vec![json!(1), json!(2)];
        let err = build_element(1, &items[1], &items, failures(), &ValidatorOptions::default());

        assert!(err.is_element);
        assert_eq!(err.property, "1");
        assert_eq!(err.value, Some(json!(2)));
        assert_eq!(err.target, Some(json!([1, 2])));
        assert!(!build("age", None, &target(), failures(), &ValidatorOptions::default()).is_element);
    }

    #[test]
    fn test_empty_failures() {
        assert!(PropertyFailures::default().is_empty());
        assert!(!failures().is_empty());
    }
}
