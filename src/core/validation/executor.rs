//! Recursive validation driver
//!
//! Walks one object against its class metadata: enforces the unknown-value
//! and whitelist policies, gates and runs every declared property, and
//! recurses into nested objects and arrays. Properties are evaluated
//! concurrently but results are always assembled in declaration order.

use super::aggregator::{self, PropertyFailures};
use super::gate;
use super::report::{NESTED_VALIDATION, UNKNOWN_VALUE, ValidationError, WHITELIST_VALIDATION};
use super::runner::{self, ExecutionMode, PropertyScope};
use crate::config::ValidatorOptions;
use crate::core::ValidatorError;
use crate::core::metadata::{MetadataStore, PropertyConstraintSet};
use futures::future::{BoxFuture, FutureExt, join_all};
use serde_json::{Map, Value};

/// Result of validating one object
#[derive(Debug, Default)]
pub struct ObjectOutcome {
    pub errors: Vec<ValidationError>,

    /// Rewritten copy of the object, when whitelisting changed it
    pub cleaned: Option<Value>,
}

#[derive(Debug, Default)]
struct PropertyOutcome {
    error: Option<ValidationError>,
    cleaned: Option<Value>,
}

#[derive(Debug, Default)]
struct NestedOutcome {
    children: Vec<ValidationError>,
    /// The value was neither an object nor an array
    not_traversable: bool,
    cleaned: Option<Value>,
}

/// Drives one validation run
pub struct ValidationExecutor<'a> {
    store: &'a dyn MetadataStore,
    options: &'a ValidatorOptions,
    mode: ExecutionMode,
}

impl<'a> ValidationExecutor<'a> {
    pub fn new(store: &'a dyn MetadataStore, options: &'a ValidatorOptions, mode: ExecutionMode) -> Self {
        Self { store, options, mode }
    }

    /// Validate `object` as an instance of `class_name`
    ///
    /// `None` (or an unregistered class) makes the object an unknown value.
    pub fn execute<'s>(
        &'s self,
        object: &'s Value,
        class_name: Option<&'s str>,
    ) -> BoxFuture<'s, Result<ObjectOutcome, ValidatorError>> {
        async move { self.execute_impl(object, class_name).await }.boxed()
    }

    async fn execute_impl(
        &self,
        object: &Value,
        class_name: Option<&str>,
    ) -> Result<ObjectOutcome, ValidatorError> {
        let metadata = match class_name {
            Some(name) => self.store.class_metadata(name)?,
            None => None,
        };
        let (metadata, map) = match (metadata, object.as_object()) {
            (Some(metadata), Some(map)) => (metadata, map),
            _ => return Ok(self.unknown_value(object, class_name)),
        };

        let mut errors = Vec::new();
        let mut cleaned: Option<Map<String, Value>> = self.options.whitelist.then(|| {
            map.iter()
                .filter(|(key, _)| metadata.whitelists(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        });

        if !self.options.whitelist && self.options.forbid_non_whitelisted {
            for (key, value) in map.iter().filter(|(key, _)| !metadata.whitelists(key)) {
                errors.push(self.not_whitelisted(map, key, value));
            }
        }

        let outcomes = join_all(
            metadata
                .properties
                .iter()
                .map(|set| self.validate_property(map, set, &metadata.class_name)),
        )
        .await;

        for (set, outcome) in metadata.properties.iter().zip(outcomes) {
            let outcome = outcome?;
            if let Some(error) = outcome.error {
                errors.push(error);
            }
            if let (Some(cleaned), Some(value)) = (cleaned.as_mut(), outcome.cleaned) {
                cleaned.insert(set.property_name.clone(), value);
            }
        }

        Ok(ObjectOutcome {
            errors,
            cleaned: cleaned.map(Value::Object),
        })
    }

    async fn validate_property(
        &self,
        object: &Map<String, Value>,
        set: &PropertyConstraintSet,
        target_name: &str,
    ) -> Result<PropertyOutcome, ValidatorError> {
        let value = object.get(&set.property_name);
        let decision = gate::decide(value, set, object, self.options);
        if decision.skip {
            return Ok(PropertyOutcome::default());
        }

        let scope = PropertyScope {
            object,
            property: &set.property_name,
            target_name,
        };
        let mut failures = runner::run(value, &decision.active, scope, self.options, self.mode).await;

        let mut cleaned = None;
        if set.is_nested {
            let nested = self
                .validate_nested(value, set.nested_class.as_deref())
                .await?;
            if nested.not_traversable {
                failures.constraints.insert(
                    NESTED_VALIDATION.to_string(),
                    self.nested_message(&set.property_name),
                );
            }
            failures.children = nested.children;
            cleaned = nested.cleaned;
        }

        let error = (!failures.is_empty())
            .then(|| aggregator::build(&set.property_name, value, object, failures, self.options));
        Ok(PropertyOutcome { error, cleaned })
    }

    /// Validate a nested value: objects recurse, arrays recurse per element
    fn validate_nested<'s>(
        &'s self,
        value: Option<&'s Value>,
        class_name: Option<&'s str>,
    ) -> BoxFuture<'s, Result<NestedOutcome, ValidatorError>> {
        async move {
            match value {
                Some(Value::Array(items)) => {
                    let outcomes = join_all(
                        items
                            .iter()
                            .map(|item| self.validate_nested(Some(item), class_name)),
                    )
                    .await;

                    let mut children = Vec::new();
                    let mut cleaned_items = Vec::new();
                    for (index, (item, outcome)) in items.iter().zip(outcomes).enumerate() {
                        let outcome = outcome?;
                        let mut failures = PropertyFailures {
                            children: outcome.children,
                            ..Default::default()
                        };
                        if outcome.not_traversable {
                            failures.constraints.insert(
                                NESTED_VALIDATION.to_string(),
                                self.nested_message(&index.to_string()),
                            );
                        }
                        if !failures.is_empty() {
                            children.push(aggregator::build_element(
                                index,
                                item,
                                items,
                                failures,
                                self.options,
                            ));
                        }
                        if self.options.whitelist {
                            cleaned_items.push(outcome.cleaned.unwrap_or_else(|| item.clone()));
                        }
                    }

                    Ok(NestedOutcome {
                        children,
                        not_traversable: false,
                        cleaned: self.options.whitelist.then_some(Value::Array(cleaned_items)),
                    })
                }
                Some(object) if object.is_object() => {
                    let outcome = self.execute(object, class_name).await?;
                    Ok(NestedOutcome {
                        children: outcome.errors,
                        not_traversable: false,
                        cleaned: outcome.cleaned,
                    })
                }
                _ => Ok(NestedOutcome {
                    not_traversable: true,
                    ..Default::default()
                }),
            }
        }
        .boxed()
    }

    fn unknown_value(&self, object: &Value, class_name: Option<&str>) -> ObjectOutcome {
        if self.options.enable_debug_messages {
            tracing::warn!(
                class = class_name.unwrap_or("<none>"),
                "No validation metadata found for value, it is treated as unknown"
            );
        }
        if !self.options.forbids_unknown_values() {
            return ObjectOutcome::default();
        }

        let mut failures = PropertyFailures::default();
        failures.constraints.insert(
            UNKNOWN_VALUE.to_string(),
            Some("an unknown value was passed to the validate function".to_string()),
        );
        ObjectOutcome {
            errors: vec![aggregator::build_for_target(
                "",
                None,
                || object.clone(),
                failures,
                self.options,
            )],
            cleaned: None,
        }
    }

    fn not_whitelisted(&self, object: &Map<String, Value>, key: &str, value: &Value) -> ValidationError {
        let mut failures = PropertyFailures::default();
        failures.constraints.insert(
            WHITELIST_VALIDATION.to_string(),
            Some(format!("property {} should not exist", key)),
        );
        aggregator::build(key, Some(value), object, failures, self.options)
    }

    /// Kept under `dismiss_default_messages`, like the other reserved keys
    fn nested_message(&self, property: &str) -> Option<String> {
        Some(format!("nested property {} must be either object or array", property))
    }
}
