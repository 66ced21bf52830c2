//! Validator entry point

use crate::config::ValidatorOptions;
use crate::core::ValidatorError;
use crate::core::metadata::MetadataStore;
use crate::core::validation::{ExecutionMode, ValidationExecutor, ValidationReport};
use serde_json::Value;
use std::sync::Arc;

/// Validates objects against the class metadata of a store
///
/// Cheap to clone; clones share the store. Every call works on its own
/// error tree, so one validator can serve concurrent calls.
#[derive(Clone)]
pub struct Validator {
    store: Arc<dyn MetadataStore>,
}

impl Validator {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Validate `object` as an instance of `class_name`
    ///
    /// Data problems are reported in the returned report; `Err` means the
    /// options or the store are unusable.
    pub async fn validate(
        &self,
        object: &Value,
        class_name: &str,
        options: &ValidatorOptions,
    ) -> Result<ValidationReport, ValidatorError> {
        self.run(object, class_name, options, ExecutionMode::Full).await
    }

    /// Validate without invoking async constraints (they count as passed)
    pub fn validate_sync(
        &self,
        object: &Value,
        class_name: &str,
        options: &ValidatorOptions,
    ) -> Result<ValidationReport, ValidatorError> {
        futures::executor::block_on(self.run(object, class_name, options, ExecutionMode::SyncOnly))
    }

    /// Validate and return the (cleaned) object, or reject with its errors
    pub async fn validate_or_reject(
        &self,
        object: &Value,
        class_name: &str,
        options: &ValidatorOptions,
    ) -> Result<Value, ValidatorError> {
        let report = self.validate(object, class_name, options).await?;
        if !report.is_valid() {
            return Err(ValidatorError::Rejected(report.errors));
        }
        Ok(report.cleaned.unwrap_or_else(|| object.clone()))
    }

    async fn run(
        &self,
        object: &Value,
        class_name: &str,
        options: &ValidatorOptions,
        mode: ExecutionMode,
    ) -> Result<ValidationReport, ValidatorError> {
        options.check()?;

        let executor = ValidationExecutor::new(&*self.store, options, mode);
        let outcome = executor.execute(object, Some(class_name)).await?;

        tracing::debug!(
            class = %class_name,
            errors = outcome.errors.len(),
            mode = ?mode,
            "Validation finished"
        );

        let cleaned = options
            .whitelist
            .then(|| outcome.cleaned.unwrap_or_else(|| object.clone()));
        Ok(ValidationReport {
            errors: outcome.errors,
            cleaned,
        })
    }
}
