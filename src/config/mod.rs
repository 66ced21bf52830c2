//! Validator options loading and management

use crate::core::ValidatorError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Controls what is exposed on emitted validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationErrorOptions {
    /// Expose the validated object as `target`
    pub target: bool,

    /// Expose the validated value as `value`
    pub value: bool,
}

impl Default for ValidationErrorOptions {
    fn default() -> Self {
        Self {
            target: true,
            value: true,
        }
    }
}

/// Options for a single validation run
///
/// Resolved once per call and threaded unchanged through nested validation.
/// Field names serialize in camelCase so option files can be shared with
/// other validator front-ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorOptions {
    /// Emit diagnostic warnings (no effect on the result)
    pub enable_debug_messages: bool,

    /// Skip properties whose value is undefined
    pub skip_undefined_properties: bool,

    /// Skip properties whose value is null
    pub skip_null_properties: bool,

    /// Skip properties whose value is null or undefined
    pub skip_missing_properties: bool,

    /// Strip properties that carry no declarations from the cleaned output
    pub whitelist: bool,

    /// Report undeclared properties as errors (when not stripped)
    pub forbid_non_whitelisted: bool,

    /// Groups requested for this run
    pub groups: Vec<String>,

    /// Default for declarations that do not set `always` themselves
    pub always: bool,

    /// With no requested groups, ignore declarations that carry a group
    pub strict_groups: bool,

    /// Leave messages unset instead of falling back to default messages
    pub dismiss_default_messages: bool,

    /// Payload shaping of emitted errors
    pub validation_error: ValidationErrorOptions,

    /// Reject objects whose class has no metadata (`None` means `true`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbid_unknown_values: Option<bool>,

    /// Stop checking a property after its first failing constraint
    pub stop_at_first_error: bool,
}

impl ValidatorOptions {
    /// Options with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = serde_yaml::from_str(&content)?;
        Ok(options)
    }

    /// Load options from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml)?;
        Ok(options)
    }

    /// Load options from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options)
    }

    /// Whether objects without metadata are rejected
    ///
    /// Unset means rejected, so a missing option never lets unknown
    /// objects bypass validation.
    pub fn forbids_unknown_values(&self) -> bool {
        self.forbid_unknown_values.unwrap_or(true)
    }

    /// Reject option bundles that cannot be applied
    pub fn check(&self) -> Result<(), ValidatorError> {
        if self.groups.iter().any(|g| g.trim().is_empty()) {
            return Err(ValidatorError::InvalidOptions {
                message: "group names must not be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_whitelist(mut self, whitelist: bool) -> Self {
        self.whitelist = whitelist;
        self
    }

    pub fn with_forbid_non_whitelisted(mut self, forbid: bool) -> Self {
        self.forbid_non_whitelisted = forbid;
        self
    }

    pub fn with_forbid_unknown_values(mut self, forbid: bool) -> Self {
        self.forbid_unknown_values = Some(forbid);
        self
    }

    pub fn with_strict_groups(mut self, strict: bool) -> Self {
        self.strict_groups = strict;
        self
    }

    pub fn with_always(mut self, always: bool) -> Self {
        self.always = always;
        self
    }

    pub fn with_stop_at_first_error(mut self, stop: bool) -> Self {
        self.stop_at_first_error = stop;
        self
    }

    pub fn with_dismiss_default_messages(mut self, dismiss: bool) -> Self {
        self.dismiss_default_messages = dismiss;
        self
    }

    pub fn with_skip_undefined_properties(mut self, skip: bool) -> Self {
        self.skip_undefined_properties = skip;
        self
    }

    pub fn with_skip_null_properties(mut self, skip: bool) -> Self {
        self.skip_null_properties = skip;
        self
    }

    pub fn with_skip_missing_properties(mut self, skip: bool) -> Self {
        self.skip_missing_properties = skip;
        self
    }

    pub fn with_validation_error(mut self, target: bool, value: bool) -> Self {
        self.validation_error = ValidationErrorOptions { target, value };
        self
    }

    pub fn with_debug_messages(mut self, enabled: bool) -> Self {
        self.enable_debug_messages = enabled;
        self
    }
}
