//! Validation error tree and run report

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Constraint key of an object whose class has no metadata
pub const UNKNOWN_VALUE: &str = "unknownValue";

/// Constraint key of a property that is not declared
pub const WHITELIST_VALIDATION: &str = "whitelistValidation";

/// Constraint key of a nested property holding neither object nor array
pub const NESTED_VALIDATION: &str = "nestedValidation";

/// Failures of one property
///
/// Never emitted with both `constraints` and `children` empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Object the property belongs to (hidden by `validationError.target`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,

    pub property: String,

    /// Validated value (hidden by `validationError.value`, absent if undefined)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Failed constraint name -> message, in execution order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub constraints: IndexMap<String, Option<String>>,

    /// Failures of the nested value reached through this property
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ValidationError>,

    /// Context payloads of failed constraints
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub contexts: IndexMap<String, Value>,

    /// `property` is the index of an element of a nested array
    #[serde(skip)]
    pub is_element: bool,
}

impl ValidationError {
    pub fn has_constraint(&self, name: &str) -> bool {
        self.constraints.contains_key(name)
    }

    pub fn message(&self, name: &str) -> Option<&str> {
        self.constraints.get(name).and_then(|m| m.as_deref())
    }

    fn write_lines(&self, f: &mut fmt::Formatter<'_>, parent_path: &str) -> fmt::Result {
        let path = if parent_path.is_empty() {
            self.property.clone()
        } else if self.is_element {
            format!("{}[{}]", parent_path, self.property)
        } else if self.property.is_empty() {
            parent_path.to_string()
        } else {
            format!("{}.{}", parent_path, self.property)
        };

        if !self.constraints.is_empty() {
            let names: Vec<&str> = self.constraints.keys().map(String::as_str).collect();
            writeln!(
                f,
                " - property {} has failed the following constraints: {}",
                path,
                names.join(", ")
            )?;
        }
        for child in &self.children {
            child.write_lines(f, &path)?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_lines(f, "")
    }
}

/// Human-readable report of all failures of one object
pub fn format_errors(class_name: &str, errors: &[ValidationError]) -> String {
    let mut out = format!("An instance of {} has failed the validation:\n", class_name);
    for error in errors {
        out.push_str(&error.to_string());
    }
    out
}

/// Result of a validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// One entry per invalid property, in declaration order
    pub errors: Vec<ValidationError>,

    /// Copy of the object with undeclared properties stripped (whitelist only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<Value>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Property names of the top-level errors, in order
    pub fn failed_properties(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.property.as_str()).collect()
    }
}
