//! Class metadata: which constraints apply to which properties
//!
//! Metadata is plain data. How it gets produced (hand-written builders,
//! generated code, configuration files) is up to the application; the engine
//! only reads it through the [`MetadataStore`] trait.

use crate::core::ValidatorError;
use crate::core::constraint::{Predicate, ValidationArguments};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Failure message of a declaration
#[derive(Clone)]
pub enum Message {
    Static(String),
    Computed(Arc<dyn Fn(&ValidationArguments<'_>) -> String + Send + Sync>),
}

impl Message {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ValidationArguments<'_>) -> String + Send + Sync + 'static,
    {
        Message::Computed(Arc::new(f))
    }

    pub fn resolve(&self, args: &ValidationArguments<'_>) -> String {
        match self {
            Message::Static(message) => message.clone(),
            Message::Computed(f) => f(args),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Static(message) => f.debug_tuple("Static").field(message).finish(),
            Message::Computed(_) => f.write_str("Computed"),
        }
    }
}

impl From<&str> for Message {
    fn from(message: &str) -> Self {
        Message::Static(message.to_string())
    }
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Message::Static(message)
    }
}

/// Name of the declaration created by [`ConstraintDeclaration::allow`]
pub const ALLOW: &str = "allow";

/// A named rule attached to a property
#[derive(Debug, Clone)]
pub struct ConstraintDeclaration {
    /// Key of the failure in `ValidationError::constraints`
    pub name: String,

    pub predicate: Predicate,

    /// Groups this declaration belongs to (empty = ungrouped)
    pub groups: Vec<String>,

    /// Run regardless of requested groups; `None` defers to the options
    pub always: Option<bool>,

    pub message: Option<Message>,

    /// Check every element when the value is an array
    pub each: bool,

    /// Opaque payload reported in `ValidationError::contexts` on failure
    pub context: Option<Value>,

    /// Declaration parameters, exposed through `ValidationArguments`
    pub constraints: Vec<Value>,
}

impl ConstraintDeclaration {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            groups: Vec::new(),
            always: None,
            message: None,
            each: false,
            context: None,
            constraints: Vec::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_always(mut self, always: bool) -> Self {
        self.always = Some(always);
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_computed_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValidationArguments<'_>) -> String + Send + Sync + 'static,
    {
        self.message = Some(Message::computed(f));
        self
    }

    pub fn each(mut self) -> Self {
        self.each = true;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<Value>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Keep a property through whitelisting without checking it
    pub fn allow() -> Self {
        Self::new(ALLOW, Predicate::sync(|_, _| true)).with_always(true)
    }
}

/// Guard deciding whether a property is validated for a given object
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&Map<String, Value>, Option<&Value>) -> bool + Send + Sync>);

impl Condition {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Map<String, Value>, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Validate only when the value is neither null nor undefined
    pub fn optional() -> Self {
        Self::new(|_, value| value.is_some_and(|v| !v.is_null()))
    }

    pub fn holds(&self, object: &Map<String, Value>, value: Option<&Value>) -> bool {
        (self.0)(object, value)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition")
    }
}

/// Declarations attached to one property
#[derive(Debug, Clone)]
pub struct PropertyConstraintSet {
    pub property_name: String,
    pub constraints: Vec<ConstraintDeclaration>,
    pub is_nested: bool,
    pub nested_class: Option<String>,
    pub conditions: Vec<Condition>,
}

impl PropertyConstraintSet {
    /// A property with no declarations yet (stripped by the whitelist until it gets one)
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            constraints: Vec::new(),
            is_nested: false,
            nested_class: None,
            conditions: Vec::new(),
        }
    }

    pub fn constraint(mut self, declaration: ConstraintDeclaration) -> Self {
        self.constraints.push(declaration);
        self
    }

    /// Validate the value (or each element of it) against `class_name`
    pub fn nested(mut self, class_name: impl Into<String>) -> Self {
        self.is_nested = true;
        self.nested_class = Some(class_name.into());
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn optional(self) -> Self {
        self.when(Condition::optional())
    }

    /// Whether the whitelist keeps this property
    pub fn is_whitelisted(&self) -> bool {
        !self.constraints.is_empty() || self.is_nested
    }

    pub(crate) fn merge(&mut self, other: PropertyConstraintSet) {
        self.constraints.extend(other.constraints);
        self.conditions.extend(other.conditions);
        if other.is_nested {
            self.is_nested = true;
            self.nested_class = other.nested_class;
        }
    }
}

/// Metadata registered for one class
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    pub class_name: String,
    pub extends: Option<String>,
    pub properties: Vec<PropertyConstraintSet>,
}

impl ClassMetadata {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            extends: None,
            properties: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add a property; a repeated name merges into the existing set
    pub fn property(mut self, set: PropertyConstraintSet) -> Self {
        match self
            .properties
            .iter_mut()
            .find(|p| p.property_name == set.property_name)
        {
            Some(existing) => existing.merge(set),
            None => self.properties.push(set),
        }
        self
    }

    pub fn get(&self, property_name: &str) -> Option<&PropertyConstraintSet> {
        self.properties
            .iter()
            .find(|p| p.property_name == property_name)
    }

    pub fn declares(&self, property_name: &str) -> bool {
        self.get(property_name).is_some()
    }

    /// Listed with at least one declaration, or nested
    pub fn whitelists(&self, property_name: &str) -> bool {
        self.get(property_name)
            .is_some_and(PropertyConstraintSet::is_whitelisted)
    }
}

/// Read-only lookup table from class name to metadata
///
/// Implementations must be safe to share across concurrent validation calls.
/// Returned metadata is fully resolved (inherited properties included).
pub trait MetadataStore: Send + Sync {
    fn class_metadata(&self, class_name: &str) -> Result<Option<Arc<ClassMetadata>>, ValidatorError>;
}
