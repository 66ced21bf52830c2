//! # Vouch
//!
//! A metadata-driven validation engine for JSON objects.
//!
//! Applications describe, per class, which constraints apply to which
//! properties. Vouch runs an object through that description and returns an
//! ordered tree of failures instead of stopping at the first one.
//!
//! ## Features
//!
//! - **Groups**: activate subsets of constraints per run (`groups`, `always`, `strictGroups`)
//! - **Skip Rules**: ignore undefined and/or null properties
//! - **Whitelisting**: strip or reject properties that carry no declarations
//! - **Unknown Values**: reject objects whose class has no metadata (on by default)
//! - **Nested Validation**: recurse into nested objects and arrays of objects
//! - **Sync & Async Constraints**: deterministic output whatever the completion order
//! - **Payload Shaping**: hide the target and/or value from emitted errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vouch::prelude::*;
//! use vouch::validators::{is_not_empty, min};
//!
//! let store = InMemoryMetadataStore::new();
//! store.register(
//!     ClassMetadata::new("user")
//!         .property(PropertyConstraintSet::new("name").constraint(is_not_empty()))
//!         .property(PropertyConstraintSet::new("age").constraint(min(18.0))),
//! )?;
//!
//! let validator = Validator::new(Arc::new(store));
//! let report = validator
//!     .validate(&json!({ "name": "", "age": 15 }), "user", &ValidatorOptions::default())
//!     .await?;
//!
//! assert_eq!(report.failed_properties(), vec!["name", "age"]);
//! ```

pub mod config;
pub mod core;
pub mod storage;

#[cfg(feature = "builtin-validators")]
pub use crate::core::validation::validators;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Metadata ===
    pub use crate::core::{
        ALLOW, ClassMetadata, Condition, ConstraintDeclaration, Message, MetadataStore,
        PropertyConstraintSet,
    };

    // === Predicates ===
    pub use crate::core::{AsyncConstraintCheck, ConstraintCheck, Predicate, ValidationArguments};

    // === Validation ===
    pub use crate::core::validation::{
        NESTED_VALIDATION, UNKNOWN_VALUE, WHITELIST_VALIDATION, format_errors,
    };
    pub use crate::core::{ValidationError, ValidationReport, Validator, ValidatorError};

    // === Config ===
    pub use crate::config::{ValidationErrorOptions, ValidatorOptions};

    // === Storage ===
    pub use crate::storage::InMemoryMetadataStore;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
