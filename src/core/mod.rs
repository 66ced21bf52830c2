//! Core module containing the metadata model, predicates and validation engine

pub mod constraint;
pub mod error;
pub mod metadata;
pub mod validation;
pub mod validator;

pub use constraint::{AsyncConstraintCheck, ConstraintCheck, Predicate, ValidationArguments};
pub use error::ValidatorError;
pub use metadata::{
    ALLOW, ClassMetadata, Condition, ConstraintDeclaration, Message, MetadataStore, PropertyConstraintSet,
};
pub use validation::{ValidationError, ValidationReport};
pub use validator::Validator;
