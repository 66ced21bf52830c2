//! In-memory implementation of MetadataStore

use crate::core::ValidatorError;
use crate::core::metadata::{ClassMetadata, MetadataStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory metadata store
///
/// Classes are registered once (typically at startup) and then shared by
/// every validation call. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    classes: Arc<RwLock<HashMap<String, Arc<ClassMetadata>>>>,
}

impl InMemoryMetadataStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the metadata of a class
    pub fn register(&self, metadata: ClassMetadata) -> Result<(), ValidatorError> {
        let mut classes = self.classes.write().map_err(ValidatorError::lock_poisoned)?;
        classes.insert(metadata.class_name.clone(), Arc::new(metadata));
        Ok(())
    }

    /// Names of all registered classes, sorted
    pub fn class_names(&self) -> Result<Vec<String>, ValidatorError> {
        let classes = self.classes.read().map_err(ValidatorError::lock_poisoned)?;
        let mut names: Vec<String> = classes.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Flatten `class_name` with its ancestors, parents first
    fn resolve(
        classes: &HashMap<String, Arc<ClassMetadata>>,
        class_name: &str,
    ) -> Result<Option<Arc<ClassMetadata>>, ValidatorError> {
        let Some(own) = classes.get(class_name) else {
            return Ok(None);
        };
        if own.extends.is_none() {
            return Ok(Some(own.clone()));
        }

        // Walk up the chain, then apply ancestors from the root down
        let mut chain = vec![own.clone()];
        let mut seen = vec![own.class_name.as_str()];
        let mut current = own;
        while let Some(parent_name) = current.extends.as_deref() {
            if seen.contains(&parent_name) {
                return Err(ValidatorError::InvalidMetadata {
                    class_name: class_name.to_string(),
                    message: format!("inheritance cycle through '{}'", parent_name),
                });
            }
            let Some(parent) = classes.get(parent_name) else {
                tracing::warn!(
                    class = %current.class_name,
                    parent = %parent_name,
                    "Parent class has no registered metadata"
                );
                break;
            };
            seen.push(parent.class_name.as_str());
            chain.push(parent.clone());
            current = parent;
        }

        let mut resolved = ClassMetadata::new(class_name);
        resolved.extends = own.extends.clone();
        for metadata in chain.iter().rev() {
            for set in &metadata.properties {
                resolved = resolved.property(set.clone());
            }
        }
        Ok(Some(Arc::new(resolved)))
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn class_metadata(&self, class_name: &str) -> Result<Option<Arc<ClassMetadata>>, ValidatorError> {
        let classes = self.classes.read().map_err(ValidatorError::lock_poisoned)?;
        Self::resolve(&classes, class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Predicate;
    use crate::core::metadata::{ConstraintDeclaration, PropertyConstraintSet};

    fn decl(name: &str) -> ConstraintDeclaration {
        ConstraintDeclaration::new(name, Predicate::sync(|_, _| true))
    }

    fn names(metadata: &ClassMetadata, property: &str) -> Vec<String> {
        metadata
            .get(property)
            .map(|p| p.constraints.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_register_and_lookup() {
        let store = InMemoryMetadataStore::new();
        store
            .register(ClassMetadata::new("user").property(PropertyConstraintSet::new("name")))
            .unwrap();

        let metadata = store.class_metadata("user").unwrap().unwrap();
        assert!(metadata.declares("name"));
        assert!(store.class_metadata("missing").unwrap().is_none());
        assert_eq!(store.class_names().unwrap(), vec!["user"]);
    }

    #[test]
    fn test_register_replaces() {
        let store = InMemoryMetadataStore::new();
        store
            .register(ClassMetadata::new("user").property(PropertyConstraintSet::new("name")))
            .unwrap();
        store
            .register(ClassMetadata::new("user").property(PropertyConstraintSet::new("email")))
            .unwrap();

        let metadata = store.class_metadata("user").unwrap().unwrap();
        assert!(metadata.declares("email"));
        assert!(!metadata.declares("name"));
    }

    #[test]
    fn test_inheritance_parent_first() {
        let store = InMemoryMetadataStore::new();
        store
            .register(
                ClassMetadata::new("base")
                    .property(PropertyConstraintSet::new("id").constraint(decl("isDefined")))
                    .property(PropertyConstraintSet::new("name").constraint(decl("isString"))),
            )
            .unwrap();
        store
            .register(
                ClassMetadata::new("admin")
                    .extends("base")
                    .property(PropertyConstraintSet::new("role").constraint(decl("isIn")))
                    .property(PropertyConstraintSet::new("name").constraint(decl("isNotEmpty"))),
            )
            .unwrap();

        let metadata = store.class_metadata("admin").unwrap().unwrap();
        let properties: Vec<&str> = metadata
            .properties
            .iter()
            .map(|p| p.property_name.as_str())
            .collect();
        assert_eq!(properties, vec!["id", "name", "role"]);
        assert_eq!(names(&metadata, "name"), vec!["isString", "isNotEmpty"]);
        assert_eq!(metadata.class_name, "admin");
    }

    #[test]
    fn test_inheritance_cycle_is_invalid_metadata() {
        let store = InMemoryMetadataStore::new();
        store.register(ClassMetadata::new("a").extends("b")).unwrap();
        store.register(ClassMetadata::new("b").extends("a")).unwrap();

        let err = store.class_metadata("a").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_METADATA");
    }

    #[test]
    fn test_missing_parent_resolves_own_properties() {
        let store = InMemoryMetadataStore::new();
        store
            .register(
                ClassMetadata::new("child")
                    .extends("ghost")
                    .property(PropertyConstraintSet::new("x")),
            )
            .unwrap();

        let metadata = store.class_metadata("child").unwrap().unwrap();
        assert!(metadata.declares("x"));
    }

    #[test]
    fn test_clones_share_storage() {
        let store = InMemoryMetadataStore::new();
        let clone = store.clone();
        clone.register(ClassMetadata::new("user")).unwrap();
        assert!(store.class_metadata("user").unwrap().is_some());
    }
}
