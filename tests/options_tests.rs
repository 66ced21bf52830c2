//! Tests for loading validator options and applying them end to end

use std::io::Write;
use tempfile::NamedTempFile;
use vouch::prelude::*;
use vouch::validators::{is_email, length};

fn validator() -> Validator {
    let store = InMemoryMetadataStore::new();
    store
        .register(
            ClassMetadata::new("account")
                .property(PropertyConstraintSet::new("email").constraint(is_email()))
                .property(
                    PropertyConstraintSet::new("password")
                        .constraint(length(8, 64).with_groups(["create"])),
                ),
        )
        .unwrap();
    Validator::new(Arc::new(store))
}

mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_options_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "whitelist: true\ngroups:\n  - create\nvalidationError:\n  target: false\n  value: false"
        )
        .unwrap();
        let options = ValidatorOptions::from_yaml_file(file.path().to_str().unwrap()).unwrap();

        let report = validator()
            .validate(
                &json!({ "email": "ada@example.com", "password": "short", "role": "admin" }),
                "account",
                &options,
            )
            .await
            .unwrap();

        assert_eq!(report.failed_properties(), vec!["password"]);
        assert_eq!(report.errors[0].target, None);
        assert_eq!(report.errors[0].value, None);
        assert_eq!(
            report.cleaned,
            Some(json!({ "email": "ada@example.com", "password": "short" }))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ValidatorOptions::from_yaml_file("/nonexistent/vouch.yaml").is_err());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(ValidatorOptions::from_yaml_str("groups: [unclosed").is_err());
    }
}

mod json_tests {
    use super::*;

    #[tokio::test]
    async fn test_options_from_json() {
        let options = ValidatorOptions::from_json_str(
            r#"{ "groups": ["update"], "strictGroups": true, "forbidNonWhitelisted": true }"#,
        )
        .unwrap();

        let report = validator()
            .validate(
                &json!({ "email": "ada@example.com", "password": "x", "role": "admin" }),
                "account",
                &options,
            )
            .await
            .unwrap();

        assert_eq!(report.failed_properties(), vec!["role"]);
        assert!(report.errors[0].has_constraint(WHITELIST_VALIDATION));
    }

    #[tokio::test]
    async fn test_blank_group_rejected_before_validation() {
        let options = ValidatorOptions::from_json_str(r#"{ "groups": [""] }"#).unwrap();
        let err = validator()
            .validate(&json!({}), "account", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, ValidatorError::InvalidOptions { .. }));
    }
}

mod debug_message_tests {
    use super::*;

    #[tokio::test]
    async fn test_debug_messages_do_not_change_result() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("vouch=debug")
            .with_test_writer()
            .try_init();

        let object = json!({ "anything": 1 });
        let quiet = validator()
            .validate(&object, "ghost", &ValidatorOptions::default())
            .await
            .unwrap();
        let verbose = validator()
            .validate(&object, "ghost", &ValidatorOptions::new().with_debug_messages(true))
            .await
            .unwrap();

        assert_eq!(quiet, verbose);
        assert!(verbose.errors[0].has_constraint(UNKNOWN_VALUE));
    }
}
