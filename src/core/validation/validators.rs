//! Reusable constraint declarations
//!
//! Ready-made declarations for the checks most classes need. Each carries
//! its default message; attach groups, `always` or a custom message with the
//! `ConstraintDeclaration` builder methods.

use crate::core::constraint::{Predicate, ValidationArguments};
use crate::core::metadata::ConstraintDeclaration;
use regex::Regex;
use serde_json::{Value, json};
use validator::{ValidateEmail, ValidateUrl};

fn as_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

fn as_f64(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn declaration<F, M>(name: &str, check: F, message: M) -> ConstraintDeclaration
where
    F: Fn(Option<&Value>, &ValidationArguments<'_>) -> bool + Send + Sync + 'static,
    M: Fn(&ValidationArguments<'_>) -> String + Send + Sync + 'static,
{
    ConstraintDeclaration::new(name, Predicate::sync_with_message(check, message))
}

/// Value is present and not null
pub fn is_defined() -> ConstraintDeclaration {
    declaration(
        "isDefined",
        |value, _| value.is_some_and(|v| !v.is_null()),
        |args| format!("{} should not be null or undefined", args.property),
    )
}

/// Value is not undefined, null, or an empty string/array/object
pub fn is_not_empty() -> ConstraintDeclaration {
    declaration(
        "isNotEmpty",
        |value, _| match value {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        },
        |args| format!("{} should not be empty", args.property),
    )
}

/// String length (in characters) within `min..=max`
pub fn length(min: usize, max: usize) -> ConstraintDeclaration {
    declaration(
        "length",
        move |value, _| as_str(value).is_some_and(|s| (min..=max).contains(&s.chars().count())),
        move |args| match as_str(args.value) {
            Some(s) if s.chars().count() < min => format!(
                "{} must be longer than or equal to {} characters",
                args.property, min
            ),
            Some(_) => format!(
                "{} must be shorter than or equal to {} characters",
                args.property, max
            ),
            None => format!("{} must be a string", args.property),
        },
    )
    .with_constraints(vec![json!(min), json!(max)])
}

/// Number greater than or equal to `min`
pub fn min(min: f64) -> ConstraintDeclaration {
    declaration(
        "min",
        move |value, _| as_f64(value).is_some_and(|n| n >= min),
        move |args| format!("{} must not be less than {}", args.property, min),
    )
    .with_constraints(vec![json!(min)])
}

/// Number lower than or equal to `max`
pub fn max(max: f64) -> ConstraintDeclaration {
    declaration(
        "max",
        move |value, _| as_f64(value).is_some_and(|n| n <= max),
        move |args| format!("{} must not be greater than {}", args.property, max),
    )
    .with_constraints(vec![json!(max)])
}

/// Number strictly greater than zero
pub fn is_positive() -> ConstraintDeclaration {
    declaration(
        "isPositive",
        |value, _| as_f64(value).is_some_and(|n| n > 0.0),
        |args| format!("{} must be a positive number", args.property),
    )
}

/// String is one of `allowed`
pub fn is_in(allowed: Vec<String>) -> ConstraintDeclaration {
    let params = allowed.iter().map(|a| json!(a)).collect();
    let listed = allowed.join(", ");
    declaration(
        "isIn",
        move |value, _| as_str(value).is_some_and(|s| allowed.iter().any(|a| a == s)),
        move |args| {
            format!(
                "{} must be one of the following values: {}",
                args.property, listed
            )
        },
    )
    .with_constraints(params)
}

/// String is a date in the given chrono `format`
pub fn date_format(format: &'static str) -> ConstraintDeclaration {
    declaration(
        "isDateString",
        move |value, _| {
            as_str(value).is_some_and(|s| chrono::NaiveDate::parse_from_str(s, format).is_ok())
        },
        move |args| format!("{} must be a date in the {} format", args.property, format),
    )
    .with_constraints(vec![json!(format)])
}

/// String is an email address
pub fn is_email() -> ConstraintDeclaration {
    declaration(
        "isEmail",
        |value, _| as_str(value).is_some_and(|s| s.validate_email()),
        |args| format!("{} must be an email", args.property),
    )
}

/// String is a URL
pub fn is_url() -> ConstraintDeclaration {
    declaration(
        "isUrl",
        |value, _| as_str(value).is_some_and(|s| s.validate_url()),
        |args| format!("{} must be a URL address", args.property),
    )
}

/// String matches `pattern`
pub fn matches(pattern: Regex) -> ConstraintDeclaration {
    let source = pattern.as_str().to_string();
    declaration(
        "matches",
        move |value, _| as_str(value).is_some_and(|s| pattern.is_match(s)),
        move |args| format!("{} must match {} regular expression", args.property, source),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    /// Evaluate a sync declaration, returning its default message on failure
    fn check(decl: &ConstraintDeclaration, value: Option<Value>) -> Result<(), String> {
        let object = Map::new();
        let args = ValidationArguments {
            value: value.as_ref(),
            object: &object,
            property: "field",
            target_name: "test",
            constraints: &decl.constraints,
        };
        let Predicate::Sync(predicate) = &decl.predicate else {
            panic!("built-in validators are synchronous");
        };
        if predicate.validate(value.as_ref(), &args) {
            Ok(())
        } else {
            Err(decl.predicate.default_message(&args).unwrap_or_default())
        }
    }

    // === is_defined() ===

    #[test]
    fn test_is_defined_null_value_returns_error() {
        let result = check(&is_defined(), Some(json!(null)));
        assert!(result.unwrap_err().contains("null or undefined"));
    }

    #[test]
    fn test_is_defined_undefined_returns_error() {
        assert!(check(&is_defined(), None).is_err());
    }

    #[test]
    fn test_is_defined_empty_string_returns_ok() {
        assert!(check(&is_defined(), Some(json!(""))).is_ok());
    }

    // === is_not_empty() ===

    #[test]
    fn test_is_not_empty_empty_string_returns_error() {
        let result = check(&is_not_empty(), Some(json!("")));
        assert_eq!(result.unwrap_err(), "field should not be empty");
    }

    #[test]
    fn test_is_not_empty_values() {
        assert!(check(&is_not_empty(), Some(json!("x"))).is_ok());
        assert!(check(&is_not_empty(), Some(json!(0))).is_ok());
        assert!(check(&is_not_empty(), Some(json!([]))).is_err());
        assert!(check(&is_not_empty(), Some(json!({}))).is_err());
        assert!(check(&is_not_empty(), None).is_err());
    }

    // === length() ===

    #[test]
    fn test_length_too_short_returns_error() {
        let result = check(&length(3, 50), Some(json!("ab")));
        assert!(result.unwrap_err().contains("longer than or equal to 3"));
    }

    #[test]
    fn test_length_too_long_returns_error() {
        let result = check(&length(1, 5), Some(json!("abcdef")));
        assert!(result.unwrap_err().contains("shorter than or equal to 5"));
    }

    #[test]
    fn test_length_bounds_inclusive() {
        assert!(check(&length(3, 5), Some(json!("abc"))).is_ok());
        assert!(check(&length(3, 5), Some(json!("abcde"))).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(check(&length(1, 2), Some(json!("éé"))).is_ok());
    }

    #[test]
    fn test_length_non_string_returns_error() {
        let result = check(&length(1, 5), Some(json!(42)));
        assert!(result.unwrap_err().contains("must be a string"));
    }

    // === min() / max() ===

    #[test]
    fn test_min_under_returns_error() {
        let result = check(&min(18.0), Some(json!(15)));
        assert_eq!(result.unwrap_err(), "field must not be less than 18");
    }

    #[test]
    fn test_min_equal_returns_ok() {
        assert!(check(&min(18.0), Some(json!(18))).is_ok());
    }

    #[test]
    fn test_max_over_returns_error() {
        let result = check(&max(100.0), Some(json!(101.5)));
        assert!(result.unwrap_err().contains("greater than 100"));
    }

    #[test]
    fn test_max_non_number_returns_error() {
        assert!(check(&max(100.0), Some(json!("50"))).is_err());
    }

    #[test]
    fn test_min_exposes_parameter() {
        assert_eq!(min(18.0).constraints, vec![json!(18.0)]);
    }

    // === is_positive() ===

    #[test]
    fn test_is_positive() {
        assert!(check(&is_positive(), Some(json!(42.5))).is_ok());
        assert!(check(&is_positive(), Some(json!(0))).is_err());
        assert!(check(&is_positive(), Some(json!(-1))).is_err());
    }

    // === is_in() ===

    #[test]
    fn test_is_in_value_in_list_returns_ok() {
        let decl = is_in(vec!["active".into(), "inactive".into(), "pending".into()]);
        assert!(check(&decl, Some(json!("active"))).is_ok());
    }

    #[test]
    fn test_is_in_value_not_in_list_returns_error() {
        let decl = is_in(vec!["active".into(), "inactive".into()]);
        let result = check(&decl, Some(json!("deleted")));
        assert!(result.unwrap_err().contains("active, inactive"));
    }

    #[test]
    fn test_is_in_empty_list_always_error() {
        assert!(check(&is_in(vec![]), Some(json!("anything"))).is_err());
    }

    // === date_format() ===

    #[test]
    fn test_date_format_valid_date_returns_ok() {
        assert!(check(&date_format("%Y-%m-%d"), Some(json!("2024-01-15"))).is_ok());
    }

    #[test]
    fn test_date_format_invalid_date_returns_error() {
        let result = check(&date_format("%Y-%m-%d"), Some(json!("not-a-date")));
        assert!(result.unwrap_err().contains("%Y-%m-%d"));
    }

    #[test]
    fn test_date_format_wrong_format_returns_error() {
        assert!(check(&date_format("%d/%m/%Y"), Some(json!("2024-01-15"))).is_err());
        assert!(check(&date_format("%d/%m/%Y"), Some(json!("15/01/2024"))).is_ok());
    }

    // === is_email() / is_url() / matches() ===

    #[test]
    fn test_is_email() {
        assert!(check(&is_email(), Some(json!("test@example.com"))).is_ok());
        assert!(check(&is_email(), Some(json!("invalid-email"))).is_err());
        assert!(check(&is_email(), Some(json!(3))).is_err());
    }

    #[test]
    fn test_is_url() {
        assert!(check(&is_url(), Some(json!("https://example.com/a"))).is_ok());
        assert!(check(&is_url(), Some(json!("not a url"))).is_err());
    }

    #[test]
    fn test_matches() {
        let decl = matches(Regex::new(r"^[A-Z]{3}$").unwrap());
        assert!(check(&decl, Some(json!("ABC"))).is_ok());
        let result = check(&decl, Some(json!("abc")));
        assert!(result.unwrap_err().contains("^[A-Z]{3}$"));
    }
}
