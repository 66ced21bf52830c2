//! Constraint runner: invokes the active predicates of one property

use super::aggregator::PropertyFailures;
use crate::config::ValidatorOptions;
use crate::core::constraint::{Predicate, ValidationArguments};
use crate::core::metadata::ConstraintDeclaration;
use futures::future::join_all;
use serde_json::{Map, Value};

/// Which predicates a run may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Sync and async predicates
    Full,
    /// Async predicates are not invoked and count as passed
    SyncOnly,
}

/// The property being checked
#[derive(Debug, Clone, Copy)]
pub struct PropertyScope<'a> {
    pub object: &'a Map<String, Value>,
    pub property: &'a str,
    pub target_name: &'a str,
}

impl<'a> PropertyScope<'a> {
    fn arguments(&self, value: Option<&'a Value>, decl: &'a ConstraintDeclaration) -> ValidationArguments<'a> {
        ValidationArguments {
            value,
            object: self.object,
            property: self.property,
            target_name: self.target_name,
            constraints: &decl.constraints,
        }
    }
}

async fn evaluate(predicate: &Predicate, value: Option<&Value>, args: &ValidationArguments<'_>) -> bool {
    match predicate {
        Predicate::Sync(check) => check.validate(value, args),
        Predicate::Async(check) => check.validate(value, args).await,
    }
}

async fn evaluate_item(predicate: &Predicate, args: ValidationArguments<'_>) -> bool {
    evaluate(predicate, args.value, &args).await
}

/// `None` when the declaration was not invoked
async fn check(
    decl: &ConstraintDeclaration,
    value: Option<&Value>,
    args: ValidationArguments<'_>,
    mode: ExecutionMode,
) -> Option<bool> {
    if mode == ExecutionMode::SyncOnly && decl.predicate.is_async() {
        tracing::debug!(
            constraint = %decl.name,
            property = %args.property,
            "Skipping async constraint in synchronous validation"
        );
        return None;
    }

    match (decl.each, value) {
        (true, Some(Value::Array(items))) => {
            let checks = items.iter().map(|item| {
                evaluate_item(
                    &decl.predicate,
                    ValidationArguments {
                        value: Some(item),
                        ..args
                    },
                )
            });
            Some(join_all(checks).await.into_iter().all(|ok| ok))
        }
        _ => Some(evaluate(&decl.predicate, value, &args).await),
    }
}

fn message_for(
    decl: &ConstraintDeclaration,
    args: &ValidationArguments<'_>,
    options: &ValidatorOptions,
) -> Option<String> {
    if let Some(message) = &decl.message {
        return Some(message.resolve(args));
    }
    if options.dismiss_default_messages {
        return None;
    }
    decl.predicate
        .default_message(args)
        .or_else(|| Some(format!("{} failed the {} constraint", args.property, decl.name)))
}

fn record(
    failures: &mut PropertyFailures,
    decl: &ConstraintDeclaration,
    args: &ValidationArguments<'_>,
    options: &ValidatorOptions,
) {
    failures
        .constraints
        .insert(decl.name.clone(), message_for(decl, args, options));
    if let Some(context) = &decl.context {
        failures.contexts.insert(decl.name.clone(), context.clone());
    }
}

/// Run `active` against `value`
///
/// Failures are recorded in declaration order whatever the completion order
/// of async predicates. With `stop_at_first_error`, predicates run one at a
/// time and nothing after the first failure is invoked.
pub async fn run(
    value: Option<&Value>,
    active: &[&ConstraintDeclaration],
    scope: PropertyScope<'_>,
    options: &ValidatorOptions,
    mode: ExecutionMode,
) -> PropertyFailures {
    let mut failures = PropertyFailures::default();

    if options.stop_at_first_error {
        for decl in active {
            let args = scope.arguments(value, decl);
            if check(decl, value, args, mode).await == Some(false) {
                record(&mut failures, decl, &args, options);
                break;
            }
        }
        return failures;
    }

    let outcomes = join_all(
        active
            .iter()
            .map(|decl| check(decl, value, scope.arguments(value, decl), mode)),
    )
    .await;

    for (decl, outcome) in active.iter().zip(outcomes) {
        if outcome == Some(false) {
            record(&mut failures, decl, &scope.arguments(value, decl), options);
        }
    }
    failures
}
