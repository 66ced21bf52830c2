//! Constraint predicates
//!
//! A predicate is the opaque "is this value valid" capability behind a
//! constraint declaration. It is either synchronous ([`ConstraintCheck`]) or
//! asynchronous ([`AsyncConstraintCheck`]); the runner treats both uniformly.

use async_trait::async_trait;
use futures::future::Future;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Everything a predicate or message function may look at
///
/// `value` is `None` when the property is absent from the object.
#[derive(Debug, Clone, Copy)]
pub struct ValidationArguments<'a> {
    pub value: Option<&'a Value>,
    pub object: &'a Map<String, Value>,
    pub property: &'a str,
    pub target_name: &'a str,
    pub constraints: &'a [Value],
}

/// Synchronous predicate
pub trait ConstraintCheck: Send + Sync {
    fn validate(&self, value: Option<&Value>, args: &ValidationArguments<'_>) -> bool;

    /// Message used when the declaration carries none
    fn default_message(&self, _args: &ValidationArguments<'_>) -> Option<String> {
        None
    }
}

impl<F> ConstraintCheck for F
where
    F: Fn(Option<&Value>, &ValidationArguments<'_>) -> bool + Send + Sync,
{
    fn validate(&self, value: Option<&Value>, args: &ValidationArguments<'_>) -> bool {
        self(value, args)
    }
}

/// Asynchronous predicate (database lookups, remote checks, ...)
#[async_trait]
pub trait AsyncConstraintCheck: Send + Sync {
    async fn validate(&self, value: Option<&Value>, args: &ValidationArguments<'_>) -> bool;

    /// Message used when the declaration carries none
    fn default_message(&self, _args: &ValidationArguments<'_>) -> Option<String> {
        None
    }
}

/// Synchronous check paired with a default message
struct WithMessage<F, M> {
    check: F,
    message: M,
}

impl<F, M> ConstraintCheck for WithMessage<F, M>
where
    F: Fn(Option<&Value>, &ValidationArguments<'_>) -> bool + Send + Sync,
    M: Fn(&ValidationArguments<'_>) -> String + Send + Sync,
{
    fn validate(&self, value: Option<&Value>, args: &ValidationArguments<'_>) -> bool {
        (self.check)(value, args)
    }

    fn default_message(&self, args: &ValidationArguments<'_>) -> Option<String> {
        Some((self.message)(args))
    }
}

/// Adapter turning an owned-value async closure into an [`AsyncConstraintCheck`]
struct AsyncFn<F>(F);

#[async_trait]
impl<F, Fut> AsyncConstraintCheck for AsyncFn<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn validate(&self, value: Option<&Value>, _args: &ValidationArguments<'_>) -> bool {
        (self.0)(value.cloned()).await
    }
}

/// A predicate, tagged with its execution contract
#[derive(Clone)]
pub enum Predicate {
    Sync(Arc<dyn ConstraintCheck>),
    Async(Arc<dyn AsyncConstraintCheck>),
}

impl Predicate {
    /// Wrap a synchronous closure
    pub fn sync<F>(check: F) -> Self
    where
        F: Fn(Option<&Value>, &ValidationArguments<'_>) -> bool + Send + Sync + 'static,
    {
        Predicate::Sync(Arc::new(check))
    }

    /// Wrap a synchronous closure with its default failure message
    pub fn sync_with_message<F, M>(check: F, message: M) -> Self
    where
        F: Fn(Option<&Value>, &ValidationArguments<'_>) -> bool + Send + Sync + 'static,
        M: Fn(&ValidationArguments<'_>) -> String + Send + Sync + 'static,
    {
        Predicate::Sync(Arc::new(WithMessage { check, message }))
    }

    /// Wrap an async closure; the closure receives a clone of the value
    pub fn from_async_fn<F, Fut>(check: F) -> Self
    where
        F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Predicate::Async(Arc::new(AsyncFn(check)))
    }

    /// Wrap an [`AsyncConstraintCheck`] implementation
    pub fn from_async<C: AsyncConstraintCheck + 'static>(check: C) -> Self {
        Predicate::Async(Arc::new(check))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Predicate::Async(_))
    }

    pub(crate) fn default_message(&self, args: &ValidationArguments<'_>) -> Option<String> {
        match self {
            Predicate::Sync(check) => check.default_message(args),
            Predicate::Async(check) => check.default_message(args),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Sync(_) => f.write_str("Predicate::Sync"),
            Predicate::Async(_) => f.write_str("Predicate::Async"),
        }
    }
}
