#![forbid(unsafe_code)]

//! Asynchronous validator contract and composer.
//!
//! An async validator returns a deferred result that resolves exactly once to
//! the same shape a synchronous validator returns. The control tree stores
//! the effective async validator but never drives it: a consumer polls the
//! future and reports the outcome through
//! [`set_errors`](crate::AbstractControl::set_errors), typically after
//! [`mark_as_pending`](crate::AbstractControl::mark_as_pending).
//!
//! A result that arrives after the control left its tree should be dropped
//! by the consumer; the core cannot cancel an in-flight future.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::validators::{ValidationErrors, ValidatorInput, merge_errors};
use crate::control::Control;

/// Deferred validation result.
pub type AsyncValidationFuture = Pin<Box<dyn Future<Output = Option<ValidationErrors>>>>;

// ---------------------------------------------------------------------------
// AsyncValidatorFn
// ---------------------------------------------------------------------------

/// Function-style asynchronous validator.
#[derive(Clone)]
pub struct AsyncValidatorFn(Rc<dyn Fn(&Control) -> AsyncValidationFuture>);

impl AsyncValidatorFn {
    /// Wrap a function returning a deferred result.
    pub fn new(f: impl Fn(&Control) -> AsyncValidationFuture + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Start validating `control`.
    ///
    /// The control is read synchronously when this is called; the returned
    /// future only carries the outcome.
    #[must_use]
    pub fn call(&self, control: &Control) -> AsyncValidationFuture {
        (self.0)(control)
    }

    /// Whether both handles wrap the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for AsyncValidatorFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidatorFn").finish_non_exhaustive()
    }
}

/// Object-style asynchronous validator.
pub trait AsyncValidator {
    /// Start validating `control`.
    fn validate(&self, control: &Control) -> AsyncValidationFuture;
}

impl AsyncValidator for AsyncValidatorFn {
    fn validate(&self, control: &Control) -> AsyncValidationFuture {
        self.call(control)
    }
}

impl<V: AsyncValidator + ?Sized> AsyncValidator for Box<V> {
    fn validate(&self, control: &Control) -> AsyncValidationFuture {
        (**self).validate(control)
    }
}

/// Wrap an object-style async validator into the function form.
pub fn normalize_async_validator(validator: impl AsyncValidator + 'static) -> AsyncValidatorFn {
    AsyncValidatorFn::new(move |control| validator.validate(control))
}

/// Combine async validators into one.
///
/// All validators are started against the same control; their results are
/// awaited in list order and merged with the synchronous merge rule. An
/// empty list yields `None`.
#[must_use]
pub fn compose_async(
    validators: impl IntoIterator<Item = AsyncValidatorFn>,
) -> Option<AsyncValidatorFn> {
    let validators: Vec<AsyncValidatorFn> = validators.into_iter().collect();
    if validators.is_empty() {
        return None;
    }
    Some(AsyncValidatorFn::new(move |control| {
        let pending: Vec<AsyncValidationFuture> =
            validators.iter().map(|v| v.call(control)).collect();
        Box::pin(async move {
            let mut results = Vec::with_capacity(pending.len());
            for fut in pending {
                results.push(fut.await);
            }
            merge_errors(results)
        })
    }))
}

/// Normalize object-style async validators, then [`compose_async`] them.
#[must_use]
pub fn compose_async_validators(
    validators: Vec<Box<dyn AsyncValidator>>,
) -> Option<AsyncValidatorFn> {
    compose_async(validators.into_iter().map(normalize_async_validator))
}

impl ValidatorInput<AsyncValidatorFn> {
    /// Resolve into the effective async validator.
    #[must_use]
    pub fn coerce(self) -> Option<AsyncValidatorFn> {
        match self {
            Self::None => None,
            Self::One(validator) => Some(validator),
            Self::Many(list) => compose_async(list),
        }
    }
}

impl From<AsyncValidatorFn> for ValidatorInput<AsyncValidatorFn> {
    fn from(validator: AsyncValidatorFn) -> Self {
        Self::One(validator)
    }
}

impl From<Vec<AsyncValidatorFn>> for ValidatorInput<AsyncValidatorFn> {
    fn from(list: Vec<AsyncValidatorFn>) -> Self {
        Self::Many(list)
    }
}

impl From<Option<AsyncValidatorFn>> for ValidatorInput<AsyncValidatorFn> {
    fn from(validator: Option<AsyncValidatorFn>) -> Self {
        validator.map_or(Self::None, Self::One)
    }
}
