#![forbid(unsafe_code)]

//! Option records accepted by control constructors and mutations.
//!
//! Defaults match the documented behavior of every operation: updates
//! propagate to ancestors (`only_self = false`) and emit events
//! (`emit_event = true`).

use serde_json::Value;

use crate::status::UpdateOn;
use crate::validation::{AsyncValidatorFn, ValidatorFn, ValidatorInput};

// ---------------------------------------------------------------------------
// Per-call options
// ---------------------------------------------------------------------------

/// Options for [`update_value_and_validity`](crate::AbstractControl::update_value_and_validity)
/// and the other tree mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Do not refresh ancestors.
    pub only_self: bool,
    /// Broadcast on `value_changes` / `status_changes`.
    pub emit_event: bool,
}

impl UpdateOptions {
    /// Propagate to ancestors and emit events.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            only_self: false,
            emit_event: true,
        }
    }

    /// Stop at this control.
    #[must_use]
    pub const fn only_self(mut self) -> Self {
        self.only_self = true;
        self
    }

    /// Suppress value and status broadcasts.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.emit_event = false;
        self
    }
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for a leaf's `set_value` / `patch_value`.
///
/// The two `emit_*_change` flags exist for UI bindings: a binding that just
/// read a value from its widget passes `emit_model_to_view_change = false`
/// so the value is not written back to the same widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetValueOptions {
    /// Do not refresh ancestors.
    pub only_self: bool,
    /// Broadcast on `value_changes` / `status_changes`.
    pub emit_event: bool,
    /// Invoke the registered change listeners.
    pub emit_model_to_view_change: bool,
    /// Flag handed to every change listener.
    pub emit_view_to_model_change: bool,
}

impl SetValueOptions {
    /// All propagation and all notifications enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            only_self: false,
            emit_event: true,
            emit_model_to_view_change: true,
            emit_view_to_model_change: true,
        }
    }

    /// Stop at this control.
    #[must_use]
    pub const fn only_self(mut self) -> Self {
        self.only_self = true;
        self
    }

    /// Suppress value and status broadcasts.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.emit_event = false;
        self
    }

    /// Skip the change listeners (the value came from the view).
    #[must_use]
    pub const fn without_model_to_view(mut self) -> Self {
        self.emit_model_to_view_change = false;
        self
    }

    /// Tell change listeners not to echo the value back to the model.
    #[must_use]
    pub const fn without_view_to_model(mut self) -> Self {
        self.emit_view_to_model_change = false;
        self
    }

    /// The subset used by the update algorithm.
    #[must_use]
    pub const fn update_options(self) -> UpdateOptions {
        UpdateOptions {
            only_self: self.only_self,
            emit_event: self.emit_event,
        }
    }
}

impl Default for SetValueOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<UpdateOptions> for SetValueOptions {
    fn from(opts: UpdateOptions) -> Self {
        Self {
            only_self: opts.only_self,
            emit_event: opts.emit_event,
            ..Self::new()
        }
    }
}

/// Options for [`set_errors`](crate::AbstractControl::set_errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorOptions {
    /// Broadcast the recalculated status on each ancestor.
    pub emit_event: bool,
}

impl ErrorOptions {
    /// Emit on every level.
    #[must_use]
    pub const fn new() -> Self {
        Self { emit_event: true }
    }

    /// Suppress status broadcasts.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.emit_event = false;
        self
    }
}

impl Default for ErrorOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Construction options
// ---------------------------------------------------------------------------

/// Options record accepted by control constructors.
#[derive(Debug, Clone, Default)]
pub struct ControlOptions {
    /// Synchronous validators (composed when a list).
    pub validators: ValidatorInput<ValidatorFn>,
    /// Asynchronous validators (composed when a list).
    pub async_validators: ValidatorInput<AsyncValidatorFn>,
    /// Explicit update hook; inherited from the parent when unset.
    pub update_on: Option<UpdateOn>,
}

impl ControlOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the synchronous validators.
    #[must_use]
    pub fn validators(mut self, validators: impl Into<ValidatorInput<ValidatorFn>>) -> Self {
        self.validators = validators.into();
        self
    }

    /// Set the asynchronous validators.
    #[must_use]
    pub fn async_validators(
        mut self,
        validators: impl Into<ValidatorInput<AsyncValidatorFn>>,
    ) -> Self {
        self.async_validators = validators.into();
        self
    }

    /// Set the update hook.
    #[must_use]
    pub fn update_on(mut self, update_on: UpdateOn) -> Self {
        self.update_on = Some(update_on);
        self
    }
}

/// Second constructor argument: either bare validators (the legacy
/// `(validator, async_validator)` pair) or a full [`ControlOptions`] record.
///
/// With the options form, the constructor's separate async argument is
/// ignored in favor of `ControlOptions::async_validators`.
#[derive(Debug, Clone)]
pub enum ValidatorOrOpts {
    /// Bare validators.
    Validators(ValidatorInput<ValidatorFn>),
    /// Options record.
    Options(ControlOptions),
}

impl Default for ValidatorOrOpts {
    fn default() -> Self {
        Self::Validators(ValidatorInput::None)
    }
}

impl From<ControlOptions> for ValidatorOrOpts {
    fn from(opts: ControlOptions) -> Self {
        Self::Options(opts)
    }
}

impl From<ValidatorInput<ValidatorFn>> for ValidatorOrOpts {
    fn from(validators: ValidatorInput<ValidatorFn>) -> Self {
        Self::Validators(validators)
    }
}

impl From<ValidatorFn> for ValidatorOrOpts {
    fn from(validator: ValidatorFn) -> Self {
        Self::Validators(validator.into())
    }
}

impl From<Vec<ValidatorFn>> for ValidatorOrOpts {
    fn from(list: Vec<ValidatorFn>) -> Self {
        Self::Validators(list.into())
    }
}

impl From<Option<ValidatorFn>> for ValidatorOrOpts {
    fn from(validator: Option<ValidatorFn>) -> Self {
        Self::Validators(validator.into())
    }
}

/// Effective configuration derived from constructor arguments.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedOptions {
    pub(crate) validator: Option<ValidatorFn>,
    pub(crate) async_validator: Option<AsyncValidatorFn>,
    pub(crate) update_on: Option<UpdateOn>,
}

impl ValidatorOrOpts {
    pub(crate) fn resolve(
        self,
        async_validators: ValidatorInput<AsyncValidatorFn>,
    ) -> ResolvedOptions {
        match self {
            Self::Validators(validators) => ResolvedOptions {
                validator: validators.coerce(),
                async_validator: async_validators.coerce(),
                update_on: None,
            },
            Self::Options(opts) => ResolvedOptions {
                validator: opts.validators.coerce(),
                async_validator: opts.async_validators.coerce(),
                update_on: opts.update_on,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

/// Initial (or reset) state of a leaf: a raw value, or a boxed value that
/// also fixes the disabled flag.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    /// Raw value; the disabled flag is left alone.
    Value(Value),
    /// Value plus an explicit disabled flag.
    Boxed {
        /// The value.
        value: Value,
        /// Whether the control starts disabled.
        disabled: bool,
    },
}

impl FormState {
    /// Boxed form.
    #[must_use]
    pub fn boxed(value: impl Into<Value>, disabled: bool) -> Self {
        Self::Boxed {
            value: value.into(),
            disabled,
        }
    }

    /// The carried value.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Value(value) | Self::Boxed { value, .. } => value,
        }
    }

    /// Split into the value and the explicit disabled flag, if any.
    #[must_use]
    pub fn into_parts(self) -> (Value, Option<bool>) {
        match self {
            Self::Value(value) => (value, None),
            Self::Boxed { value, disabled } => (value, Some(disabled)),
        }
    }

    /// Interpret a JSON value, recognizing the boxed shape.
    ///
    /// An object with exactly the two keys `value` and `disabled` is boxed;
    /// `disabled` is read by JSON truthiness.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map)
                if map.len() == 2 && map.contains_key("value") && map.contains_key("disabled") =>
            {
                let disabled = map.remove("disabled").is_some_and(|d| truthy(&d));
                let value = map.remove("value").unwrap_or(Value::Null);
                Self::Boxed { value, disabled }
            }
            other => Self::Value(other),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

impl From<Value> for FormState {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
