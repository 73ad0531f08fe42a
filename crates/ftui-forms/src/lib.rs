//! Reactive form-state model for FrankenTUI.
//!
//! # Role in FrankenTUI
//! `ftui-forms` holds the state behind an input form: values, validation
//! errors, and a four-valued status, arranged as a tree of controls. It has
//! no rendering code; widgets bind to it through change listeners and the
//! [`EventEmitter`] channels every control exposes.
//!
//! # Model
//!
//! - [`FormControl`]: a leaf holding one JSON value.
//! - [`FormGroup`]: named children whose enabled values aggregate into an
//!   object.
//! - [`AbstractControl`]: the shared contract (value, status, errors,
//!   validators, enable/disable, the update pass).
//! - [`validation`]: the validator contract and the composer that merges
//!   several validators into one.
//!
//! Every mutation runs the update pass on the touched control and then on
//! each ancestor, so the whole tree is consistent when the call returns.
//! Malformed group writes are rejected with a [`FormError`] before anything
//! is applied.
//!
//! # Example
//!
//! ```rust
//! use ftui_forms::{
//!     AbstractControl, ControlStatus, FormControl, FormGroup, UpdateOptions, ValidationErrors,
//!     ValidatorFn,
//! };
//! use serde_json::json;
//!
//! let required = ValidatorFn::new(|c| {
//!     (c.value() == json!("")).then(|| {
//!         let mut errors = ValidationErrors::new();
//!         errors.insert("required".into(), json!(true));
//!         errors
//!     })
//! });
//!
//! let form = FormGroup::new([
//!     ("email", FormControl::with_validator(json!(""), required)),
//!     ("newsletter", FormControl::new(json!(false))),
//! ]);
//! assert_eq!(form.status(), ControlStatus::Invalid);
//!
//! form.patch_value(json!({"email": "ada@example.com"}), UpdateOptions::new())
//!     .unwrap();
//! assert_eq!(form.status(), ControlStatus::Valid);
//! assert_eq!(form.value(), json!({"email": "ada@example.com", "newsletter": false}));
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: structured logging of update passes, membership changes, and
//!   rejected writes via the `tracing` crate.
//!
//! # Threading
//!
//! Controls are single-threaded (`Rc`/`RefCell`); handles are cheap clones
//! of the same node.

#![forbid(unsafe_code)]

mod control;
pub mod error;
pub mod events;
mod form_control;
mod form_group;
pub mod options;
pub mod status;
pub mod validation;

pub use control::{AbstractControl, Control};
pub use error::FormError;
pub use events::{EventEmitter, Subscription, SubscriptionScope};
pub use form_control::FormControl;
pub use form_group::FormGroup;
pub use options::{
    ControlOptions, ErrorOptions, FormState, SetValueOptions, UpdateOptions, ValidatorOrOpts,
};
pub use status::{ControlStatus, ParseEnumError, UpdateOn};
pub use validation::{
    AsyncValidationFuture, AsyncValidator, AsyncValidatorFn, ValidationErrors, Validator,
    ValidatorFn, ValidatorInput, compose, compose_async, compose_validators, normalize_validator,
};
