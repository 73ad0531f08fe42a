#![forbid(unsafe_code)]

//! Validator contract and composition.
//!
//! Validators come in two styles: function-style ([`ValidatorFn`],
//! [`AsyncValidatorFn`]) and object-style ([`Validator`], [`AsyncValidator`]).
//! Object-style validators are normalized into the function form, so controls
//! only ever store functions.
//!
//! A list of validators is composed into one effective validator with a fixed
//! merge rule: every validator runs, all error mappings are merged in list
//! order (later keys overwrite earlier ones), and the result is "no error"
//! only when nothing was reported. Composing an empty list yields no
//! validator at all.
//!
//! # Example
//!
//! ```rust
//! use ftui_forms::validation::{ValidationErrors, ValidatorFn, compose};
//! use ftui_forms::{AbstractControl, FormControl};
//! use serde_json::json;
//!
//! let required = ValidatorFn::new(|c| {
//!     c.value().is_null().then(|| {
//!         let mut errors = ValidationErrors::new();
//!         errors.insert("required".into(), json!(true));
//!         errors
//!     })
//! });
//! assert!(compose(Vec::new()).is_none());
//!
//! let name = FormControl::with_validator(json!(null), vec![required]);
//! assert!(name.invalid());
//! assert!(name.has_error("required", None));
//! ```

pub mod async_validation;
mod validators;

pub use async_validation::{
    AsyncValidationFuture, AsyncValidator, AsyncValidatorFn, compose_async,
    compose_async_validators, normalize_async_validator,
};
pub use validators::{
    ValidationErrors, Validator, ValidatorFn, ValidatorInput, compose, compose_validators,
    merge_errors, normalize_validator,
};
