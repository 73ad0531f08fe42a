#![forbid(unsafe_code)]

//! Synchronous validator contract and composer.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::control::Control;

/// Error mapping produced by a validator: error code to arbitrary payload.
///
/// `None` (not an empty map) is the "no error" result everywhere in this
/// crate; empty maps are normalized to `None` before they reach a control.
pub type ValidationErrors = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// ValidatorFn
// ---------------------------------------------------------------------------

/// Function-style synchronous validator.
///
/// Cheap to clone; clones share the same underlying function.
#[derive(Clone)]
pub struct ValidatorFn(Rc<dyn Fn(&Control) -> Option<ValidationErrors>>);

impl ValidatorFn {
    /// Wrap a validation function.
    pub fn new(f: impl Fn(&Control) -> Option<ValidationErrors> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the validator against `control`.
    #[must_use]
    pub fn call(&self, control: &Control) -> Option<ValidationErrors> {
        (self.0)(control)
    }

    /// Whether both handles wrap the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ValidatorFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFn").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Validator trait
// ---------------------------------------------------------------------------

/// Object-style synchronous validator.
///
/// Convert to the function form with [`normalize_validator`]; the rest of
/// the crate only deals with [`ValidatorFn`].
///
/// ```rust
/// use ftui_forms::{AbstractControl, Control, FormControl, ValidationErrors, Validator,
///     normalize_validator};
/// use serde_json::{Value, json};
///
/// struct NotBlank;
///
/// impl Validator for NotBlank {
///     fn validate(&self, control: &Control) -> Option<ValidationErrors> {
///         match control.value() {
///             Value::String(s) if s.trim().is_empty() => {
///                 let mut errors = ValidationErrors::new();
///                 errors.insert("blank".into(), json!(true));
///                 Some(errors)
///             }
///             _ => None,
///         }
///     }
/// }
///
/// let name = FormControl::with_validator(json!("  "), normalize_validator(NotBlank));
/// assert!(name.has_error("blank", None));
/// ```
pub trait Validator {
    /// Validate `control`, returning `None` when it is valid.
    fn validate(&self, control: &Control) -> Option<ValidationErrors>;
}

impl Validator for ValidatorFn {
    fn validate(&self, control: &Control) -> Option<ValidationErrors> {
        self.call(control)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, control: &Control) -> Option<ValidationErrors> {
        (**self).validate(control)
    }
}

/// Wrap an object-style validator into the function form.
pub fn normalize_validator(validator: impl Validator + 'static) -> ValidatorFn {
    ValidatorFn::new(move |control| validator.validate(control))
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Merge validator results into one mapping.
///
/// Later entries overwrite earlier ones on key collision. Returns `None` when
/// every result is `None` or the merged mapping is empty.
#[must_use]
pub fn merge_errors(
    results: impl IntoIterator<Item = Option<ValidationErrors>>,
) -> Option<ValidationErrors> {
    let mut merged = ValidationErrors::new();
    for errors in results.into_iter().flatten() {
        merged.extend(errors);
    }
    if merged.is_empty() { None } else { Some(merged) }
}

/// Combine `validators` into one effective validator.
///
/// Every validator runs against the same control and the results are merged
/// with [`merge_errors`]. An empty list yields `None` (no validator), which is
/// distinct from a validator that always passes.
#[must_use]
pub fn compose(validators: impl IntoIterator<Item = ValidatorFn>) -> Option<ValidatorFn> {
    let validators: Vec<ValidatorFn> = validators.into_iter().collect();
    if validators.is_empty() {
        return None;
    }
    Some(ValidatorFn::new(move |control| {
        merge_errors(validators.iter().map(|v| v.call(control)))
    }))
}

/// Normalize object-style validators, then [`compose`] them.
#[must_use]
pub fn compose_validators(validators: Vec<Box<dyn Validator>>) -> Option<ValidatorFn> {
    compose(validators.into_iter().map(normalize_validator))
}

// ---------------------------------------------------------------------------
// ValidatorInput
// ---------------------------------------------------------------------------

/// "None, one, or a list" of validators, as accepted by setters and
/// constructors.
#[derive(Debug, Clone)]
pub enum ValidatorInput<V> {
    /// No validator.
    None,
    /// A single validator used as-is.
    One(V),
    /// A list, composed into one effective validator.
    Many(Vec<V>),
}

impl<V> Default for ValidatorInput<V> {
    fn default() -> Self {
        Self::None
    }
}

impl ValidatorInput<ValidatorFn> {
    /// Resolve into the effective validator.
    #[must_use]
    pub fn coerce(self) -> Option<ValidatorFn> {
        match self {
            Self::None => None,
            Self::One(validator) => Some(validator),
            Self::Many(list) => compose(list),
        }
    }
}

impl From<ValidatorFn> for ValidatorInput<ValidatorFn> {
    fn from(validator: ValidatorFn) -> Self {
        Self::One(validator)
    }
}

impl From<Vec<ValidatorFn>> for ValidatorInput<ValidatorFn> {
    fn from(list: Vec<ValidatorFn>) -> Self {
        Self::Many(list)
    }
}

impl From<Option<ValidatorFn>> for ValidatorInput<ValidatorFn> {
    fn from(validator: Option<ValidatorFn>) -> Self {
        validator.map_or(Self::None, Self::One)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AbstractControl, FormControl};
    use serde_json::json;

    fn errors(value: Value) -> ValidationErrors {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn returning(value: Option<Value>) -> ValidatorFn {
        ValidatorFn::new(move |_| value.clone().map(errors))
    }

    fn sample() -> Control {
        FormControl::new(json!("sample")).into()
    }

    #[test]
    fn compose_later_keys_win() {
        let v = compose(vec![
            returning(Some(json!({"a": 1}))),
            returning(Some(json!({"a": 2, "b": 1}))),
        ])
        .unwrap();
        assert_eq!(v.call(&sample()), Some(errors(json!({"a": 2, "b": 1}))));
    }

    #[test]
    fn compose_order_sensitive() {
        let v = compose(vec![
            returning(Some(json!({"a": 2, "b": 1}))),
            returning(Some(json!({"a": 1}))),
        ])
        .unwrap();
        assert_eq!(v.call(&sample()), Some(errors(json!({"a": 1, "b": 1}))));
    }

    #[test]
    fn compose_empty_is_no_validator() {
        assert!(compose(Vec::new()).is_none());
        assert!(compose_validators(Vec::new()).is_none());
    }

    #[test]
    fn compose_all_pass_is_none() {
        let v = compose(vec![returning(None), returning(None)]).unwrap();
        assert_eq!(v.call(&sample()), None);
    }

    #[test]
    fn compose_mixed_keeps_errors() {
        let v = compose(vec![returning(None), returning(Some(json!({"x": true})))]).unwrap();
        assert_eq!(v.call(&sample()), Some(errors(json!({"x": true}))));
    }

    #[test]
    fn empty_maps_merge_to_none() {
        assert_eq!(merge_errors(vec![Some(ValidationErrors::new()), None]), None);
    }

    #[test]
    fn validators_see_the_control() {
        let v = ValidatorFn::new(|c| {
            (c.value() == json!("sample")).then(|| errors(json!({"seen": true})))
        });
        assert_eq!(v.call(&sample()), Some(errors(json!({"seen": true}))));
    }

    struct Always(&'static str);

    impl Validator for Always {
        fn validate(&self, _control: &Control) -> Option<ValidationErrors> {
            let mut map = ValidationErrors::new();
            map.insert(self.0.to_string(), json!(true));
            Some(map)
        }
    }

    #[test]
    fn normalized_object_validators_compose() {
        let v = compose_validators(vec![Box::new(Always("x")), Box::new(Always("y"))]).unwrap();
        assert_eq!(v.call(&sample()), Some(errors(json!({"x": true, "y": true}))));
    }

    #[test]
    fn input_coercion() {
        assert!(ValidatorInput::<ValidatorFn>::None.coerce().is_none());
        assert!(ValidatorInput::<ValidatorFn>::from(Vec::<ValidatorFn>::new()).coerce().is_none());

        let single = returning(None);
        let coerced = ValidatorInput::<ValidatorFn>::from(single.clone()).coerce().unwrap();
        assert!(coerced.ptr_eq(&single));

        let many = ValidatorInput::<ValidatorFn>::from(vec![returning(None)]).coerce().unwrap();
        assert!(!many.ptr_eq(&single));
    }
}
