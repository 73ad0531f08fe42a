#![forbid(unsafe_code)]

//! Leaf controls holding a single value.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::control::{AbstractControl, Control, ControlCore, sealed};
use crate::options::{FormState, SetValueOptions, UpdateOptions, ValidatorOrOpts};
use crate::validation::{AsyncValidatorFn, ValidatorFn, ValidatorInput};

/// Model-to-view listener: receives the new value and whether the view
/// should echo the change back to the model.
type ChangeFn = Rc<dyn Fn(&Value, bool)>;

pub(crate) struct LeafNode {
    core: ControlCore,
    pending_value: RefCell<Value>,
    on_change: RefCell<Vec<ChangeFn>>,
}

/// A leaf control.
///
/// Cloning yields another handle to the same control.
///
/// ```rust
/// use ftui_forms::{AbstractControl, ControlStatus, FormControl, SetValueOptions};
/// use serde_json::json;
///
/// let age = FormControl::new(json!(30));
/// age.set_value(json!(31), SetValueOptions::new());
/// assert_eq!(age.value(), json!(31));
/// assert_eq!(age.status(), ControlStatus::Valid);
/// ```
#[derive(Clone)]
pub struct FormControl(Rc<LeafNode>);

impl FormControl {
    /// Create a leaf from a raw value or a boxed form state.
    pub fn new(state: impl Into<FormState>) -> Self {
        Self::with_options(
            state,
            ValidatorOrOpts::default(),
            ValidatorInput::<AsyncValidatorFn>::None,
        )
    }

    /// Create a leaf with synchronous validators.
    pub fn with_validator(
        state: impl Into<FormState>,
        validators: impl Into<ValidatorInput<ValidatorFn>>,
    ) -> Self {
        Self::with_options(
            state,
            ValidatorOrOpts::Validators(validators.into()),
            ValidatorInput::<AsyncValidatorFn>::None,
        )
    }

    /// Create a leaf from validators or an options record, plus async
    /// validators.
    ///
    /// The async argument is ignored when an options record is given.
    /// Construction runs one silent, self-only update pass.
    pub fn with_options(
        state: impl Into<FormState>,
        validator_or_opts: impl Into<ValidatorOrOpts>,
        async_validators: impl Into<ValidatorInput<AsyncValidatorFn>>,
    ) -> Self {
        let resolved = validator_or_opts.into().resolve(async_validators.into());
        let (value, disabled) = state.into().into_parts();
        let control = Self(Rc::new(LeafNode {
            core: ControlCore::new(value.clone(), resolved),
            pending_value: RefCell::new(value),
            on_change: RefCell::new(Vec::new()),
        }));
        control.apply_disabled(disabled);
        control.update_value_and_validity(UpdateOptions::new().only_self().silent());
        control
    }

    fn apply_disabled(&self, disabled: Option<bool>) {
        let quiet = UpdateOptions::new().only_self().silent();
        match disabled {
            Some(true) => self.disable(quiet),
            Some(false) => self.enable(quiet),
            None => {}
        }
    }

    /// Replace the value and run an update pass.
    ///
    /// Change listeners registered with
    /// [`register_on_change`](Self::register_on_change) run first, unless
    /// `emit_model_to_view_change` is off.
    pub fn set_value(&self, value: Value, opts: impl Into<SetValueOptions>) {
        let opts = opts.into();
        self.0.core.set_value(value.clone());
        *self.0.pending_value.borrow_mut() = value.clone();

        if opts.emit_model_to_view_change {
            let listeners: Vec<ChangeFn> = self.0.on_change.borrow().clone();
            for listener in listeners {
                listener(&value, opts.emit_view_to_model_change);
            }
        }
        self.update_value_and_validity(opts.update_options());
    }

    /// Same as [`set_value`](Self::set_value) for a leaf.
    pub fn patch_value(&self, value: Value, opts: impl Into<SetValueOptions>) {
        self.set_value(value, opts);
    }

    /// Reset to `state`. A boxed state also sets the disabled flag.
    pub fn reset(&self, state: impl Into<FormState>, opts: impl Into<SetValueOptions>) {
        let (value, disabled) = state.into().into_parts();
        self.apply_disabled(disabled);
        self.set_value(value, opts);
    }

    /// Last value written through `set_value`.
    #[must_use]
    pub fn pending_value(&self) -> Value {
        self.0.pending_value.borrow().clone()
    }

    /// Register a model-to-view listener.
    pub fn register_on_change(&self, listener: impl Fn(&Value, bool) + 'static) {
        self.0.on_change.borrow_mut().push(Rc::new(listener));
    }

    /// Drop every change listener and the collection-change hook.
    pub fn clear_change_fns(&self) {
        self.0.on_change.borrow_mut().clear();
        self.0.core.set_on_collection_change(None);
    }

    /// Whether both handles refer to the same control.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl sealed::Node for FormControl {
    fn core(&self) -> &ControlCore {
        &self.0.core
    }

    fn to_control(&self) -> Control {
        Control::Leaf(self.clone())
    }

    fn update_value(&self) {}

    fn any_controls(&self, _condition: &dyn Fn(&Control) -> bool) -> bool {
        false
    }

    fn all_controls_disabled(&self) -> bool {
        self.0.core.disabled_flag()
    }

    fn children(&self) -> Vec<(String, Control)> {
        Vec::new()
    }
}

impl AbstractControl for FormControl {}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("value", &self.value())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
