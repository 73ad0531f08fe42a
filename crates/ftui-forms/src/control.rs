#![forbid(unsafe_code)]

//! The control abstraction shared by leaves and groups.
//!
//! [`AbstractControl`] carries the common contract: state accessors, the
//! validator setters, error handling, enable/disable, and the central update
//! algorithm. It is sealed; the only implementors are [`FormControl`],
//! [`FormGroup`], and the [`Control`] enum that wraps one of them.
//!
//! # Update algorithm
//!
//! [`update_value_and_validity`](AbstractControl::update_value_and_validity)
//! runs on every mutation:
//!
//! 1. Provisional status: `DISABLED` when every control is disabled, else
//!    `VALID`.
//! 2. Recompute the value (groups aggregate their enabled children).
//! 3. When enabled, run the effective validator and settle the status by
//!    priority: `DISABLED` → `INVALID` (own errors) → `PENDING` (an enabled
//!    child is pending) → `INVALID` (an enabled child is invalid) → `VALID`.
//! 4. Unless suppressed, emit the value, then the status.
//! 5. Unless `only_self`, repeat on the parent.
//!
//! Every ancestor is therefore consistent after any single mutation, at the
//! cost of re-validating the whole ancestor chain on each leaf edit.
//!
//! # Ownership
//!
//! A group owns its children (`Rc`); a child points back with a `Weak`
//! reference that is cleared when the child is removed. No borrow is held
//! while validators, change listeners, or subscribers run.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::error::{FormError, json_type_name};
use crate::events::{EventEmitter, Subscription};
use crate::form_control::FormControl;
use crate::form_group::{FormGroup, GroupNode};
use crate::options::{ErrorOptions, FormState, ResolvedOptions, UpdateOptions, truthy};
use crate::status::{ControlStatus, UpdateOn};
use crate::validation::{
    AsyncValidationFuture, AsyncValidatorFn, ValidationErrors, ValidatorFn, ValidatorInput,
};

use self::sealed::Node as _;

pub(crate) type CollectionChangeFn = Rc<dyn Fn()>;

// ---------------------------------------------------------------------------
// ControlCore
// ---------------------------------------------------------------------------

/// State common to every node kind.
#[doc(hidden)]
pub struct ControlCore {
    state: RefCell<CoreState>,
    value_changes: EventEmitter<Value>,
    status_changes: EventEmitter<ControlStatus>,
}

struct CoreState {
    value: Value,
    status: ControlStatus,
    errors: Option<ValidationErrors>,
    validator: Option<ValidatorFn>,
    async_validator: Option<AsyncValidatorFn>,
    update_on: Option<UpdateOn>,
    disabled: bool,
    parent: Option<Weak<GroupNode>>,
    on_collection_change: Option<CollectionChangeFn>,
}

impl ControlCore {
    pub(crate) fn new(value: Value, opts: ResolvedOptions) -> Self {
        Self {
            state: RefCell::new(CoreState {
                value,
                status: ControlStatus::Valid,
                errors: None,
                validator: opts.validator,
                async_validator: opts.async_validator,
                update_on: opts.update_on,
                disabled: false,
                parent: None,
                on_collection_change: None,
            }),
            value_changes: EventEmitter::new(),
            status_changes: EventEmitter::new(),
        }
    }

    pub(crate) fn value(&self) -> Value {
        self.state.borrow().value.clone()
    }

    pub(crate) fn set_value(&self, value: Value) {
        self.state.borrow_mut().value = value;
    }

    pub(crate) fn status(&self) -> ControlStatus {
        self.state.borrow().status
    }

    fn set_status(&self, status: ControlStatus) {
        self.state.borrow_mut().status = status;
    }

    fn has_errors(&self) -> bool {
        self.state.borrow().errors.is_some()
    }

    fn set_errors(&self, errors: Option<ValidationErrors>) {
        self.state.borrow_mut().errors = errors.filter(|e| !e.is_empty());
    }

    pub(crate) fn disabled_flag(&self) -> bool {
        self.state.borrow().disabled
    }

    fn set_disabled_flag(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    fn parent(&self) -> Option<FormGroup> {
        let parent = self.state.borrow().parent.clone()?;
        parent.upgrade().map(FormGroup::from_node)
    }

    pub(crate) fn set_parent(&self, parent: Option<Weak<GroupNode>>) {
        self.state.borrow_mut().parent = parent;
    }

    pub(crate) fn is_child_of(&self, group: &Rc<GroupNode>) -> bool {
        self.state
            .borrow()
            .parent
            .as_ref()
            .is_some_and(|p| std::ptr::eq(p.as_ptr(), Rc::as_ptr(group)))
    }

    pub(crate) fn on_collection_change(&self) -> Option<CollectionChangeFn> {
        self.state.borrow().on_collection_change.clone()
    }

    pub(crate) fn set_on_collection_change(&self, hook: Option<CollectionChangeFn>) {
        self.state.borrow_mut().on_collection_change = hook;
    }

    fn emit_value(&self) {
        let value = self.value();
        self.value_changes.emit(&value);
    }

    fn emit_status(&self) {
        let status = self.status();
        self.status_changes.emit(&status);
    }
}

// ---------------------------------------------------------------------------
// Sealed node contract
// ---------------------------------------------------------------------------

pub(crate) mod sealed {
    use super::{Control, ControlCore};

    /// Kind-specific operations each node kind supplies.
    pub trait Node {
        fn core(&self) -> &ControlCore;

        fn to_control(&self) -> Control;

        /// Recompute `value` from children (no-op for a leaf).
        fn update_value(&self);

        /// Whether some enabled child satisfies `condition`.
        fn any_controls(&self, condition: &dyn Fn(&Control) -> bool) -> bool;

        fn all_controls_disabled(&self) -> bool;

        /// Snapshot of the direct children.
        fn children(&self) -> Vec<(String, Control)>;
    }
}

// ---------------------------------------------------------------------------
// AbstractControl
// ---------------------------------------------------------------------------

/// Operations shared by every control in the tree.
///
/// This trait is sealed.
pub trait AbstractControl: sealed::Node {
    /// Current value.
    fn value(&self) -> Value {
        self.core().value()
    }

    /// Current status.
    fn status(&self) -> ControlStatus {
        self.core().status()
    }

    /// Current errors, `None` when there are none.
    fn errors(&self) -> Option<ValidationErrors> {
        self.core().state.borrow().errors.clone()
    }

    /// `status() == VALID`.
    fn valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// `status() == INVALID`.
    fn invalid(&self) -> bool {
        self.status() == ControlStatus::Invalid
    }

    /// `status() == PENDING`.
    fn pending(&self) -> bool {
        self.status() == ControlStatus::Pending
    }

    /// `status() == DISABLED`.
    fn disabled(&self) -> bool {
        self.status() == ControlStatus::Disabled
    }

    /// `status() != DISABLED`.
    fn enabled(&self) -> bool {
        self.status() != ControlStatus::Disabled
    }

    /// Owning group, if any.
    fn parent(&self) -> Option<FormGroup> {
        self.core().parent()
    }

    /// Top-most ancestor (the control itself for a root).
    fn root(&self) -> Control {
        let mut current = self.to_control();
        while let Some(parent) = current.parent() {
            current = Control::Group(parent);
        }
        current
    }

    /// Effective update hook: the explicit one, else the parent's, else
    /// [`UpdateOn::Change`].
    fn update_on(&self) -> UpdateOn {
        let own = self.core().state.borrow().update_on;
        match own {
            Some(update_on) => update_on,
            None => self.parent().map_or(UpdateOn::Change, |p| p.update_on()),
        }
    }

    /// Effective synchronous validator.
    fn validator(&self) -> Option<ValidatorFn> {
        self.core().state.borrow().validator.clone()
    }

    /// Effective asynchronous validator.
    fn async_validator(&self) -> Option<AsyncValidatorFn> {
        self.core().state.borrow().async_validator.clone()
    }

    /// Replace the synchronous validator; lists are composed.
    ///
    /// Takes effect on the next update pass.
    fn set_validators(&self, validators: impl Into<ValidatorInput<ValidatorFn>>)
    where
        Self: Sized,
    {
        self.core().state.borrow_mut().validator = validators.into().coerce();
    }

    /// Remove the synchronous validator.
    fn clear_validators(&self) {
        self.core().state.borrow_mut().validator = None;
    }

    /// Replace the asynchronous validator; lists are composed.
    fn set_async_validators(&self, validators: impl Into<ValidatorInput<AsyncValidatorFn>>)
    where
        Self: Sized,
    {
        self.core().state.borrow_mut().async_validator = validators.into().coerce();
    }

    /// Remove the asynchronous validator.
    fn clear_async_validators(&self) {
        self.core().state.borrow_mut().async_validator = None;
    }

    /// Start the async validator against this control.
    ///
    /// The core never drives the returned future; the caller reports its
    /// outcome through [`set_errors`](Self::set_errors).
    fn run_async_validator(&self) -> Option<AsyncValidationFuture> {
        let validator = self.async_validator()?;
        Some(validator.call(&self.to_control()))
    }

    /// Force `errors` (bypassing the validator) and notify every ancestor.
    ///
    /// Each level recalculates its status from current state; values are not
    /// recomputed and validators do not run.
    fn set_errors(&self, errors: Option<ValidationErrors>, opts: ErrorOptions) {
        self.core().set_errors(errors);
        update_controls_errors(self, opts.emit_event);
    }

    /// Payload stored under `code`.
    ///
    /// A `path` is accepted for nested lookup but not traversed: with a
    /// non-empty path the lookup yields `None`. An empty path counts as none.
    // TODO: resolve `path` against descendant controls once nested lookup
    // semantics are settled.
    fn get_error(&self, code: &str, path: Option<&str>) -> Option<Value> {
        if path.is_some_and(|p| !p.is_empty()) {
            return None;
        }
        let state = self.core().state.borrow();
        state.errors.as_ref()?.get(code).cloned()
    }

    /// Whether a truthy payload is stored under `code`.
    fn has_error(&self, code: &str, path: Option<&str>) -> bool {
        self.get_error(code, path).is_some_and(|v| truthy(&v))
    }

    /// Recompute value, errors and status, emit, then refresh ancestors.
    fn update_value_and_validity(&self, opts: UpdateOptions) {
        let core = self.core();
        let all_disabled = self.all_controls_disabled();
        core.set_status(if all_disabled {
            ControlStatus::Disabled
        } else {
            ControlStatus::Valid
        });
        self.update_value();

        if all_disabled {
            core.set_errors(None);
        } else {
            let errors = self.validator().and_then(|v| v.call(&self.to_control()));
            core.set_errors(errors);
            core.set_status(calculate_status(self));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            status = %core.status(),
            only_self = opts.only_self,
            emit_event = opts.emit_event,
            "control updated"
        );

        if opts.emit_event {
            core.emit_value();
            core.emit_status();
        }

        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts);
        }
    }

    /// Mark the control (and, unless `only_self`, its ancestors) pending.
    fn mark_as_pending(&self, opts: UpdateOptions) {
        let core = self.core();
        core.set_status(ControlStatus::Pending);
        if opts.emit_event {
            core.emit_status();
        }
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.mark_as_pending(opts);
        }
    }

    /// Disable the control (groups disable every child).
    ///
    /// Errors are cleared and the control drops out of its parent's value
    /// and status aggregation.
    fn disable(&self, opts: UpdateOptions) {
        let core = self.core();
        core.set_disabled_flag(true);
        core.set_status(ControlStatus::Disabled);
        core.set_errors(None);
        let child_opts = UpdateOptions {
            only_self: true,
            ..opts
        };
        for (_, child) in self.children() {
            child.disable(child_opts);
        }
        self.update_value();

        #[cfg(feature = "tracing")]
        tracing::debug!(only_self = opts.only_self, "control disabled");

        if opts.emit_event {
            core.emit_value();
            core.emit_status();
        }
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts);
        }
    }

    /// Enable the control (groups enable every child) and revalidate.
    fn enable(&self, opts: UpdateOptions) {
        let core = self.core();
        core.set_disabled_flag(false);
        core.set_status(ControlStatus::Valid);
        let child_opts = UpdateOptions {
            only_self: true,
            ..opts
        };
        for (_, child) in self.children() {
            child.enable(child_opts);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(only_self = opts.only_self, "control enabled");

        self.update_value_and_validity(child_opts);
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts);
        }
    }

    /// Channel receiving the value after every emitting update.
    fn value_changes(&self) -> &EventEmitter<Value> {
        &self.core().value_changes
    }

    /// Channel receiving the status after every emitting update.
    fn status_changes(&self) -> &EventEmitter<ControlStatus> {
        &self.core().status_changes
    }

    /// Shorthand for `value_changes().subscribe(callback)`.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    fn on_value_change(&self, callback: impl Fn(&Value) + 'static) -> Subscription
    where
        Self: Sized,
    {
        self.value_changes().subscribe(callback)
    }

    /// Shorthand for `status_changes().subscribe(callback)`.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    fn on_status_change(&self, callback: impl Fn(&ControlStatus) + 'static) -> Subscription
    where
        Self: Sized,
    {
        self.status_changes().subscribe(callback)
    }

    /// Install the hook invoked when the control's child collection changes.
    fn register_on_collection_change(&self, hook: impl Fn() + 'static)
    where
        Self: Sized,
    {
        self.core().set_on_collection_change(Some(Rc::new(hook)));
    }
}

/// Status by priority, from current errors and child statuses.
fn calculate_status<C: AbstractControl + ?Sized>(control: &C) -> ControlStatus {
    if control.all_controls_disabled() {
        ControlStatus::Disabled
    } else if control.core().has_errors() {
        ControlStatus::Invalid
    } else if control.any_controls(&|c| c.status() == ControlStatus::Pending) {
        ControlStatus::Pending
    } else if control.any_controls(&|c| c.status() == ControlStatus::Invalid) {
        ControlStatus::Invalid
    } else {
        ControlStatus::Valid
    }
}

fn update_controls_errors<C: AbstractControl + ?Sized>(control: &C, emit_event: bool) {
    let core = control.core();
    core.set_status(calculate_status(control));
    if emit_event {
        core.emit_status();
    }
    if let Some(parent) = control.parent() {
        update_controls_errors(&parent, emit_event);
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// Any node of the tree: a leaf or a group.
#[derive(Clone)]
pub enum Control {
    /// A single editable value.
    Leaf(FormControl),
    /// A composite of named children.
    Group(FormGroup),
}

impl Control {
    /// The leaf, if this is one.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&FormControl> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Group(_) => None,
        }
    }

    /// The group, if this is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&FormGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }

    /// Whether both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a.ptr_eq(b),
            (Self::Group(a), Self::Group(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Set the value. Leaves accept anything; groups require an object with
    /// a key for every child.
    ///
    /// # Errors
    ///
    /// See [`FormGroup::set_value`].
    pub fn set_value(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        match self {
            Self::Leaf(leaf) => {
                leaf.set_value(value, opts);
                Ok(())
            }
            Self::Group(group) => group.set_value(value, opts),
        }
    }

    /// Patch the value. Identical to `set_value` for a leaf.
    ///
    /// # Errors
    ///
    /// See [`FormGroup::patch_value`].
    pub fn patch_value(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        match self {
            Self::Leaf(leaf) => {
                leaf.patch_value(value, opts);
                Ok(())
            }
            Self::Group(group) => group.patch_value(value, opts),
        }
    }

    /// Reset to `value` (a boxed JSON object resets the disabled flag too).
    ///
    /// # Errors
    ///
    /// See [`FormGroup::reset`].
    pub fn reset(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        match self {
            Self::Leaf(leaf) => {
                leaf.reset(FormState::from(value), opts);
                Ok(())
            }
            Self::Group(group) => group.reset(value, opts),
        }
    }

    /// Value including disabled descendants.
    #[must_use]
    pub fn raw_value(&self) -> Value {
        match self {
            Self::Leaf(leaf) => leaf.value(),
            Self::Group(group) => group.get_raw_value(),
        }
    }

    pub(crate) fn check_set_value(&self, value: &Value) -> Result<(), FormError> {
        match self {
            Self::Leaf(_) => Ok(()),
            Self::Group(group) => group.check_set_value(value),
        }
    }

    pub(crate) fn check_patch_value(&self, value: &Value) -> Result<(), FormError> {
        match self {
            Self::Leaf(_) => Ok(()),
            Self::Group(group) => group.check_patch_value(value),
        }
    }

    pub(crate) fn check_reset(&self, value: &Value) -> Result<(), FormError> {
        match self {
            Self::Leaf(_) => Ok(()),
            Self::Group(group) => group.check_reset(value),
        }
    }
}

/// `FormError::ExpectedObject` for the receiver itself.
pub(crate) fn expected_object(value: &Value) -> FormError {
    FormError::ExpectedObject {
        path: String::new(),
        found: json_type_name(value),
    }
}

impl sealed::Node for Control {
    fn core(&self) -> &ControlCore {
        match self {
            Self::Leaf(leaf) => leaf.core(),
            Self::Group(group) => group.core(),
        }
    }

    fn to_control(&self) -> Control {
        self.clone()
    }

    fn update_value(&self) {
        match self {
            Self::Leaf(leaf) => leaf.update_value(),
            Self::Group(group) => group.update_value(),
        }
    }

    fn any_controls(&self, condition: &dyn Fn(&Control) -> bool) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.any_controls(condition),
            Self::Group(group) => group.any_controls(condition),
        }
    }

    fn all_controls_disabled(&self) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.all_controls_disabled(),
            Self::Group(group) => group.all_controls_disabled(),
        }
    }

    fn children(&self) -> Vec<(String, Control)> {
        match self {
            Self::Leaf(leaf) => leaf.children(),
            Self::Group(group) => group.children(),
        }
    }
}

impl AbstractControl for Control {}

impl From<FormControl> for Control {
    fn from(leaf: FormControl) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<FormGroup> for Control {
    fn from(group: FormGroup) -> Self {
        Self::Group(group)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => leaf.fmt(f),
            Self::Group(group) => group.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SetValueOptions;
    use serde_json::json;
    use std::cell::Cell;

    fn err(code: &str) -> ValidationErrors {
        let mut map = ValidationErrors::new();
        map.insert(code.to_string(), json!(true));
        map
    }

    fn required() -> ValidatorFn {
        ValidatorFn::new(|c| c.value().is_null().then(|| err("required")))
    }

    #[test]
    fn construction_runs_a_silent_pass() {
        let c = FormControl::with_validator(Value::Null, required());
        assert_eq!(c.status(), ControlStatus::Invalid);
        assert_eq!(c.errors(), Some(err("required")));
        assert_eq!(c.value_changes().subscriber_count(), 0);
    }

    #[test]
    fn set_validators_applies_on_next_pass() {
        let c = FormControl::new(Value::Null);
        assert!(c.valid());

        c.set_validators(required());
        assert!(c.valid(), "validators do not run until the next update");
        c.update_value_and_validity(UpdateOptions::new());
        assert!(c.invalid());

        c.clear_validators();
        c.update_value_and_validity(UpdateOptions::new());
        assert!(c.valid());
        assert!(c.validator().is_none());
    }

    #[test]
    fn set_validators_composes_lists() {
        let c = FormControl::new(Value::Null);
        let tagged = ValidatorFn::new(|_| Some(err("tagged")));
        c.set_validators(vec![required(), tagged]);
        c.update_value_and_validity(UpdateOptions::new());
        assert!(c.has_error("required", None));
        assert!(c.has_error("tagged", None));
    }

    #[test]
    fn empty_validator_map_is_valid() {
        let c = FormControl::with_validator(json!(1), ValidatorFn::new(|_| {
            Some(ValidationErrors::new())
        }));
        assert!(c.valid());
        assert_eq!(c.errors(), None);
    }

    #[test]
    fn get_error_ignores_paths() {
        let c = FormControl::with_validator(Value::Null, required());
        assert_eq!(c.get_error("required", None), Some(json!(true)));
        assert_eq!(c.get_error("required", Some("nested.field")), None);
        assert!(!c.has_error("required", Some("nested")));
        assert!(!c.has_error("other", None));
    }

    #[test]
    fn empty_error_path_reads_own_errors() {
        let c = FormControl::with_validator(Value::Null, required());
        assert_eq!(c.get_error("required", Some("")), Some(json!(true)));
        assert!(c.has_error("required", Some("")));
    }

    #[test]
    fn has_error_uses_truthiness() {
        let c = FormControl::new(json!(1));
        let mut errors = ValidationErrors::new();
        errors.insert("soft".into(), json!(false));
        c.set_errors(Some(errors), ErrorOptions::new());
        assert!(c.invalid());
        assert_eq!(c.get_error("soft", None), Some(json!(false)));
        assert!(!c.has_error("soft", None));
    }

    #[test]
    fn set_errors_bypasses_validator_and_notifies() {
        let c = FormControl::new(json!("x"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = c.on_status_change(move |status| s.borrow_mut().push(*status));

        c.set_errors(Some(err("server")), ErrorOptions::new());
        assert!(c.invalid());
        c.set_errors(None, ErrorOptions::new().silent());
        assert!(c.valid());

        assert_eq!(*seen.borrow(), vec![ControlStatus::Invalid]);
    }

    #[test]
    fn mark_as_pending_emits_status_only() {
        let c = FormControl::new(json!(1));
        let values = Rc::new(Cell::new(0));
        let v = Rc::clone(&values);
        let _vsub = c.on_value_change(move |_| v.set(v.get() + 1));
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&statuses);
        let _ssub = c.on_status_change(move |st| s.borrow_mut().push(*st));

        c.mark_as_pending(UpdateOptions::new());
        assert!(c.pending());
        assert_eq!(values.get(), 0);
        assert_eq!(*statuses.borrow(), vec![ControlStatus::Pending]);
    }

    #[test]
    fn disable_clears_errors_and_enable_revalidates() {
        let c = FormControl::with_validator(Value::Null, required());
        assert!(c.invalid());

        c.disable(UpdateOptions::new());
        assert!(c.disabled());
        assert_eq!(c.errors(), None);

        c.update_value_and_validity(UpdateOptions::new());
        assert!(c.disabled(), "explicit flag survives update passes");

        c.enable(UpdateOptions::new());
        assert!(c.invalid());
        assert!(c.has_error("required", None));
    }

    #[test]
    fn disable_emits_once_per_channel() {
        let c = FormControl::new(json!(1));
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _v = c.on_value_change(move |v| l1.borrow_mut().push(format!("value:{v}")));
        let l2 = Rc::clone(&log);
        let _s = c.on_status_change(move |s| l2.borrow_mut().push(format!("status:{s}")));

        c.disable(UpdateOptions::new());
        assert_eq!(*log.borrow(), vec!["value:1", "status:DISABLED"]);
    }

    #[test]
    fn async_validator_is_stored_not_run() {
        let runs = Rc::new(Cell::new(0));
        let r = Rc::clone(&runs);
        let c = FormControl::new(json!("name"));
        c.set_async_validators(crate::validation::AsyncValidatorFn::new(move |_| {
            r.set(r.get() + 1);
            Box::pin(async { None::<ValidationErrors> })
        }));

        c.set_value(json!("other"), SetValueOptions::new());
        assert_eq!(runs.get(), 0);

        let fut = c.run_async_validator();
        assert!(fut.is_some());
        assert_eq!(runs.get(), 1);

        c.clear_async_validators();
        assert!(c.run_async_validator().is_none());
    }

    #[test]
    fn control_enum_dispatches() {
        let leaf = FormControl::new(json!(1));
        let control = Control::from(leaf.clone());
        assert!(control.as_leaf().is_some());
        assert!(control.as_group().is_none());
        assert!(control.ptr_eq(&leaf.clone().into()));

        control.set_value(json!(2), UpdateOptions::new()).unwrap();
        assert_eq!(leaf.value(), json!(2));
        assert_eq!(control.raw_value(), json!(2));
        assert!(control.root().ptr_eq(&control));
    }
}
