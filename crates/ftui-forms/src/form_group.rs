#![forbid(unsafe_code)]

//! Composite controls keyed by child name.
//!
//! A group's value is the object of its enabled children's values, its
//! status folds in theirs, and any child mutation re-runs the group's update
//! pass. Children are held in name order.
//!
//! Bulk writes (`set_value`, `patch_value`, `reset`) check the whole payload,
//! nested groups included, before touching any child: a rejected call leaves
//! the tree exactly as it was.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::control::sealed::{self, Node as _};
use crate::control::{AbstractControl, Control, ControlCore, expected_object};
use crate::error::FormError;
use crate::options::{UpdateOptions, ValidatorOrOpts};
use crate::validation::{AsyncValidatorFn, ValidatorFn, ValidatorInput};

pub(crate) struct GroupNode {
    core: ControlCore,
    controls: RefCell<BTreeMap<String, Control>>,
}

/// A group of named child controls.
///
/// Cloning yields another handle to the same group.
///
/// ```rust
/// use ftui_forms::{AbstractControl, Control, FormControl, FormGroup, UpdateOptions};
/// use serde_json::json;
///
/// let login = FormGroup::new([
///     ("user", FormControl::new(json!("ada"))),
///     ("password", FormControl::new(json!(""))),
/// ]);
/// assert_eq!(login.value(), json!({"password": "", "user": "ada"}));
///
/// login
///     .set_value(json!({"user": "grace", "password": "hunter2"}), UpdateOptions::new())
///     .unwrap();
/// assert_eq!(login.get("user").map(|c| c.value()), Some(json!("grace")));
/// ```
#[derive(Clone)]
pub struct FormGroup(Rc<GroupNode>);

impl FormGroup {
    /// Create a group from `(name, control)` pairs.
    ///
    /// A repeated name keeps the last control given for it.
    pub fn new<K, C>(controls: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: Into<String>,
        C: Into<Control>,
    {
        Self::with_options(
            controls,
            ValidatorOrOpts::default(),
            ValidatorInput::<AsyncValidatorFn>::None,
        )
    }

    /// Create a group with group-level synchronous validators.
    pub fn with_validator<K, C>(
        controls: impl IntoIterator<Item = (K, C)>,
        validators: impl Into<ValidatorInput<ValidatorFn>>,
    ) -> Self
    where
        K: Into<String>,
        C: Into<Control>,
    {
        Self::with_options(
            controls,
            ValidatorOrOpts::Validators(validators.into()),
            ValidatorInput::<AsyncValidatorFn>::None,
        )
    }

    /// Create a group from validators or an options record, plus async
    /// validators (ignored when an options record is given).
    ///
    /// Children are wired to the group, then one silent, self-only update
    /// pass runs.
    pub fn with_options<K, C>(
        controls: impl IntoIterator<Item = (K, C)>,
        validator_or_opts: impl Into<ValidatorOrOpts>,
        async_validators: impl Into<ValidatorInput<AsyncValidatorFn>>,
    ) -> Self
    where
        K: Into<String>,
        C: Into<Control>,
    {
        let resolved = validator_or_opts.into().resolve(async_validators.into());
        let controls: BTreeMap<String, Control> = controls
            .into_iter()
            .map(|(name, control)| (name.into(), control.into()))
            .collect();
        let group = Self(Rc::new(GroupNode {
            core: ControlCore::new(Value::Object(Map::new()), resolved),
            controls: RefCell::new(controls),
        }));
        for (_, child) in group.children() {
            group.wire(&child);
        }
        group.update_value_and_validity(UpdateOptions::new().only_self().silent());
        group
    }

    pub(crate) fn from_node(node: Rc<GroupNode>) -> Self {
        Self(node)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    fn wire(&self, control: &Control) {
        let core = control.core();
        core.set_parent(Some(Rc::downgrade(&self.0)));
        core.set_on_collection_change(self.0.core.on_collection_change());
    }

    fn detach(&self, control: &Control) {
        let core = control.core();
        if core.is_child_of(&self.0) {
            core.set_on_collection_change(None);
            core.set_parent(None);
        }
    }

    fn notify_collection_change(&self) {
        if let Some(hook) = self.0.core.on_collection_change() {
            hook();
        }
    }

    /// Attach `control` under `name` without running an update pass.
    ///
    /// If `name` is taken, nothing changes and the existing child is
    /// returned.
    pub fn register_control(
        &self,
        name: impl Into<String>,
        control: impl Into<Control>,
    ) -> Control {
        let name = name.into();
        if let Some(existing) = self.get(&name) {
            return existing;
        }
        let control = control.into();
        self.0.controls.borrow_mut().insert(name, control.clone());
        self.wire(&control);
        control
    }

    /// Register `control` under `name`, then update and notify.
    ///
    /// An existing child under `name` is kept; use
    /// [`set_control`](Self::set_control) to replace it.
    pub fn add_control(&self, name: impl Into<String>, control: impl Into<Control>) {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(name = %name, "adding control");
        self.register_control(name, control);
        self.update_value_and_validity(UpdateOptions::new());
        self.notify_collection_change();
    }

    /// Detach and remove the child under `name`, then update and notify.
    ///
    /// The removed child no longer reaches this group. Removing an absent
    /// name still runs the update pass.
    pub fn remove_control(&self, name: &str) -> Option<Control> {
        #[cfg(feature = "tracing")]
        tracing::debug!(name, "removing control");
        if let Some(existing) = self.get(name) {
            self.detach(&existing);
        }
        let removed = self.0.controls.borrow_mut().remove(name);
        self.update_value_and_validity(UpdateOptions::new());
        self.notify_collection_change();
        removed
    }

    /// Replace (or insert) the child under `name`, then update and notify.
    ///
    /// Returns the detached previous child, if any.
    pub fn set_control(
        &self,
        name: impl Into<String>,
        control: impl Into<Control>,
    ) -> Option<Control> {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(name = %name, "replacing control");
        if let Some(existing) = self.get(&name) {
            self.detach(&existing);
        }
        let previous = self.0.controls.borrow_mut().remove(&name);
        self.register_control(name, control);
        self.update_value_and_validity(UpdateOptions::new());
        self.notify_collection_change();
        previous
    }

    /// Whether an enabled child exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|c| c.enabled())
    }

    /// Child under `name`, enabled or not.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Control> {
        self.0.controls.borrow().get(name).cloned()
    }

    /// Snapshot of the children in name order.
    #[must_use]
    pub fn controls(&self) -> Vec<(String, Control)> {
        self.children()
    }

    /// Number of children, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.controls.borrow().len()
    }

    /// Whether the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.controls.borrow().is_empty()
    }

    /// Whether both handles refer to the same group.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // -----------------------------------------------------------------------
    // Bulk writes
    // -----------------------------------------------------------------------

    /// Set every child's value from an object with exactly one key per
    /// child, then update this group once.
    ///
    /// # Errors
    ///
    /// - [`FormError::ExpectedObject`] when `value` is not an object.
    /// - [`FormError::MissingValue`] when a child has no key.
    /// - [`FormError::NoControls`] when the group is empty and `value` has
    ///   keys.
    /// - [`FormError::UnknownControl`] when a key names no child.
    ///
    /// Nested groups are checked the same way. On error nothing is applied.
    pub fn set_value(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        if let Err(err) = self.check_set_value(&value) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "rejected set_value");
            return Err(err);
        }
        let values = match value {
            Value::Object(values) => values,
            other => return Err(expected_object(&other)),
        };
        let child_opts = UpdateOptions {
            only_self: true,
            ..opts
        };
        for (name, value) in values {
            if let Some(child) = self.get(&name) {
                child.set_value(value, child_opts)?;
            }
        }
        self.update_value_and_validity(opts);
        Ok(())
    }

    /// Set the children named in `value`, ignoring unknown keys, then update
    /// this group once.
    ///
    /// # Errors
    ///
    /// [`FormError::ExpectedObject`] when `value`, or the entry for a child
    /// group, is not an object. On error nothing is applied.
    ///
    /// Unlike [`set_value`](Self::set_value), missing and unknown keys are
    /// never errors; only the shape of `value` is checked.
    pub fn patch_value(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        if let Err(err) = self.check_patch_value(&value) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "rejected patch_value");
            return Err(err);
        }
        let values = match value {
            Value::Object(values) => values,
            other => return Err(expected_object(&other)),
        };
        let child_opts = UpdateOptions {
            only_self: true,
            ..opts
        };
        for (name, value) in values {
            if let Some(child) = self.get(&name) {
                child.patch_value(value, child_opts)?;
            }
        }
        self.update_value_and_validity(opts);
        Ok(())
    }

    /// Reset every child from `value[name]` (or null), then update once.
    ///
    /// `value` may be an object or null. Leaf entries may use the boxed
    /// `{"value", "disabled"}` shape.
    ///
    /// # Errors
    ///
    /// [`FormError::ExpectedObject`] when `value`, or the entry for a child
    /// group, is neither an object nor null. On error nothing is applied.
    pub fn reset(&self, value: Value, opts: UpdateOptions) -> Result<(), FormError> {
        if let Err(err) = self.check_reset(&value) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "rejected reset");
            return Err(err);
        }
        let values = match value {
            Value::Object(values) => values,
            _ => Map::new(),
        };
        let child_opts = UpdateOptions {
            only_self: true,
            ..opts
        };
        for (name, child) in self.children() {
            let value = values.get(&name).cloned().unwrap_or(Value::Null);
            child.reset(value, child_opts)?;
        }
        self.update_value_and_validity(opts);
        Ok(())
    }

    /// Value including disabled children, recursively.
    #[must_use]
    pub fn get_raw_value(&self) -> Value {
        let raw: Map<String, Value> = self
            .children()
            .into_iter()
            .map(|(name, child)| (name, child.raw_value()))
            .collect();
        Value::Object(raw)
    }

    pub(crate) fn check_set_value(&self, value: &Value) -> Result<(), FormError> {
        let Value::Object(values) = value else {
            return Err(expected_object(value));
        };
        let controls = self.0.controls.borrow();
        if let Some(name) = controls.keys().find(|name| !values.contains_key(*name)) {
            return Err(FormError::MissingValue { name: name.clone() });
        }
        for (name, value) in values {
            if controls.is_empty() {
                return Err(FormError::NoControls {
                    path: String::new(),
                });
            }
            let Some(child) = controls.get(name) else {
                return Err(FormError::UnknownControl { name: name.clone() });
            };
            child.check_set_value(value).map_err(|e| e.nested(name))?;
        }
        Ok(())
    }

    pub(crate) fn check_patch_value(&self, value: &Value) -> Result<(), FormError> {
        let Value::Object(values) = value else {
            return Err(expected_object(value));
        };
        let controls = self.0.controls.borrow();
        for (name, value) in values {
            if let Some(child) = controls.get(name) {
                child.check_patch_value(value).map_err(|e| e.nested(name))?;
            }
        }
        Ok(())
    }

    pub(crate) fn check_reset(&self, value: &Value) -> Result<(), FormError> {
        let values = match value {
            Value::Object(values) => values,
            Value::Null => return Ok(()),
            other => return Err(expected_object(other)),
        };
        let controls = self.0.controls.borrow();
        for (name, value) in values {
            if let Some(child) = controls.get(name) {
                child.check_reset(value).map_err(|e| e.nested(name))?;
            }
        }
        Ok(())
    }
}

impl sealed::Node for FormGroup {
    fn core(&self) -> &ControlCore {
        &self.0.core
    }

    fn to_control(&self) -> Control {
        Control::Group(self.clone())
    }

    fn update_value(&self) {
        let explicit = self.0.core.disabled_flag();
        let value: Map<String, Value> = self
            .0
            .controls
            .borrow()
            .iter()
            .filter(|(_, child)| explicit || child.enabled())
            .map(|(name, child)| (name.clone(), child.value()))
            .collect();
        self.0.core.set_value(Value::Object(value));
    }

    fn any_controls(&self, condition: &dyn Fn(&Control) -> bool) -> bool {
        self.0
            .controls
            .borrow()
            .values()
            .any(|child| child.enabled() && condition(child))
    }

    fn all_controls_disabled(&self) -> bool {
        self.0.core.disabled_flag() || self.0.controls.borrow().values().all(|c| !c.enabled())
    }

    fn children(&self) -> Vec<(String, Control)> {
        self.0
            .controls
            .borrow()
            .iter()
            .map(|(name, child)| (name.clone(), child.clone()))
            .collect()
    }
}

impl AbstractControl for FormGroup {}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.controls.borrow().keys().cloned().collect();
        f.debug_struct("FormGroup")
            .field("controls", &names)
            .field("value", &self.value())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
