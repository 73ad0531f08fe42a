#![forbid(unsafe_code)]

//! Contract-violation errors raised by group mutations.
//!
//! Validation failures are never reported here: an invalid control simply
//! carries errors and an `INVALID` status. `FormError` covers malformed calls
//! only, and every operation returning it has applied nothing.

use std::fmt;

/// A malformed call against a [`FormGroup`](crate::FormGroup).
///
/// Control names are dotted paths relative to the group the call was made
/// on, so a violation inside a nested group reads `address.city`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A value was supplied for a group that has no children yet.
    NoControls {
        /// Path of the empty group (empty for the receiver itself).
        path: String,
    },
    /// `set_value` omitted a key for an existing child.
    MissingValue {
        /// Path of the child without a value.
        name: String,
    },
    /// A value referenced a child name that does not exist.
    UnknownControl {
        /// Path of the unknown child.
        name: String,
    },
    /// A group operation received a value that is not a JSON object.
    ExpectedObject {
        /// Path of the group (empty for the receiver itself).
        path: String,
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

impl FormError {
    /// Prefix every path in this error with `parent`.
    #[must_use]
    pub(crate) fn nested(self, parent: &str) -> Self {
        let join = |child: String| {
            if child.is_empty() {
                parent.to_string()
            } else {
                format!("{parent}.{child}")
            }
        };
        match self {
            Self::NoControls { path } => Self::NoControls { path: join(path) },
            Self::MissingValue { name } => Self::MissingValue { name: join(name) },
            Self::UnknownControl { name } => Self::UnknownControl { name: join(name) },
            Self::ExpectedObject { path, found } => Self::ExpectedObject {
                path: join(path),
                found,
            },
        }
    }

    /// Stable identifier for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoControls { .. } => "no_controls",
            Self::MissingValue { .. } => "missing_value",
            Self::UnknownControl { .. } => "unknown_control",
            Self::ExpectedObject { .. } => "expected_object",
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoControls { path } if path.is_empty() => {
                write!(f, "there are no form controls registered with this group yet")
            }
            Self::NoControls { path } => {
                write!(f, "there are no form controls registered with group '{path}' yet")
            }
            Self::MissingValue { name } => {
                write!(f, "must supply a value for form control with name: '{name}'")
            }
            Self::UnknownControl { name } => {
                write!(f, "cannot find form control with name: '{name}'")
            }
            Self::ExpectedObject { path, found } if path.is_empty() => {
                write!(f, "expected an object value for this group, found {found}")
            }
            Self::ExpectedObject { path, found } => {
                write!(f, "expected an object value for group '{path}', found {found}")
            }
        }
    }
}

impl std::error::Error for FormError {}

/// JSON type name used in [`FormError::ExpectedObject`].
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_prefixes_paths() {
        let err = FormError::MissingValue {
            name: "city".into(),
        }
        .nested("address");
        assert_eq!(
            err,
            FormError::MissingValue {
                name: "address.city".into()
            }
        );

        let err = FormError::NoControls {
            path: String::new(),
        }
        .nested("meta");
        assert_eq!(err, FormError::NoControls { path: "meta".into() });
    }

    #[test]
    fn display_messages() {
        let err = FormError::MissingValue { name: "b".into() };
        assert_eq!(
            err.to_string(),
            "must supply a value for form control with name: 'b'"
        );
        let err = FormError::ExpectedObject {
            path: String::new(),
            found: "number",
        };
        assert_eq!(
            err.to_string(),
            "expected an object value for this group, found number"
        );
        assert_eq!(err.code(), "expected_object");
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
        assert_eq!(json_type_name(&serde_json::json!({})), "object");
    }
}
