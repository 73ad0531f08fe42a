#![forbid(unsafe_code)]

//! Control status and update-hook enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ControlStatus
// ---------------------------------------------------------------------------

/// Validation status of a control, recomputed on every update pass.
///
/// Serialized as the canonical upper-case strings (`"VALID"`, `"INVALID"`,
/// `"PENDING"`, `"DISABLED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlStatus {
    /// All validation checks passed.
    #[default]
    Valid,
    /// The control or an enabled descendant carries errors.
    Invalid,
    /// An enabled descendant is waiting on an async result.
    Pending,
    /// The control (or every child of a group) is disabled.
    Disabled,
}

impl ControlStatus {
    /// All statuses, in priority-independent declaration order.
    pub const ALL: [Self; 4] = [Self::Valid, Self::Invalid, Self::Pending, Self::Disabled];

    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Pending => "PENDING",
            Self::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status or update-hook string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for ControlStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "control status",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// UpdateOn
// ---------------------------------------------------------------------------

/// The UI event on which a binding should push edits into its control.
///
/// The core stores this for bindings; its own propagation is always
/// synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOn {
    /// Push on every input change.
    #[default]
    Change,
    /// Push when the widget loses focus.
    Blur,
    /// Push when the enclosing form is submitted.
    Submit,
}

impl UpdateOn {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Blur => "blur",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for UpdateOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateOn {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(Self::Change),
            "blur" => Ok(Self::Blur),
            "submit" => Ok(Self::Submit),
            _ => Err(ParseEnumError {
                kind: "update hook",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in ControlStatus::ALL {
            assert_eq!(status.as_str().parse::<ControlStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_rejects_lowercase() {
        let err = "valid".parse::<ControlStatus>().unwrap_err();
        assert_eq!(err.kind, "control status");
        assert_eq!(err.to_string(), "unknown control status: \"valid\"");
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&ControlStatus::Disabled).unwrap();
        assert_eq!(json, "\"DISABLED\"");
        let back: ControlStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(back, ControlStatus::Pending);
    }

    #[test]
    fn update_on_defaults_to_change() {
        assert_eq!(UpdateOn::default(), UpdateOn::Change);
        assert_eq!("blur".parse::<UpdateOn>(), Ok(UpdateOn::Blur));
        assert!("focus".parse::<UpdateOn>().is_err());
        assert_eq!(UpdateOn::Submit.to_string(), "submit");
    }
}
