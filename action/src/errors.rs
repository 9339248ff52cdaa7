// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors raised while converting or validating flow actions.

use thiserror::Error;

/// The reasons a flow action may be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A required field is absent.
    #[error("{0} cannot be null")]
    NullArgument(String),
    /// The action payload of a list entry is unset.
    #[error("{0}: no action is specified")]
    MissingArgument(String),
    /// A value failed a range, format or type check.
    #[error("{0}")]
    BadArgument(String),
    /// No converter is registered for the action kind.
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),
}

/// Result type of flow action operations.
pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
    /// A required field of `what` is absent.
    #[must_use]
    pub fn null(what: &str, field: &str) -> ActionError {
        ActionError::NullArgument(format!("{what}: {field}"))
    }

    /// A value of `what` failed validation.
    #[must_use]
    pub fn bad(what: &str, err: &dyn core::fmt::Display) -> ActionError {
        ActionError::BadArgument(format!("{what}: {err}"))
    }
}

#[cfg(test)]
mod test {
    use super::ActionError;

    #[test]
    fn messages() {
        assert_eq!(
            ActionError::null("set-dl-src", "address").to_string(),
            "set-dl-src: address cannot be null"
        );
        assert_eq!(
            ActionError::bad("set-vlan-pcp", &"out of range").to_string(),
            "set-vlan-pcp: out of range"
        );
        assert_eq!(
            ActionError::MissingArgument("vtn-flow-action".to_string()).to_string(),
            "vtn-flow-action: no action is specified"
        );
    }
}
