// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Reference to a switch port, as used by output actions.

use core::fmt::Display;

/// Identifier of a switch port (e.g. `openflow:1:2`).
///
/// The identifier is opaque to flow actions; the only requirement is that it is not empty.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PortRef(String);

/// Errors which can occur when creating a [`PortRef`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPortRef {
    /// The identifier is empty (or only whitespace).
    #[error("port identifier cannot be empty")]
    Empty,
}

impl PortRef {
    /// Create a [`PortRef`]
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPortRef::Empty`] if `id` is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Result<PortRef, InvalidPortRef> {
        let id = id.into();
        if id.trim().is_empty() {
            Err(InvalidPortRef::Empty)
        } else {
            Ok(PortRef(id))
        }
    }

    /// Get the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PortRef {
    type Error = InvalidPortRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PortRef::new(value)
    }
}

impl TryFrom<&str> for PortRef {
    type Error = InvalidPortRef;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        PortRef::new(value)
    }
}

impl From<PortRef> for String {
    fn from(value: PortRef) -> Self {
        value.0
    }
}

impl Display for PortRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::PortRef;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for PortRef {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let dpid: u16 = driver.produce()?;
            let port: u8 = driver.produce()?;
            PortRef::new(format!("openflow:{dpid}:{port}")).ok()
        }
    }
}
