// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! TCP / UDP port numbers.

/// A TCP or UDP port number.
///
/// Unlike a parsed header, a flow action may legitimately carry port zero, so the full `u16`
/// space is accepted.
/// Construction from wider integers is checked, which is how configuration input reaches us.
#[repr(transparent)]
#[derive(
    Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "u16", into = "u16")]
pub struct L4Port(u16);

/// Errors which may occur in the creation of a [`L4Port`].
#[derive(Debug, thiserror::Error, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InvalidL4Port {
    /// Larger than 16 bits.
    #[error("invalid port number: {0}")]
    TooLarge(u32),
}

impl L4Port {
    /// Create a [`L4Port`].
    #[must_use]
    pub const fn new(port: u16) -> L4Port {
        L4Port(port)
    }

    /// Create a [`L4Port`] from a wider integer.
    ///
    /// # Errors
    ///
    /// Will return an error if the value does not fit in 16 bits.
    pub fn new_checked(port: u32) -> Result<L4Port, InvalidL4Port> {
        u16::try_from(port)
            .map(L4Port)
            .map_err(|_| InvalidL4Port::TooLarge(port))
    }

    /// Get the port number as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for L4Port {
    fn from(value: u16) -> Self {
        L4Port(value)
    }
}

impl From<L4Port> for u16 {
    fn from(port: L4Port) -> Self {
        port.0
    }
}

impl TryFrom<u32> for L4Port {
    type Error = InvalidL4Port;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new_checked(value)
    }
}

impl core::fmt::Display for L4Port {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::L4Port;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for L4Port {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(L4Port(driver.produce()?))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{InvalidL4Port, L4Port};

    #[test]
    fn port_bounds_respected() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u32| match L4Port::new_checked(raw) {
                Ok(port) => assert_eq!(u32::from(port.as_u16()), raw),
                Err(InvalidL4Port::TooLarge(x)) => {
                    assert_eq!(x, raw);
                    assert!(raw > 65535);
                }
            });
    }

    #[test]
    fn port_edges() {
        assert_eq!(L4Port::new_checked(0), Ok(L4Port::new(0)));
        assert_eq!(L4Port::new_checked(65535), Ok(L4Port::new(u16::MAX)));
        assert_eq!(
            L4Port::new_checked(65536),
            Err(InvalidL4Port::TooLarge(65536))
        );
    }
}
