// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! [DSCP] (Differentiated Services Code Point)
//!
//! [DSCP]: https://en.wikipedia.org/wiki/Differentiated_services

use etherparse::IpDscp;

/// [DSCP] (Differentiated Services Code Point)
///
/// [DSCP]: https://en.wikipedia.org/wiki/Differentiated_services
#[repr(transparent)]
#[derive(
    Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Dscp(u8);

/// Errors related to invalid [`Dscp`] states
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDscp {
    /// 6 bit value of [`Dscp`] exceeded
    #[error("DSCP value {0} too large")]
    TooBig(u8),
}

impl Dscp {
    /// The maximum legal raw [`Dscp`] value (63)
    pub const MAX_U8: u8 = IpDscp::MAX_U8;

    /// The minimum legal [`Dscp`] value
    pub const MIN: Dscp = Dscp(0);

    /// Create a new [`Dscp`]
    ///
    /// # Errors
    ///
    /// Will return an [`InvalidDscp`] if the supplied value for `raw` exceeds 6-bits.
    pub fn new(raw: u8) -> Result<Dscp, InvalidDscp> {
        IpDscp::try_new(raw)
            .map(Dscp::from)
            .map_err(|e| InvalidDscp::TooBig(e.actual))
    }

    /// Extract the [`Dscp`] from an 8-bit type-of-service byte (the upper 6 bits).
    #[must_use]
    pub const fn from_tos(tos: u8) -> Dscp {
        Dscp(tos >> 2)
    }

    /// Render the [`Dscp`] as an 8-bit type-of-service byte (ECN bits cleared).
    #[must_use]
    pub const fn to_tos(self) -> u8 {
        self.0 << 2
    }

    /// Get the raw 6-bit value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<IpDscp> for Dscp {
    fn from(value: IpDscp) -> Self {
        Dscp(value.value())
    }
}

impl TryFrom<u8> for Dscp {
    type Error = InvalidDscp;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dscp::new(value)
    }
}

impl From<Dscp> for u8 {
    fn from(value: Dscp) -> Self {
        value.as_u8()
    }
}

impl core::fmt::Display for Dscp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Dscp;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Dscp {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Dscp(driver.produce::<u8>()? & Dscp::MAX_U8))
        }
    }
}
