// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN validation and manipulation.

use crate::eth::ethtype::EthType;
use etherparse::VlanPcp;

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "bolero"))]
pub use contract::*;

/// A VLAN Identifier.
///
/// Flow actions address the full 12-bit space: `0` is a legal value and is used to mean
/// "no VLAN" (see [`Vid::NONE`]) when comparing the VLAN of a packet before and after a
/// sequence of actions.
#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Vid(u16);

/// Errors which can occur when converting a `u16` to a validated [`Vid`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum InvalidVid {
    /// The value is too large to be a legal [`Vid`] (12-bit max).
    #[error("{0} is too large to be a legal Vid ({MAX} is max legal value)", MAX = Vid::MAX)]
    TooLarge(u16),
}

impl Vid {
    /// The [`Vid`] which means "untagged".
    pub const NONE: Vid = Vid(0);

    /// The maximum legal [`Vid`] value (2^12 - 1).
    pub const MAX: Vid = Vid(4095);

    /// Create a new [`Vid`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is greater than [`Vid::MAX`].
    pub const fn new(vid: u16) -> Result<Self, InvalidVid> {
        if vid > Vid::MAX.0 {
            Err(InvalidVid::TooLarge(vid))
        } else {
            Ok(Vid(vid))
        }
    }

    /// Returns true if this is [`Vid::NONE`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Vid::NONE.0
    }

    /// Get the value of the [`Vid`] as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<Vid> for u16 {
    fn from(vid: Vid) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for Vid {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<Vid, Self::Error> {
        Vid::new(vid)
    }
}

impl core::fmt::Display for Vid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// A Priority Code Point.
#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pcp(u8);

/// Error type for invalid [`Pcp`] values.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[error("Invalid PCP value: {0} (3-bit max)")]
pub struct InvalidPcp(pub u8);

impl Pcp {
    const MIN_BINARY: u8 = 0;
    const MAX_BINARY: u8 = 0b111;
    /// The minimum legal [`Pcp`] value
    pub const MIN: Pcp = Pcp(Pcp::MIN_BINARY);
    /// The maximum legal [`Pcp`] value
    pub const MAX: Pcp = Pcp(Pcp::MAX_BINARY);

    /// Map an u8 to a [`Pcp`]
    ///
    /// # Errors
    ///
    /// Returns an error if the supplied value is larger than 3-bits.
    pub const fn new(raw: u8) -> Result<Pcp, InvalidPcp> {
        match raw {
            Pcp::MIN_BINARY..=Pcp::MAX_BINARY => Ok(Pcp(raw)),
            _ => Err(InvalidPcp(raw)),
        }
    }

    /// Map the [`Pcp`] value back to a `u8`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl Default for Pcp {
    fn default() -> Self {
        Pcp::MIN
    }
}

impl From<Pcp> for u8 {
    fn from(value: Pcp) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for Pcp {
    type Error = InvalidPcp;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Pcp::new(value)
    }
}

impl From<VlanPcp> for Pcp {
    fn from(value: VlanPcp) -> Self {
        Pcp(value.value())
    }
}

impl TryFrom<Pcp> for VlanPcp {
    type Error = InvalidPcp;

    fn try_from(value: Pcp) -> Result<Self, Self::Error> {
        VlanPcp::try_new(value.0).map_err(|_| InvalidPcp(value.0))
    }
}

impl core::fmt::Display for Pcp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single VLAN tag as seen by flow actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VlanTag {
    /// Tag protocol identifier (the ethertype which introduces the tag)
    pub tpid: EthType,
    /// VLAN identifier
    pub vid: Vid,
    /// Priority code point
    pub pcp: Pcp,
}

impl VlanTag {
    /// Create an 802.1Q tag with the given [`Vid`] and a default [`Pcp`].
    #[must_use]
    pub fn new(vid: Vid) -> VlanTag {
        VlanTag {
            tpid: EthType::VLAN,
            vid,
            pcp: Pcp::default(),
        }
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::vlan::{Pcp, Vid};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vid {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u16>()? & Vid::MAX.0;
            Some(Vid::new(raw).unwrap_or_else(|e| unreachable!("{e}")))
        }
    }

    impl TypeGenerator for Pcp {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Pcp::new(driver.produce::<u8>()? & Pcp::MAX.0).unwrap_or_else(|e| unreachable!("{e}")))
        }
    }
}
