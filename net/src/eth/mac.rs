// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MAC address types used by flow actions.

use core::fmt::Display;

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "bolero"))]
pub use contract::*;

/// A [MAC Address].
///
/// `Mac` is a transparent wrapper around `[u8; 6]`. Any six octets are a legal `Mac`; the
/// restrictions which apply to addresses written by an action are enforced by [`ActionMac`].
///
/// [MAC Address]: https://en.wikipedia.org/wiki/MAC_address
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Mac(pub [u8; 6]);

impl From<[u8; 6]> for Mac {
    fn from(value: [u8; 6]) -> Self {
        Mac(value)
    }
}

impl From<Mac> for [u8; 6] {
    fn from(value: Mac) -> Self {
        value.0
    }
}

impl AsRef<[u8; 6]> for Mac {
    fn as_ref(&self) -> &[u8; 6] {
        &self.0
    }
}

/// Errors which can occur while converting a string to a [`Mac`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacFromStringError {
    /// Invalid string representation of mac address
    #[error("invalid string representation of mac address: {0}")]
    Invalid(String),
}

impl TryFrom<&str> for Mac {
    type Error = MacFromStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || MacFromStringError::Invalid(value.to_string());
        let mut octets = [0u8; 6];
        let mut count = 0usize;
        for octet_str in value.split(':') {
            if count == octets.len()
                || octet_str.len() != 2
                || !octet_str.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(invalid());
            }
            octets[count] = u8::from_str_radix(octet_str, 16).map_err(|_| invalid())?;
            count += 1;
        }
        if count != octets.len() {
            return Err(invalid());
        }
        Ok(Mac(octets))
    }
}

impl TryFrom<String> for Mac {
    type Error = MacFromStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Mac::try_from(value.as_str())
    }
}

impl From<Mac> for String {
    fn from(value: Mac) -> Self {
        value.to_string()
    }
}

impl Mac {
    /// The broadcast `Mac`
    pub const BROADCAST: Mac = Mac([u8::MAX; 6]);
    /// The zero `Mac`.
    pub const ZERO: Mac = Mac([0; 6]);

    /// Returns true iff the binary representation of the [`Mac`] is exclusively ones.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self == &Mac::BROADCAST
    }

    /// Returns true iff the least significant bit of the first octet of the [`Mac`] is one.
    ///
    /// Note that the broadcast address is also a multicast address.
    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }

    /// Returns true iff the least significant bit of the first octet of the [`Mac`] is zero.
    #[must_use]
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Returns true iff the binary representation of the [`Mac`] is exclusively zeros.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self == &Mac::ZERO
    }
}

impl Display for Mac {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

/// A [`Mac`] which a flow action may write into an ethernet header.
///
/// Flow actions may rewrite either the source or the destination address, and the same rules
/// apply to both: the zero address, the broadcast address, and multicast addresses are refused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "Mac", into = "Mac")]
#[repr(transparent)]
pub struct ActionMac(Mac);

/// Reasons a [`Mac`] is refused by [`ActionMac::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidActionMac {
    /// The zero [`Mac`]
    #[error("zero MAC address cannot be specified: {0}")]
    Zero(Mac),
    /// The broadcast [`Mac`]
    #[error("broadcast address cannot be specified: {0}")]
    Broadcast(Mac),
    /// A multicast [`Mac`] (other than broadcast)
    #[error("multicast address cannot be specified: {0}")]
    Multicast(Mac),
}

impl ActionMac {
    /// Map a [`Mac`] to an [`ActionMac`]
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidActionMac`] if the address is zero, broadcast, or multicast.
    pub fn new(mac: Mac) -> Result<ActionMac, InvalidActionMac> {
        if mac.is_zero() {
            Err(InvalidActionMac::Zero(mac))
        } else if mac.is_broadcast() {
            Err(InvalidActionMac::Broadcast(mac))
        } else if mac.is_multicast() {
            Err(InvalidActionMac::Multicast(mac))
        } else {
            Ok(ActionMac(mac))
        }
    }

    /// Map the [`ActionMac`] back to an unqualified [`Mac`]
    #[must_use]
    pub const fn inner(self) -> Mac {
        self.0
    }
}

impl TryFrom<Mac> for ActionMac {
    type Error = InvalidActionMac;

    fn try_from(value: Mac) -> Result<Self, Self::Error> {
        ActionMac::new(value)
    }
}

impl From<ActionMac> for Mac {
    fn from(value: ActionMac) -> Self {
        value.0
    }
}

impl Display for ActionMac {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::eth::mac::{ActionMac, Mac};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Mac {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Mac(driver.produce()?))
        }
    }

    impl TypeGenerator for ActionMac {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let mut mac: Mac = driver.produce()?;
            mac.0[0] &= 0b1111_1110;
            if mac.is_zero() {
                mac.0[5] = 1;
            }
            Some(ActionMac::new(mac).unwrap_or_else(|e| unreachable!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ActionMac, InvalidActionMac, Mac};

    #[test]
    fn mac_string_parse_back() {
        bolero::check!().with_type().for_each(|mac: &Mac| {
            let parsed = Mac::try_from(mac.to_string().as_str()).unwrap();
            assert_eq!(&parsed, mac);
        });
    }

    #[test]
    fn mac_from_string_bad_octet_count() {
        assert!(Mac::try_from("00:11:22:33:44").is_err());
        assert!(Mac::try_from("00:11:22:33:44:55:66").is_err());
        assert!(Mac::try_from("").is_err());
    }

    #[test]
    fn mac_from_string_bad_octet() {
        assert!(Mac::try_from("00:11:22:33:44:555").is_err());
        assert!(Mac::try_from("00:11:22:33:+4:55").is_err());
        assert!(Mac::try_from("00:11:22:33:4g:55").is_err());
    }

    #[test]
    fn action_mac_refuses_zero_broadcast_multicast() {
        assert_eq!(
            ActionMac::new(Mac::ZERO),
            Err(InvalidActionMac::Zero(Mac::ZERO))
        );
        assert_eq!(
            ActionMac::new(Mac::BROADCAST),
            Err(InvalidActionMac::Broadcast(Mac::BROADCAST))
        );
        let mcast = Mac([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]);
        assert_eq!(ActionMac::new(mcast), Err(InvalidActionMac::Multicast(mcast)));
    }

    #[test]
    fn action_mac_accepts_unicast() {
        bolero::check!().with_type().for_each(|mac: &Mac| {
            match ActionMac::new(*mac) {
                Ok(valid) => {
                    assert_eq!(valid.inner(), *mac);
                    assert!(mac.is_unicast());
                    assert!(!mac.is_zero());
                }
                Err(_) => assert!(mac.is_zero() || mac.is_multicast()),
            }
        });
    }

    #[test]
    fn generated_action_mac_is_valid() {
        bolero::check!().with_type().for_each(|mac: &ActionMac| {
            assert!(ActionMac::new(mac.inner()).is_ok());
        });
    }
}
