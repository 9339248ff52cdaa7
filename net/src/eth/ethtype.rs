// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet type values

use etherparse::EtherType;

/// The ethernet header's ethertype field (or the TPID of a VLAN tag).
///
/// This is a transparent wrapper around the type provided by etherparse.
#[repr(transparent)]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "u16", into = "u16")]
pub struct EthType(pub(crate) EtherType);

impl EthType {
    /// Ethernet type for [address resolution protocol](https://en.wikipedia.org/wiki/Address_Resolution_Protocol)
    pub const ARP: EthType = EthType(EtherType::ARP);
    /// Ethernet type for [IPv4](https://en.wikipedia.org/wiki/IPv4)
    pub const IPV4: EthType = EthType(EtherType::IPV4);
    /// Ethernet type for [IPv6](https://en.wikipedia.org/wiki/IPv6)
    pub const IPV6: EthType = EthType(EtherType::IPV6);
    /// Ethernet type for [VLAN](https://en.wikipedia.org/wiki/IEEE_802.1Q)
    pub const VLAN: EthType = EthType(EtherType::VLAN_TAGGED_FRAME);
    /// Ethernet type for [QinQ (aka provider bridging)](https://en.wikipedia.org/wiki/IEEE_802.1ad)
    pub const VLAN_QINQ: EthType = EthType(EtherType::PROVIDER_BRIDGING);

    /// Map a raw (native-endian) u16 into an [`EthType`]
    #[must_use]
    pub const fn new(raw: u16) -> EthType {
        EthType(EtherType(raw))
    }

    /// get the raw `u16` value (native-endian)
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0.0
    }

    /// Returns true if this ethertype identifies a VLAN tag (802.1Q or 802.1ad).
    #[must_use]
    pub const fn is_vlan_tag(self) -> bool {
        self.0.0 == EtherType::VLAN_TAGGED_FRAME.0 || self.0.0 == EtherType::PROVIDER_BRIDGING.0
    }
}

impl From<u16> for EthType {
    fn from(raw: u16) -> Self {
        EthType::new(raw)
    }
}

impl From<EthType> for u16 {
    fn from(value: EthType) -> Self {
        value.raw()
    }
}

impl core::fmt::Display for EthType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:04x}", self.raw())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::EthType;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for EthType {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            Some(EthType::new(u.produce()?))
        }
    }
}

#[cfg(test)]
mod test {
    use super::EthType;

    #[test]
    fn vlan_tag_types() {
        assert!(EthType::VLAN.is_vlan_tag());
        assert!(EthType::VLAN_QINQ.is_vlan_tag());
        assert!(!EthType::IPV4.is_vlan_tag());
        assert_eq!(EthType::VLAN.raw(), 0x8100);
        assert_eq!(EthType::VLAN_QINQ.raw(), 0x88a8);
        assert_eq!(EthType::VLAN.to_string(), "0x8100");
    }
}
