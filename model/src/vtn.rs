// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VTN configuration model for flow actions.
//!
//! Output is deliberately absent: forwarding is decided by the virtual network, not by a flow
//! filter.

use ipnet::IpNet;
use net::eth::ethtype::EthType;
use net::eth::mac::Mac;
use crate::entry::RawEntry;
use serde::{Deserialize, Serialize};

/// One configuration action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumDiscriminants)]
#[strum_discriminants(name(VtnActionKind))]
#[strum_discriminants(doc = "Discriminant of [`VtnAction`].")]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::EnumIter))]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum VtnAction {
    /// Discard the packet.
    VtnDrop,
    /// Push a VLAN tag.
    VtnPushVlan {
        /// Ethernet type of the tag (802.1Q or 802.1ad)
        vlan_type: Option<EthType>,
    },
    /// Strip the VLAN tag.
    VtnPopVlan,
    /// Set the VLAN id.
    VtnSetVlanId {
        /// VLAN id
        vlan_id: Option<u32>,
    },
    /// Set the VLAN priority.
    VtnSetVlanPcp {
        /// VLAN priority
        vlan_pcp: Option<u32>,
    },
    /// Set the source MAC address.
    VtnSetDlSrc {
        /// MAC address
        address: Option<Mac>,
    },
    /// Set the destination MAC address.
    VtnSetDlDst {
        /// MAC address
        address: Option<Mac>,
    },
    /// Set the source IP address.
    VtnSetInetSrc {
        /// IP address in prefix form
        address: Option<IpNet>,
    },
    /// Set the destination IP address.
    VtnSetInetDst {
        /// IP address in prefix form
        address: Option<IpNet>,
    },
    /// Set the DSCP field.
    VtnSetInetDscp {
        /// DSCP value
        dscp: Option<u32>,
    },
    /// Set the ICMP type.
    VtnSetIcmpType {
        /// ICMP type
        icmp_type: Option<u32>,
    },
    /// Set the ICMP code.
    VtnSetIcmpCode {
        /// ICMP code
        code: Option<u32>,
    },
    /// Set the TCP / UDP source port.
    VtnSetPortSrc {
        /// Port number
        port: Option<u32>,
    },
    /// Set the TCP / UDP destination port.
    VtnSetPortDst {
        /// Port number
        port: Option<u32>,
    },
}

impl VtnAction {
    /// Get the discriminant of this action.
    #[must_use]
    pub fn kind(&self) -> VtnActionKind {
        VtnActionKind::from(self)
    }
}

impl VtnActionKind {
    /// Name of the action kind as it appears in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VtnActionKind::VtnDrop => "vtn-drop",
            VtnActionKind::VtnPushVlan => "vtn-push-vlan",
            VtnActionKind::VtnPopVlan => "vtn-pop-vlan",
            VtnActionKind::VtnSetVlanId => "vtn-set-vlan-id",
            VtnActionKind::VtnSetVlanPcp => "vtn-set-vlan-pcp",
            VtnActionKind::VtnSetDlSrc => "vtn-set-dl-src",
            VtnActionKind::VtnSetDlDst => "vtn-set-dl-dst",
            VtnActionKind::VtnSetInetSrc => "vtn-set-inet-src",
            VtnActionKind::VtnSetInetDst => "vtn-set-inet-dst",
            VtnActionKind::VtnSetInetDscp => "vtn-set-inet-dscp",
            VtnActionKind::VtnSetIcmpType => "vtn-set-icmp-type",
            VtnActionKind::VtnSetIcmpCode => "vtn-set-icmp-code",
            VtnActionKind::VtnSetPortSrc => "vtn-set-port-src",
            VtnActionKind::VtnSetPortDst => "vtn-set-port-dst",
        }
    }
}

impl core::fmt::Display for VtnActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A configuration action together with its position in the action list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawEntry<i32>")]
pub struct VtnFlowAction {
    /// Evaluation order within the list.
    pub order: Option<i32>,
    /// The action.
    #[serde(flatten)]
    pub action: Option<VtnAction>,
}

impl TryFrom<RawEntry<i32>> for VtnFlowAction {
    type Error = serde_yaml_ng::Error;

    fn try_from(entry: RawEntry<i32>) -> Result<Self, Self::Error> {
        let (order, action) = entry.into_parts()?;
        Ok(VtnFlowAction { order, action })
    }
}

impl VtnFlowAction {
    /// Create a [`VtnFlowAction`] with both fields set.
    #[must_use]
    pub fn new(order: i32, action: VtnAction) -> VtnFlowAction {
        VtnFlowAction {
            order: Some(order),
            action: Some(action),
        }
    }
}
