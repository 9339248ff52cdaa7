// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow-table model (the actions and instructions of a flow entry).

use ipnet::IpNet;
use net::eth::ethtype::EthType;
use net::eth::mac::Mac;
use crate::entry::RawEntry;
use serde::{Deserialize, Serialize};

/// One flow-table action.
///
/// `SetTpSrc` / `SetTpDst` are overloaded by the forwarding plane: when the flow matches ICMP
/// they carry the ICMP type and code respectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumDiscriminants)]
#[strum_discriminants(name(WireActionKind))]
#[strum_discriminants(doc = "Discriminant of [`WireAction`].")]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::EnumIter))]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum WireAction {
    /// Forward to a port.
    Output {
        /// Port identifier
        port: Option<String>,
    },
    /// Discard the packet.
    Drop,
    /// Push a VLAN tag.
    PushVlan {
        /// Ethernet type of the tag
        ethernet_type: Option<EthType>,
    },
    /// Strip the VLAN tag.
    PopVlan,
    /// Set the VLAN id.
    SetVlanId {
        /// VLAN id
        vlan_id: Option<u16>,
    },
    /// Set the VLAN priority.
    SetVlanPcp {
        /// VLAN priority
        vlan_pcp: Option<u8>,
    },
    /// Set the source MAC address.
    SetDlSrc {
        /// MAC address
        address: Option<Mac>,
    },
    /// Set the destination MAC address.
    SetDlDst {
        /// MAC address
        address: Option<Mac>,
    },
    /// Set the source IP address.
    SetNwSrc {
        /// IP address in prefix form
        address: Option<IpNet>,
    },
    /// Set the destination IP address.
    SetNwDst {
        /// IP address in prefix form
        address: Option<IpNet>,
    },
    /// Set the IP ToS byte.
    SetNwTos {
        /// ToS byte (DSCP in the upper 6 bits)
        tos: Option<u8>,
    },
    /// Set the transport source port (or the ICMP type).
    SetTpSrc {
        /// Port number
        port: Option<u16>,
    },
    /// Set the transport destination port (or the ICMP code).
    SetTpDst {
        /// Port number
        port: Option<u16>,
    },
    /// Enqueue on a port queue.
    SetQueue {
        /// Queue identifier
        queue_id: Option<u32>,
    },
}

impl WireAction {
    /// Get the discriminant of this action.
    #[must_use]
    pub fn kind(&self) -> WireActionKind {
        WireActionKind::from(self)
    }
}

impl WireActionKind {
    /// Name of the action kind on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WireActionKind::Output => "output",
            WireActionKind::Drop => "drop",
            WireActionKind::PushVlan => "push-vlan",
            WireActionKind::PopVlan => "pop-vlan",
            WireActionKind::SetVlanId => "set-vlan-id",
            WireActionKind::SetVlanPcp => "set-vlan-pcp",
            WireActionKind::SetDlSrc => "set-dl-src",
            WireActionKind::SetDlDst => "set-dl-dst",
            WireActionKind::SetNwSrc => "set-nw-src",
            WireActionKind::SetNwDst => "set-nw-dst",
            WireActionKind::SetNwTos => "set-nw-tos",
            WireActionKind::SetTpSrc => "set-tp-src",
            WireActionKind::SetTpDst => "set-tp-dst",
            WireActionKind::SetQueue => "set-queue",
        }
    }
}

impl core::fmt::Display for WireActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A flow-table action and its position in the action list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawEntry<u32>")]
pub struct FlowTableAction {
    /// Position within the list.
    pub order: Option<u32>,
    /// The action.
    #[serde(flatten)]
    pub action: Option<WireAction>,
}

impl TryFrom<RawEntry<u32>> for FlowTableAction {
    type Error = serde_yaml_ng::Error;

    fn try_from(entry: RawEntry<u32>) -> Result<Self, Self::Error> {
        let (order, action) = entry.into_parts()?;
        Ok(FlowTableAction { order, action })
    }
}

impl FlowTableAction {
    /// Create a [`FlowTableAction`] with both fields set.
    #[must_use]
    pub fn new(order: u32, action: WireAction) -> FlowTableAction {
        FlowTableAction {
            order: Some(order),
            action: Some(action),
        }
    }
}

/// A flow entry instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Instruction {
    /// Apply the listed actions immediately, in order.
    ApplyActions {
        /// Position of the instruction
        order: u32,
        /// Ordered actions; an output action, if any, is last
        actions: Vec<FlowTableAction>,
    },
}

/// The instruction set of a flow entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(pub Vec<Instruction>);

impl Instructions {
    /// Iterate over the instructions.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.0.iter()
    }

    /// Collect the actions of every apply-actions instruction, in instruction order.
    #[must_use]
    pub fn apply_actions(&self) -> Vec<&FlowTableAction> {
        self.0
            .iter()
            .flat_map(|instruction| match instruction {
                Instruction::ApplyActions { actions, .. } => actions.iter(),
            })
            .collect()
    }
}
