// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The runtime form of a flow action.

use crate::errors::{ActionError, ActionResult};
use model::flow::{FlowTableAction, WireAction};
use model::vtn::{VtnAction, VtnFlowAction};
use net::eth::ethtype::EthType;
use net::eth::mac::ActionMac;
use net::icmp::{IcmpCode, IcmpType};
use net::ip::dscp::Dscp;
use net::ip::host::InetHost;
use net::l4::port::L4Port;
use net::port_ref::PortRef;
use net::vlan::{Pcp, Vid};
use std::fmt::Display;

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "bolero"))]
pub use contract::*;

/// Position of an action within a filter's action list.
///
/// Orders are non-negative and fit both the configuration model (`i32`) and the flow-table
/// model (`u32`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionOrder(u32);

impl ActionOrder {
    /// The first position of an action list.
    pub const MIN: ActionOrder = ActionOrder(0);
    /// The largest legal position.
    pub const MAX: ActionOrder = ActionOrder(0x7fff_ffff);

    /// Create an [`ActionOrder`] from a flow-table order.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::BadArgument`] if `raw` exceeds [`ActionOrder::MAX`].
    pub fn new(raw: u32) -> ActionResult<ActionOrder> {
        if raw > ActionOrder::MAX.0 {
            Err(ActionError::BadArgument(format!("order out of range: {raw}")))
        } else {
            Ok(ActionOrder(raw))
        }
    }

    /// Create an [`ActionOrder`] from a flow-table order, clamping it to [`ActionOrder::MAX`].
    #[must_use]
    pub const fn saturating(raw: u32) -> ActionOrder {
        if raw > ActionOrder::MAX.0 {
            ActionOrder::MAX
        } else {
            ActionOrder(raw)
        }
    }

    /// Create an [`ActionOrder`] from a configuration order.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::BadArgument`] if `raw` is negative.
    pub fn from_vtn(raw: i32) -> ActionResult<ActionOrder> {
        u32::try_from(raw)
            .map(ActionOrder)
            .map_err(|_| ActionError::BadArgument(format!("negative order: {raw}")))
    }

    /// The order as a flow-table value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The order as a configuration value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl Display for ActionOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated flow action.
///
/// Every payload is a checked value type, so an [`Action`] which exists is always applicable
/// (subject to the headers of the packet it is applied to).
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumDiscriminants)]
#[strum_discriminants(name(ActionKind))]
#[strum_discriminants(doc = "Discriminant of [`Action`].")]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::EnumIter))]
pub enum Action {
    /// Discard the packet.
    Drop,
    /// Forward the packet to a port.
    Output(PortRef),
    /// Push a VLAN tag with the given TPID.
    PushVlan(EthType),
    /// Strip the VLAN tag.
    PopVlan,
    /// Set the VLAN id.
    SetVlanId(Vid),
    /// Set the VLAN priority.
    SetVlanPcp(Pcp),
    /// Set the source MAC address.
    SetDlSrc(ActionMac),
    /// Set the destination MAC address.
    SetDlDst(ActionMac),
    /// Set the source IP address.
    SetInetSrc(InetHost),
    /// Set the destination IP address.
    SetInetDst(InetHost),
    /// Set the DSCP field.
    SetInetDscp(Dscp),
    /// Set the ICMP type.
    SetIcmpType(IcmpType),
    /// Set the ICMP code.
    SetIcmpCode(IcmpCode),
    /// Set the TCP / UDP source port.
    SetTpSrc(L4Port),
    /// Set the TCP / UDP destination port.
    SetTpDst(L4Port),
}

impl ActionKind {
    /// Name of the action kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Drop => "drop",
            ActionKind::Output => "output",
            ActionKind::PushVlan => "push-vlan",
            ActionKind::PopVlan => "pop-vlan",
            ActionKind::SetVlanId => "set-vlan-id",
            ActionKind::SetVlanPcp => "set-vlan-pcp",
            ActionKind::SetDlSrc => "set-dl-src",
            ActionKind::SetDlDst => "set-dl-dst",
            ActionKind::SetInetSrc => "set-inet-src",
            ActionKind::SetInetDst => "set-inet-dst",
            ActionKind::SetInetDscp => "set-inet-dscp",
            ActionKind::SetIcmpType => "set-icmp-type",
            ActionKind::SetIcmpCode => "set-icmp-code",
            ActionKind::SetTpSrc => "set-tp-src",
            ActionKind::SetTpDst => "set-tp-dst",
        }
    }

    /// Returns true if actions of this kind may appear in a flow filter.
    #[must_use]
    pub const fn is_filter_kind(self) -> bool {
        matches!(
            self,
            ActionKind::SetVlanPcp
                | ActionKind::SetDlSrc
                | ActionKind::SetDlDst
                | ActionKind::SetInetSrc
                | ActionKind::SetInetDst
                | ActionKind::SetInetDscp
                | ActionKind::SetIcmpType
                | ActionKind::SetIcmpCode
                | ActionKind::SetTpSrc
                | ActionKind::SetTpDst
        )
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl Action {
    /// Create a [`Action::PushVlan`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::BadArgument`] if `tpid` is neither 802.1Q nor 802.1ad.
    pub fn push_vlan(tpid: EthType) -> ActionResult<Action> {
        if tpid.is_vlan_tag() {
            Ok(Action::PushVlan(tpid))
        } else {
            Err(ActionError::bad(
                ActionKind::PushVlan.name(),
                &format!("invalid VLAN ethernet type: {tpid}"),
            ))
        }
    }

    /// Get the discriminant of this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        ActionKind::from(self)
    }

    /// Render the action in the flow-table model.
    ///
    /// ICMP type and code are carried by the transport port actions of the flow-table model.
    #[must_use]
    pub fn to_wire(&self) -> WireAction {
        match self {
            Action::Drop => WireAction::Drop,
            Action::Output(port) => WireAction::Output {
                port: Some(port.as_str().to_string()),
            },
            Action::PushVlan(tpid) => WireAction::PushVlan {
                ethernet_type: Some(*tpid),
            },
            Action::PopVlan => WireAction::PopVlan,
            Action::SetVlanId(vid) => WireAction::SetVlanId {
                vlan_id: Some(vid.as_u16()),
            },
            Action::SetVlanPcp(pcp) => WireAction::SetVlanPcp {
                vlan_pcp: Some(pcp.as_u8()),
            },
            Action::SetDlSrc(mac) => WireAction::SetDlSrc {
                address: Some(mac.inner()),
            },
            Action::SetDlDst(mac) => WireAction::SetDlDst {
                address: Some(mac.inner()),
            },
            Action::SetInetSrc(host) => WireAction::SetNwSrc {
                address: Some(host.as_net()),
            },
            Action::SetInetDst(host) => WireAction::SetNwDst {
                address: Some(host.as_net()),
            },
            Action::SetInetDscp(dscp) => WireAction::SetNwTos {
                tos: Some(dscp.to_tos()),
            },
            Action::SetIcmpType(icmp_type) => WireAction::SetTpSrc {
                port: Some(u16::from(icmp_type.as_u8())),
            },
            Action::SetIcmpCode(code) => WireAction::SetTpDst {
                port: Some(u16::from(code.as_u8())),
            },
            Action::SetTpSrc(port) => WireAction::SetTpSrc {
                port: Some(port.as_u16()),
            },
            Action::SetTpDst(port) => WireAction::SetTpDst {
                port: Some(port.as_u16()),
            },
        }
    }

    /// Render the action in the configuration model.
    ///
    /// Returns `None` for [`Action::Output`], which has no configuration form.
    #[must_use]
    pub fn to_vtn(&self) -> Option<VtnAction> {
        let action = match self {
            Action::Output(_) => return None,
            Action::Drop => VtnAction::VtnDrop,
            Action::PushVlan(tpid) => VtnAction::VtnPushVlan {
                vlan_type: Some(*tpid),
            },
            Action::PopVlan => VtnAction::VtnPopVlan,
            Action::SetVlanId(vid) => VtnAction::VtnSetVlanId {
                vlan_id: Some(u32::from(vid.as_u16())),
            },
            Action::SetVlanPcp(pcp) => VtnAction::VtnSetVlanPcp {
                vlan_pcp: Some(u32::from(pcp.as_u8())),
            },
            Action::SetDlSrc(mac) => VtnAction::VtnSetDlSrc {
                address: Some(mac.inner()),
            },
            Action::SetDlDst(mac) => VtnAction::VtnSetDlDst {
                address: Some(mac.inner()),
            },
            Action::SetInetSrc(host) => VtnAction::VtnSetInetSrc {
                address: Some(host.as_net()),
            },
            Action::SetInetDst(host) => VtnAction::VtnSetInetDst {
                address: Some(host.as_net()),
            },
            Action::SetInetDscp(dscp) => VtnAction::VtnSetInetDscp {
                dscp: Some(u32::from(dscp.as_u8())),
            },
            Action::SetIcmpType(icmp_type) => VtnAction::VtnSetIcmpType {
                icmp_type: Some(u32::from(icmp_type.as_u8())),
            },
            Action::SetIcmpCode(code) => VtnAction::VtnSetIcmpCode {
                code: Some(u32::from(code.as_u8())),
            },
            Action::SetTpSrc(port) => VtnAction::VtnSetPortSrc {
                port: Some(u32::from(port.as_u16())),
            },
            Action::SetTpDst(port) => VtnAction::VtnSetPortDst {
                port: Some(u32::from(port.as_u16())),
            },
        };
        Some(action)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = self.kind().name();
        match self {
            Action::Drop | Action::PopVlan => f.write_str(name),
            Action::Output(port) => write!(f, "{name}(port={port})"),
            Action::PushVlan(tpid) => write!(f, "{name}(type={tpid})"),
            Action::SetVlanId(vid) => write!(f, "{name}(vlan-id={vid})"),
            Action::SetVlanPcp(pcp) => write!(f, "{name}(priority={pcp})"),
            Action::SetDlSrc(mac) | Action::SetDlDst(mac) => write!(f, "{name}(address={mac})"),
            Action::SetInetSrc(host) | Action::SetInetDst(host) => {
                write!(f, "{name}(address={host})")
            }
            Action::SetInetDscp(dscp) => write!(f, "{name}(dscp={dscp})"),
            Action::SetIcmpType(icmp_type) => write!(f, "{name}(type={icmp_type})"),
            Action::SetIcmpCode(code) => write!(f, "{name}(code={code})"),
            Action::SetTpSrc(port) | Action::SetTpDst(port) => write!(f, "{name}(port={port})"),
        }
    }
}

/// An [`Action`] and its (optional) position in a filter's action list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowAction {
    /// Position in the action list; absent for standalone flow-table actions.
    pub order: Option<ActionOrder>,
    /// The action.
    pub action: Action,
}

impl FlowAction {
    /// Create a [`FlowAction`] without order.
    #[must_use]
    pub fn new(action: Action) -> FlowAction {
        FlowAction {
            order: None,
            action,
        }
    }

    /// Create a [`FlowAction`] at the given position.
    #[must_use]
    pub fn with_order(order: ActionOrder, action: Action) -> FlowAction {
        FlowAction {
            order: Some(order),
            action,
        }
    }

    /// Get the discriminant of the action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    /// Returns true if this action may appear in a flow filter.
    #[must_use]
    pub fn is_filter_action(&self) -> bool {
        self.kind().is_filter_kind()
    }

    /// Render the action in the flow-table model.
    #[must_use]
    pub fn to_wire(&self) -> FlowTableAction {
        FlowTableAction {
            order: self.order.map(ActionOrder::as_u32),
            action: Some(self.action.to_wire()),
        }
    }

    /// Render the action in the configuration model (`None` for output actions).
    #[must_use]
    pub fn to_vtn(&self) -> Option<VtnFlowAction> {
        Some(VtnFlowAction {
            order: self.order.map(ActionOrder::as_i32),
            action: Some(self.action.to_vtn()?),
        })
    }
}

impl From<FlowAction> for Action {
    fn from(value: FlowAction) -> Self {
        value.action
    }
}

impl From<&FlowAction> for Action {
    fn from(value: &FlowAction) -> Self {
        value.action.clone()
    }
}

impl Display for FlowAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.order {
            Some(order) => write!(f, "{} (order={order})", self.action),
            None => self.action.fmt(f),
        }
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::action::{Action, ActionOrder, FlowAction};
    use bolero::{Driver, TypeGenerator};
    use net::eth::ethtype::EthType;

    impl TypeGenerator for ActionOrder {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(ActionOrder(driver.produce::<u32>()? & ActionOrder::MAX.0))
        }
    }

    impl TypeGenerator for Action {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let action = match driver.produce::<u8>()? % 15 {
                0 => Action::Drop,
                1 => Action::Output(driver.produce()?),
                2 => {
                    if driver.produce::<bool>()? {
                        Action::PushVlan(EthType::VLAN)
                    } else {
                        Action::PushVlan(EthType::VLAN_QINQ)
                    }
                }
                3 => Action::PopVlan,
                4 => Action::SetVlanId(driver.produce()?),
                5 => Action::SetVlanPcp(driver.produce()?),
                6 => Action::SetDlSrc(driver.produce()?),
                7 => Action::SetDlDst(driver.produce()?),
                8 => Action::SetInetSrc(driver.produce()?),
                9 => Action::SetInetDst(driver.produce()?),
                10 => Action::SetInetDscp(driver.produce()?),
                11 => Action::SetIcmpType(driver.produce()?),
                12 => Action::SetIcmpCode(driver.produce()?),
                13 => Action::SetTpSrc(driver.produce()?),
                _ => Action::SetTpDst(driver.produce()?),
            };
            Some(action)
        }
    }

    impl TypeGenerator for FlowAction {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(FlowAction {
                order: driver.produce()?,
                action: driver.produce()?,
            })
        }
    }
}
