// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Registry of converters between the configuration model, the flow-table model and
//! [`FlowAction`]s.
//!
//! Every table is keyed by the discriminant of the source union. The registry is built once by
//! [`ActionConverter::new`] and is read-only afterwards, so a single instance can be shared by
//! reference between threads.

use crate::action::{Action, ActionOrder, FlowAction};
use crate::errors::{ActionError, ActionResult};
use ipnet::IpNet;
use model::flow::{FlowTableAction, WireAction, WireActionKind};
use model::vtn::{VtnAction, VtnActionKind, VtnFlowAction};
use net::eth::ethtype::EthType;
use net::eth::mac::{ActionMac, Mac};
use net::icmp::{IcmpCode, IcmpType};
use net::ip::IpProto;
use net::ip::dscp::Dscp;
use net::ip::host::InetHost;
use net::l4::port::L4Port;
use net::port_ref::PortRef;
use net::vlan::{Pcp, Vid};
use std::collections::HashMap;
use std::fmt::Debug;
use tracing::{debug, instrument, trace};

type FilterConverter = fn(&VtnAction) -> ActionResult<Action>;
type WireConverter = fn(&WireAction) -> ActionResult<Action>;
type Stringifier = fn(&WireAction) -> ActionResult<String>;

/// Converts flow actions between their three representations.
pub struct ActionConverter {
    filter_converters: HashMap<VtnActionKind, FilterConverter>,
    md_converters: HashMap<WireActionKind, WireConverter>,
    l4_converters: HashMap<IpProto, HashMap<WireActionKind, WireConverter>>,
    md_stringifiers: HashMap<WireActionKind, Stringifier>,
}

impl ActionConverter {
    /// Build the converter registry.
    #[must_use]
    pub fn new() -> ActionConverter {
        let mut filter_converters: HashMap<VtnActionKind, FilterConverter> = HashMap::new();
        filter_converters.insert(VtnActionKind::VtnSetDlSrc, vtn_dl_addr);
        filter_converters.insert(VtnActionKind::VtnSetDlDst, vtn_dl_addr);
        filter_converters.insert(VtnActionKind::VtnSetInetSrc, vtn_inet_addr);
        filter_converters.insert(VtnActionKind::VtnSetInetDst, vtn_inet_addr);
        filter_converters.insert(VtnActionKind::VtnSetInetDscp, vtn_inet_dscp);
        filter_converters.insert(VtnActionKind::VtnSetIcmpType, vtn_icmp);
        filter_converters.insert(VtnActionKind::VtnSetIcmpCode, vtn_icmp);
        filter_converters.insert(VtnActionKind::VtnSetPortSrc, vtn_port);
        filter_converters.insert(VtnActionKind::VtnSetPortDst, vtn_port);
        filter_converters.insert(VtnActionKind::VtnSetVlanPcp, vtn_vlan_pcp);

        let mut md_converters: HashMap<WireActionKind, WireConverter> = HashMap::new();
        md_converters.insert(WireActionKind::Drop, wire_drop);
        md_converters.insert(WireActionKind::PushVlan, wire_push_vlan);
        md_converters.insert(WireActionKind::PopVlan, wire_pop_vlan);
        md_converters.insert(WireActionKind::SetVlanId, wire_vlan_id);
        md_converters.insert(WireActionKind::SetVlanPcp, wire_vlan_pcp);
        md_converters.insert(WireActionKind::SetDlSrc, wire_dl_addr);
        md_converters.insert(WireActionKind::SetDlDst, wire_dl_addr);
        md_converters.insert(WireActionKind::SetNwSrc, wire_nw_addr);
        md_converters.insert(WireActionKind::SetNwDst, wire_nw_addr);
        md_converters.insert(WireActionKind::SetNwTos, wire_nw_tos);

        let mut icmp: HashMap<WireActionKind, WireConverter> = HashMap::new();
        icmp.insert(WireActionKind::SetTpSrc, wire_icmp);
        icmp.insert(WireActionKind::SetTpDst, wire_icmp);
        let mut ports: HashMap<WireActionKind, WireConverter> = HashMap::new();
        ports.insert(WireActionKind::SetTpSrc, wire_tp_port);
        ports.insert(WireActionKind::SetTpDst, wire_tp_port);
        let mut l4_converters = HashMap::new();
        l4_converters.insert(IpProto::ICMP, icmp);
        l4_converters.insert(IpProto::TCP, ports.clone());
        l4_converters.insert(IpProto::UDP, ports);

        let mut md_stringifiers: HashMap<WireActionKind, Stringifier> = HashMap::new();
        md_stringifiers.insert(WireActionKind::Output, describe_output);
        md_stringifiers.insert(WireActionKind::SetTpSrc, describe_tp_port);
        md_stringifiers.insert(WireActionKind::SetTpDst, describe_tp_port);

        debug!(
            "Flow action converters: {} filter, {} flow-table, {} protocols, {} stringifiers",
            filter_converters.len(),
            md_converters.len(),
            l4_converters.len(),
            md_stringifiers.len()
        );
        ActionConverter {
            filter_converters,
            md_converters,
            l4_converters,
            md_stringifiers,
        }
    }

    /// Convert a configuration action to a filter [`FlowAction`].
    ///
    /// # Errors
    ///
    /// - [`ActionError::MissingArgument`] if no action is set.
    /// - [`ActionError::UnsupportedAction`] if the kind is not a filter action.
    /// - [`ActionError::NullArgument`] if the order or a mandatory field is absent.
    /// - [`ActionError::BadArgument`] if a value is out of range.
    #[instrument(level = "trace", skip(self))]
    pub fn to_filter_action(&self, vtn: &VtnFlowAction) -> ActionResult<FlowAction> {
        let action = vtn
            .action
            .as_ref()
            .ok_or_else(|| ActionError::MissingArgument("vtn-flow-action".to_string()))?;
        let kind = action.kind();
        let convert = self
            .filter_converters
            .get(&kind)
            .ok_or_else(|| ActionError::UnsupportedAction(kind.name().to_string()))?;
        let order = vtn.order.ok_or_else(|| ActionError::null(kind.name(), "order"))?;
        let order = ActionOrder::from_vtn(order)?;
        Ok(FlowAction::with_order(order, convert(action)?))
    }

    /// Convert a flow-table action to a [`FlowAction`].
    ///
    /// `proto` is the IP protocol matched by the enclosing flow; it decides whether transport
    /// port actions set ports or ICMP type and code. Returns `Ok(None)` for actions which have
    /// no runtime form (output, queues, transport actions for an unknown protocol). Orders
    /// beyond [`ActionOrder::MAX`] are clamped to it.
    ///
    /// # Errors
    ///
    /// - [`ActionError::MissingArgument`] if no action is set.
    /// - [`ActionError::NullArgument`] if a mandatory field is absent.
    /// - [`ActionError::BadArgument`] if a value is out of range.
    #[instrument(level = "trace", skip(self))]
    pub fn to_flow_action(
        &self,
        wire: &FlowTableAction,
        proto: Option<IpProto>,
    ) -> ActionResult<Option<FlowAction>> {
        let action = wire
            .action
            .as_ref()
            .ok_or_else(|| ActionError::MissingArgument("flow-table-action".to_string()))?;
        let Some(convert) = self.wire_converter(action.kind(), proto) else {
            trace!("No runtime form for {action:?} (protocol {proto:?})");
            return Ok(None);
        };
        let order = wire.order.map(ActionOrder::saturating);
        Ok(Some(FlowAction {
            order,
            action: convert(action)?,
        }))
    }

    /// Convert a flow-table action to the configuration model.
    ///
    /// # Errors
    ///
    /// Fails like [`ActionConverter::to_flow_action`].
    pub fn to_vtn_action(
        &self,
        wire: &FlowTableAction,
        proto: Option<IpProto>,
    ) -> ActionResult<Option<VtnFlowAction>> {
        Ok(self
            .to_flow_action(wire, proto)?
            .and_then(|action| action.to_vtn()))
    }

    /// Describe a flow-table action. This never fails: actions which cannot be converted are
    /// rendered with their debug representation.
    #[must_use]
    pub fn describe(&self, action: &WireAction) -> String {
        let kind = action.kind();
        let described = if let Some(convert) = self.md_converters.get(&kind) {
            convert(action).map(|converted| converted.to_string())
        } else if let Some(stringify) = self.md_stringifiers.get(&kind) {
            stringify(action)
        } else {
            Err(ActionError::UnsupportedAction(kind.name().to_string()))
        };
        described.unwrap_or_else(|e| {
            trace!("Falling back to generic description of {kind}: {e}");
            format!("{action:?}")
        })
    }

    fn wire_converter(&self, kind: WireActionKind, proto: Option<IpProto>) -> Option<WireConverter> {
        if let Some(convert) = self.md_converters.get(&kind) {
            return Some(*convert);
        }
        self.l4_converters.get(&proto?)?.get(&kind).copied()
    }
}

impl Default for ActionConverter {
    fn default() -> Self {
        ActionConverter::new()
    }
}

impl Debug for ActionConverter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut protocols: Vec<_> = self.l4_converters.keys().map(|p| p.as_u8()).collect();
        protocols.sort_unstable();
        f.debug_struct("ActionConverter")
            .field("filter_converters", &self.filter_converters.len())
            .field("md_converters", &self.md_converters.len())
            .field("l4_protocols", &protocols)
            .field("md_stringifiers", &self.md_stringifiers.len())
            .finish()
    }
}

fn unexpected(expected: &str, found: &dyn Debug) -> ActionError {
    ActionError::BadArgument(format!("{expected}: unexpected action type: {found:?}"))
}

fn required<T>(value: Option<T>, what: &str, field: &str) -> ActionResult<T> {
    value.ok_or_else(|| ActionError::null(what, field))
}

fn action_mac(address: Option<Mac>, what: &str) -> ActionResult<ActionMac> {
    ActionMac::new(required(address, what, "address")?).map_err(|e| ActionError::bad(what, &e))
}

fn inet_host(address: Option<IpNet>, what: &str) -> ActionResult<InetHost> {
    InetHost::new(required(address, what, "address")?).map_err(|e| ActionError::bad(what, &e))
}

fn narrow(value: Option<u32>, what: &str, field: &str) -> ActionResult<u8> {
    let raw = required(value, what, field)?;
    u8::try_from(raw).map_err(|_| ActionError::bad(what, &format!("{field} {raw} out of range")))
}

fn l4_port(port: Option<u32>, what: &str) -> ActionResult<L4Port> {
    L4Port::new_checked(required(port, what, "port")?).map_err(|e| ActionError::bad(what, &e))
}

/* configuration model */

fn vtn_dl_addr(action: &VtnAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        VtnAction::VtnSetDlSrc { address } => Ok(Action::SetDlSrc(action_mac(*address, name)?)),
        VtnAction::VtnSetDlDst { address } => Ok(Action::SetDlDst(action_mac(*address, name)?)),
        _ => Err(unexpected("vtn-set-dl-addr", action)),
    }
}

fn vtn_inet_addr(action: &VtnAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        VtnAction::VtnSetInetSrc { address } => {
            Ok(Action::SetInetSrc(inet_host(*address, name)?))
        }
        VtnAction::VtnSetInetDst { address } => {
            Ok(Action::SetInetDst(inet_host(*address, name)?))
        }
        _ => Err(unexpected("vtn-set-inet-addr", action)),
    }
}

fn vtn_inet_dscp(action: &VtnAction) -> ActionResult<Action> {
    let VtnAction::VtnSetInetDscp { dscp } = action else {
        return Err(unexpected(VtnActionKind::VtnSetInetDscp.name(), action));
    };
    let name = VtnActionKind::VtnSetInetDscp.name();
    Dscp::new(narrow(*dscp, name, "dscp")?)
        .map(Action::SetInetDscp)
        .map_err(|e| ActionError::bad(name, &e))
}

fn vtn_icmp(action: &VtnAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        VtnAction::VtnSetIcmpType { icmp_type } => {
            IcmpType::new_checked(required(*icmp_type, name, "type")?)
                .map(Action::SetIcmpType)
                .map_err(|e| ActionError::bad(name, &e))
        }
        VtnAction::VtnSetIcmpCode { code } => IcmpCode::new_checked(required(*code, name, "code")?)
            .map(Action::SetIcmpCode)
            .map_err(|e| ActionError::bad(name, &e)),
        _ => Err(unexpected("vtn-set-icmp-value", action)),
    }
}

fn vtn_port(action: &VtnAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        VtnAction::VtnSetPortSrc { port } => Ok(Action::SetTpSrc(l4_port(*port, name)?)),
        VtnAction::VtnSetPortDst { port } => Ok(Action::SetTpDst(l4_port(*port, name)?)),
        _ => Err(unexpected("vtn-set-port", action)),
    }
}

fn vtn_vlan_pcp(action: &VtnAction) -> ActionResult<Action> {
    let VtnAction::VtnSetVlanPcp { vlan_pcp } = action else {
        return Err(unexpected(VtnActionKind::VtnSetVlanPcp.name(), action));
    };
    let name = VtnActionKind::VtnSetVlanPcp.name();
    Pcp::new(narrow(*vlan_pcp, name, "vlan-pcp")?)
        .map(Action::SetVlanPcp)
        .map_err(|e| ActionError::bad(name, &e))
}

/* flow-table model */

fn wire_drop(action: &WireAction) -> ActionResult<Action> {
    match action {
        WireAction::Drop => Ok(Action::Drop),
        _ => Err(unexpected(WireActionKind::Drop.name(), action)),
    }
}

fn wire_push_vlan(action: &WireAction) -> ActionResult<Action> {
    match action {
        WireAction::PushVlan { ethernet_type } => {
            Action::push_vlan(ethernet_type.unwrap_or(EthType::VLAN))
        }
        _ => Err(unexpected(WireActionKind::PushVlan.name(), action)),
    }
}

fn wire_pop_vlan(action: &WireAction) -> ActionResult<Action> {
    match action {
        WireAction::PopVlan => Ok(Action::PopVlan),
        _ => Err(unexpected(WireActionKind::PopVlan.name(), action)),
    }
}

fn wire_vlan_id(action: &WireAction) -> ActionResult<Action> {
    let WireAction::SetVlanId { vlan_id } = action else {
        return Err(unexpected(WireActionKind::SetVlanId.name(), action));
    };
    let name = WireActionKind::SetVlanId.name();
    Vid::new(required(*vlan_id, name, "vlan-id")?)
        .map(Action::SetVlanId)
        .map_err(|e| ActionError::bad(name, &e))
}

fn wire_vlan_pcp(action: &WireAction) -> ActionResult<Action> {
    let WireAction::SetVlanPcp { vlan_pcp } = action else {
        return Err(unexpected(WireActionKind::SetVlanPcp.name(), action));
    };
    let name = WireActionKind::SetVlanPcp.name();
    Pcp::new(required(*vlan_pcp, name, "vlan-pcp")?)
        .map(Action::SetVlanPcp)
        .map_err(|e| ActionError::bad(name, &e))
}

fn wire_dl_addr(action: &WireAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        WireAction::SetDlSrc { address } => Ok(Action::SetDlSrc(action_mac(*address, name)?)),
        WireAction::SetDlDst { address } => Ok(Action::SetDlDst(action_mac(*address, name)?)),
        _ => Err(unexpected("set-dl-addr", action)),
    }
}

fn wire_nw_addr(action: &WireAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        WireAction::SetNwSrc { address } => Ok(Action::SetInetSrc(inet_host(*address, name)?)),
        WireAction::SetNwDst { address } => Ok(Action::SetInetDst(inet_host(*address, name)?)),
        _ => Err(unexpected("set-nw-addr", action)),
    }
}

fn wire_nw_tos(action: &WireAction) -> ActionResult<Action> {
    let WireAction::SetNwTos { tos } = action else {
        return Err(unexpected(WireActionKind::SetNwTos.name(), action));
    };
    let tos = required(*tos, WireActionKind::SetNwTos.name(), "tos")?;
    Ok(Action::SetInetDscp(Dscp::from_tos(tos)))
}

fn wire_tp_port(action: &WireAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        WireAction::SetTpSrc { port } => Ok(Action::SetTpSrc(L4Port::new(required(
            *port, name, "port",
        )?))),
        WireAction::SetTpDst { port } => Ok(Action::SetTpDst(L4Port::new(required(
            *port, name, "port",
        )?))),
        _ => Err(unexpected("set-tp-port", action)),
    }
}

/// ICMP type and code travel in the transport port actions.
fn wire_icmp(action: &WireAction) -> ActionResult<Action> {
    let name = action.kind().name();
    match action {
        WireAction::SetTpSrc { port } => {
            IcmpType::new_checked(u32::from(required(*port, name, "port")?))
                .map(Action::SetIcmpType)
                .map_err(|e| ActionError::bad(name, &e))
        }
        WireAction::SetTpDst { port } => {
            IcmpCode::new_checked(u32::from(required(*port, name, "port")?))
                .map(Action::SetIcmpCode)
                .map_err(|e| ActionError::bad(name, &e))
        }
        _ => Err(unexpected("set-tp-icmp", action)),
    }
}

fn describe_output(action: &WireAction) -> ActionResult<String> {
    let WireAction::Output { port } = action else {
        return Err(unexpected(WireActionKind::Output.name(), action));
    };
    let name = WireActionKind::Output.name();
    let port = PortRef::new(required(port.clone(), name, "port")?)
        .map_err(|e| ActionError::bad(name, &e))?;
    Ok(Action::Output(port).to_string())
}

fn describe_tp_port(action: &WireAction) -> ActionResult<String> {
    let name = action.kind().name();
    match action {
        WireAction::SetTpSrc { port } | WireAction::SetTpDst { port } => {
            Ok(format!("{name}(port={})", required(*port, name, "port")?))
        }
        _ => Err(unexpected("set-tp-port", action)),
    }
}
