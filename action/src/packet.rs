// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Application of flow actions to the headers of a packet.

use crate::action::{Action, ActionKind, FlowAction};
use net::eth::Eth;
use net::headers::{Headers, TryIcmpMut, TryInetMut, TryPortsMut, WithEthMut};
use net::icmp::Icmp;
use net::ip::Inet;
use net::l4::Ports;
use std::net::IpAddr;
use tracing::trace;

/// What a flow action needs from the packet it is applied to: mutable views of its headers,
/// and a record of the actions which fired.
pub trait ActionContext: WithEthMut + TryInetMut + TryPortsMut + TryIcmpMut {
    /// Record that `action` modified the packet.
    fn record_fired(&mut self, action: &FlowAction);
    /// Forget the previously recorded actions of the given kind.
    fn remove_fired(&mut self, kind: ActionKind);
}

fn set_inet_addr(inet: Option<&mut Inet>, addr: IpAddr, source: bool) -> bool {
    let Some(inet) = inet else {
        return false;
    };
    let result = if source {
        inet.set_source(addr)
    } else {
        inet.set_destination(addr)
    };
    match result {
        Ok(_) => true,
        Err(e) => {
            trace!("Address family mismatch: {e}");
            false
        }
    }
}

impl FlowAction {
    /// Apply the action to the headers exposed by `ctx`.
    ///
    /// Returns true (and records the action in `ctx`) if the headers were modified; false if the
    /// packet lacks the header the action modifies. Output and drop actions never modify
    /// headers.
    pub fn apply<C: ActionContext>(&self, ctx: &mut C) -> bool {
        let applied = match &self.action {
            Action::Drop | Action::Output(_) => false,
            Action::PushVlan(tpid) => {
                ctx.eth_mut().push_vlan(*tpid);
                true
            }
            Action::PopVlan => {
                ctx.eth_mut().pop_vlan();
                ctx.remove_fired(ActionKind::SetVlanId);
                ctx.remove_fired(ActionKind::SetVlanPcp);
                true
            }
            Action::SetVlanId(vid) => {
                ctx.eth_mut().set_vid(*vid);
                true
            }
            Action::SetVlanPcp(pcp) => {
                ctx.eth_mut().set_pcp(*pcp);
                true
            }
            Action::SetDlSrc(mac) => {
                ctx.eth_mut().set_source(*mac);
                true
            }
            Action::SetDlDst(mac) => {
                ctx.eth_mut().set_destination(*mac);
                true
            }
            Action::SetInetSrc(host) => set_inet_addr(ctx.try_inet_mut(), host.addr(), true),
            Action::SetInetDst(host) => set_inet_addr(ctx.try_inet_mut(), host.addr(), false),
            Action::SetInetDscp(dscp) => ctx
                .try_inet_mut()
                .map(|inet| inet.set_dscp(*dscp))
                .is_some(),
            Action::SetIcmpType(icmp_type) => ctx
                .try_icmp_mut()
                .map(|icmp| icmp.set_icmp_type(*icmp_type))
                .is_some(),
            Action::SetIcmpCode(code) => ctx
                .try_icmp_mut()
                .map(|icmp| icmp.set_code(*code))
                .is_some(),
            Action::SetTpSrc(port) => ctx
                .try_ports_mut()
                .map(|ports| ports.set_source(*port))
                .is_some(),
            Action::SetTpDst(port) => ctx
                .try_ports_mut()
                .map(|ports| ports.set_destination(*port))
                .is_some(),
        };
        if applied {
            ctx.record_fired(self);
        } else {
            trace!("{self} not applicable");
        }
        applied
    }
}

/// Apply filter actions in order, returning the number of actions which fired.
///
/// Actions are sorted by order first (stable, actions without order last).
pub fn apply_actions<C: ActionContext>(actions: &[FlowAction], ctx: &mut C) -> usize {
    let mut sorted: Vec<_> = actions.iter().collect();
    sorted.sort_by_key(|action| (action.order.is_none(), action.order));
    sorted
        .into_iter()
        .filter(|action| action.apply(ctx))
        .count()
}

/// A packet's headers together with the list of actions which modified them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketContext {
    headers: Headers,
    fired: Vec<FlowAction>,
}

impl PacketContext {
    /// Wrap the headers of a packet.
    #[must_use]
    pub fn new(headers: Headers) -> PacketContext {
        PacketContext {
            headers,
            fired: Vec::new(),
        }
    }

    /// The (possibly modified) headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The actions which fired, in firing order.
    #[must_use]
    pub fn fired(&self) -> &[FlowAction] {
        &self.fired
    }

    /// Consume the context, returning the headers.
    #[must_use]
    pub fn into_headers(self) -> Headers {
        self.headers
    }
}

impl WithEthMut for PacketContext {
    fn eth_mut(&mut self) -> &mut Eth {
        self.headers.eth_mut()
    }
}

impl TryInetMut for PacketContext {
    fn try_inet_mut(&mut self) -> Option<&mut Inet> {
        self.headers.try_inet_mut()
    }
}

impl TryPortsMut for PacketContext {
    fn try_ports_mut(&mut self) -> Option<&mut Ports> {
        self.headers.try_ports_mut()
    }
}

impl TryIcmpMut for PacketContext {
    fn try_icmp_mut(&mut self) -> Option<&mut Icmp> {
        self.headers.try_icmp_mut()
    }
}

impl ActionContext for PacketContext {
    fn record_fired(&mut self, action: &FlowAction) {
        self.fired.push(action.clone());
    }

    fn remove_fired(&mut self, kind: ActionKind) {
        self.fired.retain(|action| action.kind() != kind);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::ActionOrder;
    use net::eth::ethtype::EthType;
    use net::eth::mac::{ActionMac, Mac};
    use net::headers::{HeadersBuilder, TryIcmp, TryInet, TryPorts, WithEth};
    use net::icmp::{IcmpCode, IcmpType};
    use net::ip::IpProto;
    use net::ip::dscp::Dscp;
    use net::ip::host::InetHost;
    use net::l4::port::L4Port;
    use net::port_ref::PortRef;
    use net::vlan::{Pcp, Vid};
    use pretty_assertions::assert_eq;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn eth() -> Eth {
        Eth::new(
            Mac([0x02, 0, 0, 0, 0, 1]),
            Mac([0x02, 0, 0, 0, 0, 2]),
            EthType::IPV4,
        )
    }

    fn inet(proto: IpProto) -> Inet {
        Inet::new(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            Dscp::MIN,
            proto,
        )
        .unwrap()
    }

    fn tcp_packet() -> PacketContext {
        PacketContext::new(
            HeadersBuilder::default()
                .eth(eth())
                .inet(inet(IpProto::TCP))
                .transport(Ports::new(L4Port::new(40000), L4Port::new(80)))
                .build()
                .unwrap(),
        )
    }

    fn icmp_packet() -> PacketContext {
        PacketContext::new(
            HeadersBuilder::default()
                .eth(eth())
                .inet(inet(IpProto::ICMP))
                .transport(Icmp::new(IcmpType::new(8), IcmpCode::new(0)))
                .build()
                .unwrap(),
        )
    }

    fn arp_packet() -> PacketContext {
        PacketContext::new(Headers::new(eth()))
    }

    fn ordered(order: u32, action: Action) -> FlowAction {
        FlowAction::with_order(ActionOrder::new(order).unwrap(), action)
    }

    fn host(addr: IpAddr) -> InetHost {
        InetHost::from(addr)
    }

    #[test]
    fn ethernet_actions_always_apply() {
        let mac = ActionMac::new(Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])).unwrap();
        let actions = [
            Action::SetDlSrc(mac),
            Action::SetDlDst(mac),
            Action::SetVlanId(Vid::new(100).unwrap()),
            Action::SetVlanPcp(Pcp::MAX),
        ];
        for action in actions {
            let mut ctx = arp_packet();
            let action = FlowAction::new(action);
            assert!(action.apply(&mut ctx));
            assert_eq!(ctx.fired(), &[action]);
        }
        let mut ctx = arp_packet();
        FlowAction::new(Action::SetDlDst(mac)).apply(&mut ctx);
        assert_eq!(ctx.headers().eth().destination(), mac.inner());
    }

    #[test]
    fn forwarding_actions_do_not_modify_headers() {
        let mut ctx = tcp_packet();
        let before = ctx.headers().clone();
        assert!(!FlowAction::new(Action::Drop).apply(&mut ctx));
        assert!(
            !FlowAction::new(Action::Output(PortRef::new("openflow:1:1").unwrap()))
                .apply(&mut ctx)
        );
        assert_eq!(ctx.headers(), &before);
        assert!(ctx.fired().is_empty());
    }

    #[test]
    fn pop_vlan_forgets_vlan_rewrites() {
        let mut ctx = arp_packet();
        let actions = [
            ordered(0, Action::SetVlanId(Vid::new(10).unwrap())),
            ordered(1, Action::SetVlanPcp(Pcp::new(3).unwrap())),
            ordered(2, Action::PopVlan),
        ];
        assert_eq!(apply_actions(&actions, &mut ctx), 3);
        assert_eq!(ctx.headers().eth().vlan(), None);
        let kinds: Vec<_> = ctx.fired().iter().map(FlowAction::kind).collect();
        assert_eq!(kinds, vec![ActionKind::PopVlan]);
    }

    #[test]
    fn push_vlan_tags_frame() {
        let mut ctx = arp_packet();
        assert!(FlowAction::new(Action::PushVlan(EthType::VLAN_QINQ)).apply(&mut ctx));
        let tag = ctx.headers().eth().vlan().copied().unwrap();
        assert_eq!(tag.tpid, EthType::VLAN_QINQ);
        assert_eq!(tag.vid, Vid::NONE);
    }

    #[test]
    fn ip_actions_need_ip_header() {
        let v4 = host(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)));
        let mut ctx = arp_packet();
        assert!(!FlowAction::new(Action::SetInetSrc(v4)).apply(&mut ctx));
        assert!(!FlowAction::new(Action::SetInetDscp(Dscp::new(46).unwrap())).apply(&mut ctx));
        assert!(ctx.fired().is_empty());

        let mut ctx = tcp_packet();
        assert!(FlowAction::new(Action::SetInetDst(v4)).apply(&mut ctx));
        assert!(FlowAction::new(Action::SetInetDscp(Dscp::new(46).unwrap())).apply(&mut ctx));
        let inet = ctx.headers().try_inet().unwrap();
        assert_eq!(inet.destination(), v4.addr());
        assert_eq!(inet.dscp(), Dscp::new(46).unwrap());
    }

    #[test]
    fn ip_actions_need_matching_family() {
        let v6 = host(IpAddr::V6(Ipv6Addr::LOCALHOST));
        let mut ctx = tcp_packet();
        let before = ctx.headers().clone();
        assert!(!FlowAction::new(Action::SetInetSrc(v6)).apply(&mut ctx));
        assert_eq!(ctx.headers(), &before);
        assert!(ctx.fired().is_empty());
    }

    #[test]
    fn transport_actions_need_matching_header() {
        let port = L4Port::new(8080);
        let mut icmp = icmp_packet();
        assert!(!FlowAction::new(Action::SetTpDst(port)).apply(&mut icmp));
        assert!(FlowAction::new(Action::SetIcmpCode(IcmpCode::new(1))).apply(&mut icmp));
        assert_eq!(icmp.headers().try_icmp().unwrap().code(), IcmpCode::new(1));

        let mut tcp = tcp_packet();
        assert!(!FlowAction::new(Action::SetIcmpType(IcmpType::new(0))).apply(&mut tcp));
        assert!(FlowAction::new(Action::SetTpDst(port)).apply(&mut tcp));
        assert!(FlowAction::new(Action::SetTpSrc(port)).apply(&mut tcp));
        let ports = tcp.headers().try_ports().unwrap();
        assert_eq!(ports.source(), port);
        assert_eq!(ports.destination(), port);

        let mut arp = arp_packet();
        assert!(!FlowAction::new(Action::SetTpSrc(port)).apply(&mut arp));
        assert!(!FlowAction::new(Action::SetIcmpType(IcmpType::new(0))).apply(&mut arp));
    }

    #[test]
    fn actions_apply_in_order() {
        let first = ActionMac::new(Mac([0x00, 0, 0, 0, 0, 1])).unwrap();
        let second = ActionMac::new(Mac([0x00, 0, 0, 0, 0, 2])).unwrap();
        let actions = [
            FlowAction::new(Action::SetTpSrc(L4Port::new(1))),
            ordered(9, Action::SetDlSrc(second)),
            ordered(2, Action::SetDlSrc(first)),
        ];
        let mut ctx = tcp_packet();
        assert_eq!(apply_actions(&actions, &mut ctx), 3);
        assert_eq!(ctx.headers().eth().source(), second.inner());
        let fired: Vec<_> = ctx.fired().iter().map(|a| a.order).collect();
        assert_eq!(
            fired,
            vec![
                Some(ActionOrder::new(2).unwrap()),
                Some(ActionOrder::new(9).unwrap()),
                None
            ]
        );
    }

    #[test]
    fn fired_iff_applied() {
        bolero::check!().with_type().for_each(|action: &FlowAction| {
            for mut ctx in [tcp_packet(), icmp_packet(), arp_packet()] {
                let applied = action.apply(&mut ctx);
                assert_eq!(ctx.fired().contains(action), applied);
            }
        });
    }
}
