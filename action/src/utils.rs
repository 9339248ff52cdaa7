// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Stateless algorithms over ordered action lists.

use crate::action::{ActionOrder, FlowAction};
use crate::converter::ActionConverter;
use model::flow::{FlowTableAction, WireAction};
use model::vtn::{VtnAction, VtnFlowAction};
use net::eth::mac::Mac;
use net::ip::IpProto;
use net::port_ref::PortRef;
use net::vlan::Vid;
use std::cmp::Ordering;
use tracing::warn;

/// The layer 2 destination of a flow entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct L2Host {
    /// Destination MAC address
    pub mac: Mac,
    /// VLAN of the packet on egress ([`Vid::NONE`] if untagged)
    pub vid: Vid,
    /// Egress port
    pub port: PortRef,
}

fn output_port(port: Option<&str>) -> Option<PortRef> {
    match PortRef::new(port?) {
        Ok(port) => Some(port),
        Err(e) => {
            warn!("Ignoring output action: {e}");
            None
        }
    }
}

/// Get the port of the last output action of the list.
///
/// Earlier output actions are ignored, even when the last one carries an invalid port.
#[must_use]
pub fn effective_output_port(actions: &[FlowTableAction]) -> Option<PortRef> {
    let port = actions.iter().rev().find_map(|action| match &action.action {
        Some(WireAction::Output { port }) => Some(port.as_deref()),
        _ => None,
    })?;
    output_port(port)
}

/// Compute where a packet ends up after the actions of the list, given its destination MAC
/// and VLAN on ingress.
///
/// Returns `None` if the list has no output action, or if the port of the last output action
/// is invalid.
#[must_use]
pub fn destination_host(actions: &[FlowTableAction], mac: Mac, vid: Vid) -> Option<L2Host> {
    let mut mac = mac;
    let mut vid = vid;
    let mut port = None;
    for action in actions.iter().filter_map(|action| action.action.as_ref()) {
        match action {
            WireAction::Output { port: out } => port = output_port(out.as_deref()),
            WireAction::SetDlDst { address: Some(dst) } => mac = *dst,
            WireAction::PopVlan => vid = Vid::NONE,
            WireAction::SetVlanId {
                vlan_id: Some(raw),
            } => match Vid::new(*raw) {
                Ok(new) => vid = new,
                Err(e) => warn!("Ignoring VLAN rewrite: {e}"),
            },
            _ => {}
        }
    }
    Some(L2Host {
        mac,
        vid,
        port: port?,
    })
}

/// Compare configuration actions by order; actions without order sort last.
#[must_use]
pub fn vtn_order_cmp(a: &VtnFlowAction, b: &VtnFlowAction) -> Ordering {
    order_cmp(a.order, b.order)
}

/// Compare flow-table actions by order; actions without order sort last.
#[must_use]
pub fn wire_order_cmp(a: &FlowTableAction, b: &FlowTableAction) -> Ordering {
    order_cmp(a.order, b.order)
}

fn order_cmp<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Convert configuration actions to filter actions, in the order defined by `cmp`.
///
/// Actions which cannot be converted are left out; the orders of the remaining actions are
/// kept as configured.
pub fn to_filter_actions<F>(
    converter: &ActionConverter,
    actions: &[VtnFlowAction],
    cmp: F,
) -> Vec<FlowAction>
where
    F: Fn(&VtnFlowAction, &VtnFlowAction) -> Ordering,
{
    let mut sorted: Vec<_> = actions.iter().collect();
    sorted.sort_by(|a, b| cmp(a, b));
    sorted
        .into_iter()
        .filter_map(|action| match converter.to_filter_action(action) {
            Ok(converted) => Some(converted),
            Err(e) => {
                warn!("Ignoring flow filter action {action:?}: {e}");
                None
            }
        })
        .collect()
}

/// Convert the actions of a flow entry to the configuration model, in the order defined by
/// `cmp`.
///
/// Actions without a configuration form are left out and the remaining ones are renumbered
/// from [`ActionOrder::MIN`]. An empty list converts to a single drop action.
pub fn to_data_plane_actions<F>(
    converter: &ActionConverter,
    actions: &[FlowTableAction],
    cmp: F,
    proto: Option<IpProto>,
) -> Vec<VtnFlowAction>
where
    F: Fn(&FlowTableAction, &FlowTableAction) -> Ordering,
{
    if actions.is_empty() {
        return vec![VtnFlowAction::new(
            ActionOrder::MIN.as_i32(),
            VtnAction::VtnDrop,
        )];
    }
    let mut sorted: Vec<_> = actions.iter().collect();
    sorted.sort_by(|a, b| cmp(a, b));
    let converted = sorted.into_iter().filter_map(|action| {
        match converter.to_flow_action(action, proto) {
            Ok(Some(flow_action)) => {
                let vtn = flow_action.action.to_vtn();
                if vtn.is_none() {
                    warn!("Ignoring flow action without configuration form: {flow_action}");
                }
                vtn
            }
            Ok(None) => {
                if let Some(inner) = &action.action {
                    warn!("Ignoring unsupported flow action: {}", converter.describe(inner));
                }
                None
            }
            Err(e) => {
                warn!("Ignoring flow action {action:?}: {e}");
                None
            }
        }
    });
    (ActionOrder::MIN.as_i32()..)
        .zip(converted)
        .map(|(order, action)| VtnFlowAction::new(order, action))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::Action;
    use net::eth::mac::ActionMac;
    use net::l4::port::L4Port;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn output(order: u32, port: &str) -> FlowTableAction {
        FlowTableAction::new(
            order,
            WireAction::Output {
                port: Some(port.to_string()),
            },
        )
    }

    fn mac(last: u8) -> Mac {
        Mac([0x00, 0x00, 0x5e, 0x00, 0x53, last])
    }

    #[test]
    fn last_output_wins() {
        let actions = vec![
            output(0, "openflow:1:1"),
            FlowTableAction::new(
                1,
                WireAction::SetDlDst {
                    address: Some(mac(1)),
                },
            ),
            output(2, "openflow:1:2"),
        ];
        assert_eq!(
            effective_output_port(&actions),
            Some(PortRef::new("openflow:1:2").unwrap())
        );
        assert_eq!(effective_output_port(&actions[1..2]), None);
        assert_eq!(effective_output_port(&[]), None);
    }

    #[test]
    fn destination_host_follows_rewrites() {
        let actions = vec![
            FlowTableAction::new(
                0,
                WireAction::SetDlDst {
                    address: Some(mac(2)),
                },
            ),
            output(1, "openflow:2:7"),
            FlowTableAction::new(2, WireAction::PopVlan),
        ];
        let host = destination_host(&actions, mac(1), Vid::new(5).unwrap());
        assert_eq!(
            host,
            Some(L2Host {
                mac: mac(2),
                vid: Vid::NONE,
                port: PortRef::new("openflow:2:7").unwrap(),
            })
        );
    }

    #[test]
    fn destination_host_vlan_rewrite() {
        let actions = vec![
            FlowTableAction::new(0, WireAction::PushVlan { ethernet_type: None }),
            FlowTableAction::new(1, WireAction::SetVlanId { vlan_id: Some(30) }),
            FlowTableAction::new(2, WireAction::SetNwTos { tos: Some(4) }),
            output(3, "openflow:1:1"),
        ];
        let host = destination_host(&actions, mac(1), Vid::NONE).unwrap();
        assert_eq!(host.mac, mac(1));
        assert_eq!(host.vid, Vid::new(30).unwrap());
    }

    #[test]
    fn destination_host_needs_output() {
        let actions = vec![FlowTableAction::new(
            0,
            WireAction::SetDlDst {
                address: Some(mac(2)),
            },
        )];
        assert_eq!(destination_host(&actions, mac(1), Vid::NONE), None);
    }

    #[test]
    #[traced_test]
    fn invalid_last_output_hides_earlier_ones() {
        let actions = vec![
            output(0, "openflow:1:1"),
            output(1, ""),
        ];
        assert_eq!(effective_output_port(&actions), None);
        assert_eq!(destination_host(&actions, mac(1), Vid::NONE), None);
        assert!(logs_contain("Ignoring output action"));

        let unset = vec![
            output(0, "openflow:1:1"),
            FlowTableAction::new(1, WireAction::Output { port: None }),
        ];
        assert_eq!(effective_output_port(&unset), None);
        assert_eq!(destination_host(&unset, mac(1), Vid::NONE), None);
    }

    #[test]
    fn last_output_agrees_with_destination_host() {
        bolero::check!()
            .with_type()
            .for_each(|ports: &Vec<Option<u8>>| {
                let actions: Vec<_> = (0u32..)
                    .zip(ports)
                    .map(|(order, port)| match port {
                        Some(p) => output(order, &format!("openflow:1:{p}")),
                        None => output(order, ""),
                    })
                    .collect();
                assert_eq!(
                    destination_host(&actions, mac(1), Vid::NONE).map(|host| host.port),
                    effective_output_port(&actions)
                );
            });
    }

    #[test]
    fn comparators_put_unordered_last() {
        let mut actions = vec![
            FlowTableAction {
                order: None,
                action: Some(WireAction::Drop),
            },
            FlowTableAction::new(7, WireAction::PopVlan),
            FlowTableAction::new(1, WireAction::PopVlan),
        ];
        actions.sort_by(wire_order_cmp);
        let orders: Vec<_> = actions.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![Some(1), Some(7), None]);

        let unordered = VtnFlowAction {
            order: None,
            action: Some(VtnAction::VtnDrop),
        };
        let ordered = VtnFlowAction::new(-3, VtnAction::VtnDrop);
        assert_eq!(vtn_order_cmp(&ordered, &unordered), Ordering::Less);
        assert_eq!(vtn_order_cmp(&unordered, &unordered), Ordering::Equal);
    }

    #[test]
    #[traced_test]
    fn filter_actions_drop_failures_without_renumbering() {
        let converter = ActionConverter::new();
        let actions = vec![
            VtnFlowAction::new(5, VtnAction::VtnSetPortDst { port: Some(80) }),
            VtnFlowAction::new(1, VtnAction::VtnSetVlanPcp { vlan_pcp: Some(9) }),
            VtnFlowAction::new(
                3,
                VtnAction::VtnSetDlSrc {
                    address: Some(mac(9)),
                },
            ),
            VtnFlowAction::new(2, VtnAction::VtnDrop),
        ];
        let converted = to_filter_actions(&converter, &actions, vtn_order_cmp);
        assert_eq!(
            converted,
            vec![
                FlowAction::with_order(
                    ActionOrder::new(3).unwrap(),
                    Action::SetDlSrc(ActionMac::new(mac(9)).unwrap())
                ),
                FlowAction::with_order(
                    ActionOrder::new(5).unwrap(),
                    Action::SetTpDst(L4Port::new(80))
                ),
            ]
        );
        assert!(logs_contain("Ignoring flow filter action"));
    }

    #[test]
    fn filter_actions_from_yaml() {
        let yaml = r#"
- order: 20
  type: vtn-set-inet-dscp
  dscp: 64
- order: 10
  type: vtn-set-inet-src
  address: "10.0.0.1/32"
- order: 15
  type: vtn-set-inet-dst
  address: "10.0.0.0/24"
- type: vtn-set-inet-dscp
  dscp: 46
- order: 30
"#;
        let config: Vec<VtnFlowAction> = serde_yaml_ng::from_str(yaml).unwrap();
        let converted = to_filter_actions(&ActionConverter::new(), &config, vtn_order_cmp);
        let expected = vec![FlowAction::with_order(
            ActionOrder::new(10).unwrap(),
            Action::SetInetSrc("10.0.0.1/32".parse::<ipnet::IpNet>().unwrap().try_into().unwrap()),
        )];
        assert_eq!(converted, expected);
    }

    #[test]
    fn data_plane_actions_of_empty_list() {
        let converter = ActionConverter::new();
        assert_eq!(
            to_data_plane_actions(&converter, &[], wire_order_cmp, None),
            vec![VtnFlowAction::new(0, VtnAction::VtnDrop)]
        );
    }

    #[test]
    #[traced_test]
    fn data_plane_actions_are_renumbered() {
        let converter = ActionConverter::new();
        let actions = vec![
            output(4, "openflow:1:4"),
            FlowTableAction::new(2, WireAction::SetVlanId { vlan_id: Some(5000) }),
            FlowTableAction::new(
                1,
                WireAction::SetDlDst {
                    address: Some(mac(3)),
                },
            ),
            FlowTableAction::new(3, WireAction::SetTpSrc { port: Some(8080) }),
            FlowTableAction::new(0, WireAction::PopVlan),
        ];
        let converted =
            to_data_plane_actions(&converter, &actions, wire_order_cmp, Some(IpProto::TCP));
        assert_eq!(
            converted,
            vec![
                VtnFlowAction::new(0, VtnAction::VtnPopVlan),
                VtnFlowAction::new(
                    1,
                    VtnAction::VtnSetDlDst {
                        address: Some(mac(3)),
                    }
                ),
                VtnFlowAction::new(2, VtnAction::VtnSetPortSrc { port: Some(8080) }),
            ]
        );
        assert!(logs_contain("Ignoring flow action"));
        assert!(logs_contain("output(port=openflow:1:4)"));
    }

    #[test]
    fn data_plane_actions_accept_large_orders() {
        let converter = ActionConverter::new();
        let actions = vec![
            FlowTableAction::new(u32::MAX, WireAction::Drop),
            FlowTableAction::new(0x8000_0000, WireAction::PopVlan),
            FlowTableAction::new(1, WireAction::SetVlanPcp { vlan_pcp: Some(3) }),
        ];
        assert_eq!(
            to_data_plane_actions(&converter, &actions, wire_order_cmp, None),
            vec![
                VtnFlowAction::new(0, VtnAction::VtnSetVlanPcp { vlan_pcp: Some(3) }),
                VtnFlowAction::new(1, VtnAction::VtnPopVlan),
                VtnFlowAction::new(2, VtnAction::VtnDrop),
            ]
        );
        let flow_action = converter
            .to_flow_action(&actions[1], None)
            .unwrap()
            .unwrap();
        assert_eq!(flow_action.order, Some(ActionOrder::MAX));
    }

    #[test]
    fn data_plane_actions_are_dense() {
        let converter = ActionConverter::new();
        bolero::check!()
            .with_type()
            .for_each(|actions: &Vec<FlowAction>| {
                let wire: Vec<_> = actions.iter().map(FlowAction::to_wire).collect();
                let converted =
                    to_data_plane_actions(&converter, &wire, wire_order_cmp, Some(IpProto::UDP));
                for (expected, action) in (0i32..).zip(&converted) {
                    assert_eq!(action.order, Some(expected));
                    assert!(action.action.is_some());
                }
                assert!(converted.len() <= actions.len().max(1));
            });
    }
}
