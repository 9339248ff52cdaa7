// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Assembly of the action list of a flow entry.

use crate::action::{Action, ActionOrder};
use model::flow::{FlowTableAction, Instruction, Instructions};
use net::eth::ethtype::EthType;
use net::port_ref::PortRef;
use net::vlan::Vid;
use tracing::trace;

/// Accumulates [`Action`]s and renders them as the action list of a flow entry.
///
/// The builder keeps actions in insertion order. Callers which add an output action are
/// responsible for adding it last.
#[derive(Debug, Clone, Default)]
pub struct ActionListBuilder {
    actions: Vec<Action>,
}

impl ActionListBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> ActionListBuilder {
        ActionListBuilder::default()
    }

    /// Append an output action.
    pub fn add_output(&mut self, port: PortRef) -> &mut Self {
        self.actions.push(Action::Output(port));
        self
    }

    /// Append a single action.
    pub fn add_action(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// Append actions, preserving their order.
    pub fn add_all<I, A>(&mut self, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    /// Append the actions which rewrite the VLAN of a packet from `in_vid` to `out_vid`.
    ///
    /// [`Vid::NONE`] means untagged.
    pub fn add_vlan_rewrite(&mut self, in_vid: Vid, out_vid: Vid) -> &mut Self {
        if in_vid == out_vid {
            return self;
        }
        if out_vid.is_none() {
            self.actions.push(Action::PopVlan);
        } else {
            if in_vid.is_none() {
                self.actions.push(Action::PushVlan(EthType::VLAN));
            }
            self.actions.push(Action::SetVlanId(out_vid));
        }
        trace!("VLAN rewrite {in_vid} -> {out_vid}");
        self
    }

    /// Number of accumulated actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no action was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Render the flow-table action list, numbered from [`ActionOrder::MIN`].
    ///
    /// An empty builder renders as a single drop action.
    #[must_use]
    pub fn to_wire_actions(&self) -> Vec<FlowTableAction> {
        if self.actions.is_empty() {
            return vec![FlowTableAction::new(
                ActionOrder::MIN.as_u32(),
                Action::Drop.to_wire(),
            )];
        }
        (ActionOrder::MIN.as_u32()..)
            .zip(&self.actions)
            .map(|(order, action)| FlowTableAction::new(order, action.to_wire()))
            .collect()
    }

    /// Render the instructions of a flow entry: a single apply-actions instruction.
    #[must_use]
    pub fn to_instructions(&self) -> Instructions {
        Instructions(vec![Instruction::ApplyActions {
            order: 0,
            actions: self.to_wire_actions(),
        }])
    }
}
