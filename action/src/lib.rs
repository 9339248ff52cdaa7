// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flow actions: the validated runtime form of a packet header mutation, and the machinery which
//! translates it to and from the configuration and flow-table models.
//!
//! - [`action`]: the closed set of runtime actions ([`Action`], [`FlowAction`]).
//! - [`converter`]: the discriminant-keyed registry translating between the three forms.
//! - [`builder`]: assembly of flow-table action lists.
//! - [`utils`]: stateless algorithms over ordered action lists.
//! - [`packet`]: application of actions to mutable header views.

#![deny(
    unsafe_code,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod builder;
pub mod converter;
pub mod errors;
pub mod packet;
pub mod utils;

pub use action::{Action, ActionKind, ActionOrder, FlowAction};
pub use builder::ActionListBuilder;
pub use converter::ActionConverter;
pub use errors::{ActionError, ActionResult};
pub use packet::{ActionContext, PacketContext, apply_actions};
