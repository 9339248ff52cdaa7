// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Data models exchanged with the collaborators of the flow action engine.
//!
//! Two tagged unions live here:
//!
//! - [`vtn`]: the configuration model an operator uses to define flow filter actions.
//! - [`flow`]: the flow-table model installed into forwarding devices.
//!
//! Both are plain data. Fields are optional the way schema-generated bindings are, so that
//! absent values can be reported precisely when the models are converted.

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

mod entry;
pub mod flow;
pub mod vtn;

pub use flow::{FlowTableAction, Instruction, Instructions, WireAction, WireActionKind};
pub use vtn::{VtnAction, VtnActionKind, VtnFlowAction};
