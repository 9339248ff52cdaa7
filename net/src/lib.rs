// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![forbid(unsafe_code)] // Validation logic should always be strictly safe
#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Strictly validated network values used by flow actions, and the mutable header views those
//! actions are applied to.

pub mod eth;
pub mod headers;
pub mod icmp;
pub mod ip;
pub mod l4;
pub mod port_ref;
pub mod vlan;
