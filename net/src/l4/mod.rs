// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Transport header views with source and destination ports (TCP and UDP).

pub mod port;

use crate::l4::port::L4Port;

/// A mutable view of the port fields of a TCP or UDP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
    source: L4Port,
    destination: L4Port,
}

impl Ports {
    /// Create a new [`Ports`] view.
    #[must_use]
    pub const fn new(source: L4Port, destination: L4Port) -> Ports {
        Ports {
            source,
            destination,
        }
    }

    /// Get the source port
    #[must_use]
    pub const fn source(&self) -> L4Port {
        self.source
    }

    /// Get the destination port
    #[must_use]
    pub const fn destination(&self) -> L4Port {
        self.destination
    }

    /// Set the source port
    pub fn set_source(&mut self, port: L4Port) -> &mut Self {
        self.source = port;
        self
    }

    /// Set the destination port
    pub fn set_destination(&mut self, port: L4Port) -> &mut Self {
        self.destination = port;
        self
    }
}
