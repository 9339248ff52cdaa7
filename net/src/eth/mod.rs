// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet types

pub mod ethtype;
pub mod mac;

use crate::eth::ethtype::EthType;
use crate::eth::mac::{ActionMac, Mac};
use crate::vlan::{Pcp, Vid, VlanTag};
use tracing::trace;

/// A mutable view of an ethernet header and its (single) VLAN tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eth {
    source: Mac,
    destination: Mac,
    ether_type: EthType,
    vlan: Option<VlanTag>,
}

impl Eth {
    /// Create a new untagged [`Eth`] header.
    #[must_use]
    pub fn new(source: Mac, destination: Mac, ether_type: EthType) -> Eth {
        Eth {
            source,
            destination,
            ether_type,
            vlan: None,
        }
    }

    /// Get the source [`Mac`] of the header.
    #[must_use]
    pub fn source(&self) -> Mac {
        self.source
    }

    /// Get the destination [`Mac`] of the header.
    #[must_use]
    pub fn destination(&self) -> Mac {
        self.destination
    }

    /// Get the (inner) ethertype of the header.
    #[must_use]
    pub fn ether_type(&self) -> EthType {
        self.ether_type
    }

    /// Get the VLAN tag, if the frame is tagged.
    #[must_use]
    pub fn vlan(&self) -> Option<&VlanTag> {
        self.vlan.as_ref()
    }

    /// Get the [`Vid`] of the frame ([`Vid::NONE`] if untagged).
    #[must_use]
    pub fn vid(&self) -> Vid {
        self.vlan.map_or(Vid::NONE, |tag| tag.vid)
    }

    /// Get the [`Pcp`] of the frame (the default [`Pcp`] if untagged).
    #[must_use]
    pub fn pcp(&self) -> Pcp {
        self.vlan.map(|tag| tag.pcp).unwrap_or_default()
    }

    /// Set the source [`Mac`] of the header.
    pub fn set_source(&mut self, source: ActionMac) -> &mut Eth {
        self.source = source.inner();
        self
    }

    /// Set the destination [`Mac`] of the header.
    pub fn set_destination(&mut self, destination: ActionMac) -> &mut Eth {
        self.destination = destination.inner();
        self
    }

    /// Set the (inner) ethertype of the header.
    pub fn set_ether_type(&mut self, ether_type: EthType) -> &mut Eth {
        self.ether_type = ether_type;
        self
    }

    /// Set the [`Vid`] of the frame, tagging it with an 802.1Q tag if it was untagged.
    pub fn set_vid(&mut self, vid: Vid) -> &mut Eth {
        self.tag_mut().vid = vid;
        self
    }

    /// Set the [`Pcp`] of the frame, tagging it with an 802.1Q tag if it was untagged.
    pub fn set_pcp(&mut self, pcp: Pcp) -> &mut Eth {
        self.tag_mut().pcp = pcp;
        self
    }

    /// Push a VLAN tag with the given TPID.
    ///
    /// Only a single tag is modelled: if the frame is already tagged, the TPID of the existing
    /// tag is replaced and its [`Vid`] and [`Pcp`] are kept.
    pub fn push_vlan(&mut self, tpid: EthType) -> &mut Eth {
        self.tag_mut().tpid = tpid;
        self
    }

    /// Remove the VLAN tag, returning it (if any).
    pub fn pop_vlan(&mut self) -> Option<VlanTag> {
        let popped = self.vlan.take();
        if popped.is_none() {
            trace!("pop_vlan on untagged frame");
        }
        popped
    }

    fn tag_mut(&mut self) -> &mut VlanTag {
        self.vlan.get_or_insert_with(|| VlanTag::new(Vid::NONE))
    }
}
