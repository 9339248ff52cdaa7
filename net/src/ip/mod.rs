// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP protocol numbers, host addresses, DSCP, and the IP header view flow actions mutate.

pub mod dscp;
pub mod host;

use crate::ip::dscp::Dscp;
use etherparse::IpNumber;
use std::net::IpAddr;

/// Thin wrapper around [`IpNumber`]: the IP protocol (IPv4) or next header (IPv6) value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpProto(IpNumber);

impl IpProto {
    /// Internet Control Message Protocol
    pub const ICMP: IpProto = IpProto(IpNumber::ICMP);
    /// Transmission Control Protocol
    pub const TCP: IpProto = IpProto(IpNumber::TCP);
    /// User Datagram Protocol
    pub const UDP: IpProto = IpProto(IpNumber::UDP);

    /// Map a raw protocol number to an [`IpProto`]
    #[must_use]
    pub const fn new(raw: u8) -> IpProto {
        IpProto(IpNumber(raw))
    }

    /// Return the [`IpProto`] represented as a `u8`
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0.0
    }
}

impl From<u8> for IpProto {
    fn from(value: u8) -> Self {
        IpProto::new(value)
    }
}

impl From<IpProto> for u8 {
    fn from(value: IpProto) -> Self {
        value.as_u8()
    }
}

impl core::fmt::Display for IpProto {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Error returned when an address of one IP family is written into a header of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("address {0} does not match the IP version of the header")]
pub struct InvalidIpVersion(pub IpAddr);

/// A mutable view of the fields of an IPv4 or IPv6 header which flow actions may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inet {
    source: IpAddr,
    destination: IpAddr,
    dscp: Dscp,
    protocol: IpProto,
}

impl Inet {
    /// Create a new [`Inet`] view.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIpVersion`] if `source` and `destination` belong to different families.
    pub fn new(
        source: IpAddr,
        destination: IpAddr,
        dscp: Dscp,
        protocol: IpProto,
    ) -> Result<Inet, InvalidIpVersion> {
        if source.is_ipv4() != destination.is_ipv4() {
            return Err(InvalidIpVersion(destination));
        }
        Ok(Inet {
            source,
            destination,
            dscp,
            protocol,
        })
    }

    /// Get the source address
    #[must_use]
    pub fn source(&self) -> IpAddr {
        self.source
    }

    /// Get the destination address
    #[must_use]
    pub fn destination(&self) -> IpAddr {
        self.destination
    }

    /// Get the [`Dscp`]
    #[must_use]
    pub fn dscp(&self) -> Dscp {
        self.dscp
    }

    /// Get the transport protocol
    #[must_use]
    pub fn protocol(&self) -> IpProto {
        self.protocol
    }

    /// Returns true if this is an IPv4 header.
    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        self.source.is_ipv4()
    }

    fn same_family(&self, addr: IpAddr) -> Result<(), InvalidIpVersion> {
        if addr.is_ipv4() == self.is_ipv4() {
            Ok(())
        } else {
            Err(InvalidIpVersion(addr))
        }
    }

    /// Set the source address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIpVersion`] (and leaves the header untouched) if `addr` is not of the
    /// same IP family as the header.
    pub fn set_source(&mut self, addr: IpAddr) -> Result<&mut Self, InvalidIpVersion> {
        self.same_family(addr)?;
        self.source = addr;
        Ok(self)
    }

    /// Set the destination address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIpVersion`] (and leaves the header untouched) if `addr` is not of the
    /// same IP family as the header.
    pub fn set_destination(&mut self, addr: IpAddr) -> Result<&mut Self, InvalidIpVersion> {
        self.same_family(addr)?;
        self.destination = addr;
        Ok(self)
    }

    /// Set the [`Dscp`]
    pub fn set_dscp(&mut self, dscp: Dscp) -> &mut Self {
        self.dscp = dscp;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    fn v4(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn protocol_constants() {
        assert_eq!(IpProto::ICMP.as_u8(), 1);
        assert_eq!(IpProto::TCP.as_u8(), 6);
        assert_eq!(IpProto::UDP.as_u8(), 17);
    }

    #[test]
    fn mixed_family_refused() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert!(Inet::new(v4(1), v6, Dscp::MIN, IpProto::TCP).is_err());
        let mut inet = Inet::new(v4(1), v4(2), Dscp::MIN, IpProto::TCP).unwrap();
        assert_eq!(inet.set_source(v6), Err(InvalidIpVersion(v6)));
        assert_eq!(inet.set_destination(v6), Err(InvalidIpVersion(v6)));
        assert_eq!(inet.source(), v4(1));
        assert_eq!(inet.destination(), v4(2));
    }

    #[test]
    fn setters() {
        let mut inet = Inet::new(v4(1), v4(2), Dscp::MIN, IpProto::UDP).unwrap();
        inet.set_source(v4(3)).unwrap();
        inet.set_destination(v4(4)).unwrap().set_dscp(Dscp::new(46).unwrap());
        assert_eq!(inet.source(), v4(3));
        assert_eq!(inet.destination(), v4(4));
        assert_eq!(inet.dscp().as_u8(), 46);
        assert_eq!(inet.protocol(), IpProto::UDP);
    }
}
