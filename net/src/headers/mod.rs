// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Definition of [`Headers`]: the parsed, mutable header views of a packet, and the accessor
//! traits through which flow actions reach them.

#![allow(missing_docs)]

use crate::eth::Eth;
use crate::icmp::Icmp;
use crate::ip::Inet;
use crate::l4::Ports;
use derive_builder::Builder;

/// The transport header of a packet, as far as flow actions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// TCP or UDP
    Ports(Ports),
    /// `ICMPv4`
    Icmp(Icmp),
}

impl From<Ports> for Transport {
    fn from(value: Ports) -> Self {
        Transport::Ports(value)
    }
}

impl From<Icmp> for Transport {
    fn from(value: Icmp) -> Self {
        Transport::Icmp(value)
    }
}

/// The header views of a packet.
///
/// The ethernet header is always present; IP and transport headers are optional.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Headers {
    eth: Eth,
    #[builder(default, setter(strip_option))]
    inet: Option<Inet>,
    #[builder(default, setter(into, strip_option))]
    transport: Option<Transport>,
}

impl Headers {
    /// Create [`Headers`] holding only an ethernet header.
    #[must_use]
    pub fn new(eth: Eth) -> Headers {
        Headers {
            eth,
            inet: None,
            transport: None,
        }
    }
}

// Eth traits

/// Access to the ethernet header, which is always present.
pub trait WithEth {
    fn eth(&self) -> &Eth;
}

/// Mutable access to the ethernet header, which is always present.
pub trait WithEthMut {
    fn eth_mut(&mut self) -> &mut Eth;
}

impl WithEth for Headers {
    fn eth(&self) -> &Eth {
        &self.eth
    }
}

impl WithEthMut for Headers {
    fn eth_mut(&mut self) -> &mut Eth {
        &mut self.eth
    }
}

// IP traits

/// Access to the IP header, if any.
pub trait TryInet {
    fn try_inet(&self) -> Option<&Inet>;
}

/// Mutable access to the IP header, if any.
pub trait TryInetMut {
    fn try_inet_mut(&mut self) -> Option<&mut Inet>;
}

impl TryInet for Headers {
    fn try_inet(&self) -> Option<&Inet> {
        self.inet.as_ref()
    }
}

impl TryInetMut for Headers {
    fn try_inet_mut(&mut self) -> Option<&mut Inet> {
        self.inet.as_mut()
    }
}

// TCP / UDP traits

/// Access to the TCP / UDP ports, if the packet has them.
pub trait TryPorts {
    fn try_ports(&self) -> Option<&Ports>;
}

/// Mutable access to the TCP / UDP ports, if the packet has them.
pub trait TryPortsMut {
    fn try_ports_mut(&mut self) -> Option<&mut Ports>;
}

impl TryPorts for Headers {
    fn try_ports(&self) -> Option<&Ports> {
        match &self.transport {
            Some(Transport::Ports(ports)) => Some(ports),
            _ => None,
        }
    }
}

impl TryPortsMut for Headers {
    fn try_ports_mut(&mut self) -> Option<&mut Ports> {
        match &mut self.transport {
            Some(Transport::Ports(ports)) => Some(ports),
            _ => None,
        }
    }
}

// ICMP traits

/// Access to the ICMP header, if any.
pub trait TryIcmp {
    fn try_icmp(&self) -> Option<&Icmp>;
}

/// Mutable access to the ICMP header, if any.
pub trait TryIcmpMut {
    fn try_icmp_mut(&mut self) -> Option<&mut Icmp>;
}

impl TryIcmp for Headers {
    fn try_icmp(&self) -> Option<&Icmp> {
        match &self.transport {
            Some(Transport::Icmp(icmp)) => Some(icmp),
            _ => None,
        }
    }
}

impl TryIcmpMut for Headers {
    fn try_icmp_mut(&mut self) -> Option<&mut Icmp> {
        match &mut self.transport {
            Some(Transport::Icmp(icmp)) => Some(icmp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eth::ethtype::EthType;
    use crate::eth::mac::Mac;
    use crate::icmp::{IcmpCode, IcmpType};
    use crate::ip::IpProto;
    use crate::ip::dscp::Dscp;
    use crate::l4::port::L4Port;
    use std::net::{IpAddr, Ipv4Addr};

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

    #[test]
    fn builder_requires_eth() {
        assert!(HeadersBuilder::default().build().is_err());
        let headers = HeadersBuilder::default().eth(eth()).build().unwrap();
        assert_eq!(headers, Headers::new(eth()));
        assert!(headers.try_inet().is_none());
        assert!(headers.try_ports().is_none());
        assert!(headers.try_icmp().is_none());
    }

    #[test]
    fn tcp_headers_expose_ports_only() {
        let mut headers = HeadersBuilder::default()
            .eth(eth())
            .inet(inet(IpProto::TCP))
            .transport(Ports::new(L4Port::new(1024), L4Port::new(80)))
            .build()
            .unwrap();
        assert!(headers.try_inet_mut().is_some());
        assert!(headers.try_icmp_mut().is_none());
        headers
            .try_ports_mut()
            .unwrap()
            .set_destination(L4Port::new(8080));
        assert_eq!(headers.try_ports().unwrap().destination(), L4Port::new(8080));
    }

    #[test]
    fn icmp_headers_expose_icmp_only() {
        let headers = HeadersBuilder::default()
            .eth(eth())
            .inet(inet(IpProto::ICMP))
            .transport(Icmp::new(IcmpType::new(8), IcmpCode::new(0)))
            .build()
            .unwrap();
        assert!(headers.try_ports().is_none());
        assert_eq!(headers.try_icmp().unwrap().icmp_type(), IcmpType::new(8));
    }
}
