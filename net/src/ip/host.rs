// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Host addresses carried by flow actions.

use ipnet::IpNet;
use std::net::IpAddr;

/// An IP address expressed as a prefix which denotes exactly one host.
///
/// Flow actions receive addresses in prefix form (`10.0.0.1/32`); only a prefix length equal to
/// the address width is accepted.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "IpNet", into = "IpNet")]
pub struct InetHost(IpNet);

/// Errors which can occur when mapping an [`IpNet`] to an [`InetHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInetHost {
    /// The prefix covers more than a single address.
    #[error("{0} does not denote a single host")]
    NotHost(IpNet),
}

impl InetHost {
    /// Map an [`IpNet`] to an [`InetHost`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInetHost::NotHost`] if the prefix length is shorter than the address
    /// width.
    pub fn new(net: IpNet) -> Result<InetHost, InvalidInetHost> {
        if net.prefix_len() == net.max_prefix_len() {
            Ok(InetHost(net))
        } else {
            Err(InvalidInetHost::NotHost(net))
        }
    }

    /// Get the host address.
    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.0.addr()
    }

    /// Get the host address in prefix form.
    #[must_use]
    pub fn as_net(&self) -> IpNet {
        self.0
    }
}

impl From<IpAddr> for InetHost {
    fn from(addr: IpAddr) -> Self {
        InetHost(IpNet::from(addr))
    }
}

impl TryFrom<IpNet> for InetHost {
    type Error = InvalidInetHost;

    fn try_from(value: IpNet) -> Result<Self, Self::Error> {
        InetHost::new(value)
    }
}

impl From<InetHost> for IpNet {
    fn from(value: InetHost) -> Self {
        value.0
    }
}

impl core::fmt::Display for InetHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.addr())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::InetHost;
    use bolero::{Driver, TypeGenerator};
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    impl TypeGenerator for InetHost {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            let addr = if driver.produce::<bool>()? {
                IpAddr::V4(Ipv4Addr::from(driver.produce::<[u8; 4]>()?))
            } else {
                IpAddr::V6(Ipv6Addr::from(driver.produce::<[u8; 16]>()?))
            };
            Some(InetHost::from(addr))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{InetHost, InvalidInetHost};
    use ipnet::IpNet;

    #[test]
    fn host_prefixes_accepted() {
        let v4: IpNet = "192.168.10.1/32".parse().unwrap();
        let v6: IpNet = "fd00::1/128".parse().unwrap();
        assert_eq!(InetHost::new(v4).unwrap().addr().to_string(), "192.168.10.1");
        assert_eq!(InetHost::new(v6).unwrap().addr().to_string(), "fd00::1");
    }

    #[test]
    fn network_prefixes_refused() {
        let v4: IpNet = "192.168.10.0/24".parse().unwrap();
        let v6: IpNet = "fd00::/64".parse().unwrap();
        assert_eq!(InetHost::new(v4), Err(InvalidInetHost::NotHost(v4)));
        assert_eq!(InetHost::new(v6), Err(InvalidInetHost::NotHost(v6)));
    }

    #[test]
    fn generated_hosts_round_trip_through_prefix() {
        bolero::check!().with_type().for_each(|host: &InetHost| {
            assert_eq!(InetHost::new(host.as_net()), Ok(*host));
        });
    }
}
