// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `ICMPv4` type and code values, and the header view flow actions mutate.

use core::fmt::Display;

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "bolero"))]
pub use contract::*;

/// Errors which may occur when mapping an integer to an [`IcmpType`] or [`IcmpCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidIcmpValue {
    /// The ICMP type does not fit in 8 bits.
    #[error("invalid ICMP type: {0}")]
    Type(u32),
    /// The ICMP code does not fit in 8 bits.
    #[error("invalid ICMP code: {0}")]
    Code(u32),
}

/// An ICMP message type.
#[repr(transparent)]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct IcmpType(u8);

/// An ICMP message code.
#[repr(transparent)]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct IcmpCode(u8);

impl IcmpType {
    /// Create an [`IcmpType`]
    #[must_use]
    pub const fn new(raw: u8) -> IcmpType {
        IcmpType(raw)
    }

    /// Create an [`IcmpType`] from a wider integer.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIcmpValue::Type`] if `raw` exceeds 255.
    pub fn new_checked(raw: u32) -> Result<IcmpType, InvalidIcmpValue> {
        u8::try_from(raw)
            .map(IcmpType)
            .map_err(|_| InvalidIcmpValue::Type(raw))
    }

    /// Get the raw value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl IcmpCode {
    /// Create an [`IcmpCode`]
    #[must_use]
    pub const fn new(raw: u8) -> IcmpCode {
        IcmpCode(raw)
    }

    /// Create an [`IcmpCode`] from a wider integer.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIcmpValue::Code`] if `raw` exceeds 255.
    pub fn new_checked(raw: u32) -> Result<IcmpCode, InvalidIcmpValue> {
        u8::try_from(raw)
            .map(IcmpCode)
            .map_err(|_| InvalidIcmpValue::Code(raw))
    }

    /// Get the raw value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl Display for IcmpType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for IcmpCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutable view of the type and code fields of an `ICMPv4` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmp {
    icmp_type: IcmpType,
    code: IcmpCode,
}

impl Icmp {
    /// Create a new [`Icmp`] view
    #[must_use]
    pub const fn new(icmp_type: IcmpType, code: IcmpCode) -> Icmp {
        Icmp { icmp_type, code }
    }

    /// Get the ICMP type
    #[must_use]
    pub const fn icmp_type(&self) -> IcmpType {
        self.icmp_type
    }

    /// Get the ICMP code
    #[must_use]
    pub const fn code(&self) -> IcmpCode {
        self.code
    }

    /// Set the ICMP type
    pub fn set_icmp_type(&mut self, icmp_type: IcmpType) -> &mut Self {
        self.icmp_type = icmp_type;
        self
    }

    /// Set the ICMP code
    pub fn set_code(&mut self, code: IcmpCode) -> &mut Self {
        self.code = code;
        self
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::{IcmpCode, IcmpType};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for IcmpType {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(IcmpType(driver.produce()?))
        }
    }

    impl TypeGenerator for IcmpCode {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(IcmpCode(driver.produce()?))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn icmp_values_are_eight_bits() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|raw: u32| {
                match IcmpType::new_checked(raw) {
                    Ok(t) => assert_eq!(u32::from(t.as_u8()), raw),
                    Err(e) => {
                        assert!(raw > 255);
                        assert_eq!(e, InvalidIcmpValue::Type(raw));
                    }
                }
                match IcmpCode::new_checked(raw) {
                    Ok(c) => assert_eq!(u32::from(c.as_u8()), raw),
                    Err(e) => {
                        assert!(raw > 255);
                        assert_eq!(e, InvalidIcmpValue::Code(raw));
                    }
                }
            });
    }

    #[test]
    fn icmp_header_setters() {
        let mut icmp = Icmp::new(IcmpType::new(8), IcmpCode::new(0));
        icmp.set_icmp_type(IcmpType::new(0)).set_code(IcmpCode::new(3));
        assert_eq!(icmp.icmp_type(), IcmpType::new(0));
        assert_eq!(icmp.code(), IcmpCode::new(3));
    }
}
