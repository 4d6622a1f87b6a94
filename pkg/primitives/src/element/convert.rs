use crate::Element;
use ethnum::U256;
use std::str::FromStr;

macro_rules! from_int_impls {
    ($t:ty) => {
        impl From<$t> for Element {
            #[inline]
            fn from(value: $t) -> Self {
                Element(U256::from(value))
            }
        }
    };
}

from_int_impls!(u8);
from_int_impls!(u16);
from_int_impls!(u32);
from_int_impls!(u64);
from_int_impls!(u128);

impl TryFrom<Element> for u128 {
    type Error = core::num::TryFromIntError;

    #[inline]
    fn try_from(value: Element) -> Result<Self, Self::Error> {
        u128::try_from(value.0)
    }
}

impl FromStr for Element {
    type Err = <U256 as FromStr>::Err;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        Ok(Self(U256::from_str_radix(s, 16)?))
    }
}

impl Element {
    /// Convert the [`Element`] to its bytes in big-endian format
    #[inline]
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// Create an [`Element`] from bytes in big-endian format
    ///
    /// The value is taken as-is; use [`Element::reduce_from_be_bytes`] for
    /// values that may exceed the modulus.
    #[inline]
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_string_round_trip() {
        let element = Element::new(0xabcd);
        let parsed: Element = element.to_hex().parse().unwrap();
        assert_eq!(element, parsed);

        let prefixed: Element = "0xabcd".parse().unwrap();
        assert_eq!(prefixed, element);
    }

    #[test]
    fn be_bytes_round_trip() {
        let element = Element::new(u64::MAX);
        assert_eq!(Element::from_be_bytes(element.to_be_bytes()), element);
    }
}
