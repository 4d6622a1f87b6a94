use ethnum::U256;

mod convert;
mod fmt;
mod rand_impls;
mod serde;

/// A 254-bit field scalar
///
/// This type is a wrapper around a [`U256`] restricted to values below
/// [`Element::MODULUS`]. Secret keys, salts, hashes, and log payloads are all
/// `Element`s; no arithmetic beyond equality is needed by this workspace, so
/// none is exposed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Element(pub(crate) U256);

impl Element {
    /// The zero element
    pub const ZERO: Self = Self(U256::ZERO);

    /// The one element
    pub const ONE: Self = Self(U256::ONE);

    /// The scalar field modulus (BN254)
    pub const MODULUS: Self = Self(U256::from_words(
        0x30644e72e131a029b85045b68181585d,
        0x2833e84879b9709143e1f593f0000001,
    ));

    /// Create a new [`Element`] from a u64
    ///
    /// This is largely provided to help type inference in simple cases
    #[inline]
    #[must_use]
    pub fn new(i: u64) -> Self {
        Self(U256::from(i))
    }

    /// Convert this [`Element`] to a hex string
    #[inline]
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.to_be_bytes())
    }

    /// If this element is zero, returns true
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Reduce an arbitrary 256-bit value into the field
    #[inline]
    #[must_use]
    pub fn reduce_from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(bytes) % Self::MODULUS.0)
    }
}

macro_rules! partial_eq_impl {
    ($int:ty) => {
        impl PartialEq<$int> for Element {
            fn eq(&self, other: &$int) -> bool {
                *self == Element::from(*other)
            }
        }
    };
}

partial_eq_impl!(u8);
partial_eq_impl!(u16);
partial_eq_impl!(u32);
partial_eq_impl!(u64);
partial_eq_impl!(u128);

#[cfg(test)]
mod test {
    use super::Element;

    #[test]
    fn syntax_test() {
        let element = Element::new(123);

        assert_eq!(element, 123u64);
        assert_ne!(element, Element::ONE);
        assert_eq!(Element::new(1).to_string(), "1");
        assert_eq!(Element::new(123).to_string(), "7b");
    }

    #[test]
    fn reduction_stays_below_modulus() {
        let max = Element::reduce_from_be_bytes([0xff; 32]);
        assert!(max < Element::MODULUS);
    }
}
