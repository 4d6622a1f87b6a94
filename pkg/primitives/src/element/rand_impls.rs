use crate::Element;
use ethnum::U256;
use rand::Rng;

impl Element {
    /// Draw a uniformly random field element
    ///
    /// Samples 256 bits and rejects values at or above the modulus, so the
    /// result is canonical.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            // Clearing the top two bits makes the accept rate ~76%
            bytes[0] &= 0x3f;

            let candidate = Self(U256::from_be_bytes(bytes));
            if candidate < Self::MODULUS {
                return candidate;
            }
        }
    }
}
