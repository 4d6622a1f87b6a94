use primitives::Element;

use crate::{Error, Result};

/// Encode a short ASCII string (≤ 31 bytes) into a single field element
///
/// Token names and symbols travel as constructor arguments, so they have to
/// fit one field each, left-padded with zeros like the artifacts expect.
pub fn encode_field_string(s: &str) -> Result<Element> {
    let bytes = s.as_bytes();
    if bytes.len() > 31 {
        return Err(Error::StringTooLong(s.to_owned()));
    }

    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(Element::from_be_bytes(padded))
}

/// Convert a simulated return value to a u128 amount
pub fn decode_amount(value: Element) -> Result<u128> {
    u128::try_from(value).map_err(|_| Error::UnexpectedValue(value.to_hex()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_strings_round_trip_distinctly() {
        let dnt = encode_field_string("DNT").unwrap();
        let donation = encode_field_string("DONATION").unwrap();
        assert_ne!(dnt, donation);
    }

    #[test]
    fn overlong_string_is_rejected() {
        let long = "x".repeat(32);
        assert!(matches!(
            encode_field_string(&long),
            Err(Error::StringTooLong(_))
        ));
    }

    #[test]
    fn amounts_decode() {
        assert_eq!(decode_amount(Element::new(977)).unwrap(), 977);
        assert!(decode_amount(Element::MODULUS).is_err());
    }
}
