use crate::Element;
use ethnum::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::serde::serialize(self.0.to_be_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let vec = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        let bytes =
            <[u8; 32]>::try_from(vec).map_err(|_| serde::de::Error::custom("invalid length"))?;
        Ok(Self(U256::from_be_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use crate::Element;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Example {
        element: Element,
    }

    #[test]
    fn element_serialize_bijection() {
        let example = Example {
            element: Element::new(0xdead_beef),
        };

        let value = serde_json::to_value(&example).unwrap();
        let example_again: Example = serde_json::from_value(value).unwrap();

        assert_eq!(example, example_again);
    }

    #[test]
    fn element_serializes_as_hex_string() {
        let value = serde_json::to_value(Element::ONE).unwrap();
        let s = value.as_str().unwrap();
        assert_eq!(s.len(), 64);
        assert!(s.ends_with('1'));
    }
}
