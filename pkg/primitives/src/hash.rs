use sha3::{Digest, Keccak256};

use crate::Element;

/// Hash a sequence of elements under a domain-separation tag
///
/// The tag is length-prefixed so that no tag is a prefix of another. The
/// digest is reduced into the field, so the result is always canonical.
#[must_use]
pub fn hash_elements(domain: &str, inputs: &[Element]) -> Element {
    let mut hasher = Keccak256::new();
    hasher.update(domain.len().to_be_bytes());
    hasher.update(domain);
    for input in inputs {
        hasher.update(input.to_be_bytes());
    }
    Element::reduce_from_be_bytes(hasher.finalize().into())
}

/// Hash raw bytes into a field element under a domain-separation tag
#[must_use]
pub fn hash_bytes(domain: &str, bytes: &[u8]) -> Element {
    let mut hasher = Keccak256::new();
    hasher.update(domain.len().to_be_bytes());
    hasher.update(domain);
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
    Element::reduce_from_be_bytes(hasher.finalize().into())
}
