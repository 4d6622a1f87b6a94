use serde::{Deserialize, Serialize};

use crate::{hash_elements, Element};

/// The four master public keys derived from an account secret
///
/// Each key is derived by a separate domain so that revealing one does not
/// reveal the others. The set as a whole is bound into the account address
/// via [`hash`](PublicKeys::hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeys {
    pub nullifier_key: Element,
    pub incoming_view_key: Element,
    pub outgoing_view_key: Element,
    pub tagging_key: Element,
}

impl PublicKeys {
    /// Flatten the key set into a single commitment
    #[must_use]
    pub fn hash(&self) -> Element {
        hash_elements(
            "public-keys",
            &[
                self.nullifier_key,
                self.incoming_view_key,
                self.outgoing_view_key,
                self.tagging_key,
            ],
        )
    }
}

/// Derive the full public key set from an account secret key
///
/// Pure function: the same secret always yields the same keys.
#[must_use]
pub fn derive_keys(secret_key: Element) -> PublicKeys {
    PublicKeys {
        nullifier_key: hash_elements("nullifier-key", &[secret_key]),
        incoming_view_key: hash_elements("incoming-view-key", &[secret_key]),
        outgoing_view_key: hash_elements("outgoing-view-key", &[secret_key]),
        tagging_key: hash_elements("tagging-key", &[secret_key]),
    }
}

/// Derive the signing key an account contract authenticates with
#[must_use]
pub fn derive_signing_key(secret_key: Element) -> Element {
    hash_elements("signing-key", &[secret_key])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let secret = Element::new(42);
        assert_eq!(derive_keys(secret), derive_keys(secret));
        assert_eq!(derive_signing_key(secret), derive_signing_key(secret));
    }

    #[test]
    fn keys_are_pairwise_distinct() {
        let keys = derive_keys(Element::new(42));
        let all = [
            keys.nullifier_key,
            keys.incoming_view_key,
            keys.outgoing_view_key,
            keys.tagging_key,
            derive_signing_key(Element::new(42)),
        ];

        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
