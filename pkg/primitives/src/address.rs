use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::{hash_elements, Element, PublicKeys};

/// An account or contract address
///
/// Addresses are field elements derived from a [`PartialAddress`] and a
/// [`PublicKeys`] set, so that anyone holding the preimage can prove which
/// keys an address is bound to.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Address(Element);

impl Address {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    #[must_use]
    pub fn inner(&self) -> Element {
        self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = <Element as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Element> for Address {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

/// The deployment-time component of an address
///
/// Combined with a public key set to form the complete address; an
/// environment can register an account from (secret key, partial address)
/// alone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PartialAddress(pub Element);

/// Compute the partial address of a deployment
///
/// Binds the deployment salt, the initialization arguments, and the deployer,
/// so that two deployments with different parameters can never share an
/// address.
#[must_use]
pub fn compute_partial_address(
    salt: Element,
    initialization_hash: Element,
    deployer: Address,
) -> PartialAddress {
    PartialAddress(hash_elements(
        "partial-address",
        &[salt, initialization_hash, deployer.inner()],
    ))
}

/// Complete an address from its public keys and partial address
#[must_use]
pub fn compute_address(public_keys: &PublicKeys, partial: PartialAddress) -> Address {
    Address(hash_elements("address", &[public_keys.hash(), partial.0]))
}

/// Compute the address of a contract deployed without its own key set
///
/// Keyless contracts use the zero key commitment, so their address still has
/// the same shape as an account address.
#[must_use]
pub fn compute_contract_address(partial: PartialAddress) -> Address {
    Address(hash_elements("address", &[Element::ZERO, partial.0]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::derive_keys;

    #[test]
    fn address_derivation_is_deterministic() {
        let secret = Element::new(11);
        let salt = Element::new(22);
        let deployer = Address::new(Element::new(33));

        let derive = || {
            let keys = derive_keys(secret);
            let partial = compute_partial_address(salt, Element::ZERO, deployer);
            compute_address(&keys, partial)
        };

        assert_eq!(derive(), derive());
    }

    #[test]
    fn changing_salt_or_secret_changes_the_address() {
        let deployer = Address::new(Element::new(33));
        let address = |secret: u64, salt: u64| {
            let keys = derive_keys(Element::new(secret));
            let partial = compute_partial_address(Element::new(salt), Element::ZERO, deployer);
            compute_address(&keys, partial)
        };

        assert_ne!(address(1, 2), address(1, 3));
        assert_ne!(address(1, 2), address(2, 2));
    }

    #[test]
    fn hex_round_trip() {
        let address = Address::new(Element::new(77));
        let parsed: Address = address.to_hex().parse().unwrap();
        assert_eq!(address, parsed);
    }
}
