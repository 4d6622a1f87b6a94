use contracts::wallet::account_address;
use primitives::{derive_keys, Address, Element, PublicKeys};
use pxe::Role;
use rand::Rng;
use session::Session;

use crate::{Error, Result};

/// A role's key material and the address derived from it
///
/// Created once, persisted, and re-derived identically by every later
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub secret_key: Element,
    pub salt: Element,
    pub address: Address,
    pub public_keys: PublicKeys,
}

impl Identity {
    #[must_use]
    pub fn derive(secret_key: Element, salt: Element) -> Self {
        Self {
            secret_key,
            salt,
            address: account_address(secret_key, salt),
            public_keys: derive_keys(secret_key),
        }
    }

    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::derive(Element::random(rng), Element::random(rng))
    }

    /// The session fields this identity persists under
    #[must_use]
    pub fn session_patch(&self, role: Role) -> Session {
        let mut patch = Session::default();
        match role {
            Role::Donor => {
                patch.donor_secret_key = Some(self.secret_key);
                patch.donor_salt = Some(self.salt);
                patch.donor_address = Some(self.address);
            }
            Role::Operator => {
                patch.operator_secret_key = Some(self.secret_key);
                patch.operator_salt = Some(self.salt);
                patch.operator_address = Some(self.address);
            }
            Role::Deployer => {
                patch.deployer_secret_key = Some(self.secret_key);
                patch.deployer_salt = Some(self.salt);
                patch.deployer_address = Some(self.address);
            }
        }
        patch
    }
}

fn stored(session: &Session, role: Role) -> Option<Identity> {
    let (secret_key, salt) = match role {
        Role::Donor => (session.donor_secret_key, session.donor_salt),
        Role::Operator => (session.operator_secret_key, session.operator_salt),
        Role::Deployer => (session.deployer_secret_key, session.deployer_salt),
    };
    Some(Identity::derive(secret_key?, salt?))
}

/// Provision `role`: reuse the stored identity, or draw a fresh one
pub fn provision<R: Rng + ?Sized>(session: &Session, role: Role, rng: &mut R) -> Identity {
    match stored(session, role) {
        Some(identity) => {
            tracing::info!(role = role.as_str(), address = %identity.address, "reusing stored identity");
            identity
        }
        None => {
            let identity = Identity::random(rng);
            tracing::info!(role = role.as_str(), address = %identity.address, "generated fresh identity");
            identity
        }
    }
}

/// Load `role`'s identity from the session record
///
/// The role is expected to already exist (its address may hold funds), so a
/// missing field is a fatal precondition failure, not a prompt to
/// regenerate.
pub fn provision_existing(session: &Session, role: Role) -> Result<Identity> {
    stored(session, role).ok_or(Error::MissingSessionField {
        field: match role {
            Role::Donor => "donorSecretKey/donorSalt",
            Role::Operator => "operatorSecretKey/operatorSalt",
            Role::Deployer => "deployerSecretKey/deployerSalt",
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn identity_rederives_to_the_same_address() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let identity = Identity::random(&mut rng);

        let again = Identity::derive(identity.secret_key, identity.salt);
        assert_eq!(identity, again);
    }

    #[test]
    fn provision_round_trips_through_the_session() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let session = Session::default();

        let fresh = provision(&session, Role::Donor, &mut rng);

        let mut persisted = Session::default();
        persisted.merge(fresh.session_patch(Role::Donor));

        assert_eq!(provision(&persisted, Role::Donor, &mut rng), fresh);
        assert_eq!(provision_existing(&persisted, Role::Donor).unwrap(), fresh);
    }

    #[test]
    fn missing_identity_is_fatal() {
        let session = Session::default();
        assert!(matches!(
            provision_existing(&session, Role::Operator),
            Err(Error::MissingSessionField { .. })
        ));
    }
}
