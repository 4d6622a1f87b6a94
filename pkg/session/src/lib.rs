//! Durable session record shared by independent coordinator invocations.
//!
//! Setup generates keys, salts, and addresses once; every later invocation
//! re-derives the same identities from this record. The store is an explicit
//! abstraction with shallow-merge-and-overwrite write semantics: fields are
//! only ever added or replaced, never deleted.

mod error;
mod store;

pub use error::{Error, Result};
pub use store::SessionStore;

use primitives::{Address, Element, PartialAddress, PublicKeys};
use serde::{Deserialize, Serialize};

/// The session schema
///
/// Every field is optional; a value is present once the pipeline that
/// produces it has completed. Serialized field names are stable: they are
/// the on-disk schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_secret_key: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_salt: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_secret_key: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_salt: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer_secret_key: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer_salt: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_secret_key: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_salt: Option<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_public_keys: Option<PublicKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_partial_address: Option<PartialAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_contract_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowdfunding_initialization_hash: Option<Element>,
}

macro_rules! merge_fields {
    ($dst:ident, $src:ident, $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $src.$field {
                $dst.$field = Some(value);
            }
        )*
    };
}

impl Session {
    /// Shallow-merge `patch` into `self`: present fields overwrite, absent
    /// fields are left untouched
    pub fn merge(&mut self, patch: Session) {
        merge_fields!(
            self,
            patch,
            donor_secret_key,
            donor_salt,
            donor_address,
            operator_secret_key,
            operator_salt,
            operator_address,
            deployer_secret_key,
            deployer_salt,
            deployer_address,
            token_address,
            crowdfunding_secret_key,
            crowdfunding_salt,
            crowdfunding_public_keys,
            crowdfunding_partial_address,
            crowdfunding_contract_address,
            crowdfunding_initialization_hash,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_overwrites_present_fields_only() {
        let mut session = Session {
            donor_secret_key: Some(Element::new(1)),
            donor_salt: Some(Element::new(2)),
            ..Session::default()
        };

        session.merge(Session {
            donor_secret_key: Some(Element::new(9)),
            token_address: Some(Address::new(Element::new(5))),
            ..Session::default()
        });

        assert_eq!(session.donor_secret_key, Some(Element::new(9)));
        assert_eq!(session.donor_salt, Some(Element::new(2)));
        assert_eq!(session.token_address, Some(Address::new(Element::new(5))));
    }

    #[test]
    fn field_names_are_stable() {
        let session = Session {
            donor_secret_key: Some(Element::new(1)),
            crowdfunding_contract_address: Some(Address::new(Element::new(2))),
            ..Session::default()
        };

        let value = serde_json::to_value(&session).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("donorSecretKey"));
        assert!(object.contains_key("crowdfundingContractAddress"));
        assert_eq!(object.len(), 2);
    }
}
