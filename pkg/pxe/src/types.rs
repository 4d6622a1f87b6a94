use primitives::{
    compute_address, compute_contract_address, compute_partial_address, hash_bytes, hash_elements,
    Address, Element, PartialAddress, PublicKeys,
};

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Hash identifying a transaction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub Element);

impl Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Debug for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = <Element as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Immutable contract metadata, shared by every instance of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub class_id: Element,
}

impl Artifact {
    /// Look up the artifact for a named contract class
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            class_id: hash_bytes("artifact-class", name.as_bytes()),
        }
    }
}

/// A deployed instance of a contract class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInstance {
    pub address: Address,
    pub class_id: Element,
    pub salt: Element,
    pub deployer: Address,
    pub initialization_hash: Element,
    /// Set for contracts that hold private notes of their own
    pub public_keys: Option<PublicKeys>,
}

/// Everything an environment needs to simulate calls against a contract and
/// decrypt the notes it emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub instance: ContractInstance,
    pub artifact: Artifact,
    pub partial_address: Option<PartialAddress>,
}

impl ContractRef {
    #[must_use]
    pub fn address(&self) -> Address {
        self.instance.address
    }
}

/// The exact call object of an action: contract, method, and arguments
///
/// Authorization witnesses bind to the hash of this value, so two calls that
/// differ in any argument produce different witnesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract: Address,
    pub method: String,
    pub args: Vec<Element>,
}

impl ContractCall {
    #[must_use]
    pub fn new(contract: Address, method: &str, args: Vec<Element>) -> Self {
        Self {
            contract,
            method: method.to_owned(),
            args,
        }
    }

    /// Commitment to the exact action
    #[must_use]
    pub fn hash(&self) -> Element {
        let mut inputs = vec![
            self.contract.inner(),
            hash_bytes("method", self.method.as_bytes()),
        ];
        inputs.extend_from_slice(&self.args);
        hash_elements("contract-call", &inputs)
    }
}

/// A signed delegation allowing `caller` to execute one exact action on the
/// signer's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthWitness {
    pub signer: Address,
    pub request_hash: Element,
    pub signature: Element,
}

impl AuthWitness {
    /// The message an authorization witness signs over: the caller bound to
    /// the exact action hash
    #[must_use]
    pub fn request_hash_for(caller: Address, action: &ContractCall) -> Element {
        hash_elements("authwit", &[caller.inner(), action.hash()])
    }
}

/// How the transaction's fee is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeePayment {
    /// Fee sponsored by a fee-payment contract at the given address
    Sponsored { fpc: Address },
}

/// Request to deploy a new contract instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub artifact: Artifact,
    pub init_args: Vec<Element>,
    pub salt: Element,
    pub deployer: Address,
    /// Present when the contract needs an account-style identity of its own
    pub public_keys: Option<PublicKeys>,
}

impl DeployRequest {
    #[must_use]
    pub fn initialization_hash(&self) -> Element {
        hash_elements("initializer", &self.init_args)
    }

    #[must_use]
    pub fn partial_address(&self) -> PartialAddress {
        compute_partial_address(self.salt, self.initialization_hash(), self.deployer)
    }

    /// Derive the instance this request will deploy
    ///
    /// Deployment addressing is deterministic, so the instance can be
    /// computed before the transaction is sent.
    #[must_use]
    pub fn instance(&self) -> ContractInstance {
        let partial = self.partial_address();
        let address = match &self.public_keys {
            Some(keys) => compute_address(keys, partial),
            None => compute_contract_address(partial),
        };

        ContractInstance {
            address,
            class_id: self.artifact.class_id,
            salt: self.salt,
            deployer: self.deployer,
            initialization_hash: self.initialization_hash(),
            public_keys: self.public_keys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxPayload {
    Call(ContractCall),
    Deploy(DeployRequest),
}

/// A transaction as submitted through an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    /// The account the transaction executes as
    pub origin: Address,
    pub payload: TxPayload,
    pub auth_witnesses: Vec<AuthWitness>,
    pub fee: FeePayment,
}

/// Inclusion state of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    Pending,
    Success,
    Reverted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: TxStatus,
}

/// The decrypted record of state changes a transaction emitted
///
/// Private logs are only populated with entries the queried environment can
/// decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEffect {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub private_logs: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicLog {
    pub contract: Address,
    pub block_number: u64,
    pub data: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub from_block: u64,
    pub to_block: u64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn call_hash_binds_every_argument() {
        let contract = Address::new(Element::new(1));
        let base = ContractCall::new(contract, "transfer", vec![Element::new(10)]);

        let other_amount = ContractCall::new(contract, "transfer", vec![Element::new(11)]);
        let other_method = ContractCall::new(contract, "approve", vec![Element::new(10)]);
        let other_contract =
            ContractCall::new(Address::new(Element::new(2)), "transfer", vec![Element::new(10)]);

        assert_ne!(base.hash(), other_amount.hash());
        assert_ne!(base.hash(), other_method.hash());
        assert_ne!(base.hash(), other_contract.hash());
    }

    #[test]
    fn deploy_request_addressing_is_deterministic() {
        let request = DeployRequest {
            artifact: Artifact::named("Token"),
            init_args: vec![Element::new(1), Element::new(2)],
            salt: Element::new(3),
            deployer: Address::new(Element::new(4)),
            public_keys: None,
        };

        assert_eq!(request.instance(), request.instance());

        let mut other_salt = request.clone();
        other_salt.salt = Element::new(5);
        assert_ne!(request.instance().address, other_salt.instance().address);
    }
}
