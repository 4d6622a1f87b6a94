use async_trait::async_trait;
use primitives::{Address, Element, PartialAddress};

use crate::{
    ContractCall, ContractRef, LogFilter, PublicLog, Result, TxEffect, TxHash, TxReceipt,
    TxRequest,
};

/// A private-execution environment
///
/// An environment holds decryption keys and simulates/submits transactions
/// on behalf of its registered accounts. Every operation is remote and may
/// fail if the environment is unreachable.
///
/// Registration calls are idempotent: registering a subject that is already
/// registered is a no-op, never an error. An environment can only decrypt
/// private notes addressed to an account registered *as an account* (not
/// merely as a sender), and only observes a counterparty's outgoing notes if
/// that counterparty is registered as a sender.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Register an account from its secret key and partial address, returning
    /// the completed address
    async fn register_account(
        &self,
        secret_key: Element,
        partial_address: PartialAddress,
    ) -> Result<Address>;

    /// Register a contract instance together with its artifact
    ///
    /// Must be called in every environment that will later simulate a call
    /// against the contract or decrypt notes it emits.
    async fn register_contract(&self, contract: &ContractRef) -> Result<()>;

    /// Register a counterparty whose outgoing notes this environment should
    /// attempt to decrypt
    async fn register_sender(&self, address: Address) -> Result<()>;

    async fn registered_accounts(&self) -> Result<Vec<Address>>;

    async fn contracts(&self) -> Result<Vec<Address>>;

    async fn senders(&self) -> Result<Vec<Address>>;

    async fn block_number(&self) -> Result<u64>;

    /// Simulate a view call as `from`, returning its single return value
    async fn simulate(&self, call: &ContractCall, from: Address) -> Result<Element>;

    /// Prove and submit a transaction, returning its hash
    ///
    /// Submission does not imply inclusion; poll [`tx_receipt`] to observe
    /// the transaction's actual state.
    ///
    /// [`tx_receipt`]: Environment::tx_receipt
    async fn send(&self, request: TxRequest) -> Result<TxHash>;

    /// Inclusion state of a submitted transaction, `None` if unknown
    async fn tx_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>>;

    /// The decrypted effects of an included transaction
    async fn tx_effect(&self, tx_hash: TxHash) -> Result<Option<TxEffect>>;

    async fn public_logs(&self, filter: LogFilter) -> Result<Vec<PublicLog>>;
}
