use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use primitives::{compute_address, derive_keys, Address, Element, PartialAddress};
use pxe::{
    ContractCall, ContractRef, Environment, Error, LogFilter, PublicLog, Result, TxEffect, TxHash,
    TxPayload, TxReceipt, TxRequest,
};

use crate::chain::{MockChain, Note};

#[derive(Default)]
struct Registrations {
    accounts: HashSet<Address>,
    contracts: HashSet<Address>,
    senders: HashSet<Address>,
}

impl Registrations {
    /// Whether this environment can decrypt a note: the owner must be
    /// registered as an account, and the sender must be discoverable (a
    /// registered sender, a registered account, or the owner itself).
    fn can_see(&self, note_owner: Address, note_sender: Address) -> bool {
        self.accounts.contains(&note_owner)
            && (note_sender == note_owner
                || self.senders.contains(&note_sender)
                || self.accounts.contains(&note_sender))
    }
}

/// An environment backed by the in-process [`MockChain`]
///
/// Registration state is local to this environment; the chain itself is
/// shared. Queries only reveal what this environment's registration set
/// allows it to decrypt.
pub struct MemoryEnvironment {
    chain: MockChain,
    name: &'static str,
    regs: Mutex<Registrations>,
}

impl MemoryEnvironment {
    #[must_use]
    pub fn new(chain: MockChain, name: &'static str) -> Self {
        Self {
            chain,
            name,
            regs: Mutex::new(Registrations::default()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[async_trait]
impl Environment for MemoryEnvironment {
    async fn register_account(
        &self,
        secret_key: Element,
        partial_address: PartialAddress,
    ) -> Result<Address> {
        let address = compute_address(&derive_keys(secret_key), partial_address);
        self.regs.lock().accounts.insert(address);
        Ok(address)
    }

    async fn register_contract(&self, contract: &ContractRef) -> Result<()> {
        self.regs.lock().contracts.insert(contract.address());
        Ok(())
    }

    async fn register_sender(&self, address: Address) -> Result<()> {
        self.regs.lock().senders.insert(address);
        Ok(())
    }

    async fn registered_accounts(&self) -> Result<Vec<Address>> {
        let mut accounts: Vec<_> = self.regs.lock().accounts.iter().copied().collect();
        accounts.sort();
        Ok(accounts)
    }

    async fn contracts(&self) -> Result<Vec<Address>> {
        let mut contracts: Vec<_> = self.regs.lock().contracts.iter().copied().collect();
        contracts.sort();
        Ok(contracts)
    }

    async fn senders(&self) -> Result<Vec<Address>> {
        let mut senders: Vec<_> = self.regs.lock().senders.iter().copied().collect();
        senders.sort();
        Ok(senders)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.chain.current_block())
    }

    async fn simulate(&self, call: &ContractCall, from: Address) -> Result<Element> {
        let regs = self.regs.lock();
        if !regs.contracts.contains(&call.contract) {
            return Err(Error::ContractNotRegistered(call.contract));
        }
        if !regs.accounts.contains(&from) {
            return Err(Error::AccountNotRegistered(from));
        }

        let visible = |note: &Note| regs.can_see(note.owner, note.sender);
        self.chain.view(call, visible).map_err(Error::Execution)
    }

    async fn send(&self, request: TxRequest) -> Result<TxHash> {
        {
            let regs = self.regs.lock();
            if !regs.accounts.contains(&request.origin) {
                return Err(Error::AccountNotRegistered(request.origin));
            }
            if let TxPayload::Call(call) = &request.payload {
                // Simulating the call locally requires the artifact, so the
                // contract must be registered here before any send.
                if !regs.contracts.contains(&call.contract) {
                    return Err(Error::ContractNotRegistered(call.contract));
                }
            }
        }

        Ok(self.chain.submit(&request))
    }

    async fn tx_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        Ok(self.chain.receipt(tx_hash))
    }

    async fn tx_effect(&self, tx_hash: TxHash) -> Result<Option<TxEffect>> {
        let Some(record) = self.chain.effect(tx_hash) else {
            return Ok(None);
        };

        let regs = self.regs.lock();
        let private_logs = record
            .entries
            .iter()
            .filter(|entry| regs.can_see(entry.recipient, entry.sender))
            .map(|entry| entry.payload)
            .collect();

        Ok(Some(TxEffect {
            tx_hash,
            block_number: record.block_number,
            private_logs,
        }))
    }

    async fn public_logs(&self, filter: LogFilter) -> Result<Vec<PublicLog>> {
        Ok(self.chain.public_logs_in(filter.from_block, filter.to_block))
    }
}
