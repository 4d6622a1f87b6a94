use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use primitives::{hash_elements, Address, Element};
use pxe::canonical::{
    sponsored_fpc, ACCOUNT_CONTRACT, CROWDFUNDING_CONTRACT, SPONSORED_FPC_CONTRACT, TOKEN_CONTRACT,
};
use pxe::{
    AuthWitness, ContractCall, FeePayment, Node, PublicLog, Result, TxHash, TxPayload, TxReceipt,
    TxRequest, TxStatus,
};

const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
const SECONDS_PER_BLOCK: u64 = 12;

/// The shared in-process ledger
///
/// Cloning yields another handle onto the same chain.
#[derive(Clone)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContractKind {
    Account,
    SponsoredFpc,
    Token { admin: Address },
    Crowdfunding { token: Address, operator: Address, deadline: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Note {
    pub token: Address,
    pub owner: Address,
    pub sender: Address,
    pub amount: u128,
}

/// One decrypted log entry; the recipient/sender pair decides which
/// environments get to see it
#[derive(Debug, Clone)]
pub(crate) struct LogEntry {
    pub recipient: Address,
    pub sender: Address,
    pub payload: Element,
}

#[derive(Debug, Clone)]
pub(crate) struct TxRecord {
    pub block_number: u64,
    pub entries: Vec<LogEntry>,
}

struct ChainState {
    block_number: u64,
    timestamp: u64,
    tx_counter: u64,
    contracts: HashMap<Address, ContractKind>,
    public_balances: HashMap<(Address, Address), u128>,
    total_supply: HashMap<Address, u128>,
    notes: Vec<Note>,
    receipts: HashMap<TxHash, TxReceipt>,
    effects: HashMap<TxHash, TxRecord>,
    public_logs: Vec<PublicLog>,
}

impl MockChain {
    #[must_use]
    pub fn new() -> Self {
        let fpc = sponsored_fpc();
        let mut contracts = HashMap::new();
        contracts.insert(fpc.address(), ContractKind::SponsoredFpc);

        Self {
            state: Arc::new(Mutex::new(ChainState {
                block_number: 1,
                timestamp: GENESIS_TIMESTAMP,
                tx_counter: 0,
                contracts,
                public_balances: HashMap::new(),
                total_supply: HashMap::new(),
                notes: Vec::new(),
                receipts: HashMap::new(),
                effects: HashMap::new(),
                public_logs: Vec::new(),
            })),
        }
    }

    /// Move the chain clock forward without producing blocks
    pub fn advance_time(&self, seconds: u64) {
        self.state.lock().timestamp += seconds;
    }

    pub fn current_block(&self) -> u64 {
        self.state.lock().block_number
    }

    pub fn current_timestamp(&self) -> u64 {
        self.state.lock().timestamp
    }

    /// Execute a transaction and include it in the next block
    ///
    /// Reverted transactions are still included; their state changes are
    /// discarded and the failure reason lands in the receipt.
    pub(crate) fn submit(&self, request: &TxRequest) -> TxHash {
        let mut state = self.state.lock();

        state.tx_counter += 1;
        let tx_hash = TxHash(hash_elements("tx", &[Element::from(state.tx_counter)]));

        let snapshot = (
            state.public_balances.clone(),
            state.total_supply.clone(),
            state.notes.clone(),
            state.public_logs.clone(),
        );

        let outcome = execute(&mut state, request);

        state.block_number += 1;
        state.timestamp += SECONDS_PER_BLOCK;
        let block_number = state.block_number;

        let status = match outcome {
            Ok(entries) => {
                state.effects.insert(
                    tx_hash,
                    TxRecord {
                        block_number,
                        entries,
                    },
                );
                TxStatus::Success
            }
            Err(reason) => {
                (
                    state.public_balances,
                    state.total_supply,
                    state.notes,
                    state.public_logs,
                ) = snapshot;
                state.effects.insert(
                    tx_hash,
                    TxRecord {
                        block_number,
                        entries: Vec::new(),
                    },
                );
                TxStatus::Reverted { reason }
            }
        };

        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number: Some(block_number),
                status,
            },
        );

        tx_hash
    }

    pub(crate) fn receipt(&self, tx_hash: TxHash) -> Option<TxReceipt> {
        self.state.lock().receipts.get(&tx_hash).cloned()
    }

    pub(crate) fn effect(&self, tx_hash: TxHash) -> Option<TxRecord> {
        self.state.lock().effects.get(&tx_hash).cloned()
    }

    pub(crate) fn public_logs_in(&self, from_block: u64, to_block: u64) -> Vec<PublicLog> {
        self.state
            .lock()
            .public_logs
            .iter()
            .filter(|log| log.block_number >= from_block && log.block_number <= to_block)
            .cloned()
            .collect()
    }

    /// Chain-global view call, before any per-environment visibility
    /// filtering
    pub(crate) fn view(
        &self,
        call: &ContractCall,
        visible: impl Fn(&Note) -> bool,
    ) -> Result<Element, String> {
        let state = self.state.lock();

        let kind = state
            .contracts
            .get(&call.contract)
            .ok_or_else(|| "unknown contract".to_owned())?;

        match (kind, call.method.as_str()) {
            (ContractKind::Token { .. }, "balance_of_private") => {
                let owner = Address::from(*arg(call, 0)?);
                let balance: u128 = state
                    .notes
                    .iter()
                    .filter(|note| {
                        note.token == call.contract && note.owner == owner && visible(note)
                    })
                    .map(|note| note.amount)
                    .sum();
                Ok(Element::from(balance))
            }
            (ContractKind::Token { .. }, "total_supply") => Ok(Element::from(
                state
                    .total_supply
                    .get(&call.contract)
                    .copied()
                    .unwrap_or(0),
            )),
            (_, method) => Err(format!("unknown view method: {method}")),
        }
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for MockChain {
    async fn timestamp(&self) -> Result<u64> {
        Ok(self.current_timestamp())
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.current_block())
    }
}

fn arg<'a>(call: &'a ContractCall, index: usize) -> Result<&'a Element, String> {
    call.args
        .get(index)
        .ok_or_else(|| format!("{}: missing argument {index}", call.method))
}

fn as_u128(element: &Element) -> Result<u128, String> {
    u128::try_from(*element).map_err(|_| "amount out of range".to_owned())
}

fn as_u64(element: &Element) -> Result<u64, String> {
    u64::try_from(as_u128(element)?).map_err(|_| "value out of range".to_owned())
}

fn execute(state: &mut ChainState, request: &TxRequest) -> Result<Vec<LogEntry>, String> {
    let FeePayment::Sponsored { fpc } = request.fee;
    if state.contracts.get(&fpc) != Some(&ContractKind::SponsoredFpc) {
        return Err("unknown fee payment contract".to_owned());
    }

    match &request.payload {
        TxPayload::Deploy(deploy) => {
            let instance = deploy.instance();
            if state.contracts.contains_key(&instance.address) {
                return Err("contract already deployed".to_owned());
            }

            let kind = match deploy.artifact.name.as_str() {
                ACCOUNT_CONTRACT => ContractKind::Account,
                SPONSORED_FPC_CONTRACT => ContractKind::SponsoredFpc,
                TOKEN_CONTRACT => {
                    if deploy.init_args.len() != 4 {
                        return Err("token: bad constructor arguments".to_owned());
                    }
                    ContractKind::Token {
                        admin: Address::from(deploy.init_args[0]),
                    }
                }
                CROWDFUNDING_CONTRACT => {
                    if deploy.init_args.len() != 3 {
                        return Err("crowdfunding: bad constructor arguments".to_owned());
                    }
                    let token = Address::from(deploy.init_args[0]);
                    if !matches!(state.contracts.get(&token), Some(ContractKind::Token { .. })) {
                        return Err("crowdfunding: unknown token".to_owned());
                    }
                    ContractKind::Crowdfunding {
                        token,
                        operator: Address::from(deploy.init_args[1]),
                        deadline: as_u64(&deploy.init_args[2])?,
                    }
                }
                other => return Err(format!("unknown artifact: {other}")),
            };

            state.contracts.insert(instance.address, kind);
            Ok(Vec::new())
        }
        TxPayload::Call(call) => {
            let kind = *state
                .contracts
                .get(&call.contract)
                .ok_or_else(|| "unknown contract".to_owned())?;

            match kind {
                ContractKind::Token { admin } => execute_token(state, request, call, admin),
                ContractKind::Crowdfunding {
                    token,
                    operator,
                    deadline,
                } => execute_crowdfunding(state, request, call, token, operator, deadline),
                ContractKind::Account | ContractKind::SponsoredFpc => {
                    Err(format!("unknown method: {}", call.method))
                }
            }
        }
    }
}

fn execute_token(
    state: &mut ChainState,
    request: &TxRequest,
    call: &ContractCall,
    admin: Address,
) -> Result<Vec<LogEntry>, String> {
    let token = call.contract;

    match call.method.as_str() {
        "mint_to_public" => {
            let to = Address::from(*arg(call, 0)?);
            let amount = as_u128(arg(call, 1)?)?;

            if request.origin != admin {
                return Err("caller is not the token admin".to_owned());
            }

            *state.public_balances.entry((token, to)).or_default() += amount;
            *state.total_supply.entry(token).or_default() += amount;

            state.public_logs.push(PublicLog {
                contract: token,
                block_number: state.block_number + 1,
                data: vec![to.inner(), Element::from(amount)],
            });

            Ok(Vec::new())
        }
        "transfer_to_private" => {
            let to = Address::from(*arg(call, 0)?);
            let amount = as_u128(arg(call, 1)?)?;
            let from = request.origin;

            let balance = state.public_balances.entry((token, from)).or_default();
            if *balance < amount {
                return Err("insufficient public balance".to_owned());
            }
            *balance -= amount;

            Ok(vec![add_note(state, token, to, from, amount)])
        }
        "transfer_in_private" => {
            let from = Address::from(*arg(call, 0)?);
            let to = Address::from(*arg(call, 1)?);
            let amount = as_u128(arg(call, 2)?)?;

            private_transfer(state, request, call, request.origin, from, to, amount)
        }
        other => Err(format!("unknown method: {other}")),
    }
}

fn execute_crowdfunding(
    state: &mut ChainState,
    request: &TxRequest,
    call: &ContractCall,
    token: Address,
    operator: Address,
    deadline: u64,
) -> Result<Vec<LogEntry>, String> {
    let contract = call.contract;

    match call.method.as_str() {
        "donate" => {
            let amount = as_u128(arg(call, 0)?)?;

            if state.timestamp > deadline {
                return Err("donation deadline has passed".to_owned());
            }

            // The contract performs the pull itself: the inner private
            // transfer executes with the crowdfunding contract as caller, so
            // the donor's witness must bind to exactly this call.
            let inner = ContractCall::new(
                token,
                "transfer_in_private",
                vec![
                    request.origin.inner(),
                    contract.inner(),
                    Element::from(amount),
                    Element::ZERO,
                ],
            );

            private_transfer(state, request, &inner, contract, request.origin, contract, amount)
        }
        "withdraw" => {
            let amount = as_u128(arg(call, 0)?)?;

            if request.origin != operator {
                return Err("caller is not the operator".to_owned());
            }

            let inner = ContractCall::new(
                token,
                "transfer_in_private",
                vec![
                    contract.inner(),
                    operator.inner(),
                    Element::from(amount),
                    Element::ZERO,
                ],
            );

            // The contract moves its own notes; no witness involved.
            private_transfer(state, request, &inner, contract, contract, operator, amount)
        }
        other => Err(format!("unknown method: {other}")),
    }
}

/// Spend `amount` of `from`'s notes and emit a note to `to`
///
/// When `caller` differs from the note owner, the transaction must carry an
/// authorization witness binding (caller, exact inner call).
fn private_transfer(
    state: &mut ChainState,
    request: &TxRequest,
    inner_call: &ContractCall,
    caller: Address,
    from: Address,
    to: Address,
    amount: u128,
) -> Result<Vec<LogEntry>, String> {
    let token = inner_call.contract;

    if caller != from {
        let expected = AuthWitness::request_hash_for(caller, inner_call);
        let authorized = request
            .auth_witnesses
            .iter()
            .any(|witness| witness.signer == from && witness.request_hash == expected);
        if !authorized {
            return Err("unauthorized: missing or mismatched authorization witness".to_owned());
        }
    }

    let owned: u128 = state
        .notes
        .iter()
        .filter(|note| note.token == token && note.owner == from)
        .map(|note| note.amount)
        .sum();
    if owned < amount {
        return Err("insufficient private balance".to_owned());
    }

    state
        .notes
        .retain(|note| !(note.token == token && note.owner == from));

    let mut entries = vec![add_note(state, token, to, caller, amount)];
    let change = owned - amount;
    if change > 0 {
        entries.push(add_note(state, token, from, from, change));
    }

    Ok(entries)
}

fn add_note(
    state: &mut ChainState,
    token: Address,
    owner: Address,
    sender: Address,
    amount: u128,
) -> LogEntry {
    state.tx_counter += 1;
    let payload = hash_elements(
        "note",
        &[
            token.inner(),
            owner.inner(),
            Element::from(amount),
            Element::from(state.tx_counter),
        ],
    );

    state.notes.push(Note {
        token,
        owner,
        sender,
        amount,
    });

    LogEntry {
        recipient: owner,
        sender,
        payload,
    }
}
