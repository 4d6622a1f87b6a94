use primitives::Address;
use pxe::{AuthWitness, ContractCall};

use crate::Wallet;

/// Create an authorization witness for a delegated token movement
///
/// `action` must be the exact call object that will be sent: same contract
/// address, method, and arguments. A witness over a different amount or
/// recipient is rejected by the contract logic at execution time, not
/// locally, so the only correct order is: build the call, authorize it, then
/// send.
#[must_use]
pub fn authorize(signer: &Wallet, caller: Address, action: &ContractCall) -> AuthWitness {
    signer.create_auth_wit(caller, action)
}
