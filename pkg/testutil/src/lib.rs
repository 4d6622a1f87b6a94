//! In-process test network.
//!
//! A [`MockChain`] models the ledger and executes the token, crowdfunding,
//! account, and fee-payment artifacts just far enough to exercise the
//! coordination protocol: authorization witnesses are checked against the
//! exact delegated call, private notes are only readable through an
//! environment that registered the right account and sender, and reverted
//! transactions are included with their failure reason. Three
//! [`MemoryEnvironment`]s share one chain, each with its own registration
//! set.

mod chain;
mod env;

pub use chain::MockChain;
pub use env::MemoryEnvironment;

use std::sync::Arc;

use pxe::EnvironmentSet;

/// A chain plus one environment per role
pub struct TestNet {
    pub chain: MockChain,
    pub envs: EnvironmentSet,
}

/// Spin up a fresh in-process network
#[must_use]
pub fn testnet() -> TestNet {
    let chain = MockChain::new();

    let donor = Arc::new(MemoryEnvironment::new(chain.clone(), "donor"));
    let operator = Arc::new(MemoryEnvironment::new(chain.clone(), "operator"));
    let deployer = Arc::new(MemoryEnvironment::new(chain.clone(), "deployer"));

    TestNet {
        chain,
        envs: EnvironmentSet::new(donor, operator, deployer),
    }
}
