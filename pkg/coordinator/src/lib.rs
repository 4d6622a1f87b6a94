//! Cross-environment choreography for the crowdfunding flow.
//!
//! Four pipelines, each a fixed ordered sequence ending in send, wait for
//! inclusion, and effect inspection:
//!
//! - **setup** provisions the three party identities, deploys their
//!   accounts, deploys the token, and splits the minted supply into private
//!   balances;
//! - **deploy** deploys the crowdfunding contract with its own key set and
//!   registers it everywhere it will be read;
//! - **donate** moves private tokens from the donor into the contract under
//!   an authorization witness;
//! - **withdraw** pays the operator out of the contract's private balance.
//!
//! A step failure aborts the remainder of its pipeline. Sends are never
//! resubmitted automatically: a failed-but-included transaction would move
//! funds twice, so recovery starts with inspecting the transaction hash.

mod deploy;
mod donate;
mod error;
mod provision;
mod setup;
mod withdraw;

pub use deploy::DeployOutcome;
pub use donate::DonateOutcome;
pub use error::{Error, Result};
pub use provision::{provision, provision_existing, Identity};
pub use setup::SetupOutcome;
pub use withdraw::WithdrawOutcome;

use std::sync::Arc;

use pxe::{EnvironmentSet, Node, Role};
use session::SessionStore;

/// Amount minted to the deployer during setup, split evenly between donor
/// and operator.
pub const MINT_AMOUNT: u128 = 2000;

/// One coordinator per invocation: the named environments, the node the
/// deployment targets, and the session store shared across invocations.
pub struct Coordinator {
    envs: EnvironmentSet,
    node: Arc<dyn Node>,
    store: SessionStore,
}

impl Coordinator {
    #[must_use]
    pub fn new(envs: EnvironmentSet, node: Arc<dyn Node>, store: SessionStore) -> Self {
        Self { envs, node, store }
    }

    pub fn envs(&self) -> &EnvironmentSet {
        &self.envs
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Log every environment's registration sets
    pub(crate) async fn log_registrations(&self) -> Result<()> {
        for (role, env) in self.envs.iter() {
            let accounts = env.registered_accounts().await?;
            let contracts = env.contracts().await?;
            tracing::info!(
                role = role.as_str(),
                ?accounts,
                ?contracts,
                "environment registrations"
            );
        }
        Ok(())
    }

    pub(crate) fn wallet(&self, role: Role, identity: &Identity) -> contracts::Wallet {
        contracts::Wallet::new(
            Arc::clone(self.envs.get(role)),
            identity.secret_key,
            identity.salt,
        )
    }
}
