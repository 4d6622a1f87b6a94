use contracts::{sponsored_fee, CrowdfundingContract};
use primitives::{derive_keys, Address, Element};
use pxe::canonical::{sponsored_fpc, CROWDFUNDING_CONTRACT};
use pxe::{Artifact, ContractInstance, ContractRef, Role};
use session::Session;

use crate::error::required;
use crate::{provision_existing, Coordinator, Result};

/// How far past the current chain time donations stay open.
const DONATION_WINDOW_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub crowdfunding_address: Address,
}

impl Coordinator {
    /// Deploy the crowdfunding contract and register it everywhere it will
    /// be read.
    ///
    /// If the session already records a deployed contract, the on-chain
    /// deployment is skipped and only the (idempotent) registration steps
    /// re-run: a partially-registered contract is recovered by registering
    /// again, never by deploying again.
    #[tracing::instrument(err, skip(self))]
    pub async fn deploy(&self) -> Result<DeployOutcome> {
        let session = self.store.load();
        let deployer = provision_existing(&session, Role::Deployer)?;
        let token_address = required(session.token_address, "tokenAddress")?;
        let operator_address = required(session.operator_address, "operatorAddress")?;

        self.envs.register_contract_everywhere(&sponsored_fpc()).await?;
        let fee = sponsored_fee();

        let deployer_wallet = self.wallet(Role::Deployer, &deployer);
        deployer_wallet.register().await?;

        let (contract_ref, secret_key) = match stored_contract(&session) {
            Some((contract_ref, secret_key)) => {
                tracing::info!(
                    address = %contract_ref.address(),
                    "crowdfunding contract already deployed, re-running registration"
                );
                (contract_ref, secret_key)
            }
            None => {
                let mut rng = rand::thread_rng();

                // The contract decrypts donations as a party in its own
                // right, so it gets a full account-style key set, bound into
                // its address at deployment.
                let secret_key = Element::random(&mut rng);
                let public_keys = derive_keys(secret_key);
                let salt = Element::random(&mut rng);

                // Read from the network the deployment targets: a timestamp
                // from anywhere else could produce a window that has already
                // elapsed.
                let now = self.node.timestamp().await?;
                let deadline = now + DONATION_WINDOW_SECS;

                let (contract_ref, sent) = CrowdfundingContract::deploy_with_public_keys(
                    public_keys,
                    &deployer_wallet,
                    token_address,
                    operator_address,
                    deadline,
                    salt,
                    fee,
                )
                .await?;
                sent.wait().await?;
                tracing::info!(address = %contract_ref.address(), deadline, "crowdfunding contract deployed");

                let now = self.node.timestamp().await?;
                if deadline.saturating_sub(now) < 60 {
                    tracing::warn!(deadline, now, "donation window nearly elapsed at deployment time");
                }

                (contract_ref, secret_key)
            }
        };

        self.envs.register_contract_everywhere(&contract_ref).await?;

        // The operator's environment holds the contract's notes, so the
        // contract's own address goes in as an account there (not just as a
        // contract), along with the deployer as a sender to it.
        let operator_env = self.envs.get(Role::Operator);
        if let Some(partial) = contract_ref.partial_address {
            operator_env.register_account(secret_key, partial).await?;
        }
        operator_env.register_sender(deployer.address).await?;

        let mut patch = Session::default();
        patch.crowdfunding_secret_key = Some(secret_key);
        patch.crowdfunding_salt = Some(contract_ref.instance.salt);
        patch.crowdfunding_public_keys = contract_ref.instance.public_keys;
        patch.crowdfunding_partial_address = contract_ref.partial_address;
        patch.crowdfunding_contract_address = Some(contract_ref.address());
        patch.crowdfunding_initialization_hash = Some(contract_ref.instance.initialization_hash);
        self.store.merge(patch)?;

        self.log_registrations().await?;

        Ok(DeployOutcome {
            crowdfunding_address: contract_ref.address(),
        })
    }
}

/// Rebuild the contract reference recorded by an earlier deployment
fn stored_contract(session: &Session) -> Option<(ContractRef, Element)> {
    let address = session.crowdfunding_contract_address?;
    let secret_key = session.crowdfunding_secret_key?;
    let salt = session.crowdfunding_salt?;
    let partial = session.crowdfunding_partial_address?;
    let initialization_hash = session.crowdfunding_initialization_hash?;
    let public_keys = session.crowdfunding_public_keys?;
    let deployer = session.deployer_address?;

    let artifact = Artifact::named(CROWDFUNDING_CONTRACT);
    let contract_ref = ContractRef {
        instance: ContractInstance {
            address,
            class_id: artifact.class_id,
            salt,
            deployer,
            initialization_hash,
            public_keys: Some(public_keys),
        },
        artifact,
        partial_address: Some(partial),
    };

    Some((contract_ref, secret_key))
}
