use primitives::{Address, Element, PublicKeys};
use pxe::{
    canonical::CROWDFUNDING_CONTRACT, Artifact, AuthWitness, ContractCall, ContractRef,
    DeployRequest, FeePayment,
};

use crate::{pending::SentTx, Result, Wallet};

/// Handle over a deployed crowdfunding contract
#[derive(Debug, Clone)]
pub struct CrowdfundingContract {
    address: Address,
    wallet: Wallet,
}

impl CrowdfundingContract {
    pub fn at(address: Address, wallet: Wallet) -> Self {
        Self { address, wallet }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Deploy a crowdfunding instance bound to its own key set
    ///
    /// The contract receives private donations, so it needs an account-style
    /// identity: the public keys passed here are folded into the deployed
    /// address, and the matching secret key must later be registered as an
    /// account in the environment that reads the contract's notes.
    #[tracing::instrument(err, skip(public_keys, deployer, fee, salt), fields(token = %token, operator = %operator))]
    pub async fn deploy_with_public_keys(
        public_keys: PublicKeys,
        deployer: &Wallet,
        token: Address,
        operator: Address,
        deadline: u64,
        salt: Element,
        fee: FeePayment,
    ) -> Result<(ContractRef, SentTx)> {
        let request = DeployRequest {
            artifact: Artifact::named(CROWDFUNDING_CONTRACT),
            init_args: vec![token.inner(), operator.inner(), Element::from(deadline)],
            salt,
            deployer: deployer.address(),
            public_keys: Some(public_keys),
        };

        let contract = ContractRef {
            partial_address: Some(request.partial_address()),
            instance: request.instance(),
            artifact: request.artifact.clone(),
        };

        let sent = deployer.send_deploy(request, fee).await?;
        Ok((contract, sent))
    }

    /// Donate `amount` of the campaign token
    ///
    /// The attached witnesses must include the donor's authorization for
    /// this contract to move `amount` of their private tokens; without it
    /// the inner transfer is rejected at execution time.
    #[tracing::instrument(err, skip(self, auth_witnesses, fee))]
    pub async fn donate(
        &self,
        amount: u128,
        auth_witnesses: Vec<AuthWitness>,
        fee: FeePayment,
    ) -> Result<SentTx> {
        let call = ContractCall::new(self.address, "donate", vec![Element::from(amount)]);
        self.wallet.send(call, auth_witnesses, fee).await
    }

    /// Withdraw `amount` to the operator
    ///
    /// No witness: the operator is the contract's privileged caller by
    /// construction.
    #[tracing::instrument(err, skip(self, fee))]
    pub async fn withdraw(&self, amount: u128, fee: FeePayment) -> Result<SentTx> {
        let call = ContractCall::new(self.address, "withdraw", vec![Element::from(amount)]);
        self.wallet.send(call, Vec::new(), fee).await
    }
}
