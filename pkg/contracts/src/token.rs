use primitives::{Address, Element};
use pxe::{canonical::TOKEN_CONTRACT, Artifact, ContractCall, ContractRef, DeployRequest, FeePayment};

use crate::util::{decode_amount, encode_field_string};
use crate::{pending::SentTx, Result, Wallet};

/// Constructor parameters of the token contract
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub admin: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Handle over a deployed token contract
///
/// Calls execute as the bound wallet; use [`with_wallet`](Self::with_wallet)
/// to view the same instance as another party.
#[derive(Debug, Clone)]
pub struct TokenContract {
    address: Address,
    wallet: Wallet,
}

impl TokenContract {
    pub fn at(address: Address, wallet: Wallet) -> Self {
        Self { address, wallet }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn with_wallet(&self, wallet: Wallet) -> Self {
        Self {
            address: self.address,
            wallet,
        }
    }

    /// Deploy a new token instance
    #[tracing::instrument(err, skip(deployer, fee, salt), fields(admin = %params.admin))]
    pub async fn deploy(
        deployer: &Wallet,
        params: TokenParams,
        salt: Element,
        fee: FeePayment,
    ) -> Result<(ContractRef, SentTx)> {
        let request = DeployRequest {
            artifact: Artifact::named(TOKEN_CONTRACT),
            init_args: vec![
                params.admin.inner(),
                encode_field_string(&params.name)?,
                encode_field_string(&params.symbol)?,
                Element::from(params.decimals),
            ],
            salt,
            deployer: deployer.address(),
            public_keys: None,
        };

        let contract = ContractRef {
            partial_address: Some(request.partial_address()),
            instance: request.instance(),
            artifact: request.artifact.clone(),
        };

        let sent = deployer.send_deploy(request, fee).await?;
        Ok((contract, sent))
    }

    #[tracing::instrument(err, skip(self, fee))]
    pub async fn mint_to_public(
        &self,
        to: Address,
        amount: u128,
        fee: FeePayment,
    ) -> Result<SentTx> {
        let call = ContractCall::new(
            self.address,
            "mint_to_public",
            vec![to.inner(), Element::from(amount)],
        );
        self.wallet.send(call, Vec::new(), fee).await
    }

    #[tracing::instrument(err, skip(self, fee))]
    pub async fn transfer_to_private(
        &self,
        to: Address,
        amount: u128,
        fee: FeePayment,
    ) -> Result<SentTx> {
        let call = ContractCall::new(
            self.address,
            "transfer_to_private",
            vec![to.inner(), Element::from(amount)],
        );
        self.wallet.send(call, Vec::new(), fee).await
    }

    /// The exact call object of a private transfer
    ///
    /// This is what an authorization witness binds to when the transfer is
    /// executed by a third-party caller.
    #[must_use]
    pub fn transfer_in_private_call(
        &self,
        from: Address,
        to: Address,
        amount: u128,
        nonce: u64,
    ) -> ContractCall {
        ContractCall::new(
            self.address,
            "transfer_in_private",
            vec![
                from.inner(),
                to.inner(),
                Element::from(amount),
                Element::from(nonce),
            ],
        )
    }

    /// Private balance of `owner`, as visible to the bound wallet's
    /// environment
    ///
    /// Only an environment that registered `owner` as an account can decrypt
    /// its notes; elsewhere this reads as zero.
    pub async fn balance_of_private(&self, owner: Address) -> Result<u128> {
        let call = ContractCall::new(self.address, "balance_of_private", vec![owner.inner()]);
        decode_amount(self.wallet.simulate(&call).await?)
    }

    pub async fn total_supply(&self) -> Result<u128> {
        let call = ContractCall::new(self.address, "total_supply", Vec::new());
        decode_amount(self.wallet.simulate(&call).await?)
    }
}
