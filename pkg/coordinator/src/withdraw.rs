use contracts::{sponsored_fee, CrowdfundingContract, TokenContract};
use pxe::{Role, TxHash};

use crate::error::required;
use crate::{provision_existing, Coordinator, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub tx_hash: TxHash,
    pub operator_balance_before: u128,
    pub operator_balance_after: u128,
    pub contract_balance_before: u128,
    pub contract_balance_after: u128,
}

impl Coordinator {
    /// Withdraw `amount` from the campaign to the operator.
    ///
    /// No witness is attached: the operator is the contract's privileged
    /// caller by construction.
    #[tracing::instrument(err, skip(self))]
    pub async fn withdraw(&self, amount: u128) -> Result<WithdrawOutcome> {
        let session = self.store.load();
        let operator = provision_existing(&session, Role::Operator)?;
        let token_address = required(session.token_address, "tokenAddress")?;
        let crowdfunding_address = required(
            session.crowdfunding_contract_address,
            "crowdfundingContractAddress",
        )?;

        let fee = sponsored_fee();
        let operator_wallet = self.wallet(Role::Operator, &operator);
        operator_wallet.register().await?;
        tracing::info!(wallet = %operator_wallet.address(), "using wallet");

        let token = TokenContract::at(token_address, operator_wallet.clone());
        let operator_balance_before = token.balance_of_private(operator.address).await?;
        let contract_balance_before = token.balance_of_private(crowdfunding_address).await?;
        tracing::info!(
            operator_balance_before,
            contract_balance_before,
            "private balances"
        );

        let crowdfunding = CrowdfundingContract::at(crowdfunding_address, operator_wallet.clone());
        let sent = crowdfunding.withdraw(amount, fee).await?;
        let receipt = sent.wait().await?;
        tracing::info!(tx_hash = %sent.tx_hash(), block = ?receipt.block_number, "withdrawal included");

        if let Some(effect) = operator_wallet.env().tx_effect(sent.tx_hash()).await? {
            tracing::info!(logs = effect.private_logs.len(), "transaction effects");
        }

        let operator_balance_after = token.balance_of_private(operator.address).await?;
        let contract_balance_after = token.balance_of_private(crowdfunding_address).await?;
        tracing::info!(
            operator_balance_after,
            contract_balance_after,
            "private balances"
        );

        Ok(WithdrawOutcome {
            tx_hash: sent.tx_hash(),
            operator_balance_before,
            operator_balance_after,
            contract_balance_before,
            contract_balance_after,
        })
    }
}
