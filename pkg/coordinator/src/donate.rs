use contracts::{authorize, sponsored_fee, CrowdfundingContract, TokenContract};
use primitives::Element;
use pxe::{Role, TxHash};

use crate::error::required;
use crate::{provision_existing, Coordinator, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonateOutcome {
    pub tx_hash: TxHash,
    pub balance_before: u128,
    pub balance_after: u128,
    pub private_logs: Vec<Element>,
}

impl Coordinator {
    /// Donate `amount` of the donor's private tokens to the campaign.
    ///
    /// The authorization witness is constructed before the send and bound to
    /// the exact transfer the contract will execute; the send embeds it.
    #[tracing::instrument(err, skip(self))]
    pub async fn donate(&self, amount: u128) -> Result<DonateOutcome> {
        let session = self.store.load();
        let donor = provision_existing(&session, Role::Donor)?;
        let token_address = required(session.token_address, "tokenAddress")?;
        let crowdfunding_address = required(
            session.crowdfunding_contract_address,
            "crowdfundingContractAddress",
        )?;

        let fee = sponsored_fee();
        let donor_wallet = self.wallet(Role::Donor, &donor);
        donor_wallet.register().await?;
        tracing::info!(wallet = %donor_wallet.address(), "using wallet");

        let token = TokenContract::at(token_address, donor_wallet.clone());
        let balance_before = token.balance_of_private(donor.address).await?;
        tracing::info!(balance_before, "donor private balance");

        // The exact call the contract will execute on the donor's behalf,
        // with the contract itself as caller.
        let transfer =
            token.transfer_in_private_call(donor.address, crowdfunding_address, amount, 0);
        let witness = authorize(&donor_wallet, crowdfunding_address, &transfer);

        let crowdfunding = CrowdfundingContract::at(crowdfunding_address, donor_wallet.clone());
        let sent = crowdfunding.donate(amount, vec![witness], fee).await?;
        let receipt = sent.wait().await?;
        tracing::info!(tx_hash = %sent.tx_hash(), block = ?receipt.block_number, "donation included");

        let effect = donor_wallet.env().tx_effect(sent.tx_hash()).await?;
        let private_logs = effect.map(|effect| effect.private_logs).unwrap_or_default();
        tracing::info!(logs = private_logs.len(), "transaction effects");

        let balance_after = token.balance_of_private(donor.address).await?;
        tracing::info!(balance_after, "donor private balance");

        Ok(DonateOutcome {
            tx_hash: sent.tx_hash(),
            balance_before,
            balance_after,
            private_logs,
        })
    }
}
