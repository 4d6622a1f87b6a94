use contracts::{sponsored_fee, TokenContract, TokenParams, Wallet};
use primitives::{Address, Element};
use pxe::{canonical::sponsored_fpc, FeePayment, LogFilter, Role};
use session::Session;

use crate::{provision, Coordinator, Result, MINT_AMOUNT};

/// What setup leaves behind: a deployed token and two funded private
/// balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    pub token_address: Address,
    pub donor_balance: u128,
    pub operator_balance: u128,
}

impl Coordinator {
    /// Provision identities, deploy accounts and token, and split the minted
    /// supply into the donor's and operator's private balances.
    #[tracing::instrument(err, skip(self))]
    pub async fn setup(&self) -> Result<SetupOutcome> {
        let session = self.store.load();
        let mut rng = rand::thread_rng();

        let donor = provision(&session, Role::Donor, &mut rng);
        let operator = provision(&session, Role::Operator, &mut rng);
        let deployer = provision(&session, Role::Deployer, &mut rng);

        // Nothing can be sent until the fee-payment contract is known to the
        // sending environment, so this registration comes first.
        self.envs.register_contract_everywhere(&sponsored_fpc()).await?;
        let fee = sponsored_fee();

        let donor_wallet = self.wallet(Role::Donor, &donor);
        let operator_wallet = self.wallet(Role::Operator, &operator);
        let deployer_wallet = self.wallet(Role::Deployer, &deployer);

        for wallet in [&donor_wallet, &operator_wallet, &deployer_wallet] {
            wallet.register().await?;
            deploy_account_if_needed(wallet, fee).await?;
        }

        let salt = Element::random(&mut rng);
        let (token_ref, sent) = TokenContract::deploy(
            &deployer_wallet,
            TokenParams {
                admin: deployer.address,
                name: "DONATION".to_owned(),
                symbol: "DNT".to_owned(),
                decimals: 18,
            },
            salt,
            fee,
        )
        .await?;
        sent.wait().await?;
        tracing::info!(token = %token_ref.address(), "token deployed");

        self.envs.register_contract_everywhere(&token_ref).await?;

        // The deployer will be sending both parties their first private
        // notes; without sender registration those notes are undiscoverable.
        donor_wallet.register_sender(deployer.address).await?;
        operator_wallet.register_sender(deployer.address).await?;

        let token = TokenContract::at(token_ref.address(), deployer_wallet.clone());

        tracing::info!(amount = MINT_AMOUNT, "minting tokens");
        let mint = token.mint_to_public(deployer.address, MINT_AMOUNT, fee).await?;
        let receipt = mint.wait().await?;
        tracing::info!(block = ?receipt.block_number, "public mint included");

        if let Some(block) = receipt.block_number {
            let logs = deployer_wallet
                .env()
                .public_logs(LogFilter {
                    from_block: block,
                    to_block: block + 1,
                })
                .await?;
            tracing::info!(logs = logs.len(), "public logs after mint");
        }

        let half = MINT_AMOUNT / 2;
        token
            .transfer_to_private(donor.address, half, fee)
            .await?
            .wait()
            .await?;
        token
            .transfer_to_private(operator.address, half, fee)
            .await?
            .wait()
            .await?;

        let donor_balance = token
            .with_wallet(donor_wallet)
            .balance_of_private(donor.address)
            .await?;
        let operator_balance = token
            .with_wallet(operator_wallet)
            .balance_of_private(operator.address)
            .await?;
        tracing::info!(donor_balance, operator_balance, "private balances after split");

        let mut patch = Session::default();
        patch.merge(donor.session_patch(Role::Donor));
        patch.merge(operator.session_patch(Role::Operator));
        patch.merge(deployer.session_patch(Role::Deployer));
        patch.token_address = Some(token_ref.address());
        self.store.merge(patch)?;

        self.log_registrations().await?;

        Ok(SetupOutcome {
            token_address: token_ref.address(),
            donor_balance,
            operator_balance,
        })
    }
}

/// Deploy an account contract, tolerating a previous successful deployment
///
/// Setup may be re-run over an existing session; the account already being
/// on-chain is then expected, not a failure.
async fn deploy_account_if_needed(wallet: &Wallet, fee: FeePayment) -> Result<()> {
    match wallet.deploy(fee).await?.wait().await {
        Ok(_) => Ok(()),
        Err(contracts::Error::TxReverted { reason, .. }) if reason.contains("already deployed") => {
            tracing::info!(address = %wallet.address(), "account already deployed");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
