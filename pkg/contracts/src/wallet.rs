use std::sync::Arc;

use primitives::{
    compute_address, compute_partial_address, derive_keys, derive_signing_key, hash_elements,
    Address, Element, PartialAddress, PublicKeys,
};
use pxe::{
    canonical::ACCOUNT_CONTRACT, Artifact, AuthWitness, ContractCall, DeployRequest, Environment,
    FeePayment, TxPayload, TxRequest,
};
use rand::Rng;

use crate::{pending::SentTx, Result};

/// An account handle bound to one environment
///
/// The wallet owns the account's secret key and salt; address, public keys,
/// and signing key are all re-derived from those two values, so a wallet
/// reconstructed from the session record is identical to the one that
/// deployed the account.
#[derive(Clone)]
pub struct Wallet {
    env: Arc<dyn Environment>,
    secret_key: Element,
    salt: Element,
    signing_key: Element,
    public_keys: PublicKeys,
    address: Address,
}

impl Wallet {
    pub fn new(env: Arc<dyn Environment>, secret_key: Element, salt: Element) -> Self {
        let signing_key = derive_signing_key(secret_key);
        let public_keys = derive_keys(secret_key);
        let partial = account_partial_address(salt, signing_key);
        let address = compute_address(&public_keys, partial);

        Self {
            env,
            secret_key,
            salt,
            signing_key,
            public_keys,
            address,
        }
    }

    pub fn random<R: Rng + ?Sized>(env: Arc<dyn Environment>, rng: &mut R) -> Self {
        Self::new(env, Element::random(rng), Element::random(rng))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn secret_key(&self) -> Element {
        self.secret_key
    }

    pub fn salt(&self) -> Element {
        self.salt
    }

    pub fn public_keys(&self) -> &PublicKeys {
        &self.public_keys
    }

    pub fn partial_address(&self) -> PartialAddress {
        account_partial_address(self.salt, self.signing_key)
    }

    pub fn env(&self) -> &Arc<dyn Environment> {
        &self.env
    }

    /// Register this account in its own environment
    ///
    /// Idempotent; must happen before the environment can decrypt notes
    /// addressed to the account.
    pub async fn register(&self) -> Result<()> {
        self.env
            .register_account(self.secret_key, self.partial_address())
            .await?;
        Ok(())
    }

    /// Register a counterparty as a sender to this account
    pub async fn register_sender(&self, sender: Address) -> Result<()> {
        self.env.register_sender(sender).await?;
        Ok(())
    }

    /// Deploy the account contract on-chain
    #[tracing::instrument(err, skip(self, fee), fields(address = %self.address))]
    pub async fn deploy(&self, fee: FeePayment) -> Result<SentTx> {
        let request = DeployRequest {
            artifact: Artifact::named(ACCOUNT_CONTRACT),
            init_args: vec![signing_public_key(self.signing_key)],
            salt: self.salt,
            deployer: Address::default(),
            public_keys: Some(self.public_keys),
        };

        self.send_request(TxPayload::Deploy(request), Vec::new(), fee)
            .await
    }

    /// Sign a delegation for `caller` to execute `action` on this account's
    /// behalf
    ///
    /// The witness binds the exact action; it must exist before the
    /// delegated call is sent, since the send embeds it.
    pub fn create_auth_wit(&self, caller: Address, action: &ContractCall) -> AuthWitness {
        let request_hash = AuthWitness::request_hash_for(caller, action);
        let signature = hash_elements("authwit-signature", &[self.signing_key, request_hash]);

        AuthWitness {
            signer: self.address,
            request_hash,
            signature,
        }
    }

    /// Submit a call from this account
    pub async fn send(
        &self,
        call: ContractCall,
        auth_witnesses: Vec<AuthWitness>,
        fee: FeePayment,
    ) -> Result<SentTx> {
        self.send_request(TxPayload::Call(call), auth_witnesses, fee)
            .await
    }

    /// Submit a deployment from this account
    pub async fn send_deploy(&self, request: DeployRequest, fee: FeePayment) -> Result<SentTx> {
        self.send_request(TxPayload::Deploy(request), Vec::new(), fee)
            .await
    }

    /// Simulate a view call as this account
    pub async fn simulate(&self, call: &ContractCall) -> Result<Element> {
        Ok(self.env.simulate(call, self.address).await?)
    }

    async fn send_request(
        &self,
        payload: TxPayload,
        auth_witnesses: Vec<AuthWitness>,
        fee: FeePayment,
    ) -> Result<SentTx> {
        let tx_hash = self
            .env
            .send(TxRequest {
                origin: self.address,
                payload,
                auth_witnesses,
                fee,
            })
            .await?;

        Ok(SentTx::new(Arc::clone(&self.env), tx_hash))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// The public counterpart of an account signing key
#[must_use]
pub fn signing_public_key(signing_key: Element) -> Element {
    hash_elements("signing-public-key", &[signing_key])
}

/// The address an account with this secret key and salt deploys to
///
/// Pure function of its inputs; every invocation that holds the same session
/// record resolves the same address.
#[must_use]
pub fn account_address(secret_key: Element, salt: Element) -> Address {
    let partial = account_partial_address(salt, derive_signing_key(secret_key));
    compute_address(&derive_keys(secret_key), partial)
}

fn account_partial_address(salt: Element, signing_key: Element) -> PartialAddress {
    let initialization_hash = hash_elements("initializer", &[signing_public_key(signing_key)]);
    compute_partial_address(salt, initialization_hash, Address::default())
}
