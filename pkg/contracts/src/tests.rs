use std::sync::Arc;

use primitives::Element;
use pxe::canonical::sponsored_fpc;
use pxe::{AuthWitness, EnvironmentSet, Role};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use testutil::TestNet;

use super::*;
use crate::token::TokenParams;

struct Env {
    envs: EnvironmentSet,
    deployer: Wallet,
    token: TokenContract,
}

async fn make_env() -> Env {
    let TestNet { envs, .. } = testutil::testnet();
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    envs.register_contract_everywhere(&sponsored_fpc())
        .await
        .unwrap();
    let fee = sponsored_fee();

    let deployer = Wallet::random(Arc::clone(envs.get(Role::Deployer)), &mut rng);
    deployer.register().await.unwrap();
    deployer.deploy(fee).await.unwrap().wait().await.unwrap();

    let (token_ref, sent) = TokenContract::deploy(
        &deployer,
        TokenParams {
            admin: deployer.address(),
            name: "DONATION".to_owned(),
            symbol: "DNT".to_owned(),
            decimals: 18,
        },
        Element::random(&mut rng),
        fee,
    )
    .await
    .unwrap();
    sent.wait().await.unwrap();

    envs.register_contract_everywhere(&token_ref).await.unwrap();

    let token = TokenContract::at(token_ref.address(), deployer.clone());

    Env {
        envs,
        deployer,
        token,
    }
}

#[tokio::test]
async fn mint_and_total_supply() {
    let env = make_env().await;

    env.token
        .mint_to_public(env.deployer.address(), 500, sponsored_fee())
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(env.token.total_supply().await.unwrap(), 500);
}

#[tokio::test]
async fn mint_by_a_non_admin_is_rejected() {
    let env = make_env().await;
    let mut rng = ChaCha20Rng::seed_from_u64(2);

    let outsider = Wallet::random(Arc::clone(env.envs.get(Role::Donor)), &mut rng);
    outsider.register().await.unwrap();
    outsider
        .deploy(sponsored_fee())
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();

    let token = env.token.with_wallet(outsider.clone());
    let sent = token
        .mint_to_public(outsider.address(), 500, sponsored_fee())
        .await
        .unwrap();

    assert!(matches!(
        sent.wait().await,
        Err(Error::TxReverted { .. })
    ));
}

#[tokio::test]
async fn sends_without_the_fee_contract_registered_fail() {
    let TestNet { envs, .. } = testutil::testnet();
    let mut rng = ChaCha20Rng::seed_from_u64(3);

    let wallet = Wallet::random(Arc::clone(envs.get(Role::Deployer)), &mut rng);
    wallet.register().await.unwrap();

    // the FPC exists on-chain from genesis, but this wallet pays through an
    // address the chain does not recognize as a fee payment contract
    let bogus_fee = pxe::FeePayment::Sponsored {
        fpc: wallet.address(),
    };
    let sent = wallet.deploy(bogus_fee).await.unwrap();

    match sent.wait().await.unwrap_err() {
        Error::TxReverted { reason, .. } => assert!(reason.contains("fee"), "{reason}"),
        other => panic!("expected revert, got {other:?}"),
    }
}

#[tokio::test]
async fn private_notes_require_sender_registration_to_be_discovered() {
    let env = make_env().await;
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let fee = sponsored_fee();

    let recipient = Wallet::random(Arc::clone(env.envs.get(Role::Donor)), &mut rng);
    recipient.register().await.unwrap();
    recipient.deploy(fee).await.unwrap().wait().await.unwrap();

    env.token
        .mint_to_public(env.deployer.address(), 100, fee)
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    env.token
        .transfer_to_private(recipient.address(), 100, fee)
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();

    let token = env.token.with_wallet(recipient.clone());

    // account registered, but the deployer is not a known sender yet: the
    // note is undiscoverable
    assert_eq!(token.balance_of_private(recipient.address()).await.unwrap(), 0);

    recipient.register_sender(env.deployer.address()).await.unwrap();
    assert_eq!(
        token.balance_of_private(recipient.address()).await.unwrap(),
        100
    );
}

#[tokio::test]
async fn simulating_against_an_unregistered_contract_fails() {
    let env = make_env().await;
    let mut rng = ChaCha20Rng::seed_from_u64(5);

    let wallet = Wallet::random(Arc::clone(env.envs.get(Role::Operator)), &mut rng);
    wallet.register().await.unwrap();

    let call = pxe::ContractCall::new(
        primitives::Address::new(Element::new(0xbad)),
        "balance_of_private",
        vec![wallet.address().inner()],
    );

    assert!(matches!(
        wallet.simulate(&call).await,
        Err(Error::Pxe(pxe::Error::ContractNotRegistered(_)))
    ));
}

#[test]
fn auth_witness_binds_the_exact_action() {
    let TestNet { envs, .. } = testutil::testnet();
    let mut rng = ChaCha20Rng::seed_from_u64(6);

    let wallet = Wallet::random(Arc::clone(envs.get(Role::Donor)), &mut rng);
    let caller = primitives::Address::new(Element::new(7));

    let token = primitives::Address::new(Element::new(8));
    let action = pxe::ContractCall::new(token, "transfer_in_private", vec![Element::new(23)]);
    let other = pxe::ContractCall::new(token, "transfer_in_private", vec![Element::new(24)]);

    let witness = wallet.create_auth_wit(caller, &action);

    assert_eq!(
        witness.request_hash,
        AuthWitness::request_hash_for(caller, &action)
    );
    assert_ne!(
        witness.request_hash,
        AuthWitness::request_hash_for(caller, &other)
    );

    // deterministic: re-creating the witness yields the same delegation
    assert_eq!(witness, wallet.create_auth_wit(caller, &action));
}
