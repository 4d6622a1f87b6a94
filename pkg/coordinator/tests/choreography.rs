use std::sync::Arc;

use contracts::{sponsored_fee, CrowdfundingContract, TokenContract, Wallet};
use coordinator::{Coordinator, Identity, MINT_AMOUNT};
use pxe::{EnvironmentSet, Role, Subject};
use session::SessionStore;
use tempdir::TempDir;
use testutil::{MockChain, TestNet};

struct Harness {
    chain: MockChain,
    envs: EnvironmentSet,
    coordinator: Coordinator,
    _dir: TempDir,
}

fn harness() -> Harness {
    let TestNet { chain, envs } = testutil::testnet();
    let dir = TempDir::new("coordinator").unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let coordinator = Coordinator::new(envs.clone(), Arc::new(chain.clone()), store);

    Harness {
        chain,
        envs,
        coordinator,
        _dir: dir,
    }
}

fn donor_wallet(harness: &Harness) -> Wallet {
    let session = harness.coordinator.store().load();
    let identity = Identity::derive(
        session.donor_secret_key.unwrap(),
        session.donor_salt.unwrap(),
    );
    Wallet::new(
        Arc::clone(harness.envs.get(Role::Donor)),
        identity.secret_key,
        identity.salt,
    )
}

#[tokio::test]
async fn setup_splits_the_minted_supply_evenly() {
    let harness = harness();

    let outcome = harness.coordinator.setup().await.unwrap();

    assert_eq!(outcome.donor_balance, MINT_AMOUNT / 2);
    assert_eq!(outcome.operator_balance, MINT_AMOUNT / 2);

    let wallet = donor_wallet(&harness);
    let token = TokenContract::at(outcome.token_address, wallet);
    assert_eq!(token.total_supply().await.unwrap(), MINT_AMOUNT);
}

#[tokio::test]
async fn full_scenario_conserves_balances() {
    let harness = harness();

    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();

    let donate = harness.coordinator.donate(23).await.unwrap();
    assert_eq!(donate.balance_before, 1000);
    assert_eq!(donate.balance_after, 977);
    // the donor decrypts exactly its own change note
    assert_eq!(donate.private_logs.len(), 1);

    let withdraw = harness.coordinator.withdraw(10).await.unwrap();
    assert_eq!(withdraw.contract_balance_before, 23);
    assert_eq!(withdraw.contract_balance_after, 13);
    assert_eq!(withdraw.operator_balance_before, 1000);
    assert_eq!(withdraw.operator_balance_after, 1010);
}

#[tokio::test]
async fn identities_rederive_identically_across_invocations() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();

    let session = harness.coordinator.store().load();
    let first = Identity::derive(
        session.donor_secret_key.unwrap(),
        session.donor_salt.unwrap(),
    );
    let second = Identity::derive(
        session.donor_secret_key.unwrap(),
        session.donor_salt.unwrap(),
    );

    assert_eq!(first, second);
    assert_eq!(Some(first.address), session.donor_address);
}

#[tokio::test]
async fn registration_is_idempotent() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();

    let session = harness.coordinator.store().load();
    let deployer_address = session.deployer_address.unwrap();

    let donor_env = harness.envs.get(Role::Donor);
    let senders_once = donor_env.senders().await.unwrap();

    donor_env.register_sender(deployer_address).await.unwrap();
    donor_env.register_sender(deployer_address).await.unwrap();

    assert_eq!(donor_env.senders().await.unwrap(), senders_once);

    let contracts_once = donor_env.contracts().await.unwrap();
    harness.coordinator.deploy().await.unwrap();
    // re-running the whole (idempotent) registration pass changes nothing
    // beyond the first run
    let after_first = donor_env.contracts().await.unwrap();
    harness.coordinator.deploy().await.unwrap();
    assert_eq!(donor_env.contracts().await.unwrap(), after_first);
    assert_eq!(after_first.len(), contracts_once.len() + 1);
}

#[tokio::test]
async fn donate_without_a_witness_is_rejected() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();

    let session = harness.coordinator.store().load();
    let crowdfunding_address = session.crowdfunding_contract_address.unwrap();

    let wallet = donor_wallet(&harness);
    let crowdfunding = CrowdfundingContract::at(crowdfunding_address, wallet);

    // out-of-order: send before any witness exists
    let sent = crowdfunding
        .donate(23, Vec::new(), sponsored_fee())
        .await
        .unwrap();

    let err = sent.wait().await.unwrap_err();
    match err {
        contracts::Error::TxReverted { reason, .. } => {
            assert!(reason.contains("authorization"), "{reason}");
        }
        other => panic!("expected revert, got {other:?}"),
    }
}

#[tokio::test]
async fn witness_for_a_different_action_is_rejected() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();

    let session = harness.coordinator.store().load();
    let token_address = session.token_address.unwrap();
    let crowdfunding_address = session.crowdfunding_contract_address.unwrap();

    let wallet = donor_wallet(&harness);
    let token = TokenContract::at(token_address, wallet.clone());

    // witness over amount 24, donation of 23: the exact-action binding must
    // reject it remotely
    let transfer = token.transfer_in_private_call(wallet.address(), crowdfunding_address, 24, 0);
    let witness = contracts::authorize(&wallet, crowdfunding_address, &transfer);

    let crowdfunding = CrowdfundingContract::at(crowdfunding_address, wallet);
    let sent = crowdfunding
        .donate(23, vec![witness], sponsored_fee())
        .await
        .unwrap();

    assert!(matches!(
        sent.wait().await,
        Err(contracts::Error::TxReverted { .. })
    ));

    // nothing moved
    let outcome = harness.coordinator.donate(23).await.unwrap();
    assert_eq!(outcome.balance_before, 1000);
}

#[tokio::test]
async fn overdraw_fails_instead_of_clamping() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();
    harness.coordinator.donate(23).await.unwrap();

    let err = harness.coordinator.withdraw(24).await.unwrap_err();
    assert!(matches!(
        err,
        coordinator::Error::Contracts(contracts::Error::TxReverted { .. })
    ));

    // the failed withdrawal must not have moved anything
    let withdraw = harness.coordinator.withdraw(10).await.unwrap();
    assert_eq!(withdraw.contract_balance_before, 23);
    assert_eq!(withdraw.contract_balance_after, 13);
}

#[tokio::test]
async fn donations_after_the_deadline_are_rejected() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();

    harness.chain.advance_time(24 * 60 * 60 + 1);

    let err = harness.coordinator.donate(23).await.unwrap_err();
    match err {
        coordinator::Error::Contracts(contracts::Error::TxReverted { reason, .. }) => {
            assert!(reason.contains("deadline"), "{reason}");
        }
        other => panic!("expected revert, got {other:?}"),
    }
}

#[tokio::test]
async fn withdraw_by_anyone_but_the_operator_is_rejected() {
    let harness = harness();
    harness.coordinator.setup().await.unwrap();
    harness.coordinator.deploy().await.unwrap();
    harness.coordinator.donate(23).await.unwrap();

    let session = harness.coordinator.store().load();
    let crowdfunding_address = session.crowdfunding_contract_address.unwrap();

    let wallet = donor_wallet(&harness);
    let crowdfunding = CrowdfundingContract::at(crowdfunding_address, wallet);

    let sent = crowdfunding.withdraw(5, sponsored_fee()).await.unwrap();
    match sent.wait().await.unwrap_err() {
        contracts::Error::TxReverted { reason, .. } => {
            assert!(reason.contains("operator"), "{reason}");
        }
        other => panic!("expected revert, got {other:?}"),
    }
}

#[tokio::test]
async fn balances_are_only_visible_where_the_account_is_registered() {
    let harness = harness();
    let outcome = harness.coordinator.setup().await.unwrap();

    let session = harness.coordinator.store().load();
    let donor_address = session.donor_address.unwrap();
    let deployer_identity = Identity::derive(
        session.deployer_secret_key.unwrap(),
        session.deployer_salt.unwrap(),
    );

    // the deployer's environment never registered the donor as an account,
    // so the donor's notes are opaque to it
    let deployer_wallet = Wallet::new(
        Arc::clone(harness.envs.get(Role::Deployer)),
        deployer_identity.secret_key,
        deployer_identity.salt,
    );
    let token = TokenContract::at(outcome.token_address, deployer_wallet);
    assert_eq!(token.balance_of_private(donor_address).await.unwrap(), 0);

    assert!(!harness
        .envs
        .is_registered(Role::Deployer, Subject::Account(donor_address))
        .await
        .unwrap());
    assert!(harness
        .envs
        .is_registered(Role::Donor, Subject::Account(donor_address))
        .await
        .unwrap());
}
