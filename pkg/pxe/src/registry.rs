use std::sync::Arc;

use primitives::Address;

use crate::{ContractRef, Environment, Result};

/// Logical owner of an environment
///
/// Environments are addressed by role, never by position, so a reordered
/// construction cannot silently swap two parties' key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Donor,
    Operator,
    Deployer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Donor, Role::Operator, Role::Deployer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Operator => "operator",
            Role::Deployer => "deployer",
        }
    }
}

/// Something an environment may have registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Account(Address),
    Contract(Address),
    Sender(Address),
}

/// The named mapping from role to environment handle
#[derive(Clone)]
pub struct EnvironmentSet {
    donor: Arc<dyn Environment>,
    operator: Arc<dyn Environment>,
    deployer: Arc<dyn Environment>,
}

impl EnvironmentSet {
    #[must_use]
    pub fn new(
        donor: Arc<dyn Environment>,
        operator: Arc<dyn Environment>,
        deployer: Arc<dyn Environment>,
    ) -> Self {
        Self {
            donor,
            operator,
            deployer,
        }
    }

    #[must_use]
    pub fn get(&self, role: Role) -> &Arc<dyn Environment> {
        match role {
            Role::Donor => &self.donor,
            Role::Operator => &self.operator,
            Role::Deployer => &self.deployer,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &Arc<dyn Environment>)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Register a contract into every environment
    ///
    /// The three registrations have no data dependency on each other, so they
    /// are issued concurrently. Idempotent: safe to re-run after a partial
    /// failure.
    pub async fn register_contract_everywhere(&self, contract: &ContractRef) -> Result<()> {
        tokio::try_join!(
            self.donor.register_contract(contract),
            self.operator.register_contract(contract),
            self.deployer.register_contract(contract),
        )?;
        Ok(())
    }

    /// Whether `subject` is present in `role`'s registration set
    pub async fn is_registered(&self, role: Role, subject: Subject) -> Result<bool> {
        let env = self.get(role);
        let registered = match subject {
            Subject::Account(address) => env.registered_accounts().await?.contains(&address),
            Subject::Contract(address) => env.contracts().await?.contains(&address),
            Subject::Sender(address) => env.senders().await?.contains(&address),
        };
        Ok(registered)
    }
}

impl std::fmt::Debug for EnvironmentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("EnvironmentSet").finish_non_exhaustive()
    }
}
