use primitives::{Address, Element};

use crate::{Artifact, ContractRef, DeployRequest};

/// Artifact name of the account contract every party deploys
pub const ACCOUNT_CONTRACT: &str = "SchnorrAccount";

/// Artifact name of the token contract
pub const TOKEN_CONTRACT: &str = "Token";

/// Artifact name of the crowdfunding contract
pub const CROWDFUNDING_CONTRACT: &str = "Crowdfunding";

/// Artifact name of the sponsored fee-payment contract
pub const SPONSORED_FPC_CONTRACT: &str = "SponsoredFPC";

const SPONSORED_FPC_SALT: Element = Element::ONE;

/// The well-known sponsored fee-payment contract instance
///
/// The instance exists on every network from genesis, but each environment
/// still has to register it before paying fees through it.
#[must_use]
pub fn sponsored_fpc() -> ContractRef {
    let request = DeployRequest {
        artifact: Artifact::named(SPONSORED_FPC_CONTRACT),
        init_args: Vec::new(),
        salt: SPONSORED_FPC_SALT,
        deployer: Address::default(),
        public_keys: None,
    };

    ContractRef {
        partial_address: Some(request.partial_address()),
        instance: request.instance(),
        artifact: request.artifact,
    }
}
