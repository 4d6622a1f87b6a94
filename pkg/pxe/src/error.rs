use primitives::Address;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected rpc response: {0}")]
    UnexpectedResponse(String),

    #[error("serde_json error")]
    SerdeJson(#[from] serde_json::Error),

    #[error("contract {0} is not registered in this environment")]
    ContractNotRegistered(Address),

    #[error("account {0} is not registered in this environment")]
    AccountNotRegistered(Address),

    #[error("execution failed: {0}")]
    Execution(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
