use std::time::Duration;

use pxe::TxHash;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown transaction: {0}")]
    UnknownTransaction(TxHash),

    #[error("transaction {tx_hash} not included within {timeout:?}; inspect its state before resending")]
    InclusionTimeout { tx_hash: TxHash, timeout: Duration },

    #[error("transaction {tx_hash} reverted: {reason}")]
    TxReverted { tx_hash: TxHash, reason: String },

    #[error("pxe error")]
    Pxe(#[from] pxe::Error),

    #[error("value does not fit the expected type: {0}")]
    UnexpectedValue(String),

    #[error("string too long for a field element: {0:?}")]
    StringTooLong(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
