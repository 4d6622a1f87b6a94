use std::sync::Arc;
use std::time::Duration;

use pxe::{Environment, TxHash, TxReceipt, TxStatus};
use tokio::time::interval;

use crate::{Error, Result};

/// How long a transaction may stay unknown (not in the mempool) before the
/// wait gives up.
const UNKNOWN_TX_TIMEOUT: Duration = Duration::from_secs(60);

/// Overall bound on an inclusion wait. Hitting it does NOT mean the
/// transaction failed; it may still land, which is exactly why it is never
/// resent automatically.
const INCLUSION_TIMEOUT: Duration = Duration::from_secs(600);

const POLL_PERIOD: Duration = Duration::from_millis(500);

/// A submitted transaction
///
/// Submission does not imply inclusion. [`wait`](SentTx::wait) suspends
/// until the ledger reports the transaction's state, bounded by an overall
/// inclusion timeout; dropping the future cancels the wait (never the
/// transaction).
pub struct SentTx {
    env: Arc<dyn Environment>,
    tx_hash: TxHash,
}

impl SentTx {
    pub(crate) fn new(env: Arc<dyn Environment>, tx_hash: TxHash) -> Self {
        Self { env, tx_hash }
    }

    #[must_use]
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for the transaction to be included and return its receipt.
    ///
    /// A reverted transaction is an error here, not a receipt: by the time
    /// the revert is observed the transaction is final and must not be
    /// resent as-is. On timeout, inspect the transaction hash's actual state
    /// before doing anything else.
    #[tracing::instrument(err, skip(self), fields(tx_hash = %self.tx_hash))]
    pub async fn wait(&self) -> Result<TxReceipt> {
        match tokio::time::timeout(INCLUSION_TIMEOUT, self.poll_for_receipt()).await {
            Ok(result) => result,
            Err(_) => Err(Error::InclusionTimeout {
                tx_hash: self.tx_hash,
                timeout: INCLUSION_TIMEOUT,
            }),
        }
    }

    async fn poll_for_receipt(&self) -> Result<TxReceipt> {
        let unknown_timeout = std::time::Instant::now() + UNKNOWN_TX_TIMEOUT;

        let mut interval = interval(POLL_PERIOD);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.env.tx_receipt(self.tx_hash).await? {
                None => {
                    // Transaction doesn't exist / is unknown
                    if std::time::Instant::now() > unknown_timeout {
                        return Err(Error::UnknownTransaction(self.tx_hash));
                    }
                }
                Some(TxReceipt {
                    status: TxStatus::Pending,
                    ..
                })
                | Some(TxReceipt {
                    block_number: None, ..
                }) => {
                    // Transaction is pending
                }
                Some(
                    receipt @ TxReceipt {
                        status: TxStatus::Success,
                        ..
                    },
                ) => return Ok(receipt),
                Some(TxReceipt {
                    status: TxStatus::Reverted { reason },
                    ..
                }) => {
                    return Err(Error::TxReverted {
                        tx_hash: self.tx_hash,
                        reason,
                    })
                }
            }
        }
    }
}
