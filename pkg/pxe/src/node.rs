use async_trait::async_trait;

use crate::Result;

/// Read-only view of the ledger the deployment targets
///
/// The coordinator only needs the chain for wall-clock anchoring; everything
/// else goes through an [`Environment`](crate::Environment).
#[async_trait]
pub trait Node: Send + Sync {
    /// Timestamp of the latest block, in unix seconds
    async fn timestamp(&self) -> Result<u64>;

    async fn block_number(&self) -> Result<u64>;
}
