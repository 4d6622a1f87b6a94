use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use primitives::{Address, Element, PartialAddress};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ContractCall, ContractRef, Environment, Error, LogFilter, Node, PublicLog, Result, TxEffect,
    TxHash, TxReceipt, TxRequest,
};

#[derive(Serialize)]
struct Request<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct Response {
    result: Option<serde_json::Value>,
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client shared by the environment and node handles
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

impl RpcClient {
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_owned(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[tracing::instrument(err, skip(self, params), fields(url = %self.url))]
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Clone,
        R: DeserializeOwned,
    {
        let response: Response = retry_on_network_failure(|| async {
            let body = Request {
                jsonrpc: "2.0",
                id: REQUEST_ID.fetch_add(1, Ordering::Relaxed),
                method,
                params: params.clone(),
            };

            self.http
                .post(&self.url)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })
        .await?;

        if let Some(error) = response.error {
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // absent and null results are the same thing: unit and Option
        // returns deserialize from null
        let value = response.result.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

trait IsNetworkFailure {
    fn is_network_failure(&self) -> bool;
}

impl IsNetworkFailure for reqwest::Error {
    fn is_network_failure(&self) -> bool {
        self.is_connect() || self.is_timeout()
    }
}

/// Retries 4 times for a maximum of 16s.
async fn retry_on_network_failure<T, E, Fut>(f: impl Fn() -> Fut) -> Result<T, E>
where
    E: IsNetworkFailure,
    Fut: Future<Output = Result<T, E>>,
{
    const DELAYS: &[Duration] = &[
        Duration::from_secs(1),
        Duration::from_secs(5),
        Duration::from_secs(10),
    ];

    for (i, delay) in DELAYS
        .iter()
        .chain(std::iter::once(&Duration::ZERO))
        .enumerate()
    {
        let res = f().await;

        if res.as_ref().is_err_and(IsNetworkFailure::is_network_failure) {
            let was_last_try = i == DELAYS.len();
            if was_last_try {
                return res;
            }

            tracing::warn!(attempt = i + 1, "transport failure, retrying");
            tokio::time::sleep(*delay).await;
        } else {
            return res;
        }
    }

    unreachable!()
}

/// An [`Environment`] reached over HTTP JSON-RPC
#[derive(Debug, Clone)]
pub struct RpcEnvironment {
    client: RpcClient,
    name: String,
}

impl RpcEnvironment {
    #[must_use]
    pub fn new(url: &str, name: &str) -> Self {
        Self {
            client: RpcClient::new(url),
            name: name.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Environment for RpcEnvironment {
    async fn register_account(
        &self,
        secret_key: Element,
        partial_address: PartialAddress,
    ) -> Result<Address> {
        self.client
            .request("pxe_registerAccount", (secret_key, partial_address))
            .await
    }

    async fn register_contract(&self, contract: &ContractRef) -> Result<()> {
        self.client
            .request("pxe_registerContract", (contract.clone(),))
            .await
    }

    async fn register_sender(&self, address: Address) -> Result<()> {
        self.client.request("pxe_registerSender", (address,)).await
    }

    async fn registered_accounts(&self) -> Result<Vec<Address>> {
        self.client.request("pxe_getRegisteredAccounts", ()).await
    }

    async fn contracts(&self) -> Result<Vec<Address>> {
        self.client.request("pxe_getContracts", ()).await
    }

    async fn senders(&self) -> Result<Vec<Address>> {
        self.client.request("pxe_getSenders", ()).await
    }

    async fn block_number(&self) -> Result<u64> {
        self.client.request("pxe_getBlockNumber", ()).await
    }

    async fn simulate(&self, call: &ContractCall, from: Address) -> Result<Element> {
        self.client
            .request("pxe_simulate", (call.clone(), from))
            .await
    }

    async fn send(&self, request: TxRequest) -> Result<TxHash> {
        self.client.request("pxe_send", (request,)).await
    }

    async fn tx_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        self.client.request("pxe_getTxReceipt", (tx_hash,)).await
    }

    async fn tx_effect(&self, tx_hash: TxHash) -> Result<Option<TxEffect>> {
        self.client.request("pxe_getTxEffect", (tx_hash,)).await
    }

    async fn public_logs(&self, filter: LogFilter) -> Result<Vec<PublicLog>> {
        self.client.request("pxe_getPublicLogs", (filter,)).await
    }
}

/// A [`Node`] reached over HTTP JSON-RPC
#[derive(Debug, Clone)]
pub struct RpcNode {
    client: RpcClient,
}

impl RpcNode {
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
        }
    }
}

#[async_trait]
impl Node for RpcNode {
    async fn timestamp(&self) -> Result<u64> {
        self.client.request("node_getTimestamp", ()).await
    }

    async fn block_number(&self) -> Result<u64> {
        self.client.request("node_getBlockNumber", ()).await
    }
}
