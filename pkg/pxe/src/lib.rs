//! Private-execution-environment handles.
//!
//! Each party in the crowdfunding flow runs its own environment, which holds
//! that party's decryption keys and a local registration set of accounts,
//! contracts, and senders. This crate defines the capability traits those
//! environments expose ([`Environment`], [`Node`]), the wire types that move
//! across them, the HTTP JSON-RPC backed implementations, and the named
//! environment set used by the pipelines.

pub mod canonical;
mod environment;
mod error;
mod node;
mod registry;
mod rpc;
mod types;

pub use environment::Environment;
pub use error::{Error, Result};
pub use node::Node;
pub use registry::{EnvironmentSet, Role, Subject};
pub use rpc::{RpcClient, RpcEnvironment, RpcNode};
pub use types::{
    Artifact, AuthWitness, ContractCall, ContractInstance, ContractRef, DeployRequest, FeePayment,
    LogFilter, PublicLog, TxEffect, TxHash, TxPayload, TxReceipt, TxRequest, TxStatus,
};
