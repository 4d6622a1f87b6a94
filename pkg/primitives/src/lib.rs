#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

//! Core primitives shared by the crowdfunding coordination crates: field
//! elements, domain-separated hashing, and the pure key/address derivations
//! that tie an account's secret key and salt to its on-chain address.

mod address;
mod element;
mod hash;
mod keys;

pub use address::{
    compute_address, compute_contract_address, compute_partial_address, Address, PartialAddress,
};
pub use element::Element;
pub use hash::{hash_bytes, hash_elements};
pub use keys::{derive_keys, derive_signing_key, PublicKeys};
