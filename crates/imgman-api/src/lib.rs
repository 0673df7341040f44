#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Image Manager policy operations over an `EdgeGrid`-signed session.
//!
//! Layout: `network.rs` (network targets), `policies.rs` (list/get/set/delete
//! and REST path construction).

pub mod network;
pub mod policies;

pub use network::{Network, NetworkTarget};
pub use policies::{
    ImageManager, LUNA_TOKEN_HEADER, policies_path, policy_path, with_account_switch_key,
};
