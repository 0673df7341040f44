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
#![allow(clippy::module_name_repetitions)]

//! `EdgeGrid`-signed HTTP plumbing for the Image Manager CLI.
//!
//! Layout:
//! - `credentials.rs`: the client credential set and its validation
//! - `auth.rs`: `EG1-HMAC-SHA256` request signing behind the `RequestSigner` seam
//! - `caller.rs`: the HTTP caller that signs, sends, and classifies responses
//! - `error.rs`: the status-driven error taxonomy

pub mod auth;
pub mod caller;
pub mod credentials;
pub mod error;

pub use auth::{EdgeGridAuth, RequestSigner, edgegrid_timestamp};
pub use caller::{CallerOptions, EdgeGridClient};
pub use credentials::{Credentials, DEFAULT_MAX_BODY};
pub use error::{ApiError, ApiResult};
