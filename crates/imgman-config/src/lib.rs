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

//! Credential configuration for the Image Manager CLI.
//!
//! Layout: `edgerc.rs` (INI parsing), `loader.rs` (flag/file merge),
//! `error.rs` (`ConfigError`).

pub mod edgerc;
pub mod error;
pub mod loader;

pub use edgerc::{Edgerc, Section};
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    CredentialOverrides, DEFAULT_EDGERC, DEFAULT_SECTION, EdgercSource, expand_home,
    load_credentials, merge,
};
