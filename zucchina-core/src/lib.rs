//! Zucchina Core Library
//!
//! This crate provides the pieces shared by the Zucchina parser, server and
//! CLI: the error type, runtime configuration, the document fetcher and the
//! base58 codec used to embed source locations in URLs.

pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;

pub use error::{Error, Result};
pub use fetch::{Fetch, SourceFetcher};

/// Zucchina version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
