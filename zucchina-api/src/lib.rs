//! Zucchina HTTP API
//!
//! Serves rendered configurations at `GET /:token`, where `token` is the
//! base58-encoded location of the source document.

mod handlers;
pub mod server;

pub use server::{run_server, serve, AppState};
