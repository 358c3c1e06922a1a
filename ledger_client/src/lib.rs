//! Transport to the remote ledger.
//!
//! [`LedgerClient`] is the contract every service is written against.
//! [`RpcLedgerClient`] implements it over JSON-RPC 2.0; tests use the
//! in-memory ledger from `devdrop-nullables` instead.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::LedgerClient;
pub use error::{ClientError, ClientResult};
pub use rpc::{signing_message, RpcClientOptions, RpcLedgerClient, METHOD_NOT_FOUND};
