//! Nullable infrastructure for deterministic testing.
//!
//! The services only see the ledger through `LedgerClient`. This crate
//! provides an implementation that:
//! - Keeps all ledger state in memory
//! - Records every call so tests can assert on round-trips
//! - Can be told to fail specific operations
//!
//! Usage: swap `RpcLedgerClient` for `NullLedger` in tests.

pub mod ledger;

pub use ledger::{LedgerCall, NullLedger};
