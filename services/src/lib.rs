//! Orchestration services for devdrop.
//!
//! - [`BalanceTracker`]: concurrent, fault-isolated balance snapshots
//! - [`TokenMintService`]: mint creation and supply issuance
//! - [`AirdropService`]: faucet-funded batch transfers with confirmation
//! - [`DropOrchestrator`]: before snapshot → drop → after snapshot
//!
//! Every service is built from an explicit [`DevdropConfig`] (or its parts)
//! and a shared `LedgerClient`; there is no ambient state.

pub mod airdrop;
pub mod balance;
pub mod config;
pub mod error;
pub mod mint;
pub mod orchestrator;
pub mod spans;

pub use airdrop::AirdropService;
pub use balance::{BalanceKind, BalanceTracker};
pub use config::DevdropConfig;
pub use error::DevdropError;
pub use mint::TokenMintService;
pub use orchestrator::{DropOrchestrator, DropReport};
