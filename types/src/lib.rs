//! Fundamental types for devdrop.
//!
//! Every other crate in the workspace builds on these: account identifiers,
//! cluster selection, drop batches, mint records, transaction signatures and
//! balance snapshots.

pub mod account;
pub mod amount;
pub mod commitment;
pub mod drop;
pub mod error;
pub mod mint;
pub mod network;
pub mod signature;
pub mod snapshot;

pub use account::Account;
pub use amount::{lamports_from_sol, to_base_units, LAMPORTS_PER_SOL, SOL_DECIMALS};
pub use commitment::Commitment;
pub use drop::{DropAccount, DropBatch};
pub use error::TypesError;
pub use mint::{HoldingAccount, Mint};
pub use network::{Cluster, ClusterConfig};
pub use signature::TxSignature;
pub use snapshot::{BalanceSnapshot, SnapshotReport};
