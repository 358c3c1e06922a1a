//! [`tracing::Span`] constructors for devdrop operations.
//!
//! Consistent span names and fields make it easy to follow one drop through
//! its snapshot, faucet, transfer and confirmation steps.

use devdrop_types::Cluster;
use tracing::{info_span, Span};

/// Span covering one orchestrated drop.
pub fn drop_span(network: Cluster, targets: usize) -> Span {
    info_span!("drop", network = %network, targets)
}

/// Span covering one balance snapshot.
pub fn snapshot_span(kind: &str, accounts: usize) -> Span {
    info_span!("snapshot", kind = %kind, accounts)
}

/// Span covering one mint operation.
pub fn mint_span(operation: &str, mint: &str) -> Span {
    info_span!("mint", operation = %operation, mint = %mint)
}
