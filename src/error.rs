//! Error taxonomy for the outbound transfer flow
//!
//! Errors are split by when they can occur relative to broadcasting a
//! transaction, because that determines whether retrying is safe:
//! validation and quote failures happen before any funds move, while
//! submission and confirmation failures may leave gas (or in the
//! indeterminate case, the whole transfer) in flight.

use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Input errors caught before any network call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown destination network: {0}")]
    UnknownDestination(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("execution gas limit {requested} exceeds destination ceiling {max}")]
    GasLimitExceeded { requested: u128, max: u128 },

    /// A fee quote was computed against a different request than the one
    /// being submitted. A stale quote is a correctness bug, not a UX
    /// issue: fee sufficiency is checked against the exact encoded
    /// payload, so the quote must be refetched for the final request.
    #[error("fee quote is bound to request {quoted}, not {actual}; refetch the quote")]
    StaleQuote { quoted: B256, actual: B256 },
}

/// The read-only fee quote call failed
///
/// No state has changed when this is returned; the caller must abort
/// rather than guess a fee, since under-funding a cross-chain send can
/// lose the message irrecoverably.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("fee quote unavailable: {0}")]
    Unavailable(String),
}

/// The transaction could not be submitted or was rejected
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Signer cannot cover fee + gas; detected before broadcast.
    #[error("insufficient funds: {detail}")]
    InsufficientFunds { detail: String },

    /// The endpoint rejected the transaction. `mined` distinguishes an
    /// on-chain revert (gas spent, principal safe) from a rejection at
    /// the mempool boundary (nothing spent).
    #[error("submission rejected: {reason}")]
    Rejected { reason: String, mined: bool },

    /// Concurrent submission from the same signer. The caller must
    /// retry with a fresh nonce, never resubmit the same signed payload.
    #[error("nonce conflict for signer {signer}: {detail}")]
    NonceConflict { signer: Address, detail: String },

    /// Transport failure talking to the RPC node. `mid_broadcast` marks
    /// failures of the broadcast call itself, where the node may have
    /// accepted the signed transaction before the reply was lost; those
    /// must not be blindly retried.
    #[error("rpc transport failure: {detail}")]
    Rpc { detail: String, mid_broadcast: bool },
}

/// Top-level error for a transfer pipeline run
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The transaction was broadcast but not confirmed within the
    /// caller's patience window. The outcome is unknown: the transfer
    /// may still be mined. Must never be treated as success or failure;
    /// reconcile out of band (e.g. `oft-sender status`).
    #[error("transaction {tx_hash} not confirmed within {waited_secs}s; outcome unknown")]
    ConfirmationIndeterminate { tx_hash: B256, waited_secs: u64 },
}

impl TransferError {
    /// Whether funds could have left the signer's control.
    ///
    /// Determines retry safety: a `false` here means nothing was
    /// broadcast and the caller may retry freely; `true` means a
    /// transaction reached the network and blind retry risks a
    /// double-send.
    pub fn funds_at_risk(&self) -> bool {
        match self {
            TransferError::Validation(_) | TransferError::Quote(_) => false,
            TransferError::Submission(e) => matches!(
                e,
                SubmissionError::Rejected { mined: true, .. }
                    | SubmissionError::Rpc {
                        mid_broadcast: true,
                        ..
                    }
            ),
            TransferError::ConfirmationIndeterminate { .. } => true,
        }
    }

    /// Process exit code for the CLI, one per error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            TransferError::Validation(_) => 2,
            TransferError::Quote(_) => 3,
            TransferError::Submission(_) => 4,
            TransferError::ConfirmationIndeterminate { .. } => 5,
        }
    }

    /// Short category label used in CLI output and logs.
    pub fn category(&self) -> &'static str {
        match self {
            TransferError::Validation(_) => "validation",
            TransferError::Quote(_) => "quote",
            TransferError::Submission(_) => "submission",
            TransferError::ConfirmationIndeterminate { .. } => "indeterminate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_network_errors_keep_funds_safe() {
        let e = TransferError::Validation(ValidationError::UnknownDestination(
            "unknown-chain".to_string(),
        ));
        assert!(!e.funds_at_risk());
        assert_eq!(e.exit_code(), 2);

        let e = TransferError::Quote(QuoteError::Unavailable("timeout".to_string()));
        assert!(!e.funds_at_risk());
        assert_eq!(e.exit_code(), 3);
    }

    #[test]
    fn test_mempool_rejection_keeps_funds_safe() {
        let e = TransferError::Submission(SubmissionError::Rejected {
            reason: "replacement transaction underpriced".to_string(),
            mined: false,
        });
        assert!(!e.funds_at_risk());
    }

    #[test]
    fn test_broadcast_transport_failure_is_at_risk() {
        // A lost reply to the broadcast call is ambiguous: the node may
        // have accepted the signed transaction. Same transport failure
        // during a pre-broadcast read is safe to retry.
        let e = TransferError::Submission(SubmissionError::Rpc {
            detail: "error sending request".to_string(),
            mid_broadcast: true,
        });
        assert!(e.funds_at_risk());
        assert_eq!(e.category(), "submission");

        let e = TransferError::Submission(SubmissionError::Rpc {
            detail: "error sending request".to_string(),
            mid_broadcast: false,
        });
        assert!(!e.funds_at_risk());
    }

    #[test]
    fn test_onchain_revert_spends_gas() {
        let e = TransferError::Submission(SubmissionError::Rejected {
            reason: "execution reverted".to_string(),
            mined: true,
        });
        assert!(e.funds_at_risk());
        assert_eq!(e.exit_code(), 4);
    }

    #[test]
    fn test_indeterminate_is_at_risk_and_distinct() {
        let e = TransferError::ConfirmationIndeterminate {
            tx_hash: B256::ZERO,
            waited_secs: 60,
        };
        assert!(e.funds_at_risk());
        assert_eq!(e.exit_code(), 5);
        assert_eq!(e.category(), "indeterminate");
    }
}
