//! Transfer submission
//!
//! Attaches the quoted fee, submits the send transaction at a bumped
//! gas price, and waits for confirmation. Once the transaction is
//! broadcast there is no automatic retry: a possibly-mined transfer
//! must never be resubmitted, so ambiguous outcomes surface as
//! `ConfirmationIndeterminate` and are reconciled out of band.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::transports::http::{Client, Http};
use tracing::{debug, info, warn};

use crate::contracts::{IOFT, MessagingFee};
use crate::error::{SubmissionError, TransferError, ValidationError};
use crate::quote::FeeQuote;
use crate::request::TransferRequest;

/// Gas allowance used for the pre-broadcast balance check. The send
/// path (debit + endpoint dispatch) stays well under this.
const SEND_GAS_ALLOWANCE: u64 = 500_000;

/// Submission policy knobs
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Block confirmations to wait for before reporting success.
    pub confirmations: u64,
    /// Patience window for confirmation; expiry yields an
    /// indeterminate result, not a failure.
    pub timeout: Duration,
    /// Gas price multiplier over the network's current price. The
    /// policy is monotonic: the submitted price is never below the
    /// current network price, whatever the multiplier.
    pub gas_multiplier: f64,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            confirmations: 2,
            timeout: Duration::from_secs(120),
            gas_multiplier: 2.0,
        }
    }
}

/// Terminal outcome of a confirmed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub tx_hash: B256,
    pub confirmed: bool,
    pub block_number: Option<u64>,
}

/// Serializes submissions per signer
///
/// Two in-flight transactions from the same signer race on the nonce,
/// so each signer gets one submission at a time; different signers
/// proceed fully in parallel.
#[derive(Debug, Default)]
pub struct NonceGate {
    inner: Mutex<HashMap<Address, Arc<tokio::sync::Mutex<()>>>>,
}

impl NonceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for a signer; callers hold it across send + confirm.
    pub fn for_signer(&self, signer: Address) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().expect("nonce gate poisoned");
        map.entry(signer)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Bump the network gas price by the configured multiplier.
///
/// Never returns below `base`: congestion policy must stay monotonic
/// over the network's current minimum.
pub fn bump_gas_price(base: u128, multiplier: f64) -> u128 {
    let bumped = (base as f64 * multiplier) as u128;
    bumped.max(base)
}

/// Classify a broadcast-stage error from its message.
///
/// The recognized classes are node-side rejections: the transaction
/// never entered the mempool and funds stayed under the signer's
/// control. Anything unrecognized could be a transport failure after
/// the node already accepted the payload, so it is reported with
/// `mid_broadcast: true` and treated as unsafe to retry blindly.
pub fn classify_send_error(signer: Address, error: &str) -> SubmissionError {
    let error_lower = error.to_lowercase();

    if error_lower.contains("insufficient funds") {
        return SubmissionError::InsufficientFunds {
            detail: error.to_string(),
        };
    }

    if error_lower.contains("nonce too low")
        || error_lower.contains("nonce too high")
        || error_lower.contains("already known")
        || error_lower.contains("replacement transaction")
    {
        return SubmissionError::NonceConflict {
            signer,
            detail: error.to_string(),
        };
    }

    if error_lower.contains("revert")
        || error_lower.contains("underpriced")
        || error_lower.contains("intrinsic gas")
        || error_lower.contains("exceeds block gas limit")
    {
        return SubmissionError::Rejected {
            reason: error.to_string(),
            mined: false,
        };
    }

    SubmissionError::Rpc {
        detail: error.to_string(),
        mid_broadcast: true,
    }
}

/// Submits transfers with the quoted fee attached
pub struct TransferSubmitter<P> {
    provider: P,
    oft_address: Address,
    signer_address: Address,
    gate: Arc<NonceGate>,
    options: SubmitOptions,
}

impl<P: Provider<Http<Client>> + Clone> TransferSubmitter<P> {
    pub fn new(
        provider: P,
        oft_address: Address,
        signer_address: Address,
        gate: Arc<NonceGate>,
        options: SubmitOptions,
    ) -> Self {
        Self {
            provider,
            oft_address,
            signer_address,
            gate,
            options,
        }
    }

    /// Submit `request` with `quote` attached and wait for confirmation.
    ///
    /// Accepts only a quote computed for exactly this request; the
    /// refund address for any fee overpayment is the signer itself.
    pub async fn submit(
        &self,
        request: &TransferRequest,
        quote: &FeeQuote,
    ) -> Result<SubmissionResult, TransferError> {
        let actual = request.digest();
        if quote.request_digest != actual {
            return Err(ValidationError::StaleQuote {
                quoted: quote.request_digest,
                actual,
            }
            .into());
        }

        // One in-flight submission per signer; held through confirmation.
        let gate = self.gate.for_signer(self.signer_address);
        let _guard = gate.lock().await;

        let base_gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| SubmissionError::Rpc {
                detail: e.to_string(),
                mid_broadcast: false,
            })?;
        let gas_price = bump_gas_price(base_gas_price, self.options.gas_multiplier);

        let balance = self
            .provider
            .get_balance(self.signer_address)
            .await
            .map_err(|e| SubmissionError::Rpc {
                detail: e.to_string(),
                mid_broadcast: false,
            })?;
        let required =
            quote.native_fee + U256::from(gas_price) * U256::from(SEND_GAS_ALLOWANCE);
        if balance < required {
            return Err(SubmissionError::InsufficientFunds {
                detail: format!(
                    "signer {} balance {balance} below fee + gas allowance {required}",
                    self.signer_address
                ),
            }
            .into());
        }

        let nonce = self
            .provider
            .get_transaction_count(self.signer_address)
            .await
            .map_err(|e| SubmissionError::Rpc {
                detail: e.to_string(),
                mid_broadcast: false,
            })?;

        debug!(
            dst_eid = %request.dst_eid,
            native_fee = %quote.native_fee,
            base_gas_price,
            gas_price,
            nonce,
            "Submitting send transaction"
        );

        let contract = IOFT::new(self.oft_address, &self.provider);
        let fee = MessagingFee {
            nativeFee: quote.native_fee,
            lzTokenFee: U256::ZERO,
        };
        let call = contract
            .send(request.send_param(), fee, self.signer_address)
            .value(quote.native_fee)
            .gas_price(gas_price)
            .nonce(nonce);

        let pending = call
            .send()
            .await
            .map_err(|e| classify_send_error(self.signer_address, &e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, "Send transaction broadcast, waiting for confirmation");

        let receipt_fut = pending
            .with_required_confirmations(self.options.confirmations)
            .get_receipt();

        match tokio::time::timeout(self.options.timeout, receipt_fut).await {
            // Patience expired while still pending. The transaction may
            // yet be mined; report indeterminate, never retry here.
            Err(_) => {
                warn!(tx_hash = %tx_hash, "Confirmation window expired, outcome unknown");
                Err(TransferError::ConfirmationIndeterminate {
                    tx_hash,
                    waited_secs: self.options.timeout.as_secs(),
                })
            }
            // Broadcast succeeded but the receipt could not be fetched:
            // same indeterminate territory as a timeout.
            Ok(Err(e)) => {
                warn!(tx_hash = %tx_hash, error = %e, "Receipt unavailable after broadcast");
                Err(TransferError::ConfirmationIndeterminate {
                    tx_hash,
                    waited_secs: self.options.timeout.as_secs(),
                })
            }
            Ok(Ok(receipt)) => {
                if receipt.status() {
                    info!(
                        tx_hash = %tx_hash,
                        block = receipt.block_number,
                        confirmations = self.options.confirmations,
                        "Send transaction confirmed"
                    );
                    Ok(SubmissionResult {
                        tx_hash,
                        confirmed: true,
                        block_number: receipt.block_number,
                    })
                } else {
                    Err(SubmissionError::Rejected {
                        reason: "transaction reverted on-chain".to_string(),
                        mined: true,
                    }
                    .into())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_bump_doubles_by_default() {
        let opts = SubmitOptions::default();
        assert_eq!(bump_gas_price(1_000_000_000, opts.gas_multiplier), 2_000_000_000);
    }

    #[test]
    fn test_gas_bump_is_monotonic() {
        // a multiplier below 1 never submits under the network price
        assert_eq!(bump_gas_price(1_000_000_000, 0.5), 1_000_000_000);
        assert_eq!(bump_gas_price(0, 2.0), 0);
    }

    #[test]
    fn test_classify_insufficient_funds() {
        let e = classify_send_error(
            Address::ZERO,
            "insufficient funds for gas * price + value",
        );
        assert!(matches!(e, SubmissionError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_classify_nonce_conflict() {
        for msg in [
            "nonce too low",
            "already known",
            "replacement transaction underpriced",
        ] {
            let e = classify_send_error(Address::ZERO, msg);
            assert!(
                matches!(e, SubmissionError::NonceConflict { .. }),
                "{msg} should classify as a nonce conflict"
            );
        }
    }

    #[test]
    fn test_classify_rejection() {
        let e = classify_send_error(Address::ZERO, "execution reverted: SlippageExceeded");
        assert!(matches!(
            e,
            SubmissionError::Rejected { mined: false, .. }
        ));

        let e = classify_send_error(Address::ZERO, "transaction underpriced");
        assert!(matches!(
            e,
            SubmissionError::Rejected { mined: false, .. }
        ));
    }

    #[test]
    fn test_classify_transport() {
        let e = classify_send_error(Address::ZERO, "connection timeout");
        assert!(matches!(
            e,
            SubmissionError::Rpc {
                mid_broadcast: true,
                ..
            }
        ));
    }

    #[test]
    fn test_nonce_gate_shares_lock_per_signer() {
        let gate = NonceGate::new();
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        assert!(Arc::ptr_eq(&gate.for_signer(a), &gate.for_signer(a)));
        assert!(!Arc::ptr_eq(&gate.for_signer(a), &gate.for_signer(b)));
    }

    #[tokio::test]
    async fn test_nonce_gate_serializes_same_signer() {
        let gate = NonceGate::new();
        let signer = Address::repeat_byte(3);
        let lock = gate.for_signer(signer);
        let guard = lock.lock().await;
        assert!(gate.for_signer(signer).try_lock().is_err());
        drop(guard);
        assert!(gate.for_signer(signer).try_lock().is_ok());
    }
}
