//! Fee quoting
//!
//! Asks the messaging endpoint what delivering a given transfer will
//! cost in native currency. The call is read-only and mutates nothing;
//! the returned quote is a best-effort snapshot, computed fresh per
//! request immediately before submission and never reused. Each quote
//! carries the digest of the request it was computed for, which the
//! submitter checks before attaching it.

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::transports::http::{Client, Http};
use tracing::debug;

use crate::contracts::IOFT;
use crate::error::QuoteError;
use crate::request::TransferRequest;

/// Fee quote for one specific transfer request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeQuote {
    pub native_fee: U256,
    pub lz_token_fee: U256,
    /// Digest of the request this quote was computed for.
    pub request_digest: B256,
}

/// Read-only fee quoter against the OFT contract
pub struct FeeQuoter<P> {
    provider: P,
    oft_address: Address,
}

impl<P: Provider<Http<Client>> + Clone> FeeQuoter<P> {
    pub fn new(provider: P, oft_address: Address) -> Self {
        Self {
            provider,
            oft_address,
        }
    }

    /// Quote the native-currency cost of delivering `request`.
    ///
    /// Network or RPC failures abort the transfer: guessing a fee and
    /// under-funding a cross-chain send can lose the message.
    pub async fn quote(&self, request: &TransferRequest) -> Result<FeeQuote, QuoteError> {
        let contract = IOFT::new(self.oft_address, &self.provider);
        let fee = contract
            .quoteSend(request.send_param(), false)
            .call()
            .await
            .map_err(|e| QuoteError::Unavailable(e.to_string()))?
            .msgFee;

        debug!(
            dst_eid = %request.dst_eid,
            native_fee = %fee.nativeFee,
            lz_token_fee = %fee.lzTokenFee,
            "Fee quote received"
        );

        Ok(FeeQuote {
            native_fee: fee.nativeFee,
            lz_token_fee: fee.lzTokenFee,
            request_digest: request.digest(),
        })
    }
}
