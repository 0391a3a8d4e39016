//! The outbound transfer pipeline
//!
//! One strictly sequential flow per transfer: resolve destination,
//! fetch token decimals (once), build the immutable request, quote the
//! fee for exactly that request, submit with the quote attached. Steps
//! are never skipped or reordered; the quote is always computed against
//! the final payload. Independent transfers run as independent
//! pipelines sharing only the read-only directory, the RPC connection,
//! and the per-signer nonce gate.

use std::str::FromStr;
use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use eyre::{Result, WrapErr};
use tracing::info;

use crate::config::Config;
use crate::contracts::{IERC20, IOFT};
use crate::endpoints::EndpointDirectory;
use crate::error::{QuoteError, TransferError};
use crate::options::ExecutionOption;
use crate::quote::FeeQuoter;
use crate::request::{recipient_to_bytes32, TransferRequestBuilder};
use crate::submit::{NonceGate, SubmissionResult, SubmitOptions, TransferSubmitter};

/// Default destination gas for the primary lzReceive call.
pub const DEFAULT_LZ_RECEIVE_GAS: u128 = 65_000;

/// One outbound transfer, as requested by the caller
#[derive(Debug, Clone)]
pub struct SendArgs {
    /// Destination network name, resolved through the directory.
    pub dst_network: String,
    /// Recipient address on the destination chain (hex).
    pub recipient: String,
    /// Human-decimal amount in token units.
    pub amount: String,
    /// Optional slippage floor; defaults to the full amount.
    pub min_amount: Option<String>,
    /// Destination gas for lzReceive.
    pub gas_limit: u128,
    /// Optional native-currency drop to the recipient, in wei.
    pub native_drop: Option<u128>,
}

/// Connected transfer client
///
/// Owns the RPC connection and signer identity; read-only collaborators
/// (directory, nonce gate) are shared across concurrent pipelines.
pub struct TransferClient<P> {
    provider: P,
    directory: EndpointDirectory,
    oft_address: Address,
    signer_address: Address,
    gate: Arc<NonceGate>,
    options: SubmitOptions,
}

/// Build a client from validated configuration.
pub fn connect(
    config: &Config,
    gate: Arc<NonceGate>,
) -> Result<TransferClient<impl Provider<Http<Client>> + Clone>> {
    let signer: PrivateKeySigner = config.private_key.parse().wrap_err("Invalid private key")?;
    let signer_address = signer.address();
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .on_http(config.rpc_url.parse().wrap_err("Invalid RPC URL")?);
    let oft_address = Address::from_str(&config.oft_address).wrap_err("Invalid OFT address")?;
    let directory = config.directory()?;

    info!(
        signer = %signer_address,
        oft = %oft_address,
        "Transfer client initialized"
    );

    Ok(TransferClient {
        provider,
        directory,
        oft_address,
        signer_address,
        gate,
        options: config.submit_options(),
    })
}

impl<P: Provider<Http<Client>> + Clone> TransferClient<P> {
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    pub fn directory(&self) -> &EndpointDirectory {
        &self.directory
    }

    /// Run the full pipeline for one transfer.
    pub async fn send(&self, args: &SendArgs) -> Result<SubmissionResult, TransferError> {
        // Resolve before anything else so an unknown destination never
        // reaches the network.
        let dst_eid = self.directory.resolve(&args.dst_network)?;

        // Token decimals are queried once and reused for both the
        // amount and the slippage floor.
        let decimals = self.token_decimals().await?;
        info!(
            dst_network = %args.dst_network,
            dst_eid = %dst_eid,
            amount = %args.amount,
            decimals,
            "Building transfer request"
        );

        let mut options = vec![ExecutionOption::LzReceive {
            gas: args.gas_limit,
            value: 0,
        }];
        if let Some(amount) = args.native_drop {
            options.push(ExecutionOption::NativeDrop {
                amount,
                receiver: recipient_to_bytes32(&args.recipient)?,
            });
        }

        let mut builder = TransferRequestBuilder::new(&self.directory)
            .destination(&args.dst_network)
            .recipient(&args.recipient)
            .amount(&args.amount, decimals)
            .options(&options);
        if let Some(min) = &args.min_amount {
            builder = builder.min_amount(min);
        }
        let request = builder.build()?;

        let quoter = FeeQuoter::new(self.provider.clone(), self.oft_address);
        let quote = quoter.quote(&request).await?;
        info!(native_fee = %quote.native_fee, "Fee quoted, submitting transfer");

        let submitter = TransferSubmitter::new(
            self.provider.clone(),
            self.oft_address,
            self.signer_address,
            self.gate.clone(),
            self.options.clone(),
        );
        submitter.submit(&request, &quote).await
    }

    /// Decimals of the transferred token (the OFT itself, or the
    /// adapter's inner token).
    async fn token_decimals(&self) -> Result<u8, QuoteError> {
        let oft = IOFT::new(self.oft_address, &self.provider);
        let inner = oft
            .token()
            .call()
            .await
            .map_err(|e| QuoteError::Unavailable(format!("token lookup failed: {e}")))?
            .inner;

        let token = IERC20::new(inner, &self.provider);
        let decimals = token
            .decimals()
            .call()
            .await
            .map_err(|e| QuoteError::Unavailable(format!("decimals lookup failed: {e}")))?
            .count;
        Ok(decimals)
    }
}
