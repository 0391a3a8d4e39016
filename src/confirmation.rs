//! Receipt polling for submitted transactions
//!
//! Raw JSON-RPC checker used to reconcile transactions whose outcome
//! was left indeterminate by the submitter (confirmation window
//! expired). A timed-out transfer may still be mined, so the only safe
//! move is to look the transaction up again rather than resubmit.

use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;

/// Observed state of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// No receipt yet; still in (or dropped from) the mempool.
    Pending,
    /// Mined, waiting for more confirmations.
    WaitingConfirmations(u64),
    /// Mined with enough confirmations.
    Confirmed { block: u64 },
    /// Mined but reverted.
    Failed,
}

#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Transaction confirmation checker
pub struct ConfirmationChecker {
    client: Client,
    rpc_url: String,
    required_confirmations: u64,
}

impl ConfirmationChecker {
    pub fn new(rpc_url: String, required_confirmations: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rpc_url,
            required_confirmations,
        })
    }

    /// Look up a transaction and report its confirmation state.
    pub async fn check(&self, tx_hash: &str) -> Result<ConfirmationStatus> {
        let receipt = match self.get_transaction_receipt(tx_hash).await? {
            Some(receipt) => receipt,
            None => return Ok(ConfirmationStatus::Pending),
        };

        if receipt.status.as_deref() == Some("0x0") {
            return Ok(ConfirmationStatus::Failed);
        }

        let tx_block = parse_hex_u64(receipt.block_number.as_deref().unwrap_or_default())?;
        let current_block = self.get_block_number().await?;
        let confirmations = current_block.saturating_sub(tx_block);

        if confirmations >= self.required_confirmations {
            Ok(ConfirmationStatus::Confirmed { block: tx_block })
        } else {
            Ok(ConfirmationStatus::WaitingConfirmations(confirmations))
        }
    }

    async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_getTransactionReceipt",
            "params": [tx_hash],
            "id": 1
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .json::<RpcResponse<TransactionReceipt>>()
            .await?;

        if let Some(error) = response.error {
            return Err(eyre!("RPC error: {} - {}", error.code, error.message));
        }

        Ok(response.result)
    }

    async fn get_block_number(&self) -> Result<u64> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_blockNumber",
            "params": [],
            "id": 1
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .json::<RpcResponse<String>>()
            .await?;

        let hex = response
            .result
            .ok_or_else(|| eyre!("No block number returned"))?;
        parse_hex_u64(&hex)
    }
}

fn parse_hex_u64(hex: &str) -> Result<u64> {
    Ok(u64::from_str_radix(hex.trim_start_matches("0x"), 16)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x64").unwrap(), 100);
        assert_eq!(parse_hex_u64("0x0").unwrap(), 0);
        assert!(parse_hex_u64("0xzz").is_err());
    }
}
