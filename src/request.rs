//! Transfer request assembly
//!
//! Builds the canonical, chain-agnostic send payload from user-supplied
//! destination/recipient/amount. All validation happens here, before
//! any network call; the resulting `TransferRequest` is immutable and
//! is what both the fee quote and the submission are computed against.

use alloy::primitives::{keccak256, Bytes, FixedBytes, B256, U256};

use crate::amount::parse_units;
use crate::contracts::SendParam;
use crate::endpoints::{EndpointDirectory, EndpointId};
use crate::error::ValidationError;
use crate::options::{self, ExecutionOption};

/// Canonical transfer descriptor, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub dst_eid: EndpointId,
    /// Recipient in 32-byte canonical form (zero-padded on the left
    /// when the source representation is a 20-byte address).
    pub to: [u8; 32],
    pub amount_ld: U256,
    /// Slippage floor; always <= amount_ld.
    pub min_amount_ld: U256,
    pub extra_options: Vec<u8>,
    pub compose_msg: Vec<u8>,
    pub oft_cmd: Vec<u8>,
}

impl TransferRequest {
    /// Wire-format payload for quoteSend/send.
    pub fn send_param(&self) -> SendParam {
        SendParam {
            dstEid: self.dst_eid.to_u32(),
            to: FixedBytes::from(self.to),
            amountLD: self.amount_ld,
            minAmountLD: self.min_amount_ld,
            extraOptions: Bytes::from(self.extra_options.clone()),
            composeMsg: Bytes::from(self.compose_msg.clone()),
            oftCmd: Bytes::from(self.oft_cmd.clone()),
        }
    }

    /// Digest over every field, used to bind a fee quote to exactly
    /// this request. Variable-length fields are length-prefixed so no
    /// two distinct requests share an encoding.
    pub fn digest(&self) -> B256 {
        let mut data = Vec::with_capacity(
            4 + 32
                + 64
                + 12
                + self.extra_options.len()
                + self.compose_msg.len()
                + self.oft_cmd.len(),
        );
        data.extend_from_slice(&self.dst_eid.to_u32().to_be_bytes());
        data.extend_from_slice(&self.to);
        data.extend_from_slice(&self.amount_ld.to_be_bytes::<32>());
        data.extend_from_slice(&self.min_amount_ld.to_be_bytes::<32>());
        for field in [&self.extra_options, &self.compose_msg, &self.oft_cmd] {
            data.extend_from_slice(&(field.len() as u32).to_be_bytes());
            data.extend_from_slice(field);
        }
        keccak256(&data)
    }
}

/// Pad a hex-encoded recipient to the 32-byte canonical form.
///
/// Accepts a 20-byte EVM address (padded with 12 leading zero bytes)
/// or an already-canonical 32-byte value.
pub fn recipient_to_bytes32(recipient: &str) -> Result<[u8; 32], ValidationError> {
    let hex_str = recipient.strip_prefix("0x").unwrap_or(recipient);
    let raw = hex::decode(hex_str)
        .map_err(|_| ValidationError::InvalidRecipient(format!("malformed hex: {recipient}")))?;

    let mut out = [0u8; 32];
    match raw.len() {
        20 => out[12..32].copy_from_slice(&raw),
        32 => out.copy_from_slice(&raw),
        n => {
            return Err(ValidationError::InvalidRecipient(format!(
                "expected 20 or 32 bytes, got {n}: {recipient}"
            )))
        }
    }
    Ok(out)
}

/// Assembles and validates a `TransferRequest`
///
/// Validation order: destination resolves, amount parses, recipient
/// pads, slippage floor holds. Pure aside from the read-only directory
/// lookup.
pub struct TransferRequestBuilder<'a> {
    directory: &'a EndpointDirectory,
    destination: Option<String>,
    recipient: Option<String>,
    amount: Option<String>,
    decimals: u8,
    min_amount: Option<String>,
    options: Vec<ExecutionOption>,
    compose_msg: Vec<u8>,
    oft_cmd: Vec<u8>,
}

impl<'a> TransferRequestBuilder<'a> {
    pub fn new(directory: &'a EndpointDirectory) -> Self {
        Self {
            directory,
            destination: None,
            recipient: None,
            amount: None,
            decimals: 18,
            min_amount: None,
            options: Vec::new(),
            compose_msg: Vec::new(),
            oft_cmd: Vec::new(),
        }
    }

    pub fn destination(mut self, network: &str) -> Self {
        self.destination = Some(network.to_string());
        self
    }

    pub fn recipient(mut self, address: &str) -> Self {
        self.recipient = Some(address.to_string());
        self
    }

    /// Human-decimal amount with the token's declared decimal count.
    pub fn amount(mut self, human: &str, decimals: u8) -> Self {
        self.amount = Some(human.to_string());
        self.decimals = decimals;
        self
    }

    /// Explicit slippage floor; defaults to the full amount.
    pub fn min_amount(mut self, human: &str) -> Self {
        self.min_amount = Some(human.to_string());
        self
    }

    /// Destination execution options, applied strictly in input order.
    pub fn options(mut self, options: &[ExecutionOption]) -> Self {
        self.options = options.to_vec();
        self
    }

    pub fn compose_msg(mut self, msg: Vec<u8>) -> Self {
        self.compose_msg = msg;
        self
    }

    pub fn oft_cmd(mut self, cmd: Vec<u8>) -> Self {
        self.oft_cmd = cmd;
        self
    }

    pub fn build(self) -> Result<TransferRequest, ValidationError> {
        let destination = self.destination.as_deref().unwrap_or("");
        let dst_eid = self.directory.resolve(destination)?;

        let amount = self
            .amount
            .as_deref()
            .ok_or_else(|| ValidationError::InvalidAmount("amount is required".to_string()))?;
        let amount_ld = parse_units(amount, self.decimals)?;

        let recipient = self.recipient.as_deref().ok_or_else(|| {
            ValidationError::InvalidRecipient("recipient is required".to_string())
        })?;
        let to = recipient_to_bytes32(recipient)?;

        let min_amount_ld = match self.min_amount.as_deref() {
            Some(min) => parse_units(min, self.decimals)?,
            None => amount_ld,
        };
        if min_amount_ld > amount_ld {
            return Err(ValidationError::InvalidAmount(format!(
                "slippage floor {min_amount_ld} exceeds amount {amount_ld}"
            )));
        }

        // No options means no destination-side execution is requested;
        // the payload carries empty bytes rather than a bare header so
        // contract-enforced options apply unmodified.
        let extra_options = if self.options.is_empty() {
            Vec::new()
        } else {
            options::encode(&self.options)?
        };

        Ok(TransferRequest {
            dst_eid,
            to,
            amount_ld,
            min_amount_ld,
            extra_options,
            compose_msg: self.compose_msg,
            oft_cmd: self.oft_cmd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

    fn directory() -> EndpointDirectory {
        EndpointDirectory::well_known()
    }

    fn valid_builder(dir: &EndpointDirectory) -> TransferRequestBuilder<'_> {
        TransferRequestBuilder::new(dir)
            .destination("sepolia")
            .recipient(RECIPIENT)
            .amount("1.5", 6)
    }

    #[test]
    fn test_build_valid_request() {
        let dir = directory();
        let request = valid_builder(&dir).build().unwrap();
        assert_eq!(request.dst_eid, EndpointId(40161));
        assert_eq!(request.amount_ld, U256::from(1_500_000u64));
        assert_eq!(request.min_amount_ld, request.amount_ld);
        assert!(request.extra_options.is_empty());
    }

    #[test]
    fn test_unknown_destination_rejected() {
        let dir = directory();
        let err = TransferRequestBuilder::new(&dir)
            .destination("unknown-chain")
            .recipient(RECIPIENT)
            .amount("1", 6)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownDestination("unknown-chain".to_string())
        );
    }

    #[test]
    fn test_precision_loss_rejected_at_build() {
        let dir = directory();
        let err = TransferRequestBuilder::new(&dir)
            .destination("sepolia")
            .recipient(RECIPIENT)
            .amount("1.23456789", 6)
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
    }

    #[test]
    fn test_recipient_padded_to_32_bytes() {
        let to = recipient_to_bytes32(RECIPIENT).unwrap();
        assert_eq!(&to[..12], &[0u8; 12]);
        assert_eq!(to[12], 0xd8);
        assert_eq!(to[31], 0x45);
    }

    #[test]
    fn test_canonical_32_byte_recipient_accepted() {
        let canonical = format!("0x{}", hex::encode([7u8; 32]));
        assert_eq!(recipient_to_bytes32(&canonical).unwrap(), [7u8; 32]);
    }

    #[test]
    fn test_malformed_recipient_rejected() {
        assert!(matches!(
            recipient_to_bytes32("0xzz"),
            Err(ValidationError::InvalidRecipient(_))
        ));
        assert!(matches!(
            recipient_to_bytes32("0x1234"),
            Err(ValidationError::InvalidRecipient(_))
        ));
    }

    #[test]
    fn test_slippage_floor_enforced_at_build() {
        let dir = directory();
        let err = valid_builder(&dir).min_amount("2.0").build().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));

        let request = valid_builder(&dir).min_amount("1.0").build().unwrap();
        assert_eq!(request.min_amount_ld, U256::from(1_000_000u64));
        assert!(request.min_amount_ld <= request.amount_ld);
    }

    #[test]
    fn test_options_encoded_into_request() {
        let dir = directory();
        let request = valid_builder(&dir)
            .options(&[ExecutionOption::LzReceive {
                gas: 65_000,
                value: 0,
            }])
            .build()
            .unwrap();
        assert_eq!(&request.extra_options[..2], &[0x00, 0x03]);
    }

    #[test]
    fn test_digest_binds_every_field() {
        let dir = directory();
        let base = valid_builder(&dir).build().unwrap();
        let same = valid_builder(&dir).build().unwrap();
        assert_eq!(base.digest(), same.digest());

        let other_amount = valid_builder(&dir)
            .min_amount("1.0")
            .build()
            .unwrap();
        assert_ne!(base.digest(), other_amount.digest());

        let other_dest = TransferRequestBuilder::new(&dir)
            .destination("base-sepolia")
            .recipient(RECIPIENT)
            .amount("1.5", 6)
            .build()
            .unwrap();
        assert_ne!(base.digest(), other_dest.digest());
    }
}
