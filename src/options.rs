//! Execution options encoding (TYPE_3 wire format)
//!
//! Options describe how the delivered message may be executed on the
//! destination chain: gas for `lzReceive`, native value drops, compose
//! gas per index, ordered execution. The destination decoder walks the
//! blob positionally, so input order is semantically significant and
//! must be preserved exactly.
//!
//! Wire layout (all integers big-endian):
//!
//! ```text
//! [u16 format = 3]
//!   [u8 worker_id][u16 size][u8 kind][params]   repeated, in input order
//! ```
//!
//! Param layouts per kind:
//! - lz_receive:  gas u128, value u128 (value omitted when zero)
//! - native_drop: amount u128, receiver 32 bytes
//! - lz_compose:  index u16, gas u128, value u128 (value omitted when zero)
//! - ordered_execution: empty

use crate::error::ValidationError;

pub const TYPE_3: u16 = 3;
pub const EXECUTOR_WORKER_ID: u8 = 1;

pub const OPTION_TYPE_LZRECEIVE: u8 = 1;
pub const OPTION_TYPE_NATIVE_DROP: u8 = 2;
pub const OPTION_TYPE_LZCOMPOSE: u8 = 3;
pub const OPTION_TYPE_ORDERED_EXECUTION: u8 = 4;

/// Destination per-call gas ceiling. Anything above this is rejected
/// before encoding, since the destination VM would reject it anyway.
pub const MAX_EXECUTION_GAS: u128 = 30_000_000;

/// One destination-side execution hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOption {
    /// Gas (and optional native value) for the primary `lzReceive` call.
    LzReceive { gas: u128, value: u128 },
    /// Drop native currency to an account on the destination chain.
    NativeDrop { amount: u128, receiver: [u8; 32] },
    /// Gas (and optional native value) for a composed message at `index`.
    LzCompose { index: u16, gas: u128, value: u128 },
    /// Request in-order execution relative to other messages.
    OrderedExecution,
}

impl ExecutionOption {
    fn kind(&self) -> u8 {
        match self {
            ExecutionOption::LzReceive { .. } => OPTION_TYPE_LZRECEIVE,
            ExecutionOption::NativeDrop { .. } => OPTION_TYPE_NATIVE_DROP,
            ExecutionOption::LzCompose { .. } => OPTION_TYPE_LZCOMPOSE,
            ExecutionOption::OrderedExecution => OPTION_TYPE_ORDERED_EXECUTION,
        }
    }

    fn gas(&self) -> Option<u128> {
        match self {
            ExecutionOption::LzReceive { gas, .. } => Some(*gas),
            ExecutionOption::LzCompose { gas, .. } => Some(*gas),
            _ => None,
        }
    }

    fn params(&self) -> Vec<u8> {
        match self {
            ExecutionOption::LzReceive { gas, value } => {
                let mut params = gas.to_be_bytes().to_vec();
                if *value != 0 {
                    params.extend_from_slice(&value.to_be_bytes());
                }
                params
            }
            ExecutionOption::NativeDrop { amount, receiver } => {
                let mut params = amount.to_be_bytes().to_vec();
                params.extend_from_slice(receiver);
                params
            }
            ExecutionOption::LzCompose { index, gas, value } => {
                let mut params = index.to_be_bytes().to_vec();
                params.extend_from_slice(&gas.to_be_bytes());
                if *value != 0 {
                    params.extend_from_slice(&value.to_be_bytes());
                }
                params
            }
            ExecutionOption::OrderedExecution => Vec::new(),
        }
    }
}

/// Encode an ordered option sequence into the TYPE_3 blob.
///
/// Pure and deterministic. An empty sequence yields the bare 2-byte
/// format header, valid only for a pure value transfer with no
/// destination-side execution.
pub fn encode(options: &[ExecutionOption]) -> Result<Vec<u8>, ValidationError> {
    for option in options {
        if let Some(gas) = option.gas() {
            if gas > MAX_EXECUTION_GAS {
                return Err(ValidationError::GasLimitExceeded {
                    requested: gas,
                    max: MAX_EXECUTION_GAS,
                });
            }
        }
    }

    let mut out = TYPE_3.to_be_bytes().to_vec();
    for option in options {
        let params = option.params();
        out.push(EXECUTOR_WORKER_ID);
        // size covers the kind byte plus params
        out.extend_from_slice(&((params.len() as u16 + 1).to_be_bytes()));
        out.push(option.kind());
        out.extend_from_slice(&params);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_bare_header() {
        assert_eq!(encode(&[]).unwrap(), vec![0x00, 0x03]);
    }

    #[test]
    fn test_lz_receive_layout() {
        let blob = encode(&[ExecutionOption::LzReceive {
            gas: 65_000,
            value: 0,
        }])
        .unwrap();
        // header + worker_id + size + kind + 16-byte gas
        assert_eq!(blob.len(), 2 + 1 + 2 + 1 + 16);
        assert_eq!(&blob[0..2], &[0x00, 0x03]);
        assert_eq!(blob[2], EXECUTOR_WORKER_ID);
        assert_eq!(u16::from_be_bytes([blob[3], blob[4]]), 17);
        assert_eq!(blob[5], OPTION_TYPE_LZRECEIVE);
        assert_eq!(
            u128::from_be_bytes(blob[6..22].try_into().unwrap()),
            65_000
        );
    }

    #[test]
    fn test_lz_receive_with_value_extends_params() {
        let blob = encode(&[ExecutionOption::LzReceive {
            gas: 200_000,
            value: 7,
        }])
        .unwrap();
        assert_eq!(blob.len(), 2 + 1 + 2 + 1 + 32);
        assert_eq!(u16::from_be_bytes([blob[3], blob[4]]), 33);
    }

    #[test]
    fn test_native_drop_layout() {
        let receiver = [0xAAu8; 32];
        let blob = encode(&[ExecutionOption::NativeDrop {
            amount: 1_000,
            receiver,
        }])
        .unwrap();
        assert_eq!(blob.len(), 2 + 1 + 2 + 1 + 48);
        assert_eq!(blob[5], OPTION_TYPE_NATIVE_DROP);
        assert_eq!(&blob[22..54], &receiver);
    }

    #[test]
    fn test_lz_compose_layout() {
        let blob = encode(&[ExecutionOption::LzCompose {
            index: 2,
            gas: 50_000,
            value: 0,
        }])
        .unwrap();
        assert_eq!(blob.len(), 2 + 1 + 2 + 1 + 18);
        assert_eq!(blob[5], OPTION_TYPE_LZCOMPOSE);
        assert_eq!(u16::from_be_bytes([blob[6], blob[7]]), 2);
    }

    #[test]
    fn test_deterministic() {
        let options = [
            ExecutionOption::LzReceive {
                gas: 65_000,
                value: 0,
            },
            ExecutionOption::NativeDrop {
                amount: 10,
                receiver: [1u8; 32],
            },
        ];
        assert_eq!(encode(&options).unwrap(), encode(&options).unwrap());
    }

    #[test]
    fn test_order_sensitive() {
        let a = ExecutionOption::LzReceive {
            gas: 65_000,
            value: 0,
        };
        let b = ExecutionOption::NativeDrop {
            amount: 10,
            receiver: [1u8; 32],
        };
        let forward = encode(&[a.clone(), b.clone()]).unwrap();
        let reversed = encode(&[b, a]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let opt = ExecutionOption::LzReceive {
            gas: 65_000,
            value: 0,
        };
        let once = encode(std::slice::from_ref(&opt)).unwrap();
        let twice = encode(&[opt.clone(), opt]).unwrap();
        assert_eq!(twice.len(), once.len() * 2 - 2);
    }

    #[test]
    fn test_gas_ceiling_rejected_before_encoding() {
        let err = encode(&[ExecutionOption::LzReceive {
            gas: MAX_EXECUTION_GAS + 1,
            value: 0,
        }])
        .unwrap_err();
        assert!(matches!(err, ValidationError::GasLimitExceeded { .. }));

        let err = encode(&[ExecutionOption::LzCompose {
            index: 0,
            gas: MAX_EXECUTION_GAS + 1,
            value: 0,
        }])
        .unwrap_err();
        assert!(matches!(err, ValidationError::GasLimitExceeded { .. }));
    }

    #[test]
    fn test_ordered_execution_empty_params() {
        let blob = encode(&[ExecutionOption::OrderedExecution]).unwrap();
        assert_eq!(blob, vec![0x00, 0x03, 0x01, 0x00, 0x01, 0x04]);
    }
}
