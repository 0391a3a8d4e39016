//! Outbound cross-chain OFT transfer client
//!
//! Orchestrates the client side of an omnichain token send: encode
//! destination execution options, assemble the canonical send payload,
//! quote the delivery fee for exactly that payload, then submit with
//! the fee attached and track confirmation. Quote-before-send is the
//! core invariant: a quote is bound to the request it was computed for
//! and is never reused.

pub mod amount;
pub mod config;
pub mod confirmation;
pub mod contracts;
pub mod endpoints;
pub mod error;
pub mod options;
pub mod quote;
pub mod request;
pub mod submit;
pub mod transfer;

pub use config::Config;
pub use confirmation::{ConfirmationChecker, ConfirmationStatus};
pub use endpoints::{EndpointDirectory, EndpointId};
pub use error::{QuoteError, SubmissionError, TransferError, ValidationError};
pub use options::ExecutionOption;
pub use quote::{FeeQuote, FeeQuoter};
pub use request::{TransferRequest, TransferRequestBuilder};
pub use submit::{NonceGate, SubmissionResult, SubmitOptions, TransferSubmitter};
pub use transfer::{SendArgs, TransferClient};
