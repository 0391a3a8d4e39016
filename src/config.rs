//! Configuration for the transfer client
//!
//! Everything comes in through the environment (with optional `.env`),
//! is validated up front, and is passed explicitly into each component;
//! there is no ambient global state.

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use eyre::{eyre, Result, WrapErr};

use crate::endpoints::EndpointDirectory;
use crate::submit::SubmitOptions;

/// Client configuration
#[derive(Clone)]
pub struct Config {
    /// Source-chain RPC endpoint.
    pub rpc_url: String,
    /// Address of the OFT contract on the source chain.
    pub oft_address: String,
    /// Signer private key (hex, 0x-prefixed).
    pub private_key: String,
    /// Extra `name=eid` network entries, extending the built-in set.
    pub networks: Option<String>,
    /// Gas price multiplier over the current network price.
    pub gas_multiplier: f64,
    /// Block confirmations to wait for after submission.
    pub confirmations: u64,
    /// Confirmation patience window in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("oft_address", &self.oft_address)
            .field("private_key", &"<redacted>")
            .field("networks", &self.networks)
            .field("gas_multiplier", &self.gas_multiplier)
            .field("confirmations", &self.confirmations)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_gas_multiplier() -> f64 {
    2.0
}

fn default_confirmations() -> u64 {
    2
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load configuration, preferring a local `.env` file.
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env").or_else(|_| Self::load_from_env())
    }

    /// Load from a specific .env file path.
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables.
    pub fn load_from_env() -> Result<Self> {
        let config = Config {
            rpc_url: env::var("OFT_RPC_URL")
                .map_err(|_| eyre!("OFT_RPC_URL environment variable is required"))?,
            oft_address: env::var("OFT_ADDRESS")
                .map_err(|_| eyre!("OFT_ADDRESS environment variable is required"))?,
            private_key: env::var("OFT_PRIVATE_KEY")
                .map_err(|_| eyre!("OFT_PRIVATE_KEY environment variable is required"))?,
            networks: env::var("OFT_NETWORKS").ok(),
            gas_multiplier: env::var("OFT_GAS_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_gas_multiplier()),
            confirmations: env::var("OFT_CONFIRMATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_confirmations()),
            timeout_secs: env::var("OFT_CONFIRM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_timeout_secs()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(eyre!("rpc_url cannot be empty"));
        }

        if self.oft_address.len() != 42 || !self.oft_address.starts_with("0x") {
            return Err(eyre!(
                "oft_address must be a valid hex address (42 chars with 0x prefix)"
            ));
        }

        if self.private_key.len() != 66 || !self.private_key.starts_with("0x") {
            return Err(eyre!("private_key must be 66 chars (0x + 64 hex chars)"));
        }

        // The gas policy must never submit below the network's current
        // price, so the multiplier floor is 1.
        if self.gas_multiplier < 1.0 {
            return Err(eyre!("gas_multiplier must be at least 1.0"));
        }

        if self.timeout_secs == 0 {
            return Err(eyre!("timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Endpoint directory from the built-in set plus configured extras.
    pub fn directory(&self) -> Result<EndpointDirectory> {
        match self.networks.as_deref() {
            Some(list) => EndpointDirectory::from_env_list(list)
                .map_err(|e| eyre!("invalid OFT_NETWORKS: {e}")),
            None => Ok(EndpointDirectory::well_known()),
        }
    }

    /// Submission policy derived from this config.
    pub fn submit_options(&self) -> SubmitOptions {
        SubmitOptions {
            confirmations: self.confirmations,
            timeout: Duration::from_secs(self.timeout_secs),
            gas_multiplier: self.gas_multiplier,
        }
    }
}
