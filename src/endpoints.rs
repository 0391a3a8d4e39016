//! Endpoint directory: logical network names -> messaging endpoint IDs
//!
//! Destinations are addressed by a 4-byte endpoint ID in the messaging
//! network's own namespace, not by EVM chain ID. The directory is built
//! from static configuration and consulted before any network call, so
//! an unconfigured destination fails locally.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValidationError;

/// Opaque endpoint identifier for a destination chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(pub u32);

impl EndpointId {
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EndpointId {
    fn from(id: u32) -> Self {
        EndpointId(id)
    }
}

/// Maps network names to endpoint IDs
///
/// Read-only after construction; shared freely across concurrent
/// transfer pipelines.
#[derive(Debug, Clone)]
pub struct EndpointDirectory {
    networks: BTreeMap<String, EndpointId>,
}

impl EndpointDirectory {
    /// Build a directory from explicit entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let networks = entries
            .into_iter()
            .map(|(name, eid)| (name.into(), EndpointId(eid)))
            .collect();
        Self { networks }
    }

    /// Directory of well-known networks.
    pub fn well_known() -> Self {
        Self::new([
            ("ethereum", 30101),
            ("bsc", 30102),
            ("linea", 30183),
            ("base", 30184),
            ("sepolia", 40161),
            ("avalanche-testnet", 40106),
            ("base-sepolia", 40245),
        ])
    }

    /// Parse a `name=eid,name=eid` list, e.g. from an env var.
    ///
    /// Entries extend the well-known set; a name that appears in both
    /// takes the configured value.
    pub fn from_env_list(list: &str) -> Result<Self, ValidationError> {
        let mut dir = Self::well_known();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, eid) = entry.split_once('=').ok_or_else(|| {
                ValidationError::UnknownDestination(format!(
                    "malformed network entry '{entry}', expected name=eid"
                ))
            })?;
            let eid: u32 = eid.trim().parse().map_err(|_| {
                ValidationError::UnknownDestination(format!(
                    "malformed endpoint id in network entry '{entry}'"
                ))
            })?;
            dir.networks.insert(name.trim().to_string(), EndpointId(eid));
        }
        Ok(dir)
    }

    /// Resolve a network name to its endpoint ID.
    pub fn resolve(&self, name: &str) -> Result<EndpointId, ValidationError> {
        self.networks
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UnknownDestination(name.to_string()))
    }

    /// Reverse lookup, used for log output.
    pub fn network_name(&self, eid: EndpointId) -> Option<&str> {
        self.networks
            .iter()
            .find(|(_, v)| **v == eid)
            .map(|(k, _)| k.as_str())
    }

    /// All configured networks in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EndpointId)> {
        self.networks.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
