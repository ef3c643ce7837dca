//! Tracer configuration
//!
//! The configuration carries the allow-list of trusted code addresses that
//! the scanner matches delegate calls against, and the size of the bounded
//! queue between the tracer and the scan worker.
//!
//! Configurations can be built in code or loaded from JSON:
//!
//! ```
//! use revm_safe_trace::config::TracerConfig;
//!
//! let config = TracerConfig::from_json(
//!     r#"{ "trustedAddresses": ["0x44e7f5855a77fe1793a96be8a1c9c3eaf47e9d09"], "scanQueueCapacity": 64 }"#,
//! ).unwrap();
//! assert_eq!(config.scan_queue_capacity, 64);
//! ```

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Safe master copy trusted by default
pub const SAFE_MASTER_COPY: Address = address!("44e7f5855a77fe1793a96be8a1c9c3eaf47e9d09");

/// Default number of finished traces buffered for the scan worker
pub const DEFAULT_SCAN_QUEUE_CAPACITY: usize = 1024;

/// Configuration of a [`CallTracer`](crate::CallTracer) and its scan worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TracerConfig {
    /// Code addresses whose delegate calls are reported
    pub trusted_addresses: Vec<Address>,
    /// Capacity of the queue feeding the scan worker
    pub scan_queue_capacity: usize,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            trusted_addresses: vec![SAFE_MASTER_COPY],
            scan_queue_capacity: DEFAULT_SCAN_QUEUE_CAPACITY,
        }
    }
}

impl TracerConfig {
    /// Creates a configuration trusting exactly `addresses`
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self {
            trusted_addresses: addresses.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Parses and validates a JSON configuration
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Adds a trusted address, ignoring duplicates
    pub fn with_trusted_address(mut self, address: Address) -> Self {
        if !self.trusted_addresses.contains(&address) {
            self.trusted_addresses.push(address);
        }
        self
    }

    /// Sets the scan queue capacity
    pub fn with_scan_queue_capacity(mut self, capacity: usize) -> Self {
        self.scan_queue_capacity = capacity;
        self
    }

    /// Checks the configuration for values the tracer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}
