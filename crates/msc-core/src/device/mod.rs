//! Device registry adapter
//!
//! The registry answers two questions: which devices are attached, and what
//! system properties a given device reports. [`AdbRegistry`] asks the host ADB
//! server; [`mock::MockRegistry`] answers from memory for tests.

mod adb;
#[cfg(test)]
pub(crate) mod fake_server;
pub mod mock;
pub mod parse;

use std::collections::HashMap;

use async_trait::async_trait;

pub use adb::{AdbDevice, AdbRegistry};

use crate::error::MscResult;

/// Source of attached devices and their properties
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Serials of every attached device, in the order the registry reports them
    async fn list_serials(&self) -> MscResult<Vec<String>>;

    /// All system properties of one device
    async fn properties(&self, serial: &str) -> MscResult<HashMap<String, String>>;
}
