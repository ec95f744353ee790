//! In-memory device registry for tests

use std::collections::HashMap;

use async_trait::async_trait;

use super::DeviceRegistry;
use crate::{
    error::{MscError, MscResult},
    model::{PROP_MANUFACTURER, PROP_MODEL, PROP_SDK},
};

/// Registry answering from a fixed device list
///
/// Devices are reported in insertion order. A registry built with
/// [`MockRegistry::failing`] rejects every call.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    devices: Vec<(String, HashMap<String, String>)>,
    failure: Option<String>,
}

impl MockRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose every call fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            devices: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    /// Adds a device with the given properties
    pub fn with_device(mut self, serial: impl Into<String>, props: HashMap<String, String>) -> Self {
        self.devices.push((serial.into(), props));
        self
    }

    /// Adds a device reporting model, SDK and manufacturer
    pub fn with_phone(self, serial: &str, model: &str, sdk: &str, manufacturer: &str) -> Self {
        let props = HashMap::from([
            (PROP_MODEL.to_string(), model.to_string()),
            (PROP_SDK.to_string(), sdk.to_string()),
            (PROP_MANUFACTURER.to_string(), manufacturer.to_string()),
        ]);
        self.with_device(serial, props)
    }

    fn check(&self, operation: &str) -> MscResult<()> {
        match &self.failure {
            Some(reason) => Err(MscError::adb(operation, reason)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeviceRegistry for MockRegistry {
    async fn list_serials(&self) -> MscResult<Vec<String>> {
        self.check("devices")?;
        Ok(self.devices.iter().map(|(serial, _)| serial.clone()).collect())
    }

    async fn properties(&self, serial: &str) -> MscResult<HashMap<String, String>> {
        self.check("getprop")?;
        self.devices
            .iter()
            .find(|(s, _)| s == serial)
            .map(|(_, props)| props.clone())
            .ok_or_else(|| {
                MscError::adb("get_device_by_name", format!("device '{}' not found", serial))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_in_insertion_order() {
        let registry = MockRegistry::new()
            .with_device("emulator-5556", HashMap::new())
            .with_device("emulator-5554", HashMap::new());

        let serials = registry.list_serials().await.unwrap();
        assert_eq!(serials, vec!["emulator-5556", "emulator-5554"]);
    }

    #[tokio::test]
    async fn test_properties_of_known_device() {
        let registry = MockRegistry::new().with_phone("R58M", "SM-G973F", "31", "samsung");

        let props = registry.properties("R58M").await.unwrap();
        assert_eq!(props[PROP_MODEL], "SM-G973F");
    }

    #[tokio::test]
    async fn test_unknown_device_is_an_error() {
        let registry = MockRegistry::new();

        let err = registry.properties("missing").await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_failing_registry() {
        let registry = MockRegistry::failing("connection refused");

        let err = registry.list_serials().await.unwrap_err();
        assert_eq!(err.to_string(), "ADB devices failed: connection refused");
    }
}
