//! Data models and type definitions for msc-core
//!
//! This module defines the value types passed between the tool surface and
//! the device layer:
//! - Capture method tags and the per-request capture target
//! - Device information assembled from Android system properties
//! - Encoded image payloads ready for transport

use std::{collections::HashMap, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{MscError, MscResult};

/// System property holding the product model name
pub const PROP_MODEL: &str = "ro.product.model";
/// System property holding the Android SDK level
pub const PROP_SDK: &str = "ro.build.version.sdk";
/// System property holding the manufacturer name
pub const PROP_MANUFACTURER: &str = "ro.product.manufacturer";

/// MIME type of every image produced by the encoder
pub const PNG_MIME_TYPE: &str = "image/png";

/// Capture backend selected by a textual method tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMethod {
    /// Raw `screencap` over the ADB shell
    #[default]
    Adb,
    /// DroidCast helper app serving frames over HTTP
    #[serde(rename = "droidcast")]
    DroidCast,
    /// minicap binary in one-shot mode
    Minicap,
    /// MuMu emulator instance reached by index
    Mumu,
}

impl CaptureMethod {
    /// Every supported method, in tag order
    pub const ALL: [CaptureMethod; 4] = [
        CaptureMethod::Adb,
        CaptureMethod::DroidCast,
        CaptureMethod::Minicap,
        CaptureMethod::Mumu,
    ];

    /// Returns the method tag as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMethod::Adb => "adb",
            CaptureMethod::DroidCast => "droidcast",
            CaptureMethod::Minicap => "minicap",
            CaptureMethod::Mumu => "mumu",
        }
    }
}

impl fmt::Display for CaptureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptureMethod {
    type Err = MscError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        CaptureMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == tag)
            .ok_or_else(|| MscError::UnknownMethod {
                method: tag.to_string(),
            })
    }
}

/// A capture request resolved to one backend and one device
///
/// Built once per request by [`CaptureTarget::resolve`]. Every variant
/// carries the identifier shape its backend expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    /// ADB serial for the `adb` method
    Adb(String),
    /// ADB serial for the `droidcast` method
    DroidCast(String),
    /// ADB serial for the `minicap` method
    Minicap(String),
    /// MuMu emulator instance index
    Mumu(u32),
}

impl CaptureTarget {
    /// Resolves a method tag and a device identifier into a target
    ///
    /// Fails with [`MscError::UnknownMethod`] for unknown tags and with
    /// [`MscError::InvalidDeviceId`] when `mumu` is given something other
    /// than a non-negative integer. No device is touched here.
    ///
    /// # Examples
    ///
    /// ```
    /// use msc_core::model::CaptureTarget;
    ///
    /// let target = CaptureTarget::resolve("mumu", "1").unwrap();
    /// assert_eq!(target, CaptureTarget::Mumu(1));
    ///
    /// assert!(CaptureTarget::resolve("mumu", "emulator-5554").is_err());
    /// assert!(CaptureTarget::resolve("invalid", "emulator-5554").is_err());
    /// ```
    pub fn resolve(method: &str, device_id: &str) -> MscResult<Self> {
        let method: CaptureMethod = method.parse()?;
        Ok(match method {
            CaptureMethod::Adb => CaptureTarget::Adb(device_id.to_string()),
            CaptureMethod::DroidCast => CaptureTarget::DroidCast(device_id.to_string()),
            CaptureMethod::Minicap => CaptureTarget::Minicap(device_id.to_string()),
            CaptureMethod::Mumu => CaptureTarget::Mumu(parse_instance_index(device_id)?),
        })
    }

    /// Returns the backend this target dispatches to
    pub fn method(&self) -> CaptureMethod {
        match self {
            CaptureTarget::Adb(_) => CaptureMethod::Adb,
            CaptureTarget::DroidCast(_) => CaptureMethod::DroidCast,
            CaptureTarget::Minicap(_) => CaptureMethod::Minicap,
            CaptureTarget::Mumu(_) => CaptureMethod::Mumu,
        }
    }
}

impl fmt::Display for CaptureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureTarget::Adb(serial)
            | CaptureTarget::DroidCast(serial)
            | CaptureTarget::Minicap(serial) => write!(f, "{}:{}", self.method(), serial),
            CaptureTarget::Mumu(index) => write!(f, "mumu:#{}", index),
        }
    }
}

fn parse_instance_index(device_id: &str) -> MscResult<u32> {
    let invalid = |reason: String| MscError::InvalidDeviceId {
        device_id: device_id.to_string(),
        reason,
    };

    let trimmed = device_id.trim();
    match trimmed.parse::<u32>() {
        Ok(index) => Ok(index),
        Err(_) if trimmed.parse::<i128>().is_ok() => Err(invalid(format!(
            "MuMu instance index must be between 0 and {}",
            u32::MAX
        ))),
        Err(_) => Err(invalid(
            "MuMu capture requires an integer index as device_id (e.g., '0')".to_string(),
        )),
    }
}

/// Device information assembled from system properties
///
/// Any property the device does not report is left as `None` and rendered
/// as `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceInfo {
    /// Product model (`ro.product.model`)
    pub model: Option<String>,
    /// SDK level (`ro.build.version.sdk`)
    pub sdk: Option<String>,
    /// Manufacturer (`ro.product.manufacturer`)
    pub manufacturer: Option<String>,
}

impl DeviceInfo {
    /// Picks the three reported fields out of a property map
    pub fn from_properties(props: &HashMap<String, String>) -> Self {
        Self {
            model: props.get(PROP_MODEL).cloned(),
            sdk: props.get(PROP_SDK).cloned(),
            manufacturer: props.get(PROP_MANUFACTURER).cloned(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| "Unknown".into());
        write!(
            f,
            "Model: {}\nSDK: {}\nManufacturer: {}",
            or_unknown(&self.model),
            or_unknown(&self.sdk),
            or_unknown(&self.manufacturer)
        )
    }
}

/// Compressed image bytes plus their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded bytes (PNG)
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// Wraps PNG bytes
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: PNG_MIME_TYPE,
        }
    }
}
