//! Error types for device access and screenshot capture
//!
//! This module defines the error type shared by the device registry adapter,
//! the capture backends, and the PNG encoder. Each error carries enough
//! context to build a human-readable message and provides an actionable
//! remediation hint through [`MscError::remediation_hint`].
//!
//! Formatting errors into tool responses happens at the outer edge (the MCP
//! server and the CLI); everything inside `msc-core` returns [`MscResult`].

use std::path::PathBuf;

use crate::model::CaptureMethod;

/// Result type alias for device and capture operations
pub type MscResult<T> = Result<T, MscError>;

/// Error type for device registry, capture backend, and encoding operations
#[derive(Debug, thiserror::Error)]
pub enum MscError {
    /// Capture method tag is not one of the known backends
    #[error("Unknown capture method: {method}")]
    UnknownMethod {
        /// The tag that was requested
        method: String,
    },

    /// Device identifier has the wrong shape for the selected backend
    #[error("Invalid device id '{device_id}': {reason}")]
    InvalidDeviceId {
        /// The identifier as supplied by the caller
        device_id: String,
        /// Why it was rejected
        reason: String,
    },

    /// An ADB server or device command failed
    #[error("ADB {operation} failed: {reason}")]
    Adb {
        /// Operation that failed (e.g., "devices", "shell", "install")
        operation: String,
        /// Message reported by the ADB client
        reason: String,
    },

    /// An on-device helper needed by a backend is missing
    #[error("{method} helper is not installed on device '{serial}'")]
    HelperNotInstalled {
        /// Backend that needs the helper
        method: CaptureMethod,
        /// Device serial
        serial: String,
    },

    /// An on-device helper was started but never answered
    #[error("{method} helper did not become ready within {duration_ms}ms")]
    HelperTimeout {
        /// Backend whose helper timed out
        method: CaptureMethod,
        /// How long we waited
        duration_ms: u64,
    },

    /// A host-side helper file (APK, prebuilt binary) does not exist
    #[error("Helper asset not found: {}", path.display())]
    AssetNotFound {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// HTTP request to an on-device helper failed
    #[error("HTTP request to {url} failed: {reason}")]
    Http {
        /// Requested URL
        url: String,
        /// Transport or status error
        reason: String,
    },

    /// Captured bytes could not be decoded into a pixel grid
    #[error("Failed to decode captured frame: {reason}")]
    DecodeFailed {
        /// Reason reported by the decoder
        reason: String,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A blocking device call panicked or was cancelled
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for MscError {
    fn from(err: tokio::task::JoinError) -> Self {
        MscError::TaskFailed(err.to_string())
    }
}

impl MscError {
    /// Builds an [`MscError::Adb`] from any displayable client error
    pub fn adb(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        MscError::Adb {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true when the caller supplied a bad argument
    ///
    /// These errors are raised before any device resource is acquired.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MscError::UnknownMethod { .. } | MscError::InvalidDeviceId { .. })
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use msc_core::error::MscError;
    ///
    /// let error = MscError::UnknownMethod {
    ///     method: "scrcpy".to_string(),
    /// };
    ///
    /// assert!(error.remediation_hint().contains("adb"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            MscError::UnknownMethod { .. } => {
                "Use one of the supported capture methods: adb, droidcast, minicap, mumu."
            }
            MscError::InvalidDeviceId { .. } => {
                "The mumu method takes the emulator instance index (e.g., '0'), not an ADB \
                 serial. Other methods take the serial shown by list_devices."
            }
            MscError::Adb { .. } => {
                "Check that the ADB server is running ('adb start-server'), the device is listed \
                 by list_devices, and USB debugging is authorized on the device."
            }
            MscError::HelperNotInstalled { method, .. } => match method {
                CaptureMethod::DroidCast => {
                    "Call install_droidcast for this device before capturing with droidcast."
                }
                CaptureMethod::Minicap => {
                    "Provide the minicap prebuilt directory so the binary matching the device \
                     ABI and SDK can be pushed."
                }
                _ => "Install the helper required by this capture method.",
            },
            MscError::HelperTimeout { .. } => {
                "The helper process did not start. Reinstall it, check 'adb logcat' for crashes, \
                 or fall back to the adb method."
            }
            MscError::AssetNotFound { .. } => {
                "Point the server at the helper files with --droidcast-apk or --minicap-dir."
            }
            MscError::Http { .. } => {
                "The helper's port forward may have been removed. Retry the capture, or restart \
                 the ADB server."
            }
            MscError::DecodeFailed { .. } => {
                "The device returned data that is not an image. The screen may be secure \
                 (FLAG_SECURE) or the helper may not support this Android version."
            }
            MscError::EncodingFailed { .. } => {
                "Image encoding failed. Ensure the captured frame is non-empty."
            }
            MscError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
            MscError::TaskFailed(_) => "A device call was interrupted. Retry the operation.",
        }
    }
}
