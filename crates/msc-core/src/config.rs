//! Runtime configuration for the device layer
//!
//! There is no configuration file. Binaries start from
//! [`BackendConfig::default`] and apply command-line overrides through the
//! `with_*` setters.

use std::{net::SocketAddrV4, path::PathBuf, time::Duration};

use crate::capture::constants::{
    ADB_SERVER_ADDR, DROIDCAST_APK_NAME, DROIDCAST_DEVICE_PORT, DROIDCAST_READY_TIMEOUT_MS,
    HTTP_TIMEOUT_MS, MUMU_BASE_PORT, MUMU_PORT_STRIDE,
};

/// Settings shared by the registry adapter and every capture backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Host ADB server
    pub adb_server: SocketAddrV4,
    /// Host path of the DroidCast APK installed by `install_droidcast`
    pub droidcast_apk: PathBuf,
    /// Device-side DroidCast port
    pub droidcast_port: u16,
    /// How long to wait for DroidCast to answer after start
    pub droidcast_ready_timeout: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Root of the minicap prebuilt tree (`<abi>/bin/minicap`,
    /// `<abi>/lib/android-<sdk>/minicap.so`); `None` means "already on device"
    pub minicap_dir: Option<PathBuf>,
    /// ADB port of MuMu instance 0
    pub mumu_base_port: u16,
    /// Port distance between MuMu instances
    pub mumu_port_stride: u16,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            adb_server: ADB_SERVER_ADDR,
            droidcast_apk: PathBuf::from(DROIDCAST_APK_NAME),
            droidcast_port: DROIDCAST_DEVICE_PORT,
            droidcast_ready_timeout: Duration::from_millis(DROIDCAST_READY_TIMEOUT_MS),
            http_timeout: Duration::from_millis(HTTP_TIMEOUT_MS),
            minicap_dir: None,
            mumu_base_port: MUMU_BASE_PORT,
            mumu_port_stride: MUMU_PORT_STRIDE,
        }
    }
}

impl BackendConfig {
    /// Overrides the ADB server address
    pub fn with_adb_server(mut self, addr: SocketAddrV4) -> Self {
        self.adb_server = addr;
        self
    }

    /// Overrides the DroidCast APK path
    pub fn with_droidcast_apk(mut self, path: impl Into<PathBuf>) -> Self {
        self.droidcast_apk = path.into();
        self
    }

    /// Sets the minicap prebuilt directory
    pub fn with_minicap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.minicap_dir = Some(dir.into());
        self
    }

    /// ADB port of the given MuMu instance, or `None` on overflow
    ///
    /// # Examples
    ///
    /// ```
    /// use msc_core::config::BackendConfig;
    ///
    /// let config = BackendConfig::default();
    /// assert_eq!(config.mumu_port(0), Some(16384));
    /// assert_eq!(config.mumu_port(1), Some(16416));
    /// assert_eq!(config.mumu_port(5000), None);
    /// ```
    pub fn mumu_port(&self, index: u32) -> Option<u16> {
        let offset = index.checked_mul(u32::from(self.mumu_port_stride))?;
        let port = u32::from(self.mumu_base_port).checked_add(offset)?;
        u16::try_from(port).ok()
    }
}
