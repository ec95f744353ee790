//! Centralized defaults for the capture backends.
//!
//! Every value here is the default of a [`BackendConfig`](crate::config::BackendConfig)
//! field or a fixed on-device location used by one of the helpers.
//!
//! | Constant | Default | Used by |
//! |----------|---------|---------|
//! | [`ADB_SERVER_ADDR`] | `127.0.0.1:5037` | all |
//! | [`DROIDCAST_DEVICE_PORT`] | 53516 | droidcast |
//! | [`DROIDCAST_READY_TIMEOUT_MS`] | 5000 | droidcast |
//! | [`HTTP_TIMEOUT_MS`] | 10000 | droidcast |
//! | [`MUMU_BASE_PORT`] | 16384 | mumu |
//! | [`MUMU_PORT_STRIDE`] | 32 | mumu |

use std::net::{Ipv4Addr, SocketAddrV4};

/// Address of the host ADB server (`adb start-server` default).
pub const ADB_SERVER_ADDR: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5037);

/// Package name of the DroidCast helper app.
pub const DROIDCAST_PACKAGE: &str = "com.rayworks.droidcast";

/// Entry class started through `app_process`.
pub const DROIDCAST_MAIN_CLASS: &str = "com.rayworks.droidcast.Main";

/// File name of the DroidCast APK looked up next to the binary by default.
pub const DROIDCAST_APK_NAME: &str = "DroidCast.apk";

/// Port the DroidCast HTTP server listens on, on the device side.
pub const DROIDCAST_DEVICE_PORT: u16 = 53516;

/// How long to wait for a freshly started DroidCast server to answer.
///
/// `app_process` startup on older emulators takes 1-3s.
pub const DROIDCAST_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between DroidCast readiness checks.
pub const DROIDCAST_POLL_INTERVAL_MS: u64 = 250;

/// Timeout for a single HTTP request to an on-device helper.
pub const HTTP_TIMEOUT_MS: u64 = 10_000;

/// Device directory where helper binaries are pushed.
pub const DEVICE_TMP_DIR: &str = "/data/local/tmp";

/// On-device path of the minicap binary.
pub const MINICAP_DEVICE_BIN: &str = "/data/local/tmp/minicap";

/// On-device path of the minicap shared library.
pub const MINICAP_DEVICE_LIB: &str = "/data/local/tmp/minicap.so";

/// ADB port of MuMu instance 0.
pub const MUMU_BASE_PORT: u16 = 16384;

/// Port distance between consecutive MuMu instances.
pub const MUMU_PORT_STRIDE: u16 = 32;
