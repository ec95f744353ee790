//! Capture backends and dispatch
//!
//! Each method tag maps to one adapter over an on-device helper:
//!
//! | Method | Adapter | Helper |
//! |--------|---------|--------|
//! | `adb` | [`AdbCap`] | `screencap -p` |
//! | `droidcast` | [`DroidCast`] | DroidCast app over HTTP |
//! | `minicap` | [`MiniCap`] | minicap binary, one-shot |
//! | `mumu` | [`MuMuCap`] | `screencap` on a MuMu instance |
//!
//! Callers resolve a [`CaptureTarget`](crate::model::CaptureTarget) first,
//! ask a [`BackendFactory`] for the backend, then run one
//! [`session::run_session`].

pub mod adbcap;
pub mod constants;
pub mod droidcast;
mod factory;
pub mod frame;
pub mod minicap;
pub mod mock;
pub mod mumu;
pub mod session;
pub mod traits;

pub use adbcap::AdbCap;
pub use droidcast::DroidCast;
pub use factory::AdbBackendFactory;
pub use frame::Frame;
pub use minicap::MiniCap;
pub use mock::{MockBackendFactory, MockCapture};
pub use mumu::MuMuCap;
pub use session::run_session;
pub use traits::{BackendFactory, ScreenCapture};
