//! Traits implemented by capture backends and their factory
//!
//! A backend is a scoped resource. The caller constructs it through a
//! [`BackendFactory`], then drives it through exactly one
//! `open` / `capture` / `close` cycle, normally via
//! [`run_session`](super::session::run_session).

use async_trait::async_trait;

use super::Frame;
use crate::{error::MscResult, model::CaptureMethod, model::CaptureTarget};

// ============================================================================
// Backend
// ============================================================================

/// One screenshot backend bound to one device
#[async_trait]
pub trait ScreenCapture: Send {
    /// Method tag this backend implements
    fn method(&self) -> CaptureMethod;

    /// Acquires device-side resources (connections, helper processes,
    /// port forwards).
    async fn open(&mut self) -> MscResult<()>;

    /// Grabs one frame. Only valid between `open` and `close`.
    async fn capture(&mut self) -> MscResult<Frame>;

    /// Releases whatever `open` acquired.
    ///
    /// Must be safe to call after a failed or partial `open`, and more than
    /// once.
    async fn close(&mut self) -> MscResult<()>;
}

// ============================================================================
// Factory
// ============================================================================

/// Builds backends for resolved targets and installs helpers
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Constructs the backend for `target` without touching the device
    fn create(&self, target: CaptureTarget) -> Box<dyn ScreenCapture>;

    /// Installs the DroidCast helper app on the device with `serial`
    async fn install_droidcast(&self, serial: &str) -> MscResult<()>;
}
