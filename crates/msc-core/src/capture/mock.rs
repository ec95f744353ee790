//! Mock capture backend and factory for testing
//!
//! [`MockCapture`] returns black frames and counts how often each lifecycle
//! step runs. [`MockBackendFactory`] hands out mocks that share one set of
//! [`Counters`], so a test can check that a request created, opened,
//! captured and released exactly what it should.
//!
//! # Examples
//!
//! ```
//! use msc_core::capture::{
//!     mock::{MockBackendFactory, Phase},
//!     session::run_session,
//!     BackendFactory,
//! };
//! use msc_core::model::CaptureTarget;
//!
//! #[tokio::main]
//! async fn main() {
//!     let factory = MockBackendFactory::new().failing_at(Phase::Capture);
//!     let mut backend = factory.create(CaptureTarget::Adb("emulator-5554".into()));
//!
//!     assert!(run_session(backend.as_mut(), |_| Ok(())).await.is_err());
//!     assert_eq!(factory.counters().closed(), 1);
//! }
//! ```

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{BackendFactory, Frame, ScreenCapture};
use crate::{
    error::{MscError, MscResult},
    model::{CaptureMethod, CaptureTarget},
};

/// Default mock frame width and height
pub const MOCK_FRAME_SIZE: u32 = 100;

/// Lifecycle step where an error can be injected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `ScreenCapture::open`
    Open,
    /// `ScreenCapture::capture`
    Capture,
    /// `ScreenCapture::close`
    Close,
    /// `BackendFactory::install_droidcast`
    Install,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Open => "open",
            Phase::Capture => "capture",
            Phase::Close => "close",
            Phase::Install => "install",
        };
        f.write_str(name)
    }
}

fn injected(phase: Phase) -> MscError {
    MscError::adb(phase.to_string(), "injected failure")
}

/// Shared lifecycle counters
#[derive(Debug, Clone, Default)]
pub struct Counters {
    created: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
    captured: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl Counters {
    /// Backends constructed by a factory
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// `open` calls
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// `capture` calls
    pub fn captured(&self) -> usize {
        self.captured.load(Ordering::SeqCst)
    }

    /// `close` calls
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// `(created, opened, captured, closed)`
    pub fn snapshot(&self) -> (usize, usize, usize, usize) {
        (self.created(), self.opened(), self.captured(), self.closed())
    }
}

/// Backend returning black frames
#[derive(Debug, Clone)]
pub struct MockCapture {
    method: CaptureMethod,
    size: (u32, u32),
    failures: Vec<Phase>,
    counters: Counters,
}

impl MockCapture {
    /// Creates a mock reporting `method`
    pub fn new(method: CaptureMethod) -> Self {
        Self {
            method,
            size: (MOCK_FRAME_SIZE, MOCK_FRAME_SIZE),
            failures: Vec::new(),
            counters: Counters::default(),
        }
    }

    /// Makes `phase` fail with an injected ADB error
    pub fn failing_at(mut self, phase: Phase) -> Self {
        self.failures.push(phase);
        self
    }

    /// Sets the size of captured frames
    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Counters updated by this mock
    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }

    fn check(&self, phase: Phase) -> MscResult<()> {
        if self.failures.contains(&phase) {
            Err(injected(phase))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ScreenCapture for MockCapture {
    fn method(&self) -> CaptureMethod {
        self.method
    }

    async fn open(&mut self) -> MscResult<()> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        self.check(Phase::Open)
    }

    async fn capture(&mut self) -> MscResult<Frame> {
        self.counters.captured.fetch_add(1, Ordering::SeqCst);
        self.check(Phase::Capture)?;
        Ok(Frame::black(self.size.0, self.size.1))
    }

    async fn close(&mut self) -> MscResult<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.check(Phase::Close)
    }
}

/// Factory handing out [`MockCapture`] backends
#[derive(Debug, Default)]
pub struct MockBackendFactory {
    size: Option<(u32, u32)>,
    failures: Vec<Phase>,
    counters: Counters,
    targets: Mutex<Vec<CaptureTarget>>,
    installs: Mutex<Vec<String>>,
}

impl MockBackendFactory {
    /// Creates a factory whose backends always succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `phase` fail on every backend (or on install)
    pub fn failing_at(mut self, phase: Phase) -> Self {
        self.failures.push(phase);
        self
    }

    /// Sets the size of captured frames
    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Counters shared by every backend this factory created
    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }

    /// Targets passed to `create`, in call order
    pub fn targets(&self) -> Vec<CaptureTarget> {
        self.targets.lock().clone()
    }

    /// Serials passed to `install_droidcast`, in call order
    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().clone()
    }
}

#[async_trait]
impl BackendFactory for MockBackendFactory {
    fn create(&self, target: CaptureTarget) -> Box<dyn ScreenCapture> {
        self.counters.created.fetch_add(1, Ordering::SeqCst);

        let mut backend = MockCapture::new(target.method());
        backend.counters = self.counters.clone();
        backend.failures = self.failures.clone();
        if let Some((width, height)) = self.size {
            backend.size = (width, height);
        }

        self.targets.lock().push(target);
        Box::new(backend)
    }

    async fn install_droidcast(&self, serial: &str) -> MscResult<()> {
        self.installs.lock().push(serial.to_string());
        if self.failures.contains(&Phase::Install) {
            return Err(injected(Phase::Install));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_capture_counts_steps() {
        let mut backend = MockCapture::new(CaptureMethod::Adb).with_frame_size(8, 4);

        backend.open().await.unwrap();
        let frame = backend.capture().await.unwrap();
        backend.close().await.unwrap();

        assert_eq!(frame.dimensions(), (8, 4));
        assert_eq!(backend.counters().snapshot(), (0, 1, 1, 1));
    }

    #[tokio::test]
    async fn test_mock_capture_injects_errors() {
        let mut backend = MockCapture::new(CaptureMethod::Adb).failing_at(Phase::Open);

        let err = backend.open().await.unwrap_err();
        assert_eq!(err.to_string(), "ADB open failed: injected failure");
        assert!(backend.capture().await.is_ok());
    }

    #[tokio::test]
    async fn test_factory_shares_counters_and_records_targets() {
        let factory = MockBackendFactory::new();

        let mut first = factory.create(CaptureTarget::Adb("a".into()));
        let _second = factory.create(CaptureTarget::Mumu(1));
        first.open().await.unwrap();

        assert_eq!(factory.counters().created(), 2);
        assert_eq!(factory.counters().opened(), 1);
        assert_eq!(
            factory.targets(),
            vec![CaptureTarget::Adb("a".into()), CaptureTarget::Mumu(1)]
        );
    }

    #[tokio::test]
    async fn test_factory_backend_reports_target_method() {
        let factory = MockBackendFactory::new();

        let backend = factory.create(CaptureTarget::DroidCast("x".into()));
        assert_eq!(backend.method(), CaptureMethod::DroidCast);
    }

    #[tokio::test]
    async fn test_factory_install() {
        let factory = MockBackendFactory::new();
        factory.install_droidcast("emulator-5554").await.unwrap();
        assert_eq!(factory.installs(), vec!["emulator-5554"]);

        let failing = MockBackendFactory::new().failing_at(Phase::Install);
        assert!(failing.install_droidcast("emulator-5554").await.is_err());
    }
}
