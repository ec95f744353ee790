//! Plain `screencap` over the ADB shell

use async_trait::async_trait;
use tracing::debug;

use super::{Frame, ScreenCapture};
use crate::{
    device::{AdbDevice, AdbRegistry},
    error::{MscError, MscResult},
    model::CaptureMethod,
};

/// Returns the open device or the error every adapter uses before `open`
pub(crate) fn opened(device: &Option<AdbDevice>, method: CaptureMethod) -> MscResult<&AdbDevice> {
    device
        .as_ref()
        .ok_or_else(|| MscError::adb("capture", format!("{} backend is not open", method)))
}

/// Backend for the `adb` method
#[derive(Debug)]
pub struct AdbCap {
    registry: AdbRegistry,
    serial: String,
    device: Option<AdbDevice>,
}

impl AdbCap {
    /// Creates an unopened backend for `serial`
    pub fn new(registry: AdbRegistry, serial: impl Into<String>) -> Self {
        Self {
            registry,
            serial: serial.into(),
            device: None,
        }
    }
}

#[async_trait]
impl ScreenCapture for AdbCap {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::Adb
    }

    async fn open(&mut self) -> MscResult<()> {
        self.device = Some(self.registry.open_device(&self.serial).await?);
        Ok(())
    }

    async fn capture(&mut self) -> MscResult<Frame> {
        let png = opened(&self.device, self.method())?.screencap_png().await?;
        debug!("{}: screencap returned {} bytes", self.serial, png.len());
        Frame::from_encoded(&png)
    }

    async fn close(&mut self) -> MscResult<()> {
        self.device = None;
        Ok(())
    }
}
