//! minicap in one-shot mode
//!
//! minicap is a native binary plus a shared library built per ABI and SDK
//! level. With a prebuilt directory configured, `open` pushes the matching
//! pair to `/data/local/tmp`; otherwise it expects them to be there already.
//! `-s` makes minicap write one JPEG to stdout and exit.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    Frame, ScreenCapture,
    adbcap::opened,
    constants::{DEVICE_TMP_DIR, MINICAP_DEVICE_BIN, MINICAP_DEVICE_LIB},
};
use crate::{
    config::BackendConfig,
    device::{AdbDevice, AdbRegistry, parse::WmSize},
    error::{MscError, MscResult},
    model::{CaptureMethod, PROP_SDK},
};

const PROP_ABI: &str = "ro.product.cpu.abi";

/// JPEG start-of-image marker followed by the first segment marker
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Strips anything minicap printed before the JPEG data
fn extract_jpeg(output: &[u8]) -> Option<&[u8]> {
    output
        .windows(JPEG_SOI.len())
        .position(|window| window == JPEG_SOI)
        .map(|start| &output[start..])
}

/// Host paths of the binary and library for one ABI and SDK level
fn prebuilt_paths(dir: &std::path::Path, abi: &str, sdk: &str) -> (PathBuf, PathBuf) {
    let bin = dir.join(abi).join("bin").join("minicap");
    let lib = dir
        .join(abi)
        .join("lib")
        .join(format!("android-{}", sdk))
        .join("minicap.so");
    (bin, lib)
}

/// One-shot command projecting the physical panel onto the rendered size
fn capture_command(size: WmSize) -> String {
    let (rw, rh) = size.physical;
    let (vw, vh) = size.current;
    format!(
        "LD_LIBRARY_PATH={} {} -P {}x{}@{}x{}/0 -s 2>/dev/null",
        DEVICE_TMP_DIR, MINICAP_DEVICE_BIN, rw, rh, vw, vh
    )
}

/// Backend for the `minicap` method
#[derive(Debug)]
pub struct MiniCap {
    registry: AdbRegistry,
    serial: String,
    prebuilt_dir: Option<PathBuf>,
    device: Option<AdbDevice>,
    size: Option<WmSize>,
}

impl MiniCap {
    /// Creates an unopened backend for `serial`
    pub fn new(registry: AdbRegistry, config: &BackendConfig, serial: impl Into<String>) -> Self {
        Self {
            registry,
            serial: serial.into(),
            prebuilt_dir: config.minicap_dir.clone(),
            device: None,
            size: None,
        }
    }

    async fn required_property(&self, device: &AdbDevice, name: &str) -> MscResult<String> {
        device.property(name).await?.ok_or_else(|| {
            MscError::adb("getprop", format!("{} is not set on {}", name, self.serial))
        })
    }

    async fn push_prebuilt(&self, device: &AdbDevice, dir: &std::path::Path) -> MscResult<()> {
        let abi = self.required_property(device, PROP_ABI).await?;
        let sdk = self.required_property(device, PROP_SDK).await?;
        let (bin, lib) = prebuilt_paths(dir, &abi, &sdk);

        for path in [&bin, &lib] {
            if !path.is_file() {
                return Err(MscError::AssetNotFound { path: path.clone() });
            }
        }

        info!("Pushing minicap for {} / android-{} to {}", abi, sdk, self.serial);
        device.push(&bin, MINICAP_DEVICE_BIN).await?;
        device.push(&lib, MINICAP_DEVICE_LIB).await?;
        device
            .shell(&format!("chmod 755 {}", MINICAP_DEVICE_BIN))
            .await?;
        Ok(())
    }

    async fn check_installed(&self, device: &AdbDevice) -> MscResult<()> {
        let check = format!(
            "[ -x {} ] && [ -f {} ] && echo ok",
            MINICAP_DEVICE_BIN, MINICAP_DEVICE_LIB
        );
        if device.shell_text(&check).await?.trim() == "ok" {
            Ok(())
        } else {
            Err(MscError::HelperNotInstalled {
                method: CaptureMethod::Minicap,
                serial: self.serial.clone(),
            })
        }
    }
}

#[async_trait]
impl ScreenCapture for MiniCap {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::Minicap
    }

    async fn open(&mut self) -> MscResult<()> {
        let device = self.registry.open_device(&self.serial).await?;

        match &self.prebuilt_dir {
            Some(dir) => self.push_prebuilt(&device, dir).await?,
            None => self.check_installed(&device).await?,
        }

        let size = device.screen_size().await?;
        debug!("{}: minicap projection {:?}", self.serial, size);
        self.size = Some(size);
        self.device = Some(device);
        Ok(())
    }

    async fn capture(&mut self) -> MscResult<Frame> {
        let device = opened(&self.device, self.method())?;
        let size = self
            .size
            .ok_or_else(|| MscError::adb("capture", "minicap backend is not open"))?;
        let output = device.shell(&capture_command(size)).await?;

        let jpeg = extract_jpeg(&output).ok_or_else(|| MscError::DecodeFailed {
            reason: format!("minicap output ({} bytes) contains no JPEG image", output.len()),
        })?;
        Frame::from_encoded(jpeg)
    }

    async fn close(&mut self) -> MscResult<()> {
        // One-shot mode leaves no process or forward behind
        self.device = None;
        self.size = None;
        Ok(())
    }
}
