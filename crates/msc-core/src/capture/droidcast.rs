//! DroidCast helper app serving screenshots over HTTP
//!
//! `open` starts the helper through `app_process` from the installed APK,
//! forwards a free host port to the helper's device port and waits until it
//! answers. `capture` is a single HTTP GET. `close` stops the helper and
//! drops the forward.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use tokio::{net::TcpListener, time::Instant};
use tracing::{debug, info, warn};

use super::{
    Frame, ScreenCapture,
    constants::{DROIDCAST_MAIN_CLASS, DROIDCAST_PACKAGE, DROIDCAST_POLL_INTERVAL_MS},
};
use crate::{
    config::BackendConfig,
    device::{AdbDevice, AdbRegistry, parse::parse_pm_path},
    error::{MscError, MscResult},
    model::CaptureMethod,
};

/// Installs the DroidCast APK at `apk` on the device with `serial`
///
/// A missing APK is reported before the device is contacted.
pub async fn install(registry: &AdbRegistry, serial: &str, apk: &Path) -> MscResult<()> {
    if !apk.is_file() {
        return Err(MscError::AssetNotFound {
            path: apk.to_path_buf(),
        });
    }

    let device = registry.open_device(serial).await?;
    info!("Installing DroidCast on {} from {}", serial, apk.display());
    device.install(apk).await
}

/// Shell command starting the helper in the background
fn start_command(apk_path: &str, port: u16) -> String {
    format!(
        "nohup sh -c 'CLASSPATH={} app_process / {} --port={}' >/dev/null 2>&1 &",
        apk_path, DROIDCAST_MAIN_CLASS, port
    )
}

/// Binds an ephemeral loopback port and releases it for the forward
async fn free_local_port() -> MscResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}

/// Backend for the `droidcast` method
#[derive(Debug)]
pub struct DroidCast {
    registry: AdbRegistry,
    serial: String,
    device_port: u16,
    ready_timeout: Duration,
    http_timeout: Duration,
    device: Option<AdbDevice>,
    local_port: Option<u16>,
    client: Option<reqwest::Client>,
}

impl DroidCast {
    /// Creates an unopened backend for `serial`
    pub fn new(registry: AdbRegistry, config: &BackendConfig, serial: impl Into<String>) -> Self {
        Self {
            registry,
            serial: serial.into(),
            device_port: config.droidcast_port,
            ready_timeout: config.droidcast_ready_timeout,
            http_timeout: config.http_timeout,
            device: None,
            local_port: None,
            client: None,
        }
    }

    fn base_url(&self) -> MscResult<String> {
        self.local_port
            .map(|port| format!("http://127.0.0.1:{}", port))
            .ok_or_else(|| MscError::adb("capture", "droidcast backend is not open"))
    }

    async fn get(&self, url: &str) -> MscResult<reqwest::Response> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| MscError::adb("capture", "droidcast backend is not open"))?;

        client
            .get(url)
            .send()
            .await
            .map_err(|e| MscError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn wait_ready(&self) -> MscResult<()> {
        let url = format!("{}/", self.base_url()?);
        let deadline = Instant::now() + self.ready_timeout;

        loop {
            // Any HTTP answer, even 404, means the server is up
            match self.get(&url).await {
                Ok(_) => return Ok(()),
                Err(e) if Instant::now() >= deadline => {
                    debug!("{}: last readiness check failed: {}", self.serial, e);
                    return Err(MscError::HelperTimeout {
                        method: CaptureMethod::DroidCast,
                        duration_ms: self.ready_timeout.as_millis() as u64,
                    });
                }
                Err(_) => {
                    tokio::time::sleep(Duration::from_millis(DROIDCAST_POLL_INTERVAL_MS)).await
                }
            }
        }
    }
}

#[async_trait]
impl ScreenCapture for DroidCast {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::DroidCast
    }

    async fn open(&mut self) -> MscResult<()> {
        let device = self.registry.open_device(&self.serial).await?;

        let output = device
            .shell_text(&format!("pm path {}", DROIDCAST_PACKAGE))
            .await?;
        let apk_path = parse_pm_path(&output).ok_or_else(|| MscError::HelperNotInstalled {
            method: CaptureMethod::DroidCast,
            serial: self.serial.clone(),
        })?;

        self.device = Some(device.clone());
        device.shell(&start_command(&apk_path, self.device_port)).await?;

        let local_port = free_local_port().await?;
        device.forward(local_port, self.device_port).await?;
        self.local_port = Some(local_port);

        let client = reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| MscError::Http {
                url: format!("http://127.0.0.1:{}", local_port),
                reason: e.to_string(),
            })?;
        self.client = Some(client);

        self.wait_ready().await?;
        info!(
            "DroidCast ready on {} (tcp:{} -> tcp:{})",
            self.serial, local_port, self.device_port
        );
        Ok(())
    }

    async fn capture(&mut self) -> MscResult<Frame> {
        let url = format!("{}/screenshot?format=png", self.base_url()?);
        let response = self.get(&url).await?;

        let http_err = |reason: String| MscError::Http {
            url: url.clone(),
            reason,
        };
        let response = response.error_for_status().map_err(|e| http_err(e.to_string()))?;
        let bytes = response.bytes().await.map_err(|e| http_err(e.to_string()))?;

        Frame::from_encoded(&bytes)
    }

    /// Stops the helper and drops the port forward
    ///
    /// Both steps are device-wide: `pkill -f` ends every DroidCast process
    /// and `forward_remove_all` clears every forward of the device, including
    /// ones owned by other sessions or tools. `adb_client` offers no way to
    /// remove a single forward.
    async fn close(&mut self) -> MscResult<()> {
        self.client = None;
        let Some(device) = self.device.take() else {
            return Ok(());
        };

        let stopped = device
            .shell(&format!("pkill -f {}", DROIDCAST_MAIN_CLASS))
            .await
            .map(|_| ());
        if let Err(e) = &stopped {
            warn!("{}: failed to stop DroidCast: {}", self.serial, e);
        }

        // Forwards are only removed if open got far enough to add one
        if self.local_port.take().is_some() {
            device.forward_remove_all().await?;
        }

        stopped
    }
}
