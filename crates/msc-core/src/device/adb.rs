use std::{collections::HashMap, fmt, fs::File, net::SocketAddrV4, path::Path, sync::Arc};

use adb_client::{ADBDeviceExt, ADBServer, ADBServerDevice, DeviceState};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{
    DeviceRegistry,
    parse::{WmSize, parse_getprop, parse_wm_size},
};
use crate::error::{MscError, MscResult};

/// Registry backed by the host ADB server
#[derive(Debug, Clone)]
pub struct AdbRegistry {
    server: SocketAddrV4,
}

impl AdbRegistry {
    /// Creates a registry talking to the ADB server at `server`
    pub fn new(server: SocketAddrV4) -> Self {
        Self { server }
    }

    /// Opens a handle on one device by serial
    pub async fn open_device(&self, serial: &str) -> MscResult<AdbDevice> {
        AdbDevice::open(self.server, serial).await
    }

    /// Asks the ADB server to connect to a TCP endpoint (`adb connect`)
    pub async fn connect(&self, endpoint: SocketAddrV4) -> MscResult<()> {
        let server = self.server;
        debug!("adb connect {}", endpoint);
        tokio::task::spawn_blocking(move || ADBServer::new(server).connect_device(endpoint))
            .await?
            .map_err(|e| MscError::adb("connect", e))
    }

    /// Drops a TCP endpoint from the ADB server (`adb disconnect`)
    pub async fn disconnect(&self, endpoint: SocketAddrV4) -> MscResult<()> {
        let server = self.server;
        debug!("adb disconnect {}", endpoint);
        tokio::task::spawn_blocking(move || ADBServer::new(server).disconnect_device(endpoint))
            .await?
            .map_err(|e| MscError::adb("disconnect", e))
    }
}

#[async_trait]
impl DeviceRegistry for AdbRegistry {
    async fn list_serials(&self) -> MscResult<Vec<String>> {
        let server = self.server;
        let devices = tokio::task::spawn_blocking(move || ADBServer::new(server).devices())
            .await?
            .map_err(|e| MscError::adb("devices", e))?;

        Ok(devices
            .into_iter()
            .filter(|device| matches!(device.state, DeviceState::Device))
            .map(|device| device.identifier)
            .collect())
    }

    async fn properties(&self, serial: &str) -> MscResult<HashMap<String, String>> {
        self.open_device(serial).await?.properties().await
    }
}

/// Handle on one device attached to the ADB server
///
/// Every call is blocking in `adb_client`, so each one runs on the blocking
/// pool. The handle is cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct AdbDevice {
    serial: String,
    inner: Arc<Mutex<ADBServerDevice>>,
}

impl fmt::Debug for AdbDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdbDevice").field("serial", &self.serial).finish()
    }
}

impl AdbDevice {
    /// Looks up `serial` on the ADB server at `server`
    pub async fn open(server: SocketAddrV4, serial: &str) -> MscResult<Self> {
        let name = serial.to_string();
        let device = tokio::task::spawn_blocking(move || {
            ADBServer::new(server).get_device_by_name(&name)
        })
        .await?
        .map_err(|e| MscError::adb("get_device_by_name", e))?;

        Ok(Self {
            serial: serial.to_string(),
            inner: Arc::new(Mutex::new(device)),
        })
    }

    async fn blocking<T, E, F>(&self, operation: &'static str, f: F) -> MscResult<T>
    where
        T: Send + 'static,
        E: fmt::Display,
        F: FnOnce(&mut ADBServerDevice) -> Result<T, E> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut device = inner.lock();
            f(&mut device).map_err(|e| MscError::adb(operation, e))
        })
        .await?
    }

    /// Runs a shell command and returns its raw stdout
    pub async fn shell(&self, command: &str) -> MscResult<Vec<u8>> {
        debug!("{}: shell {}", self.serial, command);
        let command = command.to_string();
        self.blocking("shell", move |device| {
            let mut out = Vec::new();
            device
                .shell_command(&[command.as_str()], &mut out)
                .map(|_| out)
        })
        .await
    }

    /// Runs a shell command and returns its stdout as text
    pub async fn shell_text(&self, command: &str) -> MscResult<String> {
        let out = self.shell(command).await?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// All system properties (`getprop`)
    pub async fn properties(&self) -> MscResult<HashMap<String, String>> {
        Ok(parse_getprop(&self.shell_text("getprop").await?))
    }

    /// A single system property, `None` when unset
    pub async fn property(&self, name: &str) -> MscResult<Option<String>> {
        let value = self.shell_text(&format!("getprop {}", name)).await?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    /// Copies a host file to `remote` on the device
    pub async fn push(&self, local: &Path, remote: &str) -> MscResult<()> {
        debug!("{}: push {} -> {}", self.serial, local.display(), remote);
        let mut file = File::open(local)?;
        let remote = remote.to_string();
        self.blocking("push", move |device| device.push(&mut file, &remote))
            .await
    }

    /// Installs an APK from the host
    pub async fn install(&self, apk: &Path) -> MscResult<()> {
        debug!("{}: install {}", self.serial, apk.display());
        let apk = apk.to_path_buf();
        self.blocking("install", move |device| device.install(&apk))
            .await
    }

    /// Forwards a host TCP port to a device TCP port
    pub async fn forward(&self, local_port: u16, remote_port: u16) -> MscResult<()> {
        debug!("{}: forward tcp:{} -> tcp:{}", self.serial, local_port, remote_port);
        self.blocking("forward", move |device| {
            device.forward(format!("tcp:{}", remote_port), format!("tcp:{}", local_port))
        })
        .await
    }

    /// Removes every port forward of this device
    pub async fn forward_remove_all(&self) -> MscResult<()> {
        self.blocking("forward_remove_all", |device| device.forward_remove_all())
            .await
    }

    /// Captures the screen with `screencap -p` and returns PNG bytes
    pub async fn screencap_png(&self) -> MscResult<Vec<u8>> {
        self.shell("screencap -p").await
    }

    /// Physical and rendered display size as reported by `wm size`
    pub async fn screen_size(&self) -> MscResult<WmSize> {
        let output = self.shell_text("wm size").await?;
        parse_wm_size(&output).ok_or_else(|| {
            MscError::adb("wm size", format!("unexpected output: {}", output.trim()))
        })
    }
}
