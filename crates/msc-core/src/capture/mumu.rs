//! MuMu emulator instances addressed by index
//!
//! Instance `n` exposes ADB on `127.0.0.1:(base + stride * n)`. The backend
//! connects the ADB server to that endpoint when it is not already attached,
//! takes a `screencap`, and disconnects again only if it made the connection.

use std::net::{Ipv4Addr, SocketAddrV4};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{Frame, ScreenCapture, adbcap::opened};
use crate::{
    config::BackendConfig,
    device::{AdbDevice, AdbRegistry, DeviceRegistry},
    error::{MscError, MscResult},
    model::CaptureMethod,
};

/// Backend for the `mumu` method
#[derive(Debug)]
pub struct MuMuCap {
    registry: AdbRegistry,
    index: u32,
    endpoint: Option<SocketAddrV4>,
    connected_here: bool,
    device: Option<AdbDevice>,
}

impl MuMuCap {
    /// Creates an unopened backend for instance `index`
    pub fn new(registry: AdbRegistry, config: &BackendConfig, index: u32) -> Self {
        Self {
            registry,
            index,
            endpoint: config
                .mumu_port(index)
                .map(|port| SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)),
            connected_here: false,
            device: None,
        }
    }

    /// ADB endpoint of the instance, `None` when the index overflows the
    /// port range
    pub fn endpoint(&self) -> Option<SocketAddrV4> {
        self.endpoint
    }
}

#[async_trait]
impl ScreenCapture for MuMuCap {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::Mumu
    }

    async fn open(&mut self) -> MscResult<()> {
        let endpoint = self.endpoint.ok_or_else(|| MscError::InvalidDeviceId {
            device_id: self.index.to_string(),
            reason: "MuMu instance index is out of range".to_string(),
        })?;
        let serial = endpoint.to_string();

        let attached = self.registry.list_serials().await?;
        if !attached.contains(&serial) {
            info!("Connecting to MuMu instance {} at {}", self.index, serial);
            self.registry.connect(endpoint).await?;
            self.connected_here = true;
        } else {
            debug!("MuMu instance {} already attached as {}", self.index, serial);
        }

        self.device = Some(self.registry.open_device(&serial).await?);
        Ok(())
    }

    async fn capture(&mut self) -> MscResult<Frame> {
        let png = opened(&self.device, self.method())?.screencap_png().await?;
        Frame::from_encoded(&png)
    }

    async fn close(&mut self) -> MscResult<()> {
        self.device = None;
        if !self.connected_here {
            return Ok(());
        }
        self.connected_here = false;

        match self.endpoint {
            Some(endpoint) => self.registry.disconnect(endpoint).await,
            None => Ok(()),
        }
    }
}
