//! Device and capture operations behind the tool surface
//!
//! [`MscService`] owns the three collaborators every operation needs and
//! returns typed results. Turning errors into user-facing text is left to the
//! caller.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    capture::{AdbBackendFactory, BackendFactory, session::run_session},
    config::BackendConfig,
    device::DeviceRegistry,
    encode::{FrameEncoder, PngFrameEncoder},
    error::MscResult,
    model::{CaptureTarget, DeviceInfo, EncodedImage},
};

/// Device listing, device info, helper install, and capture
#[derive(Clone)]
pub struct MscService {
    registry: Arc<dyn DeviceRegistry>,
    factory: Arc<dyn BackendFactory>,
    encoder: Arc<dyn FrameEncoder>,
}

impl MscService {
    /// Creates a service from explicit collaborators
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        factory: Arc<dyn BackendFactory>,
        encoder: Arc<dyn FrameEncoder>,
    ) -> Self {
        Self {
            registry,
            factory,
            encoder,
        }
    }

    /// Creates a service over the host ADB server described by `config`
    pub fn from_config(config: BackendConfig) -> Self {
        let factory = AdbBackendFactory::new(config);
        let registry = Arc::new(factory.registry().clone());
        Self::new(registry, Arc::new(factory), Arc::new(PngFrameEncoder::default()))
    }

    /// Serials of attached devices, in registry order
    pub async fn list_devices(&self) -> MscResult<Vec<String>> {
        let serials = self.registry.list_serials().await?;
        debug!("Registry reported {} device(s)", serials.len());
        Ok(serials)
    }

    /// Model, SDK level and manufacturer of one device
    pub async fn device_info(&self, serial: &str) -> MscResult<DeviceInfo> {
        let props = self.registry.properties(serial).await?;
        Ok(DeviceInfo::from_properties(&props))
    }

    /// Installs the DroidCast helper app on one device
    pub async fn install_droidcast(&self, serial: &str) -> MscResult<()> {
        self.factory.install_droidcast(serial).await?;
        info!("DroidCast installed on {}", serial);
        Ok(())
    }

    /// Captures one screenshot and returns it PNG-encoded
    ///
    /// `method` and `device_id` are validated before any backend is built,
    /// so an unknown method or a malformed MuMu index never touches a device.
    pub async fn capture_screenshot(&self, device_id: &str, method: &str) -> MscResult<EncodedImage> {
        let target = CaptureTarget::resolve(method, device_id)?;
        info!("Capturing screenshot from {}", target);

        let mut backend = self.factory.create(target);
        let encoder = Arc::clone(&self.encoder);
        let image = run_session(backend.as_mut(), move |frame| encoder.encode(&frame)).await?;

        debug!("Encoded screenshot: {} bytes", image.bytes.len());
        Ok(image)
    }
}
