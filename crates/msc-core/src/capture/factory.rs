use async_trait::async_trait;

use super::{AdbCap, BackendFactory, DroidCast, MiniCap, MuMuCap, ScreenCapture, droidcast};
use crate::{config::BackendConfig, device::AdbRegistry, error::MscResult, model::CaptureTarget};

/// Builds the real adapters over the host ADB server
#[derive(Debug, Clone)]
pub struct AdbBackendFactory {
    registry: AdbRegistry,
    config: BackendConfig,
}

impl AdbBackendFactory {
    /// Creates a factory from configuration
    pub fn new(config: BackendConfig) -> Self {
        Self {
            registry: AdbRegistry::new(config.adb_server),
            config,
        }
    }

    /// Registry shared by every backend this factory builds
    pub fn registry(&self) -> &AdbRegistry {
        &self.registry
    }
}

#[async_trait]
impl BackendFactory for AdbBackendFactory {
    fn create(&self, target: CaptureTarget) -> Box<dyn ScreenCapture> {
        let registry = self.registry.clone();
        match target {
            CaptureTarget::Adb(serial) => Box::new(AdbCap::new(registry, serial)),
            CaptureTarget::DroidCast(serial) => {
                Box::new(DroidCast::new(registry, &self.config, serial))
            }
            CaptureTarget::Minicap(serial) => Box::new(MiniCap::new(registry, &self.config, serial)),
            CaptureTarget::Mumu(index) => Box::new(MuMuCap::new(registry, &self.config, index)),
        }
    }

    async fn install_droidcast(&self, serial: &str) -> MscResult<()> {
        droidcast::install(&self.registry, serial, &self.config.droidcast_apk).await
    }
}
