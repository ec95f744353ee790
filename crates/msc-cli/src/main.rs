//! msc-cli: Command-line tool for Android screenshot debugging
//!
//! Runs the same device operations as the MCP server without the protocol
//! overhead: list devices, show device info, install DroidCast, capture.

use std::{
    fs,
    net::SocketAddrV4,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use msc_core::{config::BackendConfig, error::MscError, service::MscService};
use tracing::debug;

#[derive(Parser)]
#[command(name = "msc-cli")]
#[command(version, about = "CLI tool for Android screenshot capture debugging and testing")]
struct Cli {
    /// Address of the host ADB server
    #[arg(long, global = true, value_name = "IP:PORT")]
    adb_server: Option<SocketAddrV4>,

    /// DroidCast APK used by install-droidcast
    #[arg(long, global = true, value_name = "PATH")]
    droidcast_apk: Option<PathBuf>,

    /// minicap prebuilt directory
    #[arg(long, global = true, value_name = "DIR")]
    minicap_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached devices
    Devices,
    /// Show model, SDK level and manufacturer of a device
    Info {
        /// ADB serial
        device_id: String,
    },
    /// Install the DroidCast helper app
    InstallDroidcast {
        /// ADB serial
        device_id: String,
    },
    /// Capture a screenshot to a PNG file
    Capture {
        /// ADB serial, or MuMu instance index with --method mumu
        device_id: String,
        /// Capture method (adb, droidcast, minicap, mumu)
        #[arg(long, default_value = "adb")]
        method: String,
        /// Output file path (default: screenshot-<id>-<timestamp>.png)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    fn backend_config(&self) -> BackendConfig {
        let mut config = BackendConfig::default();
        if let Some(addr) = self.adb_server {
            config = config.with_adb_server(addr);
        }
        if let Some(apk) = &self.droidcast_apk {
            config = config.with_droidcast_apk(apk);
        }
        if let Some(dir) = &self.minicap_dir {
            config = config.with_minicap_dir(dir);
        }
        config
    }
}

/// Attaches the remediation hint to a core error
fn with_hint(error: MscError) -> anyhow::Error {
    anyhow::anyhow!("{}\n  hint: {}", error, error.remediation_hint())
}

/// `screenshot-<id>-<timestamp>.png`, with path-hostile characters replaced
fn default_output_path(device_id: &str) -> PathBuf {
    let id: String = device_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("screenshot-{}-{}.png", id, timestamp))
}

fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("msc_cli=info".parse()?)
                .add_directive("msc_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = MscService::from_config(cli.backend_config());

    match cli.command {
        Commands::Devices => list_devices(&service).await?,
        Commands::Info { device_id } => device_info(&service, &device_id).await?,
        Commands::InstallDroidcast { device_id } => {
            service
                .install_droidcast(&device_id)
                .await
                .map_err(with_hint)?;
            println!("DroidCast installed on {}", device_id);
        }
        Commands::Capture {
            device_id,
            method,
            out,
        } => capture(&service, &device_id, &method, out).await?,
    }

    Ok(())
}

async fn list_devices(service: &MscService) -> Result<()> {
    let devices = service.list_devices().await.map_err(with_hint)?;

    println!("Found {} device(s):\n", devices.len());
    for serial in devices {
        println!("  {}", serial);
    }
    Ok(())
}

async fn device_info(service: &MscService, device_id: &str) -> Result<()> {
    let info = service.device_info(device_id).await.map_err(with_hint)?;
    println!("{}", info);
    Ok(())
}

async fn capture(
    service: &MscService,
    device_id: &str,
    method: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    println!("Capturing {} with {}...", device_id, method);
    let image = service
        .capture_screenshot(device_id, method)
        .await
        .map_err(with_hint)?;
    debug!("Encoded {} bytes ({})", image.bytes.len(), image.mime_type);

    let out = out.unwrap_or_else(|| default_output_path(device_id));
    write_image(&out, &image.bytes)?;

    println!("✓ Screenshot saved to {}", out.display());
    Ok(())
}
