//! msc-mcp: MCP server for Android screenshot capture
//!
//! Serves the tool surface over stdio until the client disconnects.

use std::{net::SocketAddrV4, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use msc_core::{config::BackendConfig, service::MscService};
use msc_mcp_server::mcp::MscMcpServer;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// MCP server exposing Android screenshot capture tools over stdio
#[derive(Parser, Debug)]
#[command(name = "msc-mcp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address of the host ADB server
    #[arg(long, value_name = "IP:PORT")]
    adb_server: Option<SocketAddrV4>,

    /// DroidCast APK installed by the install_droidcast tool
    #[arg(long, value_name = "PATH")]
    droidcast_apk: Option<PathBuf>,

    /// minicap prebuilt directory (<abi>/bin/minicap, <abi>/lib/android-<sdk>/minicap.so)
    #[arg(long, value_name = "DIR")]
    minicap_dir: Option<PathBuf>,
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

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respects RUST_LOG environment variable
    // stdout carries the protocol, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("msc_mcp_server=info,msc_core=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    info!("msc-mcp server starting...");

    let config = cli.backend_config();
    info!("ADB server: {}", config.adb_server);
    info!("DroidCast APK: {}", config.droidcast_apk.display());

    let server = MscMcpServer::new(MscService::from_config(config));

    info!("Initializing stdio transport...");
    let service = server.serve(stdio()).await?;

    info!("Server info: {:?}", service.peer_info());
    info!("Waiting for MCP requests...");

    // Blocks until the client disconnects
    service.waiting().await?;

    info!("msc-mcp server shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_uses_defaults() {
        let cli = Cli::try_parse_from(["msc-mcp"]).unwrap();
        assert_eq!(cli.backend_config(), BackendConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "msc-mcp",
            "--adb-server",
            "127.0.0.1:5038",
            "--droidcast-apk",
            "/opt/DroidCast.apk",
            "--minicap-dir",
            "/opt/minicap",
        ])
        .unwrap();

        let config = cli.backend_config();
        assert_eq!(config.adb_server.port(), 5038);
        assert_eq!(config.droidcast_apk, PathBuf::from("/opt/DroidCast.apk"));
        assert_eq!(config.minicap_dir, Some(PathBuf::from("/opt/minicap")));
    }

    #[test]
    fn test_rejects_bad_adb_server() {
        assert!(Cli::try_parse_from(["msc-mcp", "--adb-server", "localhost"]).is_err());
    }
}
