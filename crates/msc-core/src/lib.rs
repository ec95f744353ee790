//! msc-core: Android screenshot capture library
//!
//! This library lists devices attached to the host ADB server, reads their
//! system properties, captures screenshots through one of several on-device
//! helpers (`adb`, `droidcast`, `minicap`, `mumu`), and encodes the result as
//! PNG. [`service::MscService`] is the entry point used by the MCP server and
//! the CLI.

pub mod capture;
pub mod config;
pub mod device;
pub mod encode;
pub mod error;
pub mod model;
pub mod service;
