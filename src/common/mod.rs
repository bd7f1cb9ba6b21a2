//! # Common Components
//!
//! Shared utilities used by the `stego` CLI and the web server.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing
//! - [`logging`]: Logger initialization

pub mod config;
pub mod logging;
