//! # Logging
//!
//! `env_logger` setup shared by the binaries. Format:
//! `[HH:MM:SS] [LEVEL] message`

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Initialize the global logger at `level`.
///
/// `RUST_LOG`, when set, refines the filter further.
pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .init();
}
