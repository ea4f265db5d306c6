//! Stderr logging using env_logger
//!
//! The level comes from `RUST_LOG` (e.g. `RUST_LOG=bz_operator=debug`),
//! defaulting to `info`. Lines carry an RFC3339 timestamp.

use env_logger::{Builder, Env};
use std::io::Write;

/// Initialize logging; later calls are no-ops
pub fn init() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
