use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

pub const LOG_ENV: &str = "TEXEL_LOG";

fn level_from_str(s: &str) -> LevelFilter {
    match s.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" | "err" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Installs the stderr logger, level taken from `TEXEL_LOG` (warn when unset).
pub fn init() {
    let level = env::var(LOG_ENV)
        .map(|s| level_from_str(&s))
        .unwrap_or(LevelFilter::Warn);

    Builder::new()
        .filter(None, level)
        .default_format()
        .format_timestamp(None)
        .target(Target::Stderr)
        .init();
}
