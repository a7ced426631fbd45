use anyhow::Result;
use cineo_config::LoggingConfig;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Build the level filter.
/// quiet = errors only; 0 = config level (or RUST_LOG); 1 = debug without
/// hyper noise; 2+ = trace
fn build_filter(verbose_level: u8, quiet: bool, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    let fallback = match verbose_level {
        0 => default_level,
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn,rustls=warn",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// JSON when forced by `RUST_LOG_JSON`, then by config, else when stdout is not a terminal
fn use_json(config: &LoggingConfig) -> bool {
    match std::env::var("RUST_LOG_JSON") {
        Ok(v) => v == "true",
        Err(_) => config.json.unwrap_or_else(|| !io::stdout().is_terminal()),
    }
}

pub fn init_logging(verbose_level: u8, quiet: bool, config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(verbose_level, quiet, &config.level);
    let json = use_json(config);
    let registry = Registry::default().with(filter);

    if let Some(log_path) = config.file.as_deref() {
        let file_appender = rolling_appender(log_path)?;
        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);
            registry.with(json_layer).init();
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);
            registry.with(fmt_layer).init();
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(fmt_layer).init();
    }

    Ok(())
}

/// Daily rotation: cineo.log becomes cineo.2026-01-17 and so on
fn rolling_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let log_prefix = log_filename
        .rsplit_once('.')
        .map_or(log_filename, |(stem, _)| stem);

    Ok(RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix))
}
