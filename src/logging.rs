//! Tracing subscriber setup
//!
//! The TUI owns the terminal, so it logs to a daily-rolling file. CLI
//! commands log to stderr, keeping stdout for output.

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// File name prefix for rolled TUI logs (cinerate.2026-01-17, ...)
pub const LOG_PREFIX: &str = "cinerate";

/// Filter directives for a verbosity level. `RUST_LOG` wins when set.
///
/// 0 = warn, 1 = debug (hyper quieted), 2+ = trace
pub fn filter_directives(verbose_level: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose_level {
        0 => "warn",
        1 => "debug,hyper=warn,reqwest=info",
        _ => "trace",
    }
}

fn env_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    let directives = filter_directives(verbose_level, quiet);
    if quiet {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    }
}

/// Log to stderr (CLI mode)
pub fn init_stderr(verbose_level: u8, quiet: bool) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(io::stderr);

    Registry::default()
        .with(env_filter(verbose_level, quiet))
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Log to `<log_dir>/cinerate.<date>` (TUI mode)
pub fn init_file(verbose_level: u8, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_PREFIX);

    let fmt_layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_writer(file_appender);

    // info by default in the file
    let filter = if verbose_level == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        env_filter(verbose_level, false)
    };

    Registry::default().with(filter).with(fmt_layer).try_init()?;
    Ok(())
}
