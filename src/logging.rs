//! Tracing subscriber setup.
//!
//! `RUST_LOG` drives filtering (default `info`). `LOG_FORMAT=json` switches to
//! structured output for log shippers, and `LOG_DIR` adds a daily rotated file
//! next to stdout.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::ChronoLocal, writer::MakeWriterExt},
};

const LOG_FILE_PREFIX: &str = "tierwatch.log";

/// Keeps the file writer alive so buffered lines are flushed on shutdown.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let file = env::var("LOG_DIR").ok().and_then(file_writer);

    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false);

    match (file, json) {
        (Some(file), true) => builder
            .json()
            .with_writer(std::io::stdout.and(file))
            .init(),
        (Some(file), false) => builder
            .with_ansi(false)
            .with_writer(std::io::stdout.and(file))
            .init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.with_ansi(true).init(),
    }

    tracing::info!(json, "📝 Logger initialized");
}

fn file_writer(dir: String) -> Option<NonBlocking> {
    let mut appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX);

    if let Some(max) = env::var("LOG_MAX_FILES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
    {
        appender = appender.max_log_files(max);
    }

    let appender = match appender.build(&dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("cannot open log directory {dir}: {e}, logging to stdout only");
            return None;
        }
    };

    let (writer, guard) = non_blocking(appender);
    // A second init would be a programming error; keep the first guard.
    let _ = FILE_GUARD.set(guard);

    Some(writer)
}
