//! File logging for the marker binary.
//!
//! The terminal belongs to the UI, so logs always go to a file.
//!
//! ## Environment Variables
//!
//! 1. **`MARKER_LOG`** (highest priority): a bare level such as `debug` applies
//!    to this crate only; anything containing `=`, `:` or `,` is used verbatim.
//! 2. **`RUST_LOG`**: standard tracing filter.
//! 3. **Default**: `warn` globally, `info` for this crate.
//!
//! The log file defaults to `<temp dir>/marker-<pid>.log` and can be moved
//! with **`MARKER_LOG_FILE`**.

use std::{
    env,
    path::{Path, PathBuf},
};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CRATE_TARGET: &str = "marker_tui";

#[derive(Clone, Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            log_file_path: env::var_os("MARKER_LOG_FILE").map(PathBuf::from),
        }
    }
}

/// Returned from [`init`]. Dropping it flushes and stops the file writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Install the global file subscriber.
///
/// Writes happen on a background thread, so the returned guard must live
/// until the UI has shut down. Fails if a subscriber is already installed.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    fmt()
        .with_env_filter(create_filter())
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Stdout logging for tests. Safe to call repeatedly.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

/// Split the configured path into directory and file name. A path without
/// an extension is taken as a directory.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("marker-{}.log", std::process::id());
    let Some(path) = override_path else {
        return (env::temp_dir(), filename);
    };
    if path.extension().is_none() {
        return (path, filename);
    }
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let name = path
        .file_name()
        .map_or(filename, |name| name.to_string_lossy().into_owned());
    (dir, name)
}

fn create_filter() -> EnvFilter {
    if let Ok(marker_log) = env::var("MARKER_LOG") {
        return expand_marker_log(&marker_log);
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    EnvFilter::new(format!("warn,{CRATE_TARGET}=info"))
}

fn expand_marker_log(value: &str) -> EnvFilter {
    EnvFilter::new(expanded_directives(value))
}

fn expanded_directives(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }
    format!("warn,{CRATE_TARGET}={value},marker={value}")
}
