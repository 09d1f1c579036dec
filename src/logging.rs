use crate::config::{Config, DebugLogRotation};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "newsrag-debug.log";

/// Keeps the background log writer alive; flushes on drop.
#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs go to `<config_dir>/newsrag/newsrag-debug.log`
/// unless `debug_log_path` says otherwise. When disabled, this is a no-op.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let rotation = config.debug_log_rotation.unwrap_or(DebugLogRotation::Session);
    let base = resolve_base_log_path(config.debug_log_path.as_deref())?;
    let (writer, log_path, guard) = open_writer(&base, rotation, config.debug_log_keep)?;

    // Default: debug our crate, warn for everything else.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("newsrag=debug,warn"))
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // Already initialized (e.g. in tests) is fine.

    tracing::info!(log_file = %log_path.display(), rotation = ?rotation, "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

fn open_writer(
    base: &Path,
    rotation: DebugLogRotation,
    keep: Option<usize>,
) -> Result<(NonBlocking, PathBuf, WorkerGuard)> {
    match rotation {
        DebugLogRotation::None => {
            let file = open_append(base)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            Ok((writer, base.to_path_buf(), guard))
        }
        DebugLogRotation::Daily => {
            let (dir, base_name) = split_dir_and_name(base)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            // tracing_appender::rolling::daily names files `{base_name}.{YYYY-MM-DD}`
            prune_rotated_logs(&dir, &format!("{base_name}."), keep.unwrap_or(7))?;

            let appender = tracing_appender::rolling::daily(&dir, &base_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            Ok((writer, base.to_path_buf(), guard))
        }
        DebugLogRotation::Session => {
            let (dir, base_name) = split_dir_and_name(base)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            prune_rotated_logs(&dir, &format!("{base_name}.session-"), keep.unwrap_or(20))?;

            let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
            let session_path = dir.join(format!("{base_name}.session-{ts}"));
            let file = open_append(&session_path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            Ok((writer, session_path, guard))
        }
    }
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn resolve_base_log_path(config_value: Option<&str>) -> Result<PathBuf> {
    let Some(raw) = config_value else {
        return Ok(crate::config::config_path()?.with_file_name(LOG_FILE_NAME));
    };

    let path = PathBuf::from(expand_tilde(raw));

    if raw.ends_with(std::path::MAIN_SEPARATOR) || path.is_dir() {
        return Ok(path.join(LOG_FILE_NAME));
    }

    Ok(path)
}

fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid debug_log_path: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

/// Delete all but the newest `keep` files starting with `prefix`.
fn prune_rotated_logs(dir: &Path, prefix: &str, keep: usize) -> Result<()> {
    if keep == 0 {
        return Ok(());
    }

    let mut candidates: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(prefix))
        .collect();

    // Both suffix formats sort chronologically.
    candidates.sort_unstable_by(|a, b| b.cmp(a));

    for name in candidates.iter().skip(keep) {
        let path = dir.join(name);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(error = %e, file = %path.display(), "failed to remove old log file");
        }
    }

    Ok(())
}

/// Best-effort redaction for `sk-...` style API keys.
pub fn redact_secrets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;

    while let Some(offset) = input[i..].find("sk-") {
        let start = i + offset;
        let mut end = start + 3;
        while end < bytes.len()
            && matches!(bytes[end], b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_')
        {
            end += 1;
        }

        // Require a minimum length to reduce false positives.
        if end - (start + 3) >= 8 {
            out.push_str(&input[last..start]);
            out.push_str("sk-***REDACTED***");
            last = end;
        }
        i = end;
    }

    out.push_str(&input[last..]);
    out
}

/// [`redact_secrets`] plus masking of the given credential values.
pub fn redact_known(input: &str, secrets: &[&str]) -> String {
    let mut out = redact_secrets(input);
    for secret in secrets.iter().filter(|s| s.len() >= 4) {
        out = out.replace(secret, "***REDACTED***");
    }
    out
}
