//! Common utilities shared across modules.
//!
//! Path resolution for the config and stats files, day-key formatting, and
//! the owner-only atomic write used by both stores.

use crate::error::Result;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "breathebreak";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BREATHEBREAK_CONFIG";

/// Environment variable overriding the stats directory.
pub const DATA_DIR_ENV: &str = "BREATHEBREAK_DATA_DIR";

/// Gets the application data directory.
///
/// `$BREATHEBREAK_DATA_DIR` wins; otherwise `~/.local/share/breathebreak/`
/// on Linux and the platform equivalent elsewhere.
///
/// # Example
///
/// ```rust,no_run
/// use breathebreak::common::get_data_dir;
///
/// let stats_file = get_data_dir().join("stats.json");
/// ```
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    let base_dir = dirs::data_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".local").join("share")
    });

    base_dir.join(APP_DIR_NAME)
}

/// Gets the config file path.
///
/// `$BREATHEBREAK_CONFIG` wins; otherwise `~/.config/breathebreak/config.toml`
/// on Linux and the platform equivalent elsewhere.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    let base_dir = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });

    base_dir.join(APP_DIR_NAME).join("config.toml")
}

/// Formats a local timestamp as its day key (`YYYY-MM-DD`).
///
/// # Example
///
/// ```rust
/// use breathebreak::common::day_key;
///
/// let key = day_key(&chrono::Local::now());
/// assert_eq!(key.len(), 10);
/// ```
pub fn day_key(instant: &DateTime<Local>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Creates `dir` (and its parents) with owner-only permissions on Unix.
pub fn create_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().mode(0o700).recursive(true).create(dir)?;
    }

    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir)?;
    }

    Ok(())
}

/// Path of the temporary sibling used while writing `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to `path` atomically with 0600 permissions.
///
/// The data goes to `<path>.tmp` first and is renamed over the target, so a
/// reader never sees a half-written file.
pub fn write_private_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_private_dir(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    let written = write_temp(&temp_path, contents).and_then(|()| {
        fs::rename(&temp_path, path)?;
        Ok(())
    });

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;

    // A stale temp file keeps its old mode through open(), so reset it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp_path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
