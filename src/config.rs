use crate::common::{get_config_path, write_private_atomic};
use crate::error::{BreatheError, Result};
use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use toml::{Table, Value};

/// Default reminder interval, the 20-20-20 rule
pub const DEFAULT_INTERVAL: u32 = 20;
pub const MIN_INTERVAL: u32 = 1;
pub const MAX_INTERVAL: u32 = 480;

/// Default length of an acknowledged break, in seconds
pub const DEFAULT_BREAK_DURATION: u32 = 20;
pub const MIN_BREAK_DURATION: u32 = 5;
pub const MAX_BREAK_DURATION: u32 = 300;

pub const DEFAULT_TITLE: &str = "BreatheBreak";
/// Longest notification title kept, in characters
pub const MAX_TITLE_CHARS: usize = 64;

/// User preferences.
///
/// Values read from disk are always clamped into their documented ranges, so
/// the rest of the app can use them without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Minutes between reminders, in `[MIN_INTERVAL, MAX_INTERVAL]`
    pub interval_minutes: u32,

    /// Seconds credited for each acknowledged break
    pub break_duration_seconds: u32,

    /// Play a sound with notifications
    pub sound_enabled: bool,

    /// Record reminder, break and focus statistics
    pub track_stats: bool,

    /// Title shown on every notification
    pub notification_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interval_minutes: DEFAULT_INTERVAL,
            break_duration_seconds: DEFAULT_BREAK_DURATION,
            sound_enabled: true,
            track_stats: true,
            notification_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Config {
    /// Load from the default location (`$BREATHEBREAK_CONFIG` or the
    /// platform config directory). Never fails.
    pub fn load() -> Self {
        Self::load_from_file(&get_config_path())
    }

    /// Load from `path`, falling back to defaults when the file is missing,
    /// unreadable, empty or not valid TOML.
    pub fn load_from_file(path: &Path) -> Self {
        match Self::try_load_from_file(path) {
            Ok(config) => config,
            Err(BreatheError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Config::default()
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    /// Strict variant of [`Config::load_from_file`] that reports why the
    /// file could not be used.
    pub fn try_load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let document: Table = toml::from_str(&contents)?;
        Ok(Self::from_document(&document))
    }

    /// Build a config from a parsed document.
    ///
    /// Only recognised keys with a usable type are taken; everything else
    /// keeps its default. Unknown keys are ignored.
    pub fn from_document(document: &Table) -> Self {
        let defaults = Config::default();

        let sound_enabled = document
            .get("sound_enabled")
            .or_else(|| document.get("sound"))
            .and_then(Value::as_bool)
            .unwrap_or(defaults.sound_enabled);

        let notification_title = document
            .get("notification_title")
            .and_then(Value::as_str)
            .map(truncate_title)
            .unwrap_or(defaults.notification_title);

        Config {
            interval_minutes: clamp_interval(document.get("interval_minutes")),
            break_duration_seconds: clamp_or_min(
                document.get("break_duration_seconds"),
                DEFAULT_BREAK_DURATION,
                MIN_BREAK_DURATION,
                MAX_BREAK_DURATION,
            ),
            sound_enabled,
            track_stats: document
                .get("track_stats")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.track_stats),
            notification_title,
        }
    }

    /// Save to `path` atomically with owner-only permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        write_private_atomic(path, toml_string.as_bytes())
    }

    /// Timer period for the configured interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }

    /// Generate example config file content
    pub fn example_toml() -> &'static str {
        r#"# BreatheBreak configuration
#
# Every key is optional; missing or invalid values fall back to the
# defaults shown here.

# Minutes between break reminders (1-480)
interval_minutes = 20

# Seconds credited when you confirm a break (5-300)
break_duration_seconds = 20

# Play a sound with each notification ("sound" is accepted too)
sound_enabled = true

# Keep daily reminder, break and focus statistics
track_stats = true

# Title of every notification (at most 64 characters)
notification_title = "BreatheBreak"
"#
    }
}

/// Interprets a document value as a whole number.
///
/// Floats are truncated and numeric strings are parsed; anything else is
/// rejected.
fn as_whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate and clamp an interval value to `[MIN_INTERVAL, MAX_INTERVAL]`.
///
/// Missing or non-numeric values give `DEFAULT_INTERVAL`.
pub fn clamp_interval(value: Option<&Value>) -> u32 {
    match value.and_then(as_whole_number) {
        Some(minutes) => minutes.clamp(i64::from(MIN_INTERVAL), i64::from(MAX_INTERVAL)) as u32,
        None => DEFAULT_INTERVAL,
    }
}

/// Clamp to `[lo, hi]`. A missing value gives `default`, a non-numeric
/// one gives `lo`.
fn clamp_or_min(value: Option<&Value>, default: u32, lo: u32, hi: u32) -> u32 {
    let Some(value) = value else {
        return default;
    };
    match as_whole_number(value) {
        Some(n) => n.clamp(i64::from(lo), i64::from(hi)) as u32,
        None => lo,
    }
}

fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Parse an interval typed by the user.
///
/// Unlike values loaded from disk, user input is rejected rather than
/// clamped; the error message is meant to be shown as-is.
pub fn validate_interval_input(text: &str) -> Result<u32> {
    let minutes: i64 = text
        .trim()
        .parse()
        .map_err(|_| BreatheError::invalid_input("Please enter a valid number."))?;

    if minutes < i64::from(MIN_INTERVAL) || minutes > i64::from(MAX_INTERVAL) {
        return Err(BreatheError::invalid_input(format!(
            "Choose between {} and {} minutes.",
            MIN_INTERVAL, MAX_INTERVAL
        )));
    }

    Ok(minutes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.interval_minutes, DEFAULT_INTERVAL);
        assert_eq!(config.break_duration_seconds, DEFAULT_BREAK_DURATION);
        assert!(config.sound_enabled);
        assert!(config.track_stats);
        assert_eq!(config.notification_title, "BreatheBreak");
        assert_eq!(config.interval(), Duration::from_secs(20 * 60));
    }

    #[test]
    fn test_clamps_to_minimum() {
        assert_eq!(clamp_interval(Some(&Value::Integer(0))), MIN_INTERVAL);
        assert_eq!(clamp_interval(Some(&Value::Integer(-10))), MIN_INTERVAL);
    }

    #[test]
    fn test_clamps_to_maximum() {
        assert_eq!(clamp_interval(Some(&Value::Integer(999))), MAX_INTERVAL);
        assert_eq!(clamp_interval(Some(&Value::Integer(9999))), MAX_INTERVAL);
    }

    #[test]
    fn test_accepts_valid_value() {
        assert_eq!(clamp_interval(Some(&Value::Integer(45))), 45);
        assert_eq!(clamp_interval(Some(&Value::Integer(1))), MIN_INTERVAL);
        assert_eq!(clamp_interval(Some(&Value::Integer(480))), MAX_INTERVAL);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(clamp_interval(Some(&Value::String("abc".into()))), DEFAULT_INTERVAL);
        assert_eq!(clamp_interval(Some(&Value::Boolean(true))), DEFAULT_INTERVAL);
        assert_eq!(clamp_interval(None), DEFAULT_INTERVAL);
    }

    #[test]
    fn test_numeric_strings_and_floats() {
        assert_eq!(clamp_interval(Some(&Value::String(" 30 ".into()))), 30);
        assert_eq!(clamp_interval(Some(&Value::Float(12.9))), 12);
        assert_eq!(clamp_interval(Some(&Value::Float(f64::NAN))), DEFAULT_INTERVAL);
    }

    #[test]
    fn test_from_document_custom_values() {
        let config = Config::from_document(&doc(
            "interval_minutes = 30\nsound_enabled = false\ntrack_stats = false\n",
        ));
        assert_eq!(config.interval_minutes, 30);
        assert!(!config.sound_enabled);
        assert!(!config.track_stats);
        assert_eq!(config.notification_title, DEFAULT_TITLE);
    }

    #[test]
    fn test_from_document_sound_alias() {
        let config = Config::from_document(&doc("sound = false\n"));
        assert!(!config.sound_enabled);

        let both = Config::from_document(&doc("sound = false\nsound_enabled = true\n"));
        assert!(both.sound_enabled);
    }

    #[test]
    fn test_from_document_type_mismatch_keeps_defaults() {
        let config = Config::from_document(&doc(
            "interval_minutes = [1, 2]\nsound_enabled = \"yes\"\nnotification_title = 7\n",
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_document_ignores_unknown_keys() {
        let config = Config::from_document(&doc("theme = \"dark\"\n[window]\nwidth = 3\n"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_break_duration_clamped() {
        let low = Config::from_document(&doc("break_duration_seconds = 1\n"));
        assert_eq!(low.break_duration_seconds, MIN_BREAK_DURATION);

        let high = Config::from_document(&doc("break_duration_seconds = 1000\n"));
        assert_eq!(high.break_duration_seconds, MAX_BREAK_DURATION);

        let bad = Config::from_document(&doc("break_duration_seconds = \"long\"\n"));
        assert_eq!(bad.break_duration_seconds, MIN_BREAK_DURATION);
    }

    #[test]
    fn test_title_is_length_capped() {
        let long = "A".repeat(200);
        let config = Config::from_document(&doc(&format!("notification_title = \"{}\"\n", long)));
        assert_eq!(config.notification_title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_title_cap_counts_characters() {
        let long = "é".repeat(100);
        assert_eq!(truncate_title(&long).chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_validate_interval_input() {
        assert_eq!(validate_interval_input("45").unwrap(), 45);
        assert_eq!(validate_interval_input(" 1 ").unwrap(), 1);
        assert_eq!(validate_interval_input("480").unwrap(), 480);

        let err = validate_interval_input("abc").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid number.");

        for bad in ["0", "-5", "481"] {
            let err = validate_interval_input(bad).unwrap_err();
            assert!(matches!(err, BreatheError::InvalidInput(_)));
            assert!(err.to_string().contains("between 1 and 480"));
        }
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config = Config::from_document(&doc(Config::example_toml()));
        assert_eq!(config, Config::default());
    }
}
