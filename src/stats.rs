//! Day-bucketed break and focus statistics.
//!
//! One [`DailyStats`] record per local calendar day, keyed by its ISO date.
//! Every recording call writes the whole map back to disk before returning;
//! a failed write is logged and the in-memory counters are kept.

use crate::clock::{Clock, SystemClock};
use crate::common::{day_key, write_private_atomic};
use crate::error::Result;
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of days covered by the default summary.
pub const SUMMARY_DAYS: usize = 7;

/// Summary text for a store with no recorded days.
pub const NO_DATA_MESSAGE: &str = "No break data recorded yet.";

/// Aggregated counters for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Day key (`YYYY-MM-DD`); filled from the map key when absent on disk
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub reminders_sent: u64,
    #[serde(default)]
    pub breaks_acknowledged: u64,
    #[serde(default)]
    pub total_break_seconds: u64,
    #[serde(default)]
    pub sessions_started: u64,
    #[serde(default)]
    pub focus_seconds: u64,
}

impl DailyStats {
    pub fn new(date: impl Into<String>) -> Self {
        DailyStats {
            date: date.into(),
            ..Default::default()
        }
    }
}

/// Owner of all per-day records and the open focus session, if any.
pub struct StatsStore {
    days: BTreeMap<String, DailyStats>,
    focus_start: Option<DateTime<Local>>,
    path: Option<PathBuf>,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsStore")
            .field("days", &self.days)
            .field("focus_start", &self.focus_start)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl StatsStore {
    /// An empty store persisted to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StatsStore {
            days: BTreeMap::new(),
            focus_start: None,
            path: Some(path.into()),
            clock: Box::new(SystemClock),
        }
    }

    /// An empty store that never touches the filesystem.
    pub fn in_memory() -> Self {
        StatsStore {
            days: BTreeMap::new(),
            focus_start: None,
            path: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Load the store persisted at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty store bound to
    /// the same path; this never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let days = match read_days(&path) {
            Ok(days) => days,
            Err(e) => {
                warn!(
                    "Ignoring unreadable stats file {}: {}. Starting empty.",
                    path.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        StatsStore {
            days,
            focus_start: None,
            path: Some(path),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Record for one day key, if any event happened that day.
    pub fn day(&self, key: &str) -> Option<&DailyStats> {
        self.days.get(key)
    }

    /// All records in ascending day order.
    pub fn days(&self) -> impl DoubleEndedIterator<Item = &DailyStats> + '_ {
        self.days.values()
    }

    /// Today's counters, zeroed when nothing was recorded yet. Does not
    /// create a record.
    pub fn today_stats(&self) -> DailyStats {
        let key = day_key(&self.clock.now());
        self.days
            .get(&key)
            .cloned()
            .unwrap_or_else(|| DailyStats::new(key))
    }

    pub fn record_reminder(&mut self) {
        self.today().reminders_sent += 1;
        self.persist();
    }

    pub fn record_break(&mut self, duration_seconds: u64) {
        let today = self.today();
        today.breaks_acknowledged += 1;
        today.total_break_seconds += duration_seconds;
        self.persist();
    }

    /// Count one (re)enabling of reminders.
    pub fn record_session_start(&mut self) {
        self.today().sessions_started += 1;
        self.persist();
    }

    /// Open a focus session at the current time.
    ///
    /// An already-open session is replaced and its elapsed time is dropped.
    pub fn start_focus_session(&mut self) {
        let now = self.clock.now();
        if let Some(previous) = self.focus_start.replace(now) {
            debug!(
                "Focus session started at {} replaced by new start",
                previous.to_rfc3339()
            );
        }
        debug!("Focus session started at {}", now.to_rfc3339());
    }

    pub fn has_open_session(&self) -> bool {
        self.focus_start.is_some()
    }

    /// Close the open focus session and credit its whole length to the day
    /// active now, even if it started on an earlier day.
    ///
    /// Returns the seconds credited, or `None` when no session was open (in
    /// which case nothing is recorded or written).
    pub fn end_focus_session(&mut self) -> Option<u64> {
        let start = self.focus_start.take()?;
        // A clock moved backwards must not produce negative focus time.
        let elapsed = (self.clock.now() - start).num_seconds().max(0) as u64;
        self.today().focus_seconds += elapsed;
        self.persist();
        debug!("Focus session ended, +{}s", elapsed);
        Some(elapsed)
    }

    /// Rolling report over the `last_n_days` most recent recorded days.
    ///
    /// Days are picked by descending key, so days without records are
    /// skipped rather than counted.
    pub fn summary(&self, last_n_days: usize) -> String {
        let recent: Vec<&DailyStats> = self.days.values().rev().take(last_n_days).collect();
        if recent.is_empty() {
            return NO_DATA_MESSAGE.to_string();
        }

        let reminders: u64 = recent.iter().map(|d| d.reminders_sent).sum();
        let breaks: u64 = recent.iter().map(|d| d.breaks_acknowledged).sum();
        let focus: u64 = recent.iter().map(|d| d.focus_seconds).sum();

        let lines = [
            format!("Last {} day(s):", recent.len()),
            format!("  Reminders sent: {}", reminders),
            format!("  Breaks taken:   {}", breaks),
            format!("  Compliance:     {:.0}%", compliance_rate(breaks, reminders)),
            format!("  Focus time:     {}", format_focus_time(focus)),
        ];
        lines.join("\n")
    }

    /// Write the full store to its file. In-memory stores succeed trivially.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.days)?;
        write_private_atomic(path, json.as_bytes())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to persist stats: {}", e);
        }
    }

    fn today(&mut self) -> &mut DailyStats {
        let key = day_key(&self.clock.now());
        self.days
            .entry(key.clone())
            .or_insert_with(|| DailyStats::new(key))
    }
}

fn read_days(path: &Path) -> Result<BTreeMap<String, DailyStats>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path)?;
    let mut days: BTreeMap<String, DailyStats> = serde_json::from_str(&contents)?;
    for (key, day) in days.iter_mut() {
        if day.date.is_empty() {
            day.date = key.clone();
        }
    }
    Ok(days)
}

/// Breaks per reminder as a percentage; 0 when no reminders were sent.
pub fn compliance_rate(breaks: u64, reminders: u64) -> f64 {
    if reminders == 0 {
        return 0.0;
    }
    breaks as f64 / reminders as f64 * 100.0
}

/// Formats seconds as whole hours and minutes, e.g. `1h 30m`.
pub fn format_focus_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}
