//! # BreatheBreak
//!
//! A break reminder that keeps local, day-bucketed statistics.
//!
//! ## Features
//!
//! - **Reminders**: a recurring timer that shows a desktop notification
//! - **Stats Tracking**: reminders, acknowledged breaks and focus time per day
//! - **Configuration**: TOML settings with clamped, validated values
//! - **Durability**: every change is written atomically with owner-only permissions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use breathebreak::{StatsStore, SUMMARY_DAYS};
//!
//! let mut stats = StatsStore::load("/tmp/breathebreak/stats.json");
//! stats.record_reminder();
//! stats.record_break(20);
//! println!("{}", stats.summary(SUMMARY_DAYS));
//! ```

pub mod app;
pub mod clock;
pub mod common;
/// Configuration management module for loading and saving settings
pub mod config;
pub mod error;
pub mod notifier;
/// Terminal event loop driving the controller
pub mod runtime;
pub mod stats;
pub mod version;

pub use app::{Action, App, Host};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{BreatheError, Result};
pub use notifier::{default_notifier, LogNotifier, Notifier};
pub use stats::{DailyStats, StatsStore, NO_DATA_MESSAGE, SUMMARY_DAYS};
pub use version::{short_version, version_string};
