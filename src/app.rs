//! Reminder controller.
//!
//! [`App`] owns the config, the stats store and the notifier, and reacts to
//! two kinds of input: timer ticks from the host and user actions from the
//! host's menu. Menu entries come from the [`ACTIONS`] table so every host
//! exposes the same set of actions with the same handlers.

use crate::common::get_data_dir;
use crate::config::{validate_interval_input, Config};
use crate::error::Result;
use crate::notifier::Notifier;
use crate::stats::{StatsStore, SUMMARY_DAYS};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the stats store inside the data directory.
pub const STATS_FILE_NAME: &str = "stats.json";

/// Services the controller needs from whatever UI drives it.
pub trait Host {
    /// Start (or restart) the recurring reminder timer.
    fn start_timer(&mut self, period: Duration);

    /// Stop the reminder timer; a stopped timer must not tick again.
    fn stop_timer(&mut self);

    /// Show a blocking informational message.
    fn alert(&mut self, title: &str, message: &str);

    /// Ask the user for a line of text. `None` means the user cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Leave the host's event loop.
    fn exit(&mut self);
}

/// User-facing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleReminders,
    SetInterval,
    ShowStats,
    TakeBreak,
    Quit,
}

/// Handler signature shared by every action. The optional argument carries
/// input the host already collected (e.g. `interval 30`).
pub type ActionHandler = fn(&mut App, &mut dyn Host, Option<&str>);

/// One row of the menu table.
pub struct ActionEntry {
    pub action: Action,
    /// Menu label
    pub label: &'static str,
    /// Short command name for text hosts
    pub command: &'static str,
    pub handler: ActionHandler,
}

/// Menu table, in display order.
pub const ACTIONS: &[ActionEntry] = &[
    ActionEntry {
        action: Action::ToggleReminders,
        label: "Reminders",
        command: "toggle",
        handler: toggle_handler,
    },
    ActionEntry {
        action: Action::SetInterval,
        label: "Set Interval",
        command: "interval",
        handler: set_interval_handler,
    },
    ActionEntry {
        action: Action::ShowStats,
        label: "Stats",
        command: "stats",
        handler: show_stats_handler,
    },
    ActionEntry {
        action: Action::TakeBreak,
        label: "Took a Break",
        command: "break",
        handler: take_break_handler,
    },
    ActionEntry {
        action: Action::Quit,
        label: "Quit",
        command: "quit",
        handler: quit_handler,
    },
];

impl Action {
    pub fn entry(self) -> &'static ActionEntry {
        ACTIONS
            .iter()
            .find(|entry| entry.action == self)
            .unwrap_or(&ACTIONS[0])
    }

    /// Look up an action by its command name or menu label (case-insensitive).
    pub fn from_command(name: &str) -> Option<Action> {
        let name = name.trim();
        ACTIONS
            .iter()
            .find(|entry| {
                entry.command.eq_ignore_ascii_case(name) || entry.label.eq_ignore_ascii_case(name)
            })
            .map(|entry| entry.action)
    }
}

fn toggle_handler(app: &mut App, host: &mut dyn Host, _arg: Option<&str>) {
    app.toggle_reminders(host);
}

fn set_interval_handler(app: &mut App, host: &mut dyn Host, arg: Option<&str>) {
    let text = match arg {
        Some(text) => text.to_string(),
        None => {
            let message = format!(
                "Interval in minutes ({}\u{2013}{}):",
                crate::config::MIN_INTERVAL,
                crate::config::MAX_INTERVAL
            );
            let current = app.config.interval_minutes.to_string();
            match host.prompt(&message, &current) {
                Some(text) => text,
                None => return,
            }
        }
    };
    if let Err(e) = app.set_interval(host, &text) {
        debug!("Interval input rejected: {}", e);
    }
}

fn show_stats_handler(app: &mut App, host: &mut dyn Host, _arg: Option<&str>) {
    app.show_stats(host);
}

fn take_break_handler(app: &mut App, _host: &mut dyn Host, _arg: Option<&str>) {
    app.take_break();
}

fn quit_handler(app: &mut App, host: &mut dyn Host, _arg: Option<&str>) {
    app.quit(host);
}

/// The break reminder controller.
pub struct App {
    config: Config,
    config_path: PathBuf,
    stats: StatsStore,
    notifier: Box<dyn Notifier>,
    active: bool,
}

impl App {
    pub fn new(
        config: Config,
        config_path: impl Into<PathBuf>,
        stats: StatsStore,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        App {
            config,
            config_path: config_path.into(),
            stats,
            notifier,
            active: false,
        }
    }

    /// Load config from `config_path` and, when tracking is enabled, stats
    /// from `data_dir`. With tracking off the store stays in memory.
    pub fn from_paths(config_path: &Path, data_dir: &Path, notifier: Box<dyn Notifier>) -> Self {
        let config = Config::load_from_file(config_path);
        let stats = if config.track_stats {
            StatsStore::load(data_dir.join(STATS_FILE_NAME))
        } else {
            StatsStore::in_memory()
        };
        Self::new(config, config_path, stats, notifier)
    }

    /// [`App::from_paths`] with the default config path and data directory.
    pub fn load_default(notifier: Box<dyn Notifier>) -> Self {
        Self::from_paths(&crate::common::get_config_path(), &get_data_dir(), notifier)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    /// Whether reminders are currently running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run the handler registered for `action`.
    pub fn dispatch(&mut self, host: &mut dyn Host, action: Action, arg: Option<&str>) {
        (action.entry().handler)(self, host, arg);
    }

    /// Start reminders if paused, pause them if running.
    pub fn toggle_reminders(&mut self, host: &mut dyn Host) {
        if self.active {
            host.stop_timer();
            self.active = false;
            if let Some(stats) = self.tracking() {
                stats.end_focus_session();
            }
            info!("Reminders paused");
            return;
        }

        host.start_timer(self.config.interval());
        self.active = true;
        if let Some(stats) = self.tracking() {
            stats.record_session_start();
            stats.start_focus_session();
        }
        self.notify(
            "Reminders active",
            &format!("Break every {} min.", self.config.interval_minutes),
            self.config.sound_enabled,
        );
        info!(
            "Reminders started, interval {} min",
            self.config.interval_minutes
        );
    }

    /// Apply an interval typed by the user.
    ///
    /// Invalid input is reported through the notifier and leaves the config
    /// and the timer untouched.
    pub fn set_interval(&mut self, host: &mut dyn Host, text: &str) -> Result<u32> {
        let minutes = match validate_interval_input(text) {
            Ok(minutes) => minutes,
            Err(e) => {
                self.notify("", &e.to_string(), false);
                return Err(e);
            }
        };

        if self.active {
            host.stop_timer();
        }

        self.config.interval_minutes = minutes;
        if let Err(e) = self.config.save(&self.config_path) {
            warn!(
                "Failed to save config to {}: {}",
                self.config_path.display(),
                e
            );
        }

        if self.active {
            host.start_timer(self.config.interval());
        }

        self.notify(
            "Interval updated",
            &format!("Reminders set to every {} min.", minutes),
            self.config.sound_enabled,
        );
        info!("Interval changed to {} min", minutes);
        Ok(minutes)
    }

    pub fn show_stats(&mut self, host: &mut dyn Host) {
        host.alert("Break Statistics", &self.stats.summary(SUMMARY_DAYS));
    }

    /// Record that the user took a break of the configured length.
    pub fn take_break(&mut self) {
        let seconds = u64::from(self.config.break_duration_seconds);
        if let Some(stats) = self.tracking() {
            stats.record_break(seconds);
        }
        info!("Break acknowledged ({}s)", seconds);
    }

    /// Stop everything and flush any open focus session before leaving.
    pub fn quit(&mut self, host: &mut dyn Host) {
        if self.active {
            host.stop_timer();
            self.active = false;
        }
        if let Some(stats) = self.tracking() {
            stats.end_focus_session();
        }
        host.exit();
    }

    /// Timer callback: count the reminder and show it.
    pub fn on_tick(&mut self) {
        if let Some(stats) = self.tracking() {
            stats.record_reminder();
        }
        self.notify(
            "Time for a break",
            "Look away from the screen. Stretch. Breathe.",
            self.config.sound_enabled,
        );
    }

    fn tracking(&mut self) -> Option<&mut StatsStore> {
        if self.config.track_stats {
            Some(&mut self.stats)
        } else {
            None
        }
    }

    fn notify(&self, subtitle: &str, message: &str, sound: bool) {
        self.notifier
            .notify(&self.config.notification_title, subtitle, message, sound);
    }
}
