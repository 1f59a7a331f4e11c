//! Terminal host for the reminder controller.
//!
//! A ticker thread and a stdin reader thread only produce [`Event`]s; the
//! event loop in [`TerminalHost::run`] is the single owner of the [`App`],
//! so the stores are never touched from more than one thread.

use crate::app::{Action, App, Host, ACTIONS};
use crate::error::Result;
use log::{debug, warn};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The reminder timer fired. Carries the id of the timer that sent it.
    Tick(u64),
    /// A line typed by the user.
    Command(String),
    /// Stdin reached end of file.
    InputClosed,
    /// The user pressed Ctrl-C.
    Interrupted,
}

/// Handle to a running ticker thread. Dropping it stops the thread.
struct Ticker {
    id: u64,
    _stop: Sender<()>,
}

/// A [`Host`] that reads commands from a line-based input and writes
/// alerts and prompts to `out`.
pub struct TerminalHost<W: Write> {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    pending: VecDeque<Event>,
    ticker: Option<Ticker>,
    next_timer_id: u64,
    exit_requested: bool,
    out: W,
}

impl TerminalHost<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W) -> Self {
        let (tx, rx) = mpsc::channel();
        TerminalHost {
            tx,
            rx,
            pending: VecDeque::new(),
            ticker: None,
            next_timer_id: 0,
            exit_requested: false,
            out,
        }
    }

    /// Sender for feeding events into the loop.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Forward stdin lines into the loop, followed by `InputClosed`.
    pub fn spawn_stdin_reader(&self) -> io::Result<JoinHandle<()>> {
        let tx = self.sender();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(Event::Command(line)).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read input: {}", e);
                            break;
                        }
                    }
                }
                let _ = tx.send(Event::InputClosed);
            })
    }

    /// Turn Ctrl-C into an [`Event::Interrupted`] so the loop can quit
    /// cleanly and flush the open focus session.
    pub fn install_interrupt_handler(&self) -> Result<()> {
        let tx = self.sender();
        ctrlc::set_handler(move || {
            let _ = tx.send(Event::Interrupted);
        })?;
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn is_timer_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Process events until the app asks to exit.
    pub fn run(&mut self, app: &mut App) -> Result<()> {
        self.print_menu(app);

        while !self.exit_requested {
            let Some(event) = self.next_event() else {
                break;
            };

            match event {
                Event::Tick(id) => {
                    if self.ticker.as_ref().map(|t| t.id) == Some(id) {
                        app.on_tick();
                    } else {
                        debug!("Dropping tick from stopped timer {}", id);
                    }
                }
                Event::Command(line) => self.handle_command(app, &line),
                Event::InputClosed => app.quit(self),
                Event::Interrupted => {
                    self.say("\nShutting down...");
                    app.quit(self);
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn handle_command(&mut self, app: &mut App, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        if name.eq_ignore_ascii_case("help") || name == "?" {
            self.print_menu(app);
            return;
        }

        match Action::from_command(name) {
            Some(action) => app.dispatch(self, action, arg),
            None => self.say(&format!("Unknown command '{}'. Type 'help'.", name)),
        }
    }

    fn print_menu(&mut self, app: &App) {
        let state = if app.is_active() { "on" } else { "off" };
        let mut menu = format!(
            "BreatheBreak - reminders {}, every {} min\n",
            state,
            app.config().interval_minutes
        );
        for entry in ACTIONS {
            menu.push_str(&format!("  {:<10} {}\n", entry.command, entry.label));
        }
        self.say(menu.trim_end());
    }

    fn next_event(&mut self) -> Option<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        self.rx.recv().ok()
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> Host for TerminalHost<W> {
    fn start_timer(&mut self, period: Duration) {
        self.stop_timer();

        let id = self.next_timer_id;
        self.next_timer_id += 1;

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let events = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("ticker-{}", id))
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(Event::Tick(id)).is_err() {
                            return;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            });

        match spawned {
            Ok(_) => {
                debug!("Timer {} started with period {:?}", id, period);
                self.ticker = Some(Ticker { id, _stop: stop_tx });
            }
            Err(e) => warn!("Failed to start reminder timer: {}", e),
        }
    }

    fn stop_timer(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!("Timer {} stopped", ticker.id);
        }
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.say(&format!("== {} ==\n{}", title, message));
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self.say(&format!("{} [{}]", message, default));

        loop {
            match self.rx.recv() {
                Ok(Event::Command(line)) => {
                    let line = line.trim();
                    return Some(if line.is_empty() {
                        default.to_string()
                    } else {
                        line.to_string()
                    });
                }
                Ok(event @ Event::Tick(_)) => self.pending.push_back(event),
                Ok(event @ (Event::InputClosed | Event::Interrupted)) => {
                    self.pending.push_back(event);
                    return None;
                }
                Err(_) => return None,
            }
        }
    }

    fn exit(&mut self) {
        self.stop_timer();
        self.exit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::notifier::LogNotifier;
    use crate::stats::StatsStore;
    use chrono::Local;
    use tempfile::TempDir;

    fn test_app(temp_dir: &TempDir) -> App {
        App::new(
            Config::default(),
            temp_dir.path().join("config.toml"),
            StatsStore::in_memory(),
            Box::new(LogNotifier),
        )
    }

    fn output_text(host: &TerminalHost<Vec<u8>>) -> String {
        String::from_utf8_lossy(host.output()).into_owned()
    }

    #[test]
    fn test_run_processes_commands_until_quit() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Command("toggle".into())).unwrap();
        tx.send(Event::Command("stats".into())).unwrap();
        tx.send(Event::Command("quit".into())).unwrap();
        tx.send(Event::Command("toggle".into())).unwrap();

        host.run(&mut app).unwrap();

        let text = output_text(&host);
        assert!(text.contains("== Break Statistics =="));
        assert!(text.contains("Last 1 day(s):"));
        assert!(!app.is_active());
        assert!(!host.is_timer_running());
        assert!(!app.stats().has_open_session());
    }

    #[test]
    fn test_unknown_command_and_help() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Command("snooze".into())).unwrap();
        tx.send(Event::Command("help".into())).unwrap();
        tx.send(Event::InputClosed).unwrap();

        host.run(&mut app).unwrap();

        let text = output_text(&host);
        assert!(text.contains("Unknown command 'snooze'"));
        assert_eq!(text.matches("Set Interval").count(), 2);
    }

    #[test]
    fn test_interval_command_with_argument() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Command("interval 45".into())).unwrap();
        tx.send(Event::InputClosed).unwrap();
        host.run(&mut app).unwrap();

        assert_eq!(app.config().interval_minutes, 45);
        let saved = Config::load_from_file(&temp_dir.path().join("config.toml"));
        assert_eq!(saved.interval_minutes, 45);
    }

    #[test]
    fn test_interval_prompt_reads_next_line() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Command("interval".into())).unwrap();
        tx.send(Event::Command("12".into())).unwrap();
        tx.send(Event::InputClosed).unwrap();
        host.run(&mut app).unwrap();

        assert_eq!(app.config().interval_minutes, 12);
        assert!(output_text(&host).contains("Interval in minutes"));
    }

    #[test]
    fn test_interrupt_flushes_open_focus_session() {
        let temp_dir = TempDir::new().unwrap();
        let stats_path = temp_dir.path().join("stats.json");
        let clock = ManualClock::new(Local::now());
        let mut app = App::new(
            Config::default(),
            temp_dir.path().join("config.toml"),
            StatsStore::new(&stats_path).with_clock(clock.clone()),
            Box::new(LogNotifier),
        );
        let mut host = TerminalHost::new(Vec::new());

        app.toggle_reminders(&mut host);
        clock.advance(chrono::Duration::minutes(40));
        host.sender().send(Event::Interrupted).unwrap();
        host.run(&mut app).unwrap();

        assert!(!app.is_active());
        assert!(!host.is_timer_running());
        let persisted = StatsStore::load(&stats_path).with_clock(clock);
        assert_eq!(persisted.today_stats().focus_seconds, 40 * 60);
        assert_eq!(persisted.today_stats().sessions_started, 1);
    }

    #[test]
    fn test_interrupt_during_prompt_cancels_and_quits() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Command("interval".into())).unwrap();
        tx.send(Event::Interrupted).unwrap();
        host.run(&mut app).unwrap();

        assert_eq!(app.config().interval_minutes, 20);
        assert!(output_text(&host).contains("Shutting down..."));
    }

    #[test]
    fn test_stale_ticks_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let mut host = TerminalHost::new(Vec::new());

        let tx = host.sender();
        tx.send(Event::Tick(99)).unwrap();
        tx.send(Event::InputClosed).unwrap();
        host.run(&mut app).unwrap();

        assert!(app.stats().is_empty());
    }

    #[test]
    fn test_timer_ticks_and_stops() {
        let mut host = TerminalHost::new(Vec::new());
        host.start_timer(Duration::from_millis(10));
        assert!(host.is_timer_running());

        let event = host.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event, Event::Tick(0));

        host.stop_timer();
        assert!(!host.is_timer_running());
    }
}
