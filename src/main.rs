//! # BreatheBreak
//!
//! Reminds you to take breaks and keeps local statistics about them.
//!
//! ## Usage
//!
//! ```bash
//! breathebreak                 # interactive reminder loop
//! breathebreak stats --days 30 # print the rolling summary
//! breathebreak break           # log a break taken away from the app
//! ```

use breathebreak::app::{App, STATS_FILE_NAME};
use breathebreak::common::{get_config_path, get_data_dir};
use breathebreak::config::{validate_interval_input, Config};
use breathebreak::error::Result;
use breathebreak::notifier::default_notifier;
use breathebreak::runtime::TerminalHost;
use breathebreak::stats::{StatsStore, SUMMARY_DAYS};
use breathebreak::version::{short_version, version_string};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

/// BreatheBreak - break reminders with local statistics
#[derive(Parser)]
#[command(name = "breathebreak")]
#[command(version = env!("BREATHEBREAK_VERSION"))]
#[command(about = "Break reminders with local focus and compliance statistics", long_about = None)]
struct Cli {
    /// Show detailed version information
    #[arg(long = "version-full")]
    version_full: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding stats.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive reminder loop (default)
    Run,

    /// Print the statistics summary
    Stats {
        /// Number of most recent recorded days to include
        #[arg(long, default_value_t = SUMMARY_DAYS)]
        days: usize,
    },

    /// Record a break
    Break {
        /// Break length in seconds (defaults to break_duration_seconds)
        #[arg(long)]
        seconds: Option<u64>,
    },

    /// Change the reminder interval
    SetInterval {
        /// Minutes between reminders
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },

    /// Generate example config file
    GenerateConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show where config and stats are stored
    Paths,
}

fn main() -> Result<()> {
    // INFO by default so reminder activity is visible; RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.version_full {
        print!("{}", version_string());
        return Ok(());
    }

    let config_path = cli.config.unwrap_or_else(get_config_path);
    let data_dir = cli.data_dir.unwrap_or_else(get_data_dir);
    let stats_path = data_dir.join(STATS_FILE_NAME);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!("BreatheBreak {} starting", short_version());
            let mut app = App::from_paths(&config_path, &data_dir, default_notifier());
            let mut host = TerminalHost::stdout();
            host.install_interrupt_handler()?;
            host.spawn_stdin_reader()?;
            host.run(&mut app)?;
            info!("BreatheBreak stopped");
        }
        Commands::Stats { days } => {
            let stats = StatsStore::load(&stats_path);
            println!("{}", stats.summary(days));
        }
        Commands::Break { seconds } => {
            let config = Config::load_from_file(&config_path);
            if !config.track_stats {
                println!("Stats tracking is disabled (track_stats = false).");
                return Ok(());
            }
            let seconds = seconds.unwrap_or(u64::from(config.break_duration_seconds));
            let mut stats = StatsStore::load(&stats_path);
            stats.record_break(seconds);
            stats.save()?;
            let today = stats.today_stats();
            println!(
                "Break recorded ({}s). Breaks today: {}",
                seconds, today.breaks_acknowledged
            );
        }
        Commands::SetInterval { minutes } => {
            let minutes = validate_interval_input(&minutes)?;
            let mut config = Config::load_from_file(&config_path);
            config.interval_minutes = minutes;
            config.save(&config_path)?;
            println!("Reminders set to every {} min.", minutes);
        }
        Commands::GenerateConfig { force } => {
            if config_path.exists() && !force {
                println!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
                return Ok(());
            }
            breathebreak::common::write_private_atomic(
                &config_path,
                Config::example_toml().as_bytes(),
            )?;
            println!("Config file generated at {}", config_path.display());
        }
        Commands::Paths => {
            println!("Config: {}", config_path.display());
            println!("Stats:  {}", stats_path.display());
        }
    }

    Ok(())
}
