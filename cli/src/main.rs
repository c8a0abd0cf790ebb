mod config;
mod data;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use tokio::sync::watch;
use tracing::info;

use config::{config_path, ensure_dirs, LogLevel, UserConfig};
use data::{monitor, BatteryData, BatteryReading, CsvAppender, LevelMonitor, LevelSnapshot, Sampler};
use logging::LogMode;

#[derive(Debug, Subcommand)]
enum Commands {
    /// Record battery samples to a CSV file (default)
    #[command(alias = "rec")]
    Record {
        /// Output file (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sampling interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Number of samples to record (0 = until interrupted)
        #[arg(short, long, default_value_t = 0)]
        samples: u64,
    },

    /// Output readings in JSON format (suitable for piping)
    #[command(alias = "raw")]
    Pipe {
        /// Number of samples to output (0 = infinite)
        #[arg(short, long, default_value_t = 0)]
        samples: u32,

        /// Update interval in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval: u64,

        /// Compact JSON output (one line per sample)
        #[arg(short, long)]
        compact: bool,
    },

    /// Print debug information about the battery and configuration
    Debug,

    /// Show or edit configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },
}

/// Battery sampler that appends readings to a CSV file
#[derive(Debug, Parser)]
#[command(name = "voltlog", version, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);

    match cli.command {
        Some(Commands::Record {
            output,
            interval_ms,
            samples,
        }) => {
            let _guard = logging::init(config.log_level, LogMode::Both, log_level_override);
            let mut config = config;
            config.merge_with_args(interval_ms, output);
            run_record(config, samples)
        }
        Some(Commands::Pipe {
            samples,
            interval,
            compact,
        }) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            run_pipe(samples, interval, compact)
        }
        Some(Commands::Debug) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            run_debug(&config)
        }
        Some(Commands::Config { path, reset, edit }) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            run_config(path, reset, edit)
        }
        None => {
            let _guard = logging::init(config.log_level, LogMode::Both, log_level_override);
            run_record(config, 0)
        }
    }
}

fn run_record(config: UserConfig, samples: u64) -> Result<()> {
    if !BatteryData::is_available() {
        return Err(eyre!("No battery found on this system"));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run_record_async(config, samples))
}

async fn run_record_async(config: UserConfig, samples: u64) -> Result<()> {
    let output = config.effective_output();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let monitor_battery = BatteryData::new()?;
    let (level_tx, level_rx) = monitor::channel();
    let props = monitor_battery.props();
    let _ = level_tx.send(LevelSnapshot {
        voltage_mv: props.voltage_mv,
        level_percent: props.level_percent(),
    });

    let monitor = LevelMonitor::new(
        monitor_battery,
        level_tx,
        Duration::from_millis(config.monitor_interval_ms),
    );
    let monitor_task = tokio::task::spawn_local(monitor.run(shutdown_rx.clone()));

    let sampler = Sampler::new(
        BatteryData::new()?,
        CsvAppender::new(output),
        level_rx,
        Duration::from_millis(config.interval_ms),
        samples,
    );
    let mut sampler_task = tokio::task::spawn_local(sampler.run(shutdown_rx));

    tokio::select! {
        result = &mut sampler_task => {
            let count = result?;
            info!(count, "Recording finished");
            let _ = shutdown_tx.send(true);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, stopping");
            let _ = shutdown_tx.send(true);
            let count = (&mut sampler_task).await?;
            info!(count, "Recording stopped");
        }
    }

    let _ = monitor_task.await;
    Ok(())
}

fn run_pipe(samples: u32, interval: u64, compact: bool) -> Result<()> {
    use serde_json::json;

    let mut battery = BatteryData::new()?;
    let mut counter = 0u32;

    loop {
        battery.refresh()?;

        let props = battery.props();
        let cached = LevelSnapshot {
            voltage_mv: props.voltage_mv,
            level_percent: props.level_percent(),
        };
        let reading = BatteryReading::compute(chrono::Utc::now().timestamp_millis(), props, cached);

        let doc = json!({
            "reading": reading,
            "state": props.state.label(),
            "level_percent": cached.level_percent,
        });

        if compact {
            println!("{}", serde_json::to_string(&doc)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }

        counter += 1;
        if samples > 0 && counter >= samples {
            break;
        }

        std::thread::sleep(Duration::from_millis(interval));
    }

    Ok(())
}

fn run_debug(config: &UserConfig) -> Result<()> {
    println!("voltlog debug information");
    println!("{}", "=".repeat(60));

    println!("\n--- Battery Properties ---");
    let battery = BatteryData::new()?;
    let props = battery.props();
    println!("State: {}", props.state);
    println!("Current now: {} uA", props.current_now_ua);
    println!("Current average: {} uA", props.current_average_ua);
    println!("Voltage: {} mV", props.voltage_mv);
    println!("Charge counter: {} uAh", props.charge_counter_uah);
    println!("Charge full: {} uAh", props.charge_full_uah);
    println!("Capacity: {}%", props.capacity_percent);
    println!("Level: {:.1}%", props.level_percent());
    println!("Energy: {} nWh", props.energy_nwh);

    println!("\n--- Derived ---");
    let cached = LevelSnapshot {
        voltage_mv: props.voltage_mv,
        level_percent: props.level_percent(),
    };
    let reading = BatteryReading::compute(chrono::Utc::now().timestamp_millis(), props, cached);
    println!("Normalized current: {} uA", reading.current_now_ua);
    println!("Discharge power: {:.2} W", reading.watts);
    println!(
        "Estimated lifetime: {}h {:.0}m",
        reading.hours, reading.minutes
    );
    println!("CSV record: {}", reading.to_csv_line());

    println!("\n--- Config Paths ---");
    println!("Config: {}", config_path().display());
    println!("Output: {}", config.effective_output().display());
    println!("Logs: {}", config::runtime_dir().display());

    println!("\n--- Current Config ---");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}

fn run_config(path: bool, reset: bool, edit: bool) -> Result<()> {
    let config_file = config_path();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        let config = UserConfig::default();
        config.save()?;
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());

        if !config_file.exists() {
            let config = UserConfig::default();
            config.save()?;
        }

        std::process::Command::new(editor)
            .arg(&config_file)
            .status()?;

        return Ok(());
    }

    let config = UserConfig::load();
    println!("Config file: {}", config_file.display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
