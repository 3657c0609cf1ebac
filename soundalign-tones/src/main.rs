//! SoundAlign tone engine (soundalign-tones) - command-line entry point
//!
//! Subcommands exercise the engine the way a host integration would:
//! single beeps through the router, progress tones, the test sequences,
//! and a `run` mode that routes beeps read line by line from stdin.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use soundalign_common::config::{resolve_config_path, TomlConfig};
use soundalign_common::{Direction, WaveformType};
use soundalign_tones::audio::{device, CpalPlainTone};
use soundalign_tones::playback::{
    spawn_liveness_supervisor, ToneEngine, TrackedObjectId, DEFAULT_STOP_TIMEOUT,
};
use soundalign_tones::routing::{
    self_test, BeepRouter, FocusProgress, LogAnnouncer, ProgressReading,
};
use soundalign_tones::SynthesisParameters;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for soundalign-tones
#[derive(Parser, Debug)]
#[command(name = "soundalign-tones")]
#[command(about = "Progress tone synthesis and stereo beep routing")]
#[command(version)]
struct Args {
    /// Bootstrap TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List audio output devices
    Devices,

    /// Route a single beep as the host would
    Beep {
        /// Frequency in Hz
        #[arg(long)]
        hz: f32,

        /// Length in milliseconds
        #[arg(long, default_value = "40")]
        length_ms: u32,

        /// Caller balance, left channel (0-100)
        #[arg(long, default_value = "50")]
        left: u8,

        /// Caller balance, right channel (0-100)
        #[arg(long, default_value = "50")]
        right: u8,

        /// Progress value of the focused control
        #[arg(long)]
        percent: Option<f64>,
    },

    /// Play one synthesized progress tone
    Progress {
        /// Percent complete (omit for indeterminate)
        #[arg(long)]
        percent: Option<f64>,

        /// left, center, right, left-to-right, right-to-left
        #[arg(long, value_parser = parse_direction)]
        direction: Option<Direction>,
    },

    /// Play the category test beeps and a progress sweep
    TestSequence {
        #[arg(long, value_parser = parse_direction)]
        direction: Option<Direction>,

        /// sine, triangle, sawtooth, original
        #[arg(long, value_parser = parse_waveform)]
        waveform: Option<WaveformType>,
    },

    /// Route beeps read from stdin: `<hz> <length_ms> [percent|busy] [object]`,
    /// or `on` / `off` to toggle routing
    Run,
}

fn parse_direction(s: &str) -> std::result::Result<Direction, String> {
    Direction::from_name(s).ok_or_else(|| format!("unknown direction '{}'", s))
}

fn parse_waveform(s: &str) -> std::result::Result<WaveformType, String> {
    WaveformType::from_name(s).ok_or_else(|| format!("unknown waveform '{}'", s))
}

fn init_tracing(config: &TomlConfig, cli_level: Option<&str>) -> Result<()> {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "soundalign_tones={level},soundalign_common={level}"
        ))
    });

    match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = TomlConfig::load_or_default(config_path.as_deref());
    init_tracing(&config, args.log_level.as_deref())?;

    info!(
        "Starting SoundAlign tone engine (soundalign-tones) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using compiled defaults"),
    }

    if let Command::Devices = args.command {
        for name in device::list_devices().context("Failed to list output devices")? {
            println!("{}", name);
        }
        return Ok(());
    }

    let engine = Arc::new(ToneEngine::with_cpal(
        SynthesisParameters::from_settings(&config.settings),
        config.device.clone(),
    ));
    let router = Arc::new(BeepRouter::new(
        Arc::clone(&engine),
        Arc::new(CpalPlainTone::new(config.device.clone())),
        Arc::new(LogAnnouncer),
        config.settings.clone(),
    ));

    if let Err(e) = engine.start() {
        warn!("Progress tones unavailable, plain tones only: {}", e);
    }

    let result = match args.command {
        Command::Devices => Ok(()),
        Command::Beep {
            hz,
            length_ms,
            left,
            right,
            percent,
        } => {
            let focus = percent.map(|p| FocusProgress {
                object: TrackedObjectId(1),
                reading: ProgressReading::Value(p),
            });
            let route = router.handle_beep(hz, length_ms, left, right, focus);
            info!("Beep routed: {:?}", route);
            // Let the plain tone thread finish
            tokio::time::sleep(Duration::from_millis(length_ms as u64 + 200)).await;
            Ok(())
        }
        Command::Progress { percent, direction } => {
            let direction = direction.unwrap_or(config.settings.progress_direction);
            engine
                .play_progress_sound(percent, direction)
                .map_err(|e| anyhow!("Failed to play progress tone: {}", e))
        }
        Command::TestSequence {
            direction,
            waveform,
        } => {
            let settings = router.settings();
            let direction = direction.unwrap_or(settings.progress_direction);
            let waveform = waveform.unwrap_or(settings.waveform_type);
            let router = Arc::clone(&router);
            tokio::task::spawn_blocking(move || {
                self_test::test_beeps(&router, self_test::CATEGORY_PAUSE);
                self_test::test_progress(&router, direction, waveform, self_test::SWEEP_PAUSE)
                    .map(|_| ())
            })
            .await
            .context("Test sequence task failed")?
            .map_err(|e| anyhow!("Progress test failed: {}", e))
        }
        Command::Run => {
            let supervisor = spawn_liveness_supervisor(
                Arc::clone(&engine),
                Duration::from_secs(config.liveness_interval_secs),
            );
            let result = tokio::select! {
                result = route_stdin(Arc::clone(&router)) => result,
                _ = shutdown_signal() => Ok(()),
            };
            supervisor.abort();
            result
        }
    };

    info!("Tone engine status at shutdown: {:?}", engine.status());

    // Stop on a blocking thread: the worker drains what is still queued
    let stopper = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || stopper.stop(DEFAULT_STOP_TIMEOUT))
        .await
        .context("Engine shutdown task failed")?;

    info!("Shutdown complete");
    result
}

/// One parsed stdin line
enum Line {
    Beep {
        hz: f32,
        length_ms: u32,
        focus: Option<FocusProgress>,
    },
    Active(bool),
}

fn parse_line(line: &str) -> Result<Line> {
    let mut fields = line.split_whitespace();
    let first = fields.next().ok_or_else(|| anyhow!("empty line"))?;
    match first {
        "on" => return Ok(Line::Active(true)),
        "off" => return Ok(Line::Active(false)),
        _ => {}
    }

    let hz: f32 = first.parse().with_context(|| format!("bad frequency '{}'", first))?;
    let length_ms: u32 = fields
        .next()
        .ok_or_else(|| anyhow!("missing length"))?
        .parse()
        .context("bad length")?;

    let reading = match fields.next() {
        None => None,
        Some("busy") => Some(ProgressReading::Indeterminate),
        Some(value) => Some(ProgressReading::Value(
            value.parse().with_context(|| format!("bad percent '{}'", value))?,
        )),
    };
    let object = match fields.next() {
        Some(value) => value.parse().context("bad object id")?,
        None => 1,
    };

    Ok(Line::Beep {
        hz,
        length_ms,
        focus: reading.map(|reading| FocusProgress {
            object: TrackedObjectId(object),
            reading,
        }),
    })
}

async fn route_stdin(router: Arc<BeepRouter>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("Reading beeps from stdin");

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Ignoring line '{}': {}", line, e);
                continue;
            }
        };

        let router = Arc::clone(&router);
        let handled = tokio::task::spawn_blocking(move || match parsed {
            Line::Beep {
                hz,
                length_ms,
                focus,
            } => {
                let route = router.handle_beep(hz, length_ms, 50, 50, focus);
                info!("{} Hz / {} ms -> {:?}", hz, length_ms, route);
            }
            Line::Active(active) => router.set_active(active),
        })
        .await;

        if let Err(e) = handled {
            error!("Beep handler failed: {}", e);
        }
    }

    info!("End of input");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
