//! CrashGuard host simulation entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedSensors   LogEventSink   JsonConfigFile  LogSpeech   │
//! │  (Motion+Audio)     (EventSink)    (ConfigPort)    (Speech)    │
//! │  SimulatedLocation                                             │
//! │  (Location)                                                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  Watchers · Timers · Alert FSM                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  runtime::run_session (LocalExecutor · Channel · Signal)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `crashguard [config.json]`.  The script switches protection on,
//! replays a crash spike half a second later, lets the countdown run out
//! and the alert go out, then dismisses it and shuts down.

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use crashguard::adapters::config_file::JsonConfigFile;
use crashguard::adapters::log_sink::LogEventSink;
use crashguard::adapters::sim::{LogSpeech, SimulatedLocation, SimulatedSensors};
use crashguard::app::commands::AppCommand;
use crashguard::app::ports::{ConfigPort, Coordinates};
use crashguard::app::service::MonitorService;
use crashguard::error::Error;
use crashguard::runtime::{self, CommandChannel};
use crashguard::sensors::motion::MotionSample;

const DEFAULT_CONFIG_PATH: &str = "crashguard.json";

/// Position reported by the simulated geolocation.
const SIM_POSITION: Coordinates = Coordinates {
    latitude: 37.7749,
    longitude: -122.4194,
};

const LOCATION_LATENCY: Duration = Duration::from_millis(300);

async fn script(commands: &CommandChannel, countdown: Duration) {
    commands.send(AppCommand::ToggleMonitoring).await;

    // Spike lands at +500 ms; countdown, locate, then a moment to read the panel.
    let settle = Duration::from_millis(500) + countdown + LOCATION_LATENCY + Duration::from_secs(1);
    async_io_mini::Timer::after(settle).await;

    commands.send(AppCommand::DismissAlert).await;
    commands.send(AppCommand::ToggleMonitoring).await;
    commands.send(AppCommand::Shutdown).await;
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  CrashGuard v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let config = JsonConfigFile::new(&path)
        .load()
        .map_err(Error::from)
        .with_context(|| format!("loading {}", path))?;

    let countdown = Duration::from_millis(
        u64::from(config.countdown_secs) * u64::from(config.countdown_tick_ms),
    );

    let sensors = SimulatedSensors::new()
        .with_reading(Duration::from_millis(500), MotionSample::new(10.0, 10.0, 10.0))
        .with_sound_level(40);
    let location = SimulatedLocation::fixed(SIM_POSITION, LOCATION_LATENCY);
    let commands = CommandChannel::new();

    let service = MonitorService::new(config);
    let (summary, ()) = runtime::run_blocking(futures_lite::future::zip(
        runtime::run_session(
            service,
            sensors,
            LogEventSink::new(),
            location,
            LogSpeech::new(),
            &commands,
        ),
        script(&commands, countdown),
    ));

    info!(
        "Simulation finished: {} alert(s) sent, final state {:?}",
        summary.alerts_sent, summary.final_state
    );
    if let Some(report) = summary.last_alert {
        info!("Last alert at {}, {}", report.latitude, report.longitude);
    }
    Ok(())
}
