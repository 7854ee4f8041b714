//! Door lock emulator binary.
//!
//! Runs the door controller against mock peripherals. Console lines drive
//! the button and card reader; other lines reach the serial link as
//! Bluetooth commands, and whatever the controller writes back is printed.
//!
//! # Usage
//!
//! ```bash
//! # Reference configuration
//! doorlock
//!
//! # Custom credentials and timing
//! DOORLOCK_CONFIG=door.json doorlock --log-level debug
//!
//! # Bluetooth module on a real UART (requires the hardware-serial feature)
//! doorlock --serial-port /dev/ttyUSB0
//! ```

mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use doorlock_controller::{DoorController, Peripherals};
use doorlock_core::DoorConfig;
use doorlock_hardware::AnySerialLink;
use doorlock_hardware::mock::{
    MockButton, MockButtonHandle, MockNotifier, MockRfid, MockRfidHandle, MockSerial,
    MockSerialHandle, MockStepper,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use console::Command;

/// Cycle pacing used when the configuration asks for none.
const DEFAULT_POLL_INTERVAL_MS: u64 = 20;

/// Door lock controller emulator
#[derive(Parser, Debug)]
#[command(name = "doorlock")]
#[command(about = "Motorized door lock controller running on mock peripherals")]
#[command(version)]
struct Args {
    /// JSON configuration file (defaults to the reference build)
    #[arg(short, long, env = "DOORLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Move the latch instantly instead of at motor speed
    #[arg(long)]
    instant: bool,

    /// Serial port of the Bluetooth module
    #[cfg(feature = "hardware-serial")]
    #[arg(long, env = "DOORLOCK_SERIAL_PORT")]
    serial_port: Option<String>,

    /// Baud rate for --serial-port
    #[cfg(feature = "hardware-serial")]
    #[arg(long, default_value_t = doorlock_core::constants::SERIAL_BAUD_RATE)]
    baud: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = load_config(args.config.as_deref())?;
    if config.poll_interval_ms == 0 {
        config.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
    }

    let (button, button_handle) = MockButton::new();
    let (reader, rfid_handle) = MockRfid::new();
    let (serial, serial_handle) = open_serial(&args)?;

    let motor = if args.instant {
        MockStepper::new()
    } else {
        MockStepper::new().with_timing()
    };

    let mut controller = DoorController::new(
        &config,
        Peripherals {
            button,
            reader,
            motor,
            notifier: MockNotifier::new(),
            serial,
        },
    )?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    if let Some(handle) = &serial_handle {
        tokio::spawn(print_serial_output(handle.clone()));
    }
    tokio::spawn(read_console(
        button_handle,
        rfid_handle,
        serial_handle,
        shutdown_tx.clone(),
    ));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            let _ = shutdown_tx.send(true);
        }
    });

    eprintln!("{}", console::HELP);
    controller.run(shutdown_rx).await?;

    for transition in controller.last_transitions(5) {
        tracing::info!(%transition, "Recent transition");
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<DoorConfig> {
    let Some(path) = path else {
        tracing::info!("Using reference configuration");
        return Ok(DoorConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: DoorConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config file {}", path.display()))?;

    tracing::info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

#[cfg(feature = "hardware-serial")]
fn open_serial(args: &Args) -> Result<(AnySerialLink, Option<MockSerialHandle>)> {
    if let Some(path) = &args.serial_port {
        let link = doorlock_hardware::serial::SerialPortLink::open(
            path,
            args.baud,
            std::time::Duration::from_millis(100),
        )?;
        return Ok((link.into(), None));
    }
    let (link, handle) = MockSerial::new();
    Ok((link.into(), Some(handle)))
}

#[cfg(not(feature = "hardware-serial"))]
fn open_serial(_args: &Args) -> Result<(AnySerialLink, Option<MockSerialHandle>)> {
    let (link, handle) = MockSerial::new();
    Ok((link.into(), Some(handle)))
}

async fn print_serial_output(handle: MockSerialHandle) {
    while let Some(line) = handle.recv_output().await {
        println!("< {line}");
    }
}

async fn read_console(
    button: MockButtonHandle,
    rfid: MockRfidHandle,
    serial: Option<MockSerialHandle>,
    shutdown: watch::Sender<bool>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Console read failed");
                break;
            }
        };

        let command = match console::parse(line.trim_end()) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e:#}");
                continue;
            }
        };

        let result = match command {
            Command::Press => button.press().await,
            Command::Hold => button.hold(),
            Command::Release => button.release(),
            Command::Card(card) => {
                eprintln!("presenting {}", console::describe(&card));
                rfid.present(card).await
            }
            Command::Help => {
                eprintln!("{}", console::HELP);
                Ok(())
            }
            Command::Quit => break,
            Command::Line(line) => match &serial {
                Some(serial) => serial.send_line(&line),
                None => {
                    eprintln!("serial link is a real port; console lines are not forwarded");
                    Ok(())
                }
            },
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Console command failed");
        }
    }

    let _ = shutdown.send(true);
}
