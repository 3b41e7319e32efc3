use std::env;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use vend_fsm::VendingMachine;
use vend_fsm::csv::{read_commands, read_inventory, write_inventory};

const USAGE: &str = "usage: vend-fsm <inventory.csv> <commands.csv>";

/// Optional auto-cancel of a pending sale, in milliseconds.
const TIMEOUT_VAR: &str = "VEND_DISPENSE_TIMEOUT_MS";

fn dispense_timeout() -> Option<Duration> {
    let raw = env::var(TIMEOUT_VAR).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let (Some(inventory_path), Some(commands_path)) = (args.next(), args.next()) else {
        error!("{USAGE}");
        return ExitCode::from(2);
    };

    for path in [&inventory_path, &commands_path] {
        if !path.ends_with(".csv") {
            warn!(path = %path, "input file seems to not be a csv file");
        }
    }

    let mut machine = VendingMachine::new();
    if let Some(timeout) = dispense_timeout() {
        machine = machine.with_dispense_timeout(timeout);
    }

    let inventory = match read_inventory(&inventory_path) {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    for result in inventory {
        match result {
            Ok((id, item)) => {
                machine.stock(id, item);
            }
            Err(e) => warn!("{e}"),
        }
    }

    let commands = match read_commands(commands_path) {
        Ok(rows) => rows,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (command_sender, command_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in commands {
            match result {
                Ok(command) => {
                    if command_sender.send(command).await.is_err() {
                        // machine task is gone, nothing left to feed
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    machine.run(ReceiverStream::new(command_receiver)).await;

    info!(
        collected = %machine.collected(),
        state = machine.state().name(),
        "machine settled"
    );

    if let Err(e) = write_inventory(io::stdout().lock(), machine.items()) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
