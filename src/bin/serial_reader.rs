use camlink::{
    Error,
    config::{self, SerialConfig},
    serial::{PortSettings, SerialConnection, SerialMonitor},
};
use clap::Parser;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "serial_reader",
    version,
    about = "Print lines received from a microcontroller over a serial port"
)]
struct Cli {
    /// Serial port to open (e.g. /dev/ttyUSB0, COM3)
    port: String,
}

async fn monitor(port: &str, config: &SerialConfig) -> camlink::Result<()> {
    let connection = SerialConnection::open(PortSettings::from_config(port, config))?;
    println!("Connected to {} at {} baud.", port, config.baud_rate);

    let stop = Arc::new(AtomicBool::new(false));
    let worker_stop = Arc::clone(&stop);
    let serial_monitor = SerialMonitor::new(config.poll_interval());
    let reset_delay = config.reset_delay();

    // The connection moves into the worker and is closed when it returns
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut connection = connection;
        debug!("Waiting {:?} for device reset", reset_delay);
        std::thread::sleep(reset_delay);

        let mut sink = std::io::stdout();
        serial_monitor.run(&mut connection, &mut sink, &worker_stop)
    });

    let outcome = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            stop.store(true, Ordering::Relaxed);
            println!("\nExiting.");
            worker.await
        }
    };

    let printed = outcome.map_err(|e| Error::internal(format!("Serial worker failed: {e}")))??;
    info!("Serial session closed after {} lines", printed);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1; --help and --version keep clap's behavior
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.serial.logs.level.clone());
    if let Err(e) = config::validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = monitor(&cli.port, &config.serial).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
