//! Airscope - Main entry point
//!
//! One-shot discovery commands, or an HTTP service for a UI shell.

mod api;
mod config;
mod server;
mod state;

use airscope_core::{NeighborRecord, NetworkRecord};
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "airscope")]
#[command(about = "Wireless network discovery and connectivity diagnostics")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "airscope.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan for nearby wireless networks
    Scan,
    /// Show the currently associated network
    Current,
    /// Measure latency to a host
    Ping { host: String },
    /// Measure download and upload throughput
    Speedtest,
    /// List devices in the local neighbor table
    Neighbors,
    /// Show platform, architecture and hostname
    Info,
    /// Run the HTTP service (default)
    Serve,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_networks(networks: &[NetworkRecord]) {
    println!(
        "{:<32} {:<17} {:>5} {:>4} {:<6} {:<10} {:<20}",
        "SSID", "BSSID", "RSSI", "CH", "BAND", "SECURITY", "VENDOR"
    );
    for n in networks {
        let ssid = if n.ssid.is_empty() { "<hidden>" } else { &n.ssid };
        println!(
            "{:<32} {:<17} {:>5} {:>4} {:<6} {:<10} {:<20}{}",
            ssid,
            n.bssid,
            n.rssi,
            n.channel,
            n.band,
            n.security,
            n.vendor,
            if n.is_connected { " *" } else { "" }
        );
    }
}

fn print_neighbors(neighbors: &[NeighborRecord]) {
    println!("{:<16} {:<17} {:<20} HOSTNAME", "IP", "MAC", "VENDOR");
    for d in neighbors {
        println!(
            "{:<16} {:<17} {:<20} {}",
            d.ip,
            d.mac,
            d.vendor.as_deref().unwrap_or(airscope_core::UNKNOWN_VENDOR),
            d.hostname.as_deref().unwrap_or("")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so one-shot output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Airscope v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    let state = state::AppState::new(config.clone())?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Scan => {
            let networks = state.scanner.scan().await;
            if args.json {
                print_json(&networks)?;
            } else {
                print_networks(&networks);
            }
        }
        Command::Current => {
            let current = state.scanner.current_network().await;
            if args.json {
                print_json(&current)?;
            } else {
                match current {
                    Some(network) => print_networks(&[network]),
                    None => println!("Not connected"),
                }
            }
        }
        Command::Ping { host } => {
            let result = state.probe.probe_latency(&host).await;
            if args.json {
                print_json(&result)?;
            } else if result.success {
                println!(
                    "{}: {} ms, {}% packet loss",
                    result.host, result.latency, result.packet_loss
                );
            } else {
                println!("{}: unreachable", result.host);
            }
        }
        Command::Speedtest => {
            let result = state.probe.measure_throughput().await;
            if args.json {
                print_json(&result)?;
            } else {
                println!("Server:   {}", result.server);
                println!("Ping:     {} ms", result.ping);
                println!("Download: {:.2} Mbps", result.download);
                println!("Upload:   {:.2} Mbps", result.upload);
            }
        }
        Command::Neighbors => {
            let neighbors = state.probe.discover_neighbors().await;
            if args.json {
                print_json(&neighbors)?;
            } else {
                print_neighbors(&neighbors);
            }
        }
        Command::Info => {
            let info = state.system_info().await;
            if args.json {
                print_json(&info)?;
            } else {
                println!("Platform: {}", info.platform);
                println!("Arch:     {}", info.arch);
                println!("Hostname: {}", info.hostname);
            }
        }
        Command::Serve => {
            server::run(state, &config.daemon.bind).await?;
        }
    }

    Ok(())
}
