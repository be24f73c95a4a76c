#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ntdash_api::sim::Simulator;
use ntdash_api::{InProcTable, TableClient};
use ntdash_gui::{GuiConfig, DEFAULT_STYLESHEET};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ntdash", version, about = "Live NetworkTables dashboard")]
struct Cli {
    /// Table server address (host or host:port)
    #[arg(long, env = "NTDASH_SERVER", default_value = "127.0.0.1")]
    server: String,
    /// Stylesheet applied at startup; a missing file is not fatal
    #[arg(long, env = "NTDASH_STYLESHEET", default_value = DEFAULT_STYLESHEET)]
    stylesheet: PathBuf,
    /// Publish simulated robot telemetry into the in-process table
    #[arg(long, env = "NTDASH_DEMO")]
    demo: bool,
    #[arg(long, default_value_t = 100)]
    demo_interval_ms: u64,
}

fn init_tracing() {
    let env = std::env::var("NTDASH_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("NTDASH_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            warn!(addr = %addr, "invalid NTDASH_METRICS_ADDR; expected host:port");
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    init_metrics();

    let table = InProcTable::new();
    let client: Arc<dyn TableClient> = Arc::new(table.clone());
    // listeners go in before the window exists; the queue holds their events
    let queue = ntdash_api::connect(client.as_ref(), &cli.server);

    let mut sim = if cli.demo {
        match Simulator::spawn(table.clone(), Duration::from_millis(cli.demo_interval_ms.max(1))) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "demo publisher failed to start");
                None
            }
        }
    } else {
        None
    };

    let cfg = GuiConfig { stylesheet: Some(cli.stylesheet), ..GuiConfig::default() };
    let res = ntdash_gui::run_native(client.clone(), queue, cfg);

    if let Some(s) = sim.as_mut() {
        s.stop();
    }
    client.shutdown();
    info!("ntdash exiting");

    if let Err(e) = res {
        eprintln!("GUI error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
