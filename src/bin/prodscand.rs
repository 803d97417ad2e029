//! prodscand — product scanner daemon.
//!
//! Serves [`Scanner`](prodscan::Scanner) over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prodscan::ScannerError;
use prodscan::server::config::{Config, Secrets};

/// Product scanner daemon.
#[derive(Parser)]
#[command(name = "prodscand")]
#[command(version = prodscan::PKG_VERSION)]
#[command(about = "Product scanner HTTP service")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "PRODSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let scanner = config.scanner_builder(&secrets).build()?;

    let address = args.address.unwrap_or_else(|| config.server.address.clone());
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| ScannerError::Configuration(format!("Invalid address {address:?}: {e}")))?;

    info!(
        version = prodscan::version_string(),
        %addr,
        model = scanner.model(),
        cache_dir = %scanner.cache().dir().display(),
        "prodscand starting"
    );

    let app = prodscan::server::router(Arc::new(scanner), &config.server.limits);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
