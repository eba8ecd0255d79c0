//! Command-line front end for the diagnostics.
//!
//! ```text
//! cargo run --example netdiag -- config
//! cargo run --example netdiag -- ping example.com 3
//! cargo run --example netdiag -- dns https://example.com/
//! RUST_LOG=horizon_netdiag=debug cargo run --example netdiag -- config
//! ```

use horizon_netdiag::dns::{lookup_hosts, resolve_all};
use horizon_netdiag::ping::{PingOptions, ping};
use horizon_netdiag::{ConfigCache, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        Some("config") | None => show_config().await,
        Some("ping") => {
            let host = args.get(1).map(String::as_str).unwrap_or("8.8.8.8");
            let count = args.get(2).and_then(|c| c.parse().ok()).unwrap_or(4);
            show_ping(host, count).await
        }
        Some("dns") => {
            let domain = args.get(1).map(String::as_str).unwrap_or("example.com");
            show_dns(domain).await
        }
        Some(other) => {
            eprintln!("unknown command {other:?}; expected config, ping or dns");
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn show_config() -> Result<()> {
    let cache = ConfigCache::system();
    let config = cache.get().await?;
    print!("{config}");
    Ok(())
}

async fn show_ping(host: &str, count: u32) -> Result<()> {
    let result = ping(host, Some(PingOptions::new().count(count))).await?;
    print!("{result}");
    Ok(())
}

async fn show_dns(domain: &str) -> Result<()> {
    match lookup_hosts(domain).await {
        Ok(addresses) => {
            for addr in addresses {
                println!("{addr}");
            }
        }
        Err(e) => eprintln!("lookup failed: {e}"),
    }
    println!();
    print!("{}", resolve_all(domain).await?);
    Ok(())
}
