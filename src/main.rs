use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use valuation_gauge::config::{Config, LoggingConfig};
use valuation_gauge::panel;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set GAUGE_CONFIG or run from a directory containing config/default.toml");
            std::process::exit(1);
        }
    };

    // First positional argument is the host's "amount owned" parameter.
    if let Some(raw) = std::env::args().nth(1) {
        config.apply_host_overrides(Some(raw.as_str()), None, None);
    }

    init_tracing(&config.logging);

    tracing::info!(
        endpoints = config.quotes.endpoints.len(),
        timeout_ms = config.quotes.timeout_ms,
        holdings = config.holdings.amount,
        currency = config.holdings.currency().code(),
        "Starting valuation-gauge"
    );

    let panel = panel::refresh(&config)
        .await
        .context("failed to build panel")?;
    let (png, json) = panel::write_outputs(&panel, &config.panel.output_dir)
        .context("failed to write panel outputs")?;

    println!(
        "{} | {} {} | upside {} | target {} | {} [{}]",
        panel.text.title,
        panel.text.price,
        panel.text.percent,
        panel.text.multiplier,
        panel.text.target_price,
        panel.text.purchasing_power,
        panel.text.status,
    );
    println!("wrote {} and {}", png.display(), json.display());
    println!("next refresh at {}", panel.next_refresh_at.to_rfc3339());

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.with_ansi(false).json().init();
    } else {
        builder.init();
    }
}
