use std::env;
use std::path::Path;
use std::process;
use std::time::Duration;

use geousage::config::Config;
use geousage::error::Result;
use geousage::geo::{FixedIntervalGate, NominatimClient};
use geousage::pipeline;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) run the batch, mapping failure class to exit status ──────
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.yaml".into());
    if let Err(err) = run(&config_path) {
        error!("{err}");
        process::exit(err.exit_code());
    }
}

fn run(config_path: &str) -> Result<()> {
    let config = Config::load(Path::new(config_path))?;
    let geocoder = NominatimClient::new(&config)?;
    let mut gate = FixedIntervalGate::new(Duration::from_millis(config.geocode_min_delay_ms));

    match pipeline::run(&config, &geocoder, &mut gate)? {
        Some(report) => info!(report = %report.display(), "run complete"),
        None => info!("run complete; no monthly files found"),
    }
    Ok(())
}
