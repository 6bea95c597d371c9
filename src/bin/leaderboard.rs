//! Print the top-N all-time countries as CSV on stdout.
//!
//! Reads the same monthly file set as the main pipeline, totals each
//! country across the whole window, and lists the leaders in descending
//! order with months rendered as `YYYY-MM`.

use std::env;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use geousage::config::Config;
use geousage::ingest;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_TOP_N: usize = 20;

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.yaml".into());
    let top_n = match env::args().nth(2) {
        Some(raw) => raw.parse().context("top-N argument must be an integer")?,
        None => DEFAULT_TOP_N,
    };

    let config = Config::load(Path::new(&config_path))?;
    let monthly = ingest::read_monthly(&config)?;
    info!(rows = monthly.row_count(), "number of countries");

    let mut rows: Vec<(String, Vec<i64>, i64)> = monthly
        .rows()
        .map(|(country, cells)| (country.to_string(), cells.to_vec(), cells.iter().sum()))
        .collect();
    // Stable sort: ties keep ingestion order.
    rows.sort_by(|a, b| b.2.cmp(&a.2));

    let mut wtr = csv::Writer::from_writer(io::stdout());
    let mut header = vec!["Country".to_string()];
    header.extend(
        monthly
            .periods()
            .iter()
            .map(|m| format!("{}-{:02}", m / 100, m % 100)),
    );
    header.push("Total".to_string());
    wtr.write_record(&header)?;

    for (country, cells, total) in rows.into_iter().take(top_n) {
        let mut record = vec![country];
        record.extend(cells.iter().map(|v| v.to_string()));
        record.push(total.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
