//! Discovery and parsing of monthly usage files.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::debug;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::ingest::month::MonthKey;

/// A recognized monthly file, ready to load.
#[derive(Debug)]
pub struct MonthFile {
    pub month: MonthKey,
    pub path: PathBuf,
}

/// One month's worth of rows, in file row order.
#[derive(Debug)]
pub struct MonthTable {
    pub month: MonthKey,
    pub counts: Vec<(String, i64)>,
}

/// Scan the data directory for files named `<prefix><YYYYMM>.csv`, in
/// ascending file-name order. Files without the prefix are ignored; a file
/// with the prefix whose month token does not parse as a real month aborts
/// the run.
pub fn discover(config: &Config) -> Result<Vec<MonthFile>> {
    let pattern = format!("{}/*.csv", config.data_dir.display());
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(p) if p.is_file() => paths.push(p),
            Ok(_) => {}
            Err(e) => return Err(e.into_error().into()),
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        let token = match name
            .strip_prefix(config.file_prefix.as_str())
            .and_then(|rest| rest.strip_suffix(".csv"))
        {
            Some(t) => t,
            None => continue,
        };
        let month = token
            .parse::<u32>()
            .ok()
            .and_then(MonthKey::new)
            .ok_or_else(|| PipelineError::BadMonthToken {
                file: name.to_string(),
            })?;
        files.push(MonthFile { month, path });
    }
    Ok(files)
}

/// Parse one monthly file into per-country counts. Rows missing either
/// required field, or whose count does not parse numerically, are dropped
/// here; zero-fill for countries absent from a month happens after the
/// merge, not here.
pub fn load_month(file: &MonthFile, config: &Config) -> Result<MonthTable> {
    let mut rdr = csv::ReaderBuilder::new().from_path(&file.path)?;

    let headers = rdr.headers()?.clone();
    let country_col = find_column(&headers, &config.country_column, &file.path)?;
    let count_col = find_column(&headers, &config.count_column, &file.path)?;

    let mut counts = Vec::new();
    let mut dropped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let country = record.get(country_col).map(str::trim).unwrap_or("");
        let count = record.get(count_col).and_then(parse_count);
        match (country.is_empty(), count) {
            (false, Some(count)) => counts.push((country.to_string(), count)),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(file = %file.path.display(), dropped, "dropped incomplete rows");
    }

    Ok(MonthTable {
        month: file.month,
        counts,
    })
}

fn find_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| PipelineError::MissingColumn {
            file: path.display().to_string(),
            column: name.to_string(),
        })
}

/// Counts are integers; fractional input truncates toward zero rather than
/// rounding. Anything else reads as a missing field.
fn parse_count(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}
