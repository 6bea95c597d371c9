//! Thin CSV handoff for the downstream renderers.
//!
//! One row per country in table order: quarter columns, `total`, `lat`,
//! `long`. No styling, no spreadsheet format; richer rendering lives
//! outside this crate.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::geo::Coordinates;
use crate::quarter::QuarterlyTable;

/// The file name embeds the observed month range.
fn report_name(first_month: u32, last_month: u32) -> String {
    if first_month == last_month {
        format!("usage_quarters_{first_month}.csv")
    } else {
        format!("usage_quarters_{first_month}_to_{last_month}.csv")
    }
}

/// Write the enriched quarterly table under `out_dir` and return the path.
/// `coords` must be parallel to the table's rows.
pub fn write(
    out_dir: &Path,
    first_month: u32,
    last_month: u32,
    quarterly: &QuarterlyTable,
    coords: &[Coordinates],
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(report_name(first_month, last_month));
    let mut wtr = csv::Writer::from_path(&path)?;

    let mut header = vec!["Country".to_string()];
    header.extend(quarterly.quarters().iter().map(|q| q.to_string()));
    header.push("total".to_string());
    header.push("lat".to_string());
    header.push("long".to_string());
    wtr.write_record(&header)?;

    for ((country, cells, total), c) in quarterly.rows().zip(coords) {
        let mut record = vec![country.to_string()];
        record.extend(cells.iter().map(|v| v.to_string()));
        record.push(total.to_string());
        record.push(c.lat.to_string());
        record.push(c.long.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(path)
}
