//! Ingestion: monthly file loading, outer merge, contiguity validation.

pub mod loader;
pub mod month;

use tracing::info;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::table::UsageTable;

use loader::MonthTable;
use month::MonthKey;

/// Load every recognized monthly file and merge into one wide table.
pub fn read_monthly(config: &Config) -> Result<UsageTable> {
    let files = loader::discover(config)?;
    let mut tables = Vec::with_capacity(files.len());
    for file in &files {
        tables.push(loader::load_month(file, config)?);
    }
    let wide = merge_months(tables)?;
    info!(
        months = wide.periods().len(),
        countries = wide.row_count(),
        "monthly data read"
    );
    Ok(wide)
}

/// Outer-merge per-month tables into one wide table keyed by country, then
/// verify the observed months form an unbroken consecutive run. Countries
/// absent from a given month carry an explicit zero. Zero input tables are
/// valid and produce an empty table.
pub fn merge_months(tables: Vec<MonthTable>) -> Result<UsageTable> {
    let mut wide = UsageTable::new();
    let mut months: Vec<MonthKey> = Vec::with_capacity(tables.len());
    for table in &tables {
        months.push(table.month);
    }
    for table in tables {
        wide.add_period_column(table.month.get(), &table.counts);
    }

    months.sort_unstable();
    if !is_contiguous(&months) {
        return Err(PipelineError::NonContiguousMonths {
            months: months.iter().map(|m| m.get()).collect(),
        });
    }
    Ok(wide)
}

/// A sorted month set is contiguous when every successive pair of base-12
/// ordinals differs by exactly one. Equal ordinals (a duplicated month) fail
/// just like a gap. Empty and single-month sets pass trivially.
fn is_contiguous(sorted: &[MonthKey]) -> bool {
    sorted
        .windows(2)
        .all(|w| w[1].ordinal() == w[0].ordinal() + 1)
}
