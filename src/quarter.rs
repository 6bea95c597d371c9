//! Month-to-quarter aggregation.

use crate::table::UsageTable;

/// The quarter containing `month`, encoded `YYYY*100 + Q` with `Q` in 1..=4.
/// `month` must be a valid `YYYYMM` key.
pub fn quarter_of(month: u32) -> u32 {
    let m = month % 100;
    debug_assert!((1..=12).contains(&m), "not a month key: {month}");
    (month / 100) * 100 + 1 + (m - 1) / 3
}

/// A quarterly view of a monthly table: one column per quarter in first-seen
/// order, a per-row `total`, and all-zero rows dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterlyTable {
    table: UsageTable,
    totals: Vec<i64>,
}

impl QuarterlyTable {
    /// Quarter keys in first-seen order of their constituent months.
    pub fn quarters(&self) -> &[u32] {
        self.table.periods()
    }

    pub fn countries(&self) -> &[String] {
        self.table.countries()
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn get(&self, country: &str, quarter: u32) -> Option<i64> {
        self.table.get(country, quarter)
    }

    /// Rows in order as `(country, quarter cells, total)`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[i64], i64)> {
        self.table
            .rows()
            .zip(self.totals.iter())
            .map(|((country, cells), total)| (country, cells, *total))
    }

    pub fn total(&self, country: &str) -> Option<i64> {
        self.table
            .countries()
            .iter()
            .position(|c| c == country)
            .map(|i| self.totals[i])
    }
}

/// Collapse a dense monthly table into quarters. A country with zero usage
/// across the whole observed window is noise, not data, and is dropped.
pub fn to_quarters(monthly: &UsageTable) -> QuarterlyTable {
    let mut table = monthly.aggregate_by(quarter_of);
    table.retain_rows(|_, cells| cells.iter().sum::<i64>() != 0);
    let totals = table.rows().map(|(_, cells)| cells.iter().sum()).collect();
    QuarterlyTable { table, totals }
}
