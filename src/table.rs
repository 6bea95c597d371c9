//! Dense usage tables keyed by country.

use std::collections::HashMap;

/// A dense table of counts: one row per country in first-appearance order,
/// one column per period key in encounter order. Period keys are integer
/// encodings (`YYYYMM` months or `YYYY*100+Q` quarters). Every cell is
/// materialized; an unobserved (country, period) cell is an explicit zero.
#[derive(Debug, Clone, Default)]
pub struct UsageTable {
    periods: Vec<u32>,
    countries: Vec<String>,
    /// Row-major cells, `countries.len()` x `periods.len()`.
    cells: Vec<Vec<i64>>,
    index: HashMap<String, usize>,
}

impl UsageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no period column has been added.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Column keys in encounter order.
    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    /// Country names in first-appearance order.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn row_count(&self) -> usize {
        self.countries.len()
    }

    /// Cell for `(country, period)`, if both exist.
    pub fn get(&self, country: &str, period: u32) -> Option<i64> {
        let row = *self.index.get(country)?;
        let col = self.periods.iter().position(|&p| p == period)?;
        Some(self.cells[row][col])
    }

    /// Rows in order, each as `(country, cells)` with cells parallel to
    /// `periods()`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.countries
            .iter()
            .zip(self.cells.iter())
            .map(|(c, row)| (c.as_str(), row.as_slice()))
    }

    /// Append one period column. Countries seen for the first time get a
    /// zero backfill for all earlier columns; countries absent from
    /// `counts` get a zero in the new column. A country repeated within
    /// `counts` keeps the last value.
    pub fn add_period_column(&mut self, period: u32, counts: &[(String, i64)]) {
        for row in &mut self.cells {
            row.push(0);
        }
        self.periods.push(period);
        let width = self.periods.len();

        for (country, count) in counts {
            let row = match self.index.get(country) {
                Some(&r) => r,
                None => {
                    self.index.insert(country.clone(), self.countries.len());
                    self.countries.push(country.clone());
                    self.cells.push(vec![0; width]);
                    self.cells.len() - 1
                }
            };
            self.cells[row][width - 1] = *count;
        }
    }

    /// Group columns by `mapper` and sum them, keeping the first-seen order
    /// of mapped keys and the existing row order. The identity mapper
    /// reproduces the table.
    pub fn aggregate_by<F: Fn(u32) -> u32>(&self, mapper: F) -> UsageTable {
        let mut out_periods: Vec<u32> = Vec::new();
        let mut col_map = Vec::with_capacity(self.periods.len());
        for &p in &self.periods {
            let key = mapper(p);
            let pos = match out_periods.iter().position(|&q| q == key) {
                Some(i) => i,
                None => {
                    out_periods.push(key);
                    out_periods.len() - 1
                }
            };
            col_map.push(pos);
        }

        let width = out_periods.len();
        let mut cells = vec![vec![0i64; width]; self.countries.len()];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][col_map[c]] += v;
            }
        }

        UsageTable {
            periods: out_periods,
            countries: self.countries.clone(),
            cells,
            index: self.index.clone(),
        }
    }

    /// Keep only the rows for which `pred(country, cells)` holds,
    /// preserving order.
    pub fn retain_rows<F: Fn(&str, &[i64]) -> bool>(&mut self, pred: F) {
        let mut countries = Vec::with_capacity(self.countries.len());
        let mut cells = Vec::with_capacity(self.cells.len());
        for (country, row) in self.countries.drain(..).zip(self.cells.drain(..)) {
            if pred(&country, &row) {
                countries.push(country);
                cells.push(row);
            }
        }
        self.countries = countries;
        self.cells = cells;
        self.index = self
            .countries
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
    }
}

impl PartialEq for UsageTable {
    fn eq(&self, other: &Self) -> bool {
        self.periods == other.periods
            && self.countries == other.countries
            && self.cells == other.cells
    }
}
