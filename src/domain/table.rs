//! Date-keyed price table and its derived views.
//!
//! A [`Table`] holds one entry per trading day in ascending key order. Each
//! entry carries one [`Row`] per security, so a single-security table and a
//! merged multi-security table share every operation. Transformations never
//! mutate: resampling, slicing and windowing all return new tables.

use crate::domain::date_key::DateKey;
use crate::domain::error::EodError;
use crate::domain::row::Row;
use serde::Serialize;
use std::iter::FusedIterator;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Frequency {
    #[default]
    Daily,
    Monthly,
}

/// Ordered `(date, values)` pairs, one value per security column.
pub type Series = Vec<(DateKey, Vec<f64>)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    entries: Vec<(DateKey, Vec<Row>)>,
    frequency: Frequency,
}

impl Table {
    pub fn empty(frequency: Frequency) -> Self {
        Self {
            entries: Vec::new(),
            frequency,
        }
    }

    /// Entries must already be in ascending key order with unique keys.
    pub fn from_entries(entries: Vec<(DateKey, Vec<Row>)>, frequency: Frequency) -> Self {
        Self { entries, frequency }
    }

    /// Builds a daily table from one security's feed. Consecutive rows that
    /// share a day are grouped under a single entry, in input order.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, EodError> {
        let mut entries: Vec<(DateKey, Vec<Row>)> = Vec::with_capacity(rows.len());
        for row in rows {
            let key = row.key()?;
            match entries.last_mut() {
                Some((last, group)) if *last == key => group.push(row),
                _ => entries.push((key, vec![row])),
            }
        }
        debug!(entries = entries.len(), "built daily table");
        Ok(Self {
            entries,
            frequency: Frequency::Daily,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows per entry; zero for an empty table.
    pub fn width(&self) -> usize {
        self.entries.first().map_or(0, |(_, rows)| rows.len())
    }

    pub fn entries(&self) -> &[(DateKey, Vec<Row>)] {
        &self.entries
    }

    pub fn dates(&self) -> impl ExactSizeIterator<Item = DateKey> + '_ {
        self.entries.iter().map(|(date, _)| *date)
    }

    pub fn first_date(&self) -> Option<DateKey> {
        self.entries.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<DateKey> {
        self.entries.last().map(|(date, _)| *date)
    }

    /// Rows recorded on `date`, if any. Absence is an ordinary outcome.
    pub fn at(&self, date: DateKey) -> Option<&[Row]> {
        self.entries
            .binary_search_by_key(&date, |(key, _)| *key)
            .ok()
            .map(|i| self.entries[i].1.as_slice())
    }

    /// Sub-table with `from <= date <= to`.
    pub fn between(&self, from: DateKey, to: DateKey) -> Table {
        let entries = self
            .entries
            .iter()
            .filter(|(date, _)| *date >= from && *date <= to)
            .cloned()
            .collect();
        Self::from_entries(entries, self.frequency)
    }

    pub fn column<F>(&self, field: F) -> Series
    where
        F: Fn(&Row) -> f64,
    {
        self.entries
            .iter()
            .map(|(date, rows)| (*date, rows.iter().map(&field).collect()))
            .collect()
    }

    pub fn adjusted_close(&self) -> Series {
        self.column(|row| row.adjusted_close)
    }

    pub fn close(&self) -> Series {
        self.column(|row| row.close)
    }

    /// Percentage returns on adjusted close, column by column. The first
    /// date has no prior day and never appears.
    pub fn returns(&self) -> Series {
        self.entries
            .windows(2)
            .map(|pair| {
                let (_, prev) = &pair[0];
                let (date, curr) = &pair[1];
                let rets = curr
                    .iter()
                    .zip(prev)
                    .map(|(c, p)| (c.adjusted_close / p.adjusted_close - 1.0) * 100.0)
                    .collect();
                (*date, rets)
            })
            .collect()
    }

    /// Resamples to month-end: the last entry before the first entry of the
    /// next month. The final month closes only if its last entry falls on
    /// the month's last calendar day.
    pub fn to_monthly(&self) -> Result<Table, EodError> {
        if self.frequency == Frequency::Monthly {
            return Err(EodError::AlreadyMonthly);
        }

        let mut month_ends: Vec<(DateKey, Vec<Row>)> = self
            .entries
            .windows(2)
            .filter(|pair| {
                let (prev, _) = &pair[0];
                let (date, _) = &pair[1];
                (prev.year(), prev.month()) != (date.year(), date.month())
            })
            .map(|pair| pair[0].clone())
            .collect();

        if self.entries.len() > 1 {
            if let Some(last) = self.entries.last().filter(|(date, _)| date.is_month_end()) {
                month_ends.push(last.clone());
            }
        }

        debug!(
            daily = self.entries.len(),
            monthly = month_ends.len(),
            "resampled to month-end"
        );
        Ok(Self::from_entries(month_ends, Frequency::Monthly))
    }

    /// Lazy rolling windows of `period` entries. A window is emitted for each
    /// position `i > period` and covers entries `[i - period, i)`, giving
    /// `max(0, len - period - 1)` windows.
    pub fn rolling(&self, period: usize) -> Result<Rolling<'_>, EodError> {
        if period == 0 {
            return Err(EodError::InvalidPeriod { period });
        }
        Ok(Rolling {
            entries: &self.entries,
            frequency: self.frequency,
            period,
            position: period.saturating_add(1),
        })
    }
}

/// Iterator over rolling windows, see [`Table::rolling`].
#[derive(Debug, Clone)]
pub struct Rolling<'a> {
    entries: &'a [(DateKey, Vec<Row>)],
    frequency: Frequency,
    period: usize,
    position: usize,
}

impl Iterator for Rolling<'_> {
    type Item = Table;

    fn next(&mut self) -> Option<Table> {
        if self.position >= self.entries.len() {
            return None;
        }
        let window = self.entries[self.position - self.period..self.position].to_vec();
        self.position += 1;
        Some(Table::from_entries(window, self.frequency))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rolling<'_> {}

impl FusedIterator for Rolling<'_> {}
