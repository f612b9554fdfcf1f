//! Per-security tables and their alignment.
//!
//! A [`TableSet`] keeps one [`Table`] per requested security, in request
//! order. Merging by date puts every member on the common calendar; merging
//! by source only relabels members and leaves each calendar untouched.

use crate::domain::date_key::DateKey;
use crate::domain::error::EodError;
use crate::domain::table::{Frequency, Table};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

/// Whether the overlap bounds themselves survive a date merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bounds {
    /// `first <= date <= last`
    #[default]
    Inclusive,
    /// `first < date < last`; drops the first and last common day.
    Exclusive,
}

impl Bounds {
    pub fn contains(self, date: DateKey, first: DateKey, last: DateKey) -> bool {
        match self {
            Bounds::Inclusive => date >= first && date <= last,
            Bounds::Exclusive => date > first && date < last,
        }
    }
}

impl FromStr for Bounds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inclusive" => Ok(Bounds::Inclusive),
            "exclusive" => Ok(Bounds::Exclusive),
            other => Err(format!(
                "unknown bounds {other:?} (expected inclusive or exclusive)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// `(max of first dates, min of last dates)`. `None` if there are no
    /// members or any member is empty.
    pub fn overlap_bounds(&self) -> Option<(DateKey, DateKey)> {
        let firsts = self
            .tables
            .iter()
            .map(Table::first_date)
            .collect::<Option<Vec<_>>>()?;
        let lasts = self
            .tables
            .iter()
            .map(Table::last_date)
            .collect::<Option<Vec<_>>>()?;
        Some((firsts.into_iter().max()?, lasts.into_iter().min()?))
    }

    /// Dates present in every member.
    pub fn overlapping_dates(&self) -> Option<BTreeSet<DateKey>> {
        let mut tables = self.tables.iter();
        let first: BTreeSet<DateKey> = tables.next()?.dates().collect();
        Some(tables.fold(first, |common, table| {
            table.dates().filter(|date| common.contains(date)).collect()
        }))
    }

    /// Dates present in any member.
    pub fn calendar(&self) -> BTreeSet<DateKey> {
        self.tables.iter().flat_map(Table::dates).collect()
    }

    /// Aligns all members on their common dates within the overlap bounds.
    /// Each merged entry holds every member's rows for that day, in member
    /// order, so column `j` always belongs to the `j`-th security.
    pub fn merge_on_date(&self, frequency: Frequency, bounds: Bounds) -> Table {
        let Some((first, last)) = self.overlap_bounds() else {
            return Table::empty(frequency);
        };
        let common = self.overlapping_dates().unwrap_or_default();

        let entries: Vec<_> = common
            .into_iter()
            .filter(|date| bounds.contains(*date, first, last))
            .filter_map(|date| {
                let mut rows = Vec::with_capacity(self.tables.len());
                for table in &self.tables {
                    rows.extend_from_slice(table.at(date)?);
                }
                Some((date, rows))
            })
            .collect();

        debug!(
            members = self.tables.len(),
            %first,
            %last,
            merged = entries.len(),
            "merged on date"
        );
        Table::from_entries(entries, frequency)
    }

    /// Labels each member with the caller's identifier, in order. No date
    /// alignment is applied.
    pub fn merge_on_source<I>(self, ids: Vec<I>) -> Result<Vec<(I, Table)>, EodError> {
        if ids.len() != self.tables.len() {
            return Err(EodError::LengthMismatch {
                expected: self.tables.len(),
                actual: ids.len(),
            });
        }
        Ok(ids.into_iter().zip(self.tables).collect())
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
