//! Inputs handed to the downstream analytics collaborators.
//!
//! Each view is built from a fetched [`TableSet`] with the alignment its
//! consumer expects: backtests and risk attribution run on the common
//! calendar, income simulation keeps every security on its own.

use crate::domain::date_key::DateKey;
use crate::domain::error::EodError;
use crate::domain::table::{Frequency, Series, Table};
use crate::domain::table_set::{Bounds, TableSet};
use serde::Serialize;
use std::collections::BTreeMap;

fn weight_map(assets: &[String], weights: &[f64]) -> Result<BTreeMap<String, f64>, EodError> {
    if weights.len() != assets.len() {
        return Err(EodError::LengthMismatch {
            expected: assets.len(),
            actual: weights.len(),
        });
    }
    Ok(assets.iter().cloned().zip(weights.iter().copied()).collect())
}

fn require_members(set: &TableSet, expected: usize) -> Result<(), EodError> {
    if set.len() != expected {
        return Err(EodError::MissingData);
    }
    Ok(())
}

/// Portfolio backtest input: adjusted closes on the shared calendar.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestInput {
    pub assets: Vec<String>,
    pub weights: BTreeMap<String, f64>,
    pub data: Series,
    pub first_date: DateKey,
    pub last_date: DateKey,
}

impl BacktestInput {
    pub fn build(
        set: &TableSet,
        assets: &[String],
        weights: &[f64],
        bounds: Bounds,
    ) -> Result<Self, EodError> {
        require_members(set, assets.len())?;
        let weights = weight_map(assets, weights)?;

        let merged = set.merge_on_date(Frequency::Daily, bounds);
        let (Some(first_date), Some(last_date)) = (merged.first_date(), merged.last_date()) else {
            return Err(EodError::NoOverlap);
        };

        Ok(Self {
            assets: assets.to_vec(),
            weights,
            data: merged.adjusted_close(),
            first_date,
            last_date,
        })
    }
}

/// Income simulation input: each security's own table plus the dates all
/// of them share.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeInput {
    pub weights: BTreeMap<String, f64>,
    pub sources: Vec<(String, Table)>,
    pub dates: Vec<DateKey>,
    pub sample_start: DateKey,
    pub sample_end: DateKey,
}

impl IncomeInput {
    pub fn build(set: TableSet, assets: &[String], weights: &[f64]) -> Result<Self, EodError> {
        require_members(&set, assets.len())?;
        let weights = weight_map(assets, weights)?;

        let dates: Vec<DateKey> = set
            .overlapping_dates()
            .ok_or(EodError::MissingData)?
            .into_iter()
            .collect();
        let (Some(&sample_start), Some(&sample_end)) = (dates.first(), dates.last()) else {
            return Err(EodError::NoOverlap);
        };

        Ok(Self {
            weights,
            sources: set.merge_on_source(assets.to_vec())?,
            dates,
            sample_start,
            sample_end,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RollingReturns {
    pub end_date: DateKey,
    pub returns: Series,
}

/// Risk attribution input: month-end returns with the dependent security in
/// column 0 and the independents after it, plus rolling windows over the
/// same monthly table.
#[derive(Debug, Clone, Serialize)]
pub struct RiskInput {
    pub dep: String,
    pub ind: Vec<String>,
    pub min_date: DateKey,
    pub max_date: DateKey,
    pub returns: Series,
    pub rolling: Vec<RollingReturns>,
}

impl RiskInput {
    /// `set` must hold the dependent security first, then the independents.
    pub fn build(
        set: &TableSet,
        dep: &str,
        ind: &[String],
        bounds: Bounds,
        rolling_period: usize,
    ) -> Result<Self, EodError> {
        require_members(set, ind.len() + 1)?;

        let monthly = set.merge_on_date(Frequency::Daily, bounds).to_monthly()?;
        let (Some(min_date), Some(max_date)) = (monthly.first_date(), monthly.last_date()) else {
            return Err(EodError::NoOverlap);
        };

        let rolling = monthly
            .rolling(rolling_period)?
            .filter_map(|window| {
                Some(RollingReturns {
                    end_date: window.last_date()?,
                    returns: window.returns(),
                })
            })
            .collect();

        Ok(Self {
            dep: dep.to_string(),
            ind: ind.to_vec(),
            min_date,
            max_date,
            returns: monthly.returns(),
            rolling,
        })
    }
}
