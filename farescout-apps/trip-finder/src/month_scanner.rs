//!  Farescout Trip Finder
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Month Scanner
//!
//! Brute-force search over every calendar day of a month, keeping both the
//! cheapest day and the full per-day list.

use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::future::Future;

/// Anything with a comparable price.
pub trait Priced {
    fn price(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthScan<T> {
    pub best: Option<T>,
    pub daily: Vec<T>,
}

impl<T> Default for MonthScan<T> {
    fn default() -> Self {
        Self {
            best: None,
            daily: Vec::new(),
        }
    }
}

impl<T: Priced + Clone> MonthScan<T> {
    /// Fold per-day results in calendar order.
    ///
    /// Only finite prices compete for `best`; the first strict minimum wins.
    pub fn from_daily(daily: Vec<T>) -> Self {
        let mut best: Option<&T> = None;
        for item in &daily {
            let price = item.price();
            if !price.is_finite() {
                continue;
            }
            if best.is_none_or(|b| price < b.price()) {
                best = Some(item);
            }
        }
        let best = best.cloned();
        Self { best, daily }
    }
}

/// Every valid date of `year`-`month`.
pub fn days_in_month(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month: {}-{:02}", year, month))?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}

/// Check-in and checkout of a `nights`-long stay starting on the 1st of the
/// month. Zero-night stays are rejected.
pub fn first_stay(year: i32, month: u32, nights: u32) -> Result<(NaiveDate, NaiveDate)> {
    ensure!(nights > 0, "Stay must be at least one night");
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month: {}-{:02}", year, month))?;
    let checkout = first
        .checked_add_days(chrono::Days::new(nights as u64))
        .context("Checkout date out of range")?;
    Ok((first, checkout))
}

/// Run `search_day` for each day of the month with at most `concurrency`
/// searches in flight. Results are consumed in calendar order and days that
/// yield `None` are skipped.
pub async fn scan_month<T, F, Fut>(
    year: i32,
    month: u32,
    concurrency: usize,
    search_day: F,
) -> Result<MonthScan<T>>
where
    T: Priced + Clone,
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let days = days_in_month(year, month)?;
    let total = days.len();

    let daily: Vec<T> = stream::iter(days)
        .map(search_day)
        .buffered(concurrency.max(1))
        .filter_map(|found| async move { found })
        .collect()
        .await;

    tracing::info!(
        "Scanned {}-{:02}: {} of {} days returned a result",
        year,
        month,
        daily.len(),
        total
    );

    Ok(MonthScan::from_daily(daily))
}
