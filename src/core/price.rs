//! Share price series: simulated history, chart ranges and change summaries.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    OneDay,
    FiveDays,
    OneMonth,
    #[default]
    SixMonths,
    YearToDate,
    OneYear,
    FiveYears,
    All,
}

impl TimeRange {
    pub const ALL_RANGES: [TimeRange; 8] = [
        TimeRange::OneDay,
        TimeRange::FiveDays,
        TimeRange::OneMonth,
        TimeRange::SixMonths,
        TimeRange::YearToDate,
        TimeRange::OneYear,
        TimeRange::FiveYears,
        TimeRange::All,
    ];

    /// Earliest instant shown for this range, `None` for [`TimeRange::All`].
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::OneDay => Some(now - Duration::days(1)),
            TimeRange::FiveDays => Some(now - Duration::days(5)),
            TimeRange::OneMonth => now.checked_sub_months(Months::new(1)),
            TimeRange::SixMonths => now.checked_sub_months(Months::new(6)),
            TimeRange::YearToDate => Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0).single(),
            TimeRange::OneYear => now.checked_sub_months(Months::new(12)),
            TimeRange::FiveYears => now.checked_sub_months(Months::new(60)),
            TimeRange::All => None,
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TimeRange::OneDay => "1D",
                TimeRange::FiveDays => "5D",
                TimeRange::OneMonth => "1M",
                TimeRange::SixMonths => "6M",
                TimeRange::YearToDate => "YTD",
                TimeRange::OneYear => "1Y",
                TimeRange::FiveYears => "5Y",
                TimeRange::All => "ALL",
            }
        )
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1D" => Ok(TimeRange::OneDay),
            "5D" => Ok(TimeRange::FiveDays),
            "1M" => Ok(TimeRange::OneMonth),
            "6M" => Ok(TimeRange::SixMonths),
            "YTD" => Ok(TimeRange::YearToDate),
            "1Y" => Ok(TimeRange::OneYear),
            "5Y" => Ok(TimeRange::FiveYears),
            "ALL" => Ok(TimeRange::All),
            _ => Err(anyhow::anyhow!("Invalid time range: {}", s)),
        }
    }
}

/// Keeps the points dated (at midnight UTC) on or after the start of `range`.
pub fn filter_by_range(data: &[StockData], range: TimeRange, now: DateTime<Utc>) -> Vec<StockData> {
    let Some(start) = range.start(now) else {
        return data.to_vec();
    };
    data.iter()
        .filter(|point| {
            point
                .date
                .and_hms_opt(0, 0, 0)
                .is_some_and(|midnight| midnight.and_utc() >= start)
        })
        .cloned()
        .collect()
}

/// Generates one price per day from `purchase_date` through `today` as a
/// random walk moving at most 1% per day. Stored prices are rounded to cents.
pub fn simulate_history<R: Rng>(
    purchase_price: f64,
    purchase_date: NaiveDate,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<StockData> {
    let days = (today - purchase_date).num_days();
    if days < 0 {
        return Vec::new();
    }

    let mut price = purchase_price;
    let mut data = Vec::with_capacity(days as usize + 1);
    for offset in 0..=days {
        price *= 1.0 + (rng.r#gen::<f64>() - 0.5) * 0.02;
        data.push(StockData {
            date: purchase_date + Duration::days(offset),
            price: (price * 100.0).round() / 100.0,
        });
    }
    data
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
}

impl PriceSummary {
    /// Summarises the latest price against `purchase_price`. An empty series
    /// reports no change.
    pub fn from_series(data: &[StockData], purchase_price: f64) -> Self {
        let current_price = data.last().map_or(purchase_price, |p| p.price);
        let price_change = current_price - purchase_price;
        let price_change_percent = if purchase_price != 0.0 {
            price_change / purchase_price * 100.0
        } else {
            0.0
        };
        Self {
            current_price,
            price_change,
            price_change_percent,
        }
    }
}

/// Chart y-axis bounds: the price range padded by 10% on each side.
pub fn y_axis_domain(data: &[StockData]) -> Option<(f64, f64)> {
    let first = data.first()?.price;
    let (min, max) = data
        .iter()
        .fold((first, first), |(lo, hi), p| (lo.min(p.price), hi.max(p.price)));
    let padding = (max - min) * 0.1;
    Some((min - padding, max + padding))
}
