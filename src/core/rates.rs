//! Exchange rate lookup with a per-base-currency cache and a static fallback.
//!
//! [`RateProvider::get_rates`] never fails. A live table is cached for one
//! hour per base currency; any failure to fetch one yields the fallback table
//! instead. [`RateProvider::get_rates_with_provenance`] reports which of the
//! three paths produced the table.

use crate::core::clock::{Clock, SystemClock};
use crate::core::currency::{self, RateTable};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// How long a fetched table stays fresh, in milliseconds.
pub const CACHE_TTL_MS: i64 = 3_600_000;

/// The currency the fallback table is expressed against.
pub const FALLBACK_BASE: &str = "USD";

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}

#[async_trait]
impl<S: RateSource + ?Sized> RateSource for Arc<S> {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        self.as_ref().fetch_rates(base).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateProvenance {
    /// Fetched from the source by this call.
    Fresh,
    /// Served from the cache without touching the source.
    Cached,
    /// The source failed; the static table was substituted.
    Fallback,
}

impl Display for RateProvenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateProvenance::Fresh => "fresh",
                RateProvenance::Cached => "cached",
                RateProvenance::Fallback => "fallback",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct Rates {
    /// Currency the table's multipliers are relative to. For a fallback
    /// result this is [`FALLBACK_BASE`], whatever base was requested.
    pub base: String,
    pub table: Arc<RateTable>,
    pub provenance: RateProvenance,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Rates {
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        currency::convert(amount, from, to, &self.table, &self.base)
    }
}

struct RateCacheEntry {
    table: Arc<RateTable>,
    fetched_at: DateTime<Utc>,
}

pub struct RateProvider<S: RateSource, C: Clock = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    cache: Mutex<HashMap<String, RateCacheEntry>>,
    fallback: Arc<RateTable>,
}

impl<S: RateSource> RateProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: RateSource, C: Clock> RateProvider<S, C> {
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl: Duration::milliseconds(CACHE_TTL_MS),
            cache: Mutex::new(HashMap::new()),
            fallback: Arc::new(currency::fallback_rates()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn get_rates(&self, base: &str) -> Arc<RateTable> {
        self.get_rates_with_provenance(base).await.table
    }

    #[instrument(name = "GetRates", skip(self), fields(base = %base))]
    pub async fn get_rates_with_provenance(&self, base: &str) -> Rates {
        if let Some(rates) = self.cached(base).await {
            debug!("Cache hit for exchange rates: {}", base);
            return rates;
        }

        // The lock is released while fetching; concurrent misses for the same
        // base may both fetch and the last write wins.
        debug!("Cache miss for exchange rates: {}", base);
        match self.source.fetch_rates(base).await {
            Ok(table) => {
                let table = Arc::new(table);
                let fetched_at = self.clock.now();
                self.cache.lock().await.insert(
                    base.to_string(),
                    RateCacheEntry {
                        table: Arc::clone(&table),
                        fetched_at,
                    },
                );
                Rates {
                    base: base.to_string(),
                    table,
                    provenance: RateProvenance::Fresh,
                    fetched_at: Some(fetched_at),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch exchange rates for {}, using fallback", base);
                Rates {
                    base: FALLBACK_BASE.to_string(),
                    table: Arc::clone(&self.fallback),
                    provenance: RateProvenance::Fallback,
                    fetched_at: None,
                }
            }
        }
    }

    async fn cached(&self, base: &str) -> Option<Rates> {
        let now = self.clock.now();
        let cache = self.cache.lock().await;
        let entry = cache.get(base)?;
        if now - entry.fetched_at >= self.ttl {
            debug!("Cached exchange rates for {} expired", base);
            return None;
        }
        Some(Rates {
            base: base.to_string(),
            table: Arc::clone(&entry.table),
            provenance: RateProvenance::Cached,
            fetched_at: Some(entry.fetched_at),
        })
    }

    /// Drops every cached table.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }
}
