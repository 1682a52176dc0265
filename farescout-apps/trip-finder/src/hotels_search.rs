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

//! # Hotel Rates Search Client
//!
//! Effectful (network) operations for the hotel-rates provider.

use crate::config::LiteApiConfig;
use crate::errors::ProviderError;
use crate::hotels_query_builder::{HotelSearchParams, RatesRequest};
use crate::hotels_results_parser::HotelSearchResult;
use crate::month_scanner::{MonthScan, Priced, scan_month};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use farescout_query_queues::{QueryQueue, QueryQueueError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Hotel-rates collaborator: one request body in, one raw JSON body out.
#[async_trait]
pub trait HotelRatesProvider: Send + Sync {
    async fn fetch_rates(&self, request: &RatesRequest) -> Result<Value, ProviderError>;
}

#[derive(Clone)]
pub struct LiteApiClient {
    client: Arc<wreq::Client>,
    rates_url: String,
    api_key: String,
}

impl LiteApiClient {
    pub fn new(config: &LiteApiConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            rates_url: format!("{}/hotels/rates", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl HotelRatesProvider for LiteApiClient {
    async fn fetch_rates(&self, request: &RatesRequest) -> Result<Value, ProviderError> {
        tracing::info!(
            "Fetching hotel rates: {} {} {}..{}",
            request.city_name,
            request.country_code,
            request.checkin,
            request.checkout
        );

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&self.rates_url)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .header("X-API-Key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "[fetch_rates] HTTP {} in {:?}: {} KB",
            status.as_u16(),
            start.elapsed(),
            body.len() / 1024
        );

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Cheapest hotel for one check-in day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHotelQuote {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub price: f64,
    pub currency: String,
    pub hotel_name: String,
    pub hotel_id: String,
}

impl Priced for DailyHotelQuote {
    fn price(&self) -> f64 {
        self.price
    }
}

pub struct HotelSearcher<P> {
    provider: P,
    query_queue: QueryQueue,
}

impl<P: HotelRatesProvider> HotelSearcher<P> {
    pub fn new(provider: P, query_queue: QueryQueue) -> Self {
        Self {
            provider,
            query_queue,
        }
    }

    /// Search one stay; provider failures are returned to the caller.
    pub async fn try_search_hotels(&self, params: &HotelSearchParams) -> Result<HotelSearchResult> {
        params.validate().context("Invalid search parameters")?;
        let request = params.to_rates_request();

        let body = self
            .query_queue
            .run(|| async {
                self.provider
                    .fetch_rates(&request)
                    .await
                    .map_err(anyhow::Error::from)
            })
            .await
            .map_err(|e| match e {
                QueryQueueError::Failed { source, .. } => source,
                other => anyhow::Error::from(other),
            })?;

        let result = HotelSearchResult::from_json(&body, &params.currency);
        tracing::debug!(
            "{} priced hotels for {}..{}",
            result.len(),
            params.checkin,
            params.checkout
        );
        Ok(result)
    }

    /// Search one stay; any failure degrades to an empty result.
    pub async fn search_hotels(&self, params: &HotelSearchParams) -> HotelSearchResult {
        match self.try_search_hotels(params).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    "Hotel search {}..{} failed, returning no hotels: {:#}",
                    params.checkin,
                    params.checkout,
                    e
                );
                HotelSearchResult::default()
            }
        }
    }

    pub async fn cheapest_for_stay(
        &self,
        params: &HotelSearchParams,
        checkin: NaiveDate,
        nights: u32,
    ) -> Option<DailyHotelQuote> {
        let checkout = checkin.checked_add_days(Days::new(nights as u64))?;
        let result = self
            .search_hotels(&params.with_dates(checkin, checkout))
            .await;
        let best = result.cheapest()?;
        Some(DailyHotelQuote {
            checkin,
            checkout,
            price: best.total_price,
            currency: best.currency.clone(),
            hotel_name: best.name.clone(),
            hotel_id: best.hotel_id.clone(),
        })
    }

    /// Cheapest check-in day of a month for a fixed stay length.
    pub async fn cheapest_in_month(
        &self,
        params: &HotelSearchParams,
        year: i32,
        month: u32,
        nights: u32,
        concurrency: usize,
    ) -> Result<MonthScan<DailyHotelQuote>> {
        ensure!(nights > 0, "Stay must be at least one night");
        scan_month(year, month, concurrency, |day| {
            self.cheapest_for_stay(params, day, nights)
        })
        .await
    }
}
