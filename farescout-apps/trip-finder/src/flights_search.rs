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

//! # Flight Search Client
//!
//! Effectful (network) operations for the flight-search service, and the
//! fallback-mode policy around it.

use crate::config::FlightsApiConfig;
use crate::errors::ProviderError;
use crate::flights_query_builder::{FetchMode, FlightSearchParams, Trip};
use crate::flights_results_parser::{
    FlightOption, FlightSearchResponse, RawItinerary, cheapest_itinerary,
};
use crate::month_scanner::{MonthScan, scan_month};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Days;
use farescout_query_queues::QueryQueue;
use std::sync::Arc;
use std::time::Duration;

/// Flight-search collaborator: legs and an operating mode in, itineraries out.
#[async_trait]
pub trait FlightSearchProvider: Send + Sync {
    async fn search(
        &self,
        params: &FlightSearchParams,
        mode: FetchMode,
    ) -> Result<Vec<RawItinerary>, ProviderError>;
}

/// JSON-over-HTTP adapter for a flight-search service.
#[derive(Clone)]
pub struct HttpFlightsClient {
    client: Arc<wreq::Client>,
    endpoint: String,
    token: Option<String>,
}

impl HttpFlightsClient {
    pub fn new(config: &FlightsApiConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            endpoint: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl FlightSearchProvider for HttpFlightsClient {
    async fn search(
        &self,
        params: &FlightSearchParams,
        mode: FetchMode,
    ) -> Result<Vec<RawItinerary>, ProviderError> {
        let request = params.to_request(mode);
        tracing::debug!(
            "[search] {} -> {} on {} ({:?})",
            params.from_airport,
            params.to_airport,
            params.depart_date,
            mode
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(&request);
        if let Some(token) = &self.token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let start = std::time::Instant::now();
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "[search] HTTP {} in {:?}",
            status.as_u16(),
            start.elapsed()
        );

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }
        let parsed: FlightSearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.flights)
    }
}

pub struct FlightSearcher<P> {
    provider: P,
    query_queue: QueryQueue,
    modes: Vec<FetchMode>,
}

impl<P: FlightSearchProvider> FlightSearcher<P> {
    pub fn new(provider: P, query_queue: QueryQueue) -> Self {
        Self {
            provider,
            query_queue,
            modes: vec![FetchMode::Fallback, FetchMode::Common],
        }
    }

    /// Override the ordered operating modes.
    pub fn with_modes(mut self, modes: Vec<FetchMode>) -> Self {
        self.modes = modes;
        self
    }

    /// Cheapest itinerary for one (depart, return) pair.
    ///
    /// The next mode is tried only after an authentication failure. Every
    /// other failure, and an empty answer, is `None`.
    pub async fn search_flights(&self, params: &FlightSearchParams) -> Option<FlightOption> {
        if let Err(e) = params.validate() {
            tracing::warn!("Skipping flight search: {:#}", e);
            return None;
        }

        let provider = &self.provider;
        let outcome = self
            .query_queue
            .run_with_fallback(
                &self.modes,
                |mode| async move {
                    provider.search(params, mode).await.map_err(|e| {
                        tracing::debug!("Flight search in {:?} mode failed: {}", mode, e);
                        anyhow::Error::from(e)
                    })
                },
                |e| {
                    e.downcast_ref::<ProviderError>()
                        .is_some_and(ProviderError::is_auth_failure)
                },
            )
            .await;

        let itineraries = match outcome {
            Ok(itineraries) => itineraries,
            Err(e) => {
                tracing::warn!(
                    "Flight search {} -> {} on {} failed: {:#}",
                    params.from_airport,
                    params.to_airport,
                    params.depart_date,
                    e
                );
                return None;
            }
        };

        let Some(best) = cheapest_itinerary(&itineraries) else {
            tracing::debug!("No itineraries for {}", params.depart_date);
            return None;
        };
        Some(FlightOption::from_itinerary(
            best,
            params.depart_date,
            params.return_date,
        ))
    }

    /// Cheapest departure day of a month; round trips return `stay_nights` later.
    pub async fn cheapest_in_month(
        &self,
        params: &FlightSearchParams,
        year: i32,
        month: u32,
        stay_nights: u32,
        concurrency: usize,
    ) -> Result<MonthScan<FlightOption>> {
        scan_month(year, month, concurrency, |day| async move {
            let return_date = match params.trip_type {
                Trip::RoundTrip => Some(day.checked_add_days(Days::new(stay_nights as u64))?),
                Trip::OneWay => None,
            };
            self.search_flights(&params.with_dates(day, return_date))
                .await
        })
        .await
    }
}
