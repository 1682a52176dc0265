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

//! # Trip Planner
//!
//! Cheapest flight plus the cheapest hotels for the same dates, with the flight
//! price brought into KRW so both can be summed.

use crate::currency::CurrencyConverter;
use crate::flights_query_builder::FlightSearchParams;
use crate::flights_results_parser::FlightOption;
use crate::flights_search::{FlightSearchProvider, FlightSearcher};
use crate::hotels_query_builder::HotelSearchParams;
use crate::hotels_results_parser::HotelOption;
use crate::hotels_search::{HotelRatesProvider, HotelSearcher};
use anyhow::{Context, Result, ensure};
use chrono::Days;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripQuote {
    pub flight: Option<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub flight_price_krw: Option<i64>,
    /// Flight (KRW) plus the cheapest hotel; `None` unless both are known.
    pub combined_total: Option<i64>,
}

pub struct TripPlanner<F, H> {
    flights: FlightSearcher<F>,
    hotels: HotelSearcher<H>,
    converter: CurrencyConverter,
    scan_concurrency: usize,
}

impl<F: FlightSearchProvider, H: HotelRatesProvider> TripPlanner<F, H> {
    pub fn new(
        flights: FlightSearcher<F>,
        hotels: HotelSearcher<H>,
        converter: CurrencyConverter,
    ) -> Self {
        Self {
            flights,
            hotels,
            converter,
            scan_concurrency: 1,
        }
    }

    pub fn with_scan_concurrency(mut self, scan_concurrency: usize) -> Self {
        self.scan_concurrency = scan_concurrency.max(1);
        self
    }

    /// Cheapest flight of the month, then hotels for that flight's dates.
    pub async fn plan_month(
        &self,
        flight_params: &FlightSearchParams,
        hotel_params: &HotelSearchParams,
        year: i32,
        month: u32,
        nights: u32,
        top_n: usize,
    ) -> Result<TripQuote> {
        ensure!(nights > 0, "Stay must be at least one night");
        let scan = self
            .flights
            .cheapest_in_month(flight_params, year, month, nights, self.scan_concurrency)
            .await?;

        let Some(flight) = scan.best else {
            tracing::info!("No priced flight in {}-{:02}", year, month);
            return Ok(TripQuote::default());
        };

        let checkin = flight.depart_date;
        let checkout = match flight.return_date {
            Some(ret) => ret,
            None => checkin
                .checked_add_days(Days::new(nights as u64))
                .context("Checkout date out of range")?,
        };

        let mut hotels = self
            .hotels
            .search_hotels(&hotel_params.with_dates(checkin, checkout))
            .await;
        hotels.truncate(top_n);

        Ok(self.quote(Some(flight), hotels.hotels))
    }

    /// Fixed dates. Hotels are searched first so a flight failure never hides them.
    pub async fn plan_period(
        &self,
        flight_params: &FlightSearchParams,
        hotel_params: &HotelSearchParams,
        top_n: usize,
    ) -> TripQuote {
        let mut hotels = self.hotels.search_hotels(hotel_params).await;
        hotels.truncate(top_n);

        let flight_params =
            flight_params.with_dates(hotel_params.checkin, Some(hotel_params.checkout));
        let flight = self.flights.search_flights(&flight_params).await;

        self.quote(flight, hotels.hotels)
    }

    fn quote(&self, flight: Option<FlightOption>, hotels: Vec<HotelOption>) -> TripQuote {
        let flight_price_krw = flight.as_ref().and_then(|f| {
            self.converter
                .to_krw(f.price_value, f.currency.as_deref())
        });
        let combined_total = match (flight_price_krw, hotels.first()) {
            (Some(krw), Some(hotel)) => {
                self.converter
                    .combined_total(krw, hotel.total_price, &hotel.currency)
            }
            _ => None,
        };
        TripQuote {
            flight,
            hotels,
            flight_price_krw,
            combined_total,
        }
    }
}
