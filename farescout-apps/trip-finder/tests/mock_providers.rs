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

//! Shared in-memory providers for the search, scan and planner tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use farescout_trip_finder::{
    FetchMode, FlightSearchParams, FlightSearchProvider, HotelRatesProvider, ProviderError,
    RatesRequest, RawItinerary,
};
use serde_json::{Value, json};

type FlightHandler =
    dyn Fn(&FlightSearchParams, FetchMode) -> Result<Vec<RawItinerary>, ProviderError> + Send + Sync;
type HotelHandler = dyn Fn(&RatesRequest) -> Result<Value, ProviderError> + Send + Sync;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn itinerary(price: Value, name: &str) -> RawItinerary {
    RawItinerary {
        price,
        name: json!(name),
        airline: Value::Null,
    }
}

pub fn unauthorized() -> ProviderError {
    ProviderError::from_status(401, "no token provided")
}

/// Flight provider answering from a closure, recording every call.
#[derive(Clone)]
pub struct MockFlights {
    handler: Arc<FlightHandler>,
    pub calls: Arc<Mutex<Vec<(NaiveDate, FetchMode)>>>,
}

impl MockFlights {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&FlightSearchParams, FetchMode) -> Result<Vec<RawItinerary>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn modes_used(&self) -> Vec<FetchMode> {
        self.calls.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FlightSearchProvider for MockFlights {
    async fn search(
        &self,
        params: &FlightSearchParams,
        mode: FetchMode,
    ) -> Result<Vec<RawItinerary>, ProviderError> {
        self.calls.lock().unwrap().push((params.depart_date, mode));
        (self.handler)(params, mode)
    }
}

/// Hotel provider answering from a closure, counting calls.
#[derive(Clone)]
pub struct MockHotels {
    handler: Arc<HotelHandler>,
    pub calls: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<RatesRequest>>>,
}

impl MockHotels {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RatesRequest) -> Result<Value, ProviderError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HotelRatesProvider for MockHotels {
    async fn fetch_rates(&self, request: &RatesRequest) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

/// A rates body with one single-room hotel per `(id, amount)`.
pub fn rates_body(hotels: &[(&str, f64)]) -> Value {
    let data: Vec<Value> = hotels
        .iter()
        .map(|(id, amount)| {
            json!({
                "hotelId": id,
                "hotel": {"name": format!("Hotel {}", id), "starRating": 4},
                "roomTypes": [{"offerRetailRate": {"amount": amount, "currency": "KRW"}}]
            })
        })
        .collect();
    json!({ "data": data })
}
