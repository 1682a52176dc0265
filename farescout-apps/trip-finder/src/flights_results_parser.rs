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

//! # Flights Results Parser
//!
//! Side-effect free selection of the cheapest itinerary from a flight-search
//! response.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::currency::detect_currency;
use crate::month_scanner::Priced;
use crate::price_parser::parse_price;

/// One itinerary as returned by the service. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawItinerary {
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub airline: Value,
}

impl RawItinerary {
    pub fn price_value(&self) -> f64 {
        parse_price(Some(&self.price))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flights: Vec<RawItinerary>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawItinerary>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawItinerary>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FlightSearchResponse {
    pub fn from_str(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("Invalid flight-search JSON")
    }
}

/// First itinerary with the strictly lowest parsed price.
pub fn cheapest_itinerary(itineraries: &[RawItinerary]) -> Option<&RawItinerary> {
    itineraries
        .iter()
        .map(|it| (it, it.price_value()))
        .fold(None, |best: Option<(&RawItinerary, f64)>, (it, price)| match best {
            Some((_, best_price)) if price >= best_price => best,
            _ => Some((it, price)),
        })
        .map(|(it, _)| it)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightOption {
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    /// `f64::INFINITY` when the raw price could not be read.
    pub price_value: f64,
    pub price_raw: String,
    pub airline: String,
    pub currency: Option<String>,
}

impl FlightOption {
    pub fn from_itinerary(
        itinerary: &RawItinerary,
        depart_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Self {
        let price_raw = match &itinerary.price {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let airline = carrier_label(&itinerary.name)
            .or_else(|| carrier_label(&itinerary.airline))
            .unwrap_or("N/A")
            .to_string();
        let currency = detect_currency(&price_raw).map(str::to_string);

        Self {
            depart_date,
            return_date,
            price_value: itinerary.price_value(),
            price_raw,
            airline,
            currency,
        }
    }
}

impl Priced for FlightOption {
    fn price(&self) -> f64 {
        self.price_value
    }
}

fn carrier_label(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn itineraries(body: Value) -> Vec<RawItinerary> {
        serde_json::from_value::<FlightSearchResponse>(body)
            .unwrap()
            .flights
    }

    #[test]
    fn test_cheapest_and_tie_break() {
        let flights = itineraries(json!({"flights": [
            {"price": "$420", "name": "Jeju Air"},
            {"price": "$310", "name": "Peach"},
            {"price": "$310", "name": "Air Busan"},
            {"price": "sold out", "name": "Korean Air"}
        ]}));
        let best = cheapest_itinerary(&flights).unwrap();
        assert_eq!(best.name, json!("Peach"));
    }

    #[test]
    fn test_empty_list_has_no_cheapest() {
        assert!(cheapest_itinerary(&[]).is_none());
    }

    #[test]
    fn test_option_from_itinerary() {
        let depart = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let flights = itineraries(json!({"flights": [
            {"price": "$1,050", "name": "", "airline": "Asiana"},
            {"price": 880000},
            {"name": "Ghost"}
        ]}));

        let usd = FlightOption::from_itinerary(&flights[0], depart, None);
        assert_eq!(usd.price_value, 1050.0);
        assert_eq!(usd.price_raw, "$1,050");
        assert_eq!(usd.airline, "Asiana");
        assert_eq!(usd.currency.as_deref(), Some("USD"));

        let plain = FlightOption::from_itinerary(&flights[1], depart, None);
        assert_eq!(plain.price_value, 880000.0);
        assert_eq!(plain.price_raw, "880000");
        assert_eq!(plain.airline, "N/A");
        assert_eq!(plain.currency, None);

        let unpriced = FlightOption::from_itinerary(&flights[2], depart, None);
        assert_eq!(unpriced.price_value, f64::INFINITY);
        assert_eq!(unpriced.price_raw, "");
        assert_eq!(unpriced.airline, "Ghost");
    }

    #[test]
    fn test_response_without_flights_key() {
        let response = FlightSearchResponse::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(response.flights.is_empty());
        assert!(FlightSearchResponse::from_str("not json").is_err());
    }

    #[test]
    fn test_null_flights_is_empty() {
        let response = FlightSearchResponse::from_str(r#"{"flights": null}"#).unwrap();
        assert!(response.flights.is_empty());
        assert!(cheapest_itinerary(&response.flights).is_none());
        assert!(FlightSearchResponse::from_str(r#"{"flights": "none"}"#).is_err());
    }
}
