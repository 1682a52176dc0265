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

//! Combined flight + hotel planning over mock providers.
//!
//! Run with:
//!     cargo test --test t_trip_planner

mod mock_providers;

use std::sync::{Arc, Mutex};

use chrono::Datelike;
use farescout_query_queues::QueryQueue;
use farescout_trip_finder::{
    CurrencyConverter, FlightSearchParams, FlightSearcher, HotelSearchParams, HotelSearcher,
    ProviderError, Trip, TripPlanner,
};
use mock_providers::{MockFlights, MockHotels, date, itinerary, rates_body, unauthorized};
use serde_json::json;

fn planner(flights: MockFlights, hotels: MockHotels) -> TripPlanner<MockFlights, MockHotels> {
    TripPlanner::new(
        FlightSearcher::new(flights, QueryQueue::default()),
        HotelSearcher::new(hotels, QueryQueue::default()),
        CurrencyConverter::default(),
    )
}

fn flight_params(trip: Trip) -> FlightSearchParams {
    FlightSearchParams::builder("ICN".to_string(), "CTS".to_string(), date(2026, 2, 1))
        .return_date(Some(date(2026, 2, 4)))
        .trip_type(trip)
        .build()
        .unwrap()
}

fn hotel_params() -> HotelSearchParams {
    HotelSearchParams::builder(
        "Sapporo".to_string(),
        "JP".to_string(),
        date(2026, 2, 10),
        date(2026, 2, 14),
    )
    .build()
    .unwrap()
}

#[tokio::test]
async fn test_period_combines_flight_and_cheapest_hotel() {
    let flights = MockFlights::new(|_, _| Ok(vec![itinerary(json!("$1,050"), "Asiana")]));
    let hotels = MockHotels::new(|_| {
        Ok(rates_body(&[
            ("a", 450_000.0),
            ("b", 300_000.9),
            ("c", 610_000.0),
        ]))
    });
    let quote = planner(flights.clone(), hotels.clone())
        .plan_period(&flight_params(Trip::RoundTrip), &hotel_params(), 2)
        .await;

    let flight = quote.flight.as_ref().unwrap();
    // flight uses the stay's dates
    assert_eq!(flight.depart_date, date(2026, 2, 10));
    assert_eq!(flight.return_date, Some(date(2026, 2, 14)));
    assert_eq!(quote.flight_price_krw, Some(1_417_500));

    let ids: Vec<&str> = quote.hotels.iter().map(|h| h.hotel_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(quote.combined_total, Some(1_417_500 + 300_000));
}

#[tokio::test]
async fn test_period_searches_hotels_before_flights() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let flight_log = log.clone();
    let flights = MockFlights::new(move |_, _| {
        flight_log.lock().unwrap().push("flight");
        Err(unauthorized())
    });
    let hotel_log = log.clone();
    let hotels = MockHotels::new(move |_| {
        hotel_log.lock().unwrap().push("hotel");
        Ok(rates_body(&[("a", 120_000.0)]))
    });

    let quote = planner(flights, hotels)
        .plan_period(&flight_params(Trip::RoundTrip), &hotel_params(), 10)
        .await;

    assert_eq!(*log.lock().unwrap(), vec!["hotel", "flight", "flight"]);
    assert!(quote.flight.is_none());
    assert_eq!(quote.hotels.len(), 1);
    assert_eq!(quote.flight_price_krw, None);
    assert_eq!(quote.combined_total, None);
}

#[tokio::test]
async fn test_period_hotel_outage_keeps_flight() {
    let flights = MockFlights::new(|_, _| Ok(vec![itinerary(json!("₩280,000"), "Jeju Air")]));
    let hotels = MockHotels::new(|_| Err(ProviderError::Transport("dns error".to_string())));
    let quote = planner(flights, hotels)
        .plan_period(&flight_params(Trip::RoundTrip), &hotel_params(), 10)
        .await;
    assert!(quote.hotels.is_empty());
    assert_eq!(quote.flight_price_krw, Some(280_000));
    assert_eq!(quote.combined_total, None);
}

#[tokio::test]
async fn test_month_plan_books_hotels_for_the_cheapest_flight() {
    let flights = MockFlights::new(|params, _| {
        let price = if params.depart_date.day() == 17 { 180 } else { 260 };
        Ok(vec![itinerary(json!(format!("${}", price)), "Peach")])
    });
    let hotels = MockHotels::new(|_| {
        Ok(rates_body(&[
            ("a", 90_000.0),
            ("b", 80_000.0),
            ("c", 70_000.0),
            ("d", 60_000.0),
        ]))
    });

    let quote = planner(flights.clone(), hotels.clone())
        .with_scan_concurrency(4)
        .plan_month(&flight_params(Trip::RoundTrip), &hotel_params(), 2026, 2, 3, 3)
        .await
        .unwrap();

    let flight = quote.flight.as_ref().unwrap();
    assert_eq!(flight.depart_date, date(2026, 2, 17));
    assert_eq!(flight.return_date, Some(date(2026, 2, 20)));
    assert_eq!(flights.call_count(), 28);

    let requests = hotels.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].checkin, "2026-02-17");
    assert_eq!(requests[0].checkout, "2026-02-20");

    assert_eq!(quote.hotels.len(), 3);
    assert_eq!(quote.hotels[0].hotel_id, "d");
    assert_eq!(quote.flight_price_krw, Some(180 * 1350));
    assert_eq!(quote.combined_total, Some(180 * 1350 + 60_000));
}

#[tokio::test]
async fn test_one_way_month_plan_uses_nights_for_checkout() {
    let flights = MockFlights::new(|_, _| Ok(vec![itinerary(json!(99_000), "T'way")]));
    let hotels = MockHotels::new(|_| Ok(rates_body(&[("a", 1_000.0)])));

    let quote = planner(flights, hotels.clone())
        .plan_month(&flight_params(Trip::OneWay), &hotel_params(), 2026, 3, 5, 10)
        .await
        .unwrap();

    assert_eq!(quote.flight.as_ref().unwrap().return_date, None);
    let requests = hotels.requests.lock().unwrap();
    assert_eq!(requests[0].checkin, "2026-03-01");
    assert_eq!(requests[0].checkout, "2026-03-06");
    assert_eq!(quote.combined_total, Some(99_000 + 1_000));
}

#[tokio::test]
async fn test_month_without_flights_skips_hotels() {
    let flights = MockFlights::new(|_, _| Ok(Vec::new()));
    let hotels = MockHotels::new(|_| Ok(rates_body(&[("a", 1.0)])));
    let quote = planner(flights, hotels.clone())
        .plan_month(&flight_params(Trip::RoundTrip), &hotel_params(), 2026, 2, 3, 10)
        .await
        .unwrap();
    assert!(quote.flight.is_none());
    assert!(quote.hotels.is_empty());
    assert_eq!(quote.combined_total, None);
    assert_eq!(hotels.call_count(), 0);
}

#[tokio::test]
async fn test_month_plan_rejects_bad_input() {
    let flights = MockFlights::new(|_, _| Ok(Vec::new()));
    let hotels = MockHotels::new(|_| Ok(json!({})));
    let planner = planner(flights, hotels);
    assert!(
        planner
            .plan_month(&flight_params(Trip::RoundTrip), &hotel_params(), 2026, 0, 3, 10)
            .await
            .is_err()
    );
    assert!(
        planner
            .plan_month(&flight_params(Trip::RoundTrip), &hotel_params(), 2026, 2, 0, 10)
            .await
            .is_err()
    );
}

fn priced_hotel(amount: f64, currency: &str) -> serde_json::Value {
    json!({"data": [{
        "hotelId": "usd-1",
        "hotel": {"name": "Hotel Dollar", "starRating": 3},
        "roomTypes": [{"offerRetailRate": {"amount": amount, "currency": currency}}]
    }]})
}

#[tokio::test]
async fn test_usd_hotel_is_converted_before_summing() {
    let flights = MockFlights::new(|_, _| Ok(vec![itinerary(json!("$1,050"), "Asiana")]));
    let hotels = MockHotels::new(|_| Ok(priced_hotel(200.0, "USD")));
    let quote = planner(flights, hotels)
        .plan_period(&flight_params(Trip::RoundTrip), &hotel_params(), 5)
        .await;

    assert_eq!(quote.hotels[0].currency, "USD");
    assert_eq!(quote.flight_price_krw, Some(1_417_500));
    assert_eq!(quote.combined_total, Some(1_417_500 + 270_000));
}

#[tokio::test]
async fn test_unconvertible_hotel_currency_has_no_total() {
    let flights = MockFlights::new(|_, _| Ok(vec![itinerary(json!("$1,050"), "Asiana")]));
    let hotels = MockHotels::new(|_| Ok(priced_hotel(30_000.0, "JPY")));
    let quote = planner(flights, hotels)
        .plan_period(&flight_params(Trip::RoundTrip), &hotel_params(), 5)
        .await;

    assert_eq!(quote.hotels.len(), 1);
    assert_eq!(quote.flight_price_krw, Some(1_417_500));
    assert_eq!(quote.combined_total, None);
}
