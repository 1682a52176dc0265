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

//! Fixture-based hotel normalization tests.
//!
//! Loads recorded-shape rates responses from `tests/fixtures-rates/` and checks
//! the normalized, ranked rows.
//!
//! Run with:
//!     cargo test --test t_hotels_normalizer_fixtures

use std::path::Path;

use farescout_trip_finder::{HotelSearchResult, metadata_index, normalize_hotel};
use serde_json::Value;

fn load_fixture(name: &str) -> String {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures-rates");
    let fixture_path = fixtures_dir.join(format!("{}.json", name));
    std::fs::read_to_string(&fixture_path)
        .unwrap_or_else(|e| panic!("Cannot read fixture {}: {}", fixture_path.display(), e))
}

fn parse_fixture(name: &str) -> HotelSearchResult {
    HotelSearchResult::from_str(&load_fixture(name), "KRW").expect("fixture should be valid JSON")
}

#[test]
fn test_inline_hotel_data() {
    let result = parse_fixture("inline-hotel-data");
    assert_eq!(result.len(), 3);

    let grand = &result.hotels[0];
    assert_eq!(grand.rank, 1);
    assert_eq!(grand.hotel_id, "lp19a2b");
    assert_eq!(grand.name, "Sapporo Grand Hotel");
    assert_eq!(grand.star_rating, Some(4.0));
    assert_eq!(
        grand.address,
        "Kita 1-jo Nishi 4-chome Sapporo Hokkaido 060-0001 JP"
    );
    // cheaper of the two room types wins, with its own refund tag
    assert_eq!(grand.total_price, 300.0);
    assert_eq!(grand.currency, "KRW");
    assert_eq!(grand.refundable_tag, "RFN");

    let monterey = &result.hotels[1];
    assert_eq!(monterey.name, "Hotel Monterey Edelhof");
    assert_eq!(monterey.star_rating, Some(4.5));
    assert_eq!(monterey.address, "Sapporo JP");
    assert_eq!(monterey.total_price, 210000.5);
    assert_eq!(monterey.currency, "KRW");
    assert_eq!(monterey.refundable_tag, "");

    let nikko = &result.hotels[2];
    assert_eq!(nikko.rank, 3);
    assert_eq!(nikko.name, "JR Tower Hotel Nikko");
    assert_eq!(nikko.star_rating, Some(5.0));
    assert_eq!(nikko.address, "Kita 5-jo Nishi 2-5, Chuo-ku, Sapporo");
    assert_eq!(nikko.total_price, 1_234_000.0);
    assert_eq!(nikko.refundable_tag, "RFN");
}

#[test]
fn test_split_metadata() {
    let result = parse_fixture("split-metadata");
    let ids: Vec<&str> = result.hotels.iter().map(|h| h.hotel_id.as_str()).collect();
    // equal prices keep input order
    assert_eq!(ids, vec!["lp2002", "lp2003", "lp2001"]);

    let mitsui = &result.hotels[0];
    assert_eq!(mitsui.name, "Mitsui Garden Hotel Sapporo");
    assert_eq!(mitsui.star_rating, Some(4.0));
    assert_eq!(mitsui.address, "Kita 5-jo Nishi 6-18-3");

    let orphan = &result.hotels[1];
    assert_eq!(orphan.name, "");
    assert_eq!(orphan.star_rating, None);
    assert_eq!(orphan.address, "");

    let cross = &result.hotels[2];
    assert_eq!(cross.name, "Cross Hotel Sapporo");
    assert_eq!(cross.address, "Kita 2-jo Nishi 2-23 Sapporo JP");
    assert_eq!(cross.refundable_tag, "RFN");
}

#[test]
fn test_degenerate_records() {
    let result = parse_fixture("degenerate-records");
    let rows: Vec<(&str, f64, &str)> = result
        .hotels
        .iter()
        .map(|h| (h.hotel_id.as_str(), h.total_price, h.currency.as_str()))
        .collect();
    assert_eq!(rows, vec![("", 77000.0, "KRW"), ("mixed", 99000.0, "KRW")]);
    assert_eq!(result.cheapest().map(|h| h.rank), Some(1));
}

#[test]
fn test_each_record_normalizes_independently() {
    let body: Value = serde_json::from_str(&load_fixture("split-metadata")).unwrap();
    let metadata = metadata_index(&body);
    assert_eq!(metadata.len(), 2);

    let records = body["data"].as_array().unwrap();
    for raw in records {
        let hotel = normalize_hotel(raw, &metadata, "USD").expect("every record is priced");
        assert_eq!(hotel.rank, 0, "rank is assigned by the ranker only");
        assert_eq!(hotel.currency, "KRW");
    }
}

#[test]
fn test_requested_currency_is_only_a_fallback() {
    let result = HotelSearchResult::from_str(&load_fixture("inline-hotel-data"), "USD").unwrap();
    let currencies: Vec<&str> = result.hotels.iter().map(|h| h.currency.as_str()).collect();
    assert_eq!(currencies, vec!["KRW", "USD", "KRW"]);
}

#[test]
fn test_top_n() {
    let mut result = parse_fixture("inline-hotel-data");
    assert_eq!(result.top(2).len(), 2);
    assert_eq!(result.top(10).len(), 3);
    result.truncate(1);
    assert_eq!(result.len(), 1);
    assert_eq!(result.hotels[0].hotel_id, "lp19a2b");
}
