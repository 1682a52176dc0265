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

//! # Hotels Results Parser
//!
//! Side-effect free normalization of hotel-rates responses.
//!
//! Providers are inconsistent: descriptive data may be inline (`data[].hotel`) or
//! in a separate `hotels[]` array keyed by id, and almost any field can be
//! missing, null or spelled differently. Every record degrades to defaults; only
//! hotels that cannot be priced are dropped.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::price_parser::parse_price;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelOption {
    /// 1-based position after ranking; 0 until ranked.
    pub rank: usize,
    pub hotel_id: String,
    pub name: String,
    pub star_rating: Option<f64>,
    pub address: String,
    pub total_price: f64,
    pub currency: String,
    pub refundable_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelSearchResult {
    pub hotels: Vec<HotelOption>,
}

impl HotelSearchResult {
    /// Normalize and rank a decoded rates response.
    pub fn from_json(body: &Value, requested_currency: &str) -> Self {
        let metadata = metadata_index(body);
        let records = body
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let candidates: Vec<HotelOption> = records
            .iter()
            .filter_map(|raw| normalize_hotel(raw, &metadata, requested_currency))
            .collect();

        tracing::debug!(
            "Normalized {} of {} hotel records",
            candidates.len(),
            records.len()
        );

        Self {
            hotels: rank_hotels(candidates),
        }
    }

    pub fn from_str(body: &str, requested_currency: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(body).context("Invalid rates JSON")?;
        Ok(Self::from_json(&json, requested_currency))
    }

    pub fn cheapest(&self) -> Option<&HotelOption> {
        self.hotels.first()
    }

    pub fn top(&self, n: usize) -> &[HotelOption] {
        &self.hotels[..n.min(self.hotels.len())]
    }

    pub fn truncate(&mut self, n: usize) {
        self.hotels.truncate(n);
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

/// Index the side-channel `hotels[]` metadata by `id`.
pub fn metadata_index(body: &Value) -> HashMap<String, &Value> {
    body.get("hotels")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|meta| {
            let id = scalar_string(meta.get("id"))?;
            Some((id, meta))
        })
        .collect()
}

/// Map one raw `data[]` record to a [`HotelOption`] (rank 0).
///
/// Returns `None` when the hotel has no room types or no numeric offer amount.
pub fn normalize_hotel(
    raw: &Value,
    metadata: &HashMap<String, &Value>,
    requested_currency: &str,
) -> Option<HotelOption> {
    let hotel_id = scalar_string(raw.get("hotelId"))
        .or_else(|| scalar_string(raw.get("id")))
        .unwrap_or_default();

    let info = raw
        .get("hotel")
        .and_then(Value::as_object)
        .filter(|o| !o.is_empty())
        .or_else(|| metadata.get(&hotel_id).and_then(|m| m.as_object()));
    let empty = Map::new();
    let info = info.unwrap_or(&empty);

    let name = non_empty_str(info.get("name"))
        .or_else(|| non_empty_str(info.get("hotelName")))
        .or_else(|| non_empty_str(raw.get("hotelName")))
        .unwrap_or_default()
        .to_string();

    let star_rating = ["starRating", "stars", "rating"]
        .iter()
        .find_map(|key| star_value(info.get(*key)));

    let address = address_text(info.get("address"))
        .or_else(|| address_text(info.get("location")))
        .unwrap_or_default();

    let room_types = match raw.get("roomTypes").and_then(Value::as_array) {
        Some(rts) if !rts.is_empty() => rts,
        _ => {
            tracing::debug!("Skipping hotel {:?}: no room types", hotel_id);
            return None;
        }
    };

    let (best_room, total_price) = cheapest_room(room_types)?;
    if !total_price.is_finite() {
        tracing::debug!("Skipping hotel {:?}: no priced room type", hotel_id);
        return None;
    }

    let offer = best_room.get("offerRetailRate");
    let currency = non_empty_str(offer.and_then(|o| o.get("currency")))
        .unwrap_or(requested_currency)
        .to_string();

    let refundable_tag = best_room
        .get("rates")
        .and_then(Value::as_array)
        .and_then(|rates| rates.first())
        .and_then(|rate| rate.get("cancellationPolicies"))
        .and_then(|policies| match policies {
            Value::Array(list) => list.first(),
            other => Some(other),
        })
        .and_then(|policy| non_empty_str(policy.get("refundableTag")))
        .unwrap_or_default()
        .to_string();

    Some(HotelOption {
        rank: 0,
        hotel_id,
        name,
        star_rating,
        address,
        total_price,
        currency,
        refundable_tag,
    })
}

/// Stable ascending sort by total price, then dense 1-based ranks.
pub fn rank_hotels(mut hotels: Vec<HotelOption>) -> Vec<HotelOption> {
    hotels.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
    for (i, hotel) in hotels.iter_mut().enumerate() {
        hotel.rank = i + 1;
    }
    hotels
}

/// First room type with the lowest offer amount (ties keep the earliest).
fn cheapest_room(room_types: &[Value]) -> Option<(&Value, f64)> {
    room_types.iter().fold(None, |best, room| {
        let amount = parse_price(
            room.get("offerRetailRate")
                .and_then(|offer| offer.get("amount")),
        );
        match best {
            Some((_, best_amount)) if amount >= best_amount => best,
            _ => Some((room, amount)),
        }
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Strings and numbers as text; ids and postal codes arrive as either.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn star_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn address_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(parts) => {
            let joined = ["line1", "line2", "city", "state", "postalCode", "country"]
                .iter()
                .filter_map(|key| scalar_string(parts.get(*key)))
                .collect::<Vec<_>>()
                .join(" ");
            Some(joined).filter(|s| !s.is_empty())
        }
        Value::String(s) => Some(s.clone()).filter(|s| !s.trim().is_empty()),
        _ => None,
    }
}
