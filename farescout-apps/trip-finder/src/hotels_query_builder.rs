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

//! # Hotels Query Builder
//!
//! Side-effect free construction of the hotel-rates request body.

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearchParams {
    pub city_name: String,
    pub country_code: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub adults: u32,
    pub min_stars: u8,
    pub max_stars: u8,
    pub currency: String,
    pub guest_nationality: String,
    pub limit: u32,
    pub timeout_secs: Option<u32>,
}

impl HotelSearchParams {
    pub fn builder(
        city_name: String,
        country_code: String,
        checkin: NaiveDate,
        checkout: NaiveDate,
    ) -> HotelSearchParamsBuilder {
        HotelSearchParamsBuilder {
            city_name,
            country_code,
            checkin,
            checkout,
            adults: 2,
            min_stars: 4,
            max_stars: 5,
            currency: "KRW".to_string(),
            guest_nationality: "KR".to_string(),
            limit: 50,
            timeout_secs: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.city_name.trim().is_empty(), "City name is required");
        ensure!(
            !self.country_code.trim().is_empty(),
            "Country code is required"
        );
        ensure!(self.adults > 0, "At least one adult is required");
        ensure!(
            self.checkout > self.checkin,
            "Checkout ({}) must be after checkin ({})",
            self.checkout,
            self.checkin
        );
        ensure!(
            (1..=5).contains(&self.min_stars) && (1..=5).contains(&self.max_stars),
            "Star rating out of range (1-5): {}-{}",
            self.min_stars,
            self.max_stars
        );
        ensure!(self.min_stars <= self.max_stars, "Star range is reversed");
        ensure!(self.limit > 0, "Limit must be positive");
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }

    /// Same search for another stay.
    pub fn with_dates(&self, checkin: NaiveDate, checkout: NaiveDate) -> Self {
        Self {
            checkin,
            checkout,
            ..self.clone()
        }
    }

    pub fn to_rates_request(&self) -> RatesRequest {
        RatesRequest {
            occupancies: vec![Occupancy {
                adults: self.adults,
            }],
            sort: vec![SortField {
                field: "price",
                direction: "ascending",
            }],
            star_rating: (self.min_stars..=self.max_stars).collect(),
            currency: self.currency.clone(),
            guest_nationality: self.guest_nationality.clone(),
            checkin: self.checkin.format("%Y-%m-%d").to_string(),
            checkout: self.checkout.format("%Y-%m-%d").to_string(),
            timeout: self.timeout_secs,
            max_rates_per_hotel: 1,
            board_type: "RO",
            refundable_rates_only: false,
            city_name: self.city_name.clone(),
            country_code: self.country_code.clone(),
            include_hotel_data: true,
            limit: self.limit,
        }
    }
}

#[derive(Clone)]
pub struct HotelSearchParamsBuilder {
    city_name: String,
    country_code: String,
    checkin: NaiveDate,
    checkout: NaiveDate,
    adults: u32,
    min_stars: u8,
    max_stars: u8,
    currency: String,
    guest_nationality: String,
    limit: u32,
    timeout_secs: Option<u32>,
}

impl HotelSearchParamsBuilder {
    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    /// Reversed bounds are swapped rather than rejected.
    pub fn stars(mut self, min_stars: u8, max_stars: u8) -> Self {
        self.min_stars = min_stars.min(max_stars);
        self.max_stars = min_stars.max(max_stars);
        self
    }

    pub fn currency(mut self, currency: String) -> Self {
        self.currency = currency;
        self
    }

    pub fn guest_nationality(mut self, guest_nationality: String) -> Self {
        self.guest_nationality = guest_nationality;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: Option<u32>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> Result<HotelSearchParams> {
        let params = HotelSearchParams {
            city_name: self.city_name,
            country_code: self.country_code.to_uppercase(),
            checkin: self.checkin,
            checkout: self.checkout,
            adults: self.adults,
            min_stars: self.min_stars,
            max_stars: self.max_stars,
            currency: self.currency.to_uppercase(),
            guest_nationality: self.guest_nationality.to_uppercase(),
            limit: self.limit,
            timeout_secs: self.timeout_secs,
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Occupancy {
    pub adults: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SortField {
    pub field: &'static str,
    pub direction: &'static str,
}

/// Body of a hotel-rates request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatesRequest {
    pub occupancies: Vec<Occupancy>,
    pub sort: Vec<SortField>,
    pub star_rating: Vec<u8>,
    pub currency: String,
    pub guest_nationality: String,
    pub checkin: String,
    pub checkout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    pub max_rates_per_hotel: u32,
    pub board_type: &'static str,
    pub refundable_rates_only: bool,
    pub city_name: String,
    pub country_code: String,
    pub include_hotel_data: bool,
    pub limit: u32,
}
