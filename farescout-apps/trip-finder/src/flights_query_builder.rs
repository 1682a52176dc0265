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

//! # Flights Query Builder
//!
//! Side-effect free construction of the flight-search request.

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trip {
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

/// Operating mode of the flight-search service.
///
/// `Fallback` is the primary mode; `Common` is the simplified mode used when
/// the primary one is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    Fallback,
    Common,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightLeg {
    pub date: String,
    pub from_airport: String,
    pub to_airport: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub from_airport: String,
    pub to_airport: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub trip_type: Trip,
    pub adults: u32,
    pub cabin_class: Seat,
}

impl FlightSearchParams {
    pub fn builder(
        from_airport: String,
        to_airport: String,
        depart_date: NaiveDate,
    ) -> FlightSearchParamsBuilder {
        FlightSearchParamsBuilder {
            from_airport,
            to_airport,
            depart_date,
            return_date: None,
            trip_type: Trip::RoundTrip,
            adults: 1,
            cabin_class: Seat::Economy,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.from_airport.trim().is_empty(),
            "Origin airport is required"
        );
        ensure!(
            !self.to_airport.trim().is_empty(),
            "Destination airport is required"
        );
        ensure!(self.adults > 0, "At least one adult is required");
        if self.trip_type == Trip::RoundTrip {
            let Some(ret) = self.return_date else {
                anyhow::bail!("Round trip requires a return date");
            };
            ensure!(
                ret >= self.depart_date,
                "Return date ({}) is before departure ({})",
                ret,
                self.depart_date
            );
        }
        Ok(())
    }

    /// Outbound leg, plus the inbound leg for round trips.
    pub fn legs(&self) -> Vec<FlightLeg> {
        let outbound = FlightLeg {
            date: self.depart_date.format("%Y-%m-%d").to_string(),
            from_airport: self.from_airport.clone(),
            to_airport: self.to_airport.clone(),
        };
        match (self.trip_type, self.return_date) {
            (Trip::RoundTrip, Some(ret)) => vec![
                outbound,
                FlightLeg {
                    date: ret.format("%Y-%m-%d").to_string(),
                    from_airport: self.to_airport.clone(),
                    to_airport: self.from_airport.clone(),
                },
            ],
            _ => vec![outbound],
        }
    }

    /// Same route for other dates. `return_date` is ignored for one-way trips.
    pub fn with_dates(&self, depart_date: NaiveDate, return_date: Option<NaiveDate>) -> Self {
        Self {
            depart_date,
            return_date: match self.trip_type {
                Trip::RoundTrip => return_date,
                Trip::OneWay => None,
            },
            ..self.clone()
        }
    }

    pub fn to_request(&self, fetch_mode: FetchMode) -> FlightSearchRequest {
        FlightSearchRequest {
            flights: self.legs(),
            trip: self.trip_type,
            seat: self.cabin_class,
            passengers: Passengers {
                adults: self.adults,
            },
            fetch_mode,
        }
    }
}

#[derive(Clone)]
pub struct FlightSearchParamsBuilder {
    from_airport: String,
    to_airport: String,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
    trip_type: Trip,
    adults: u32,
    cabin_class: Seat,
}

impl FlightSearchParamsBuilder {
    pub fn return_date(mut self, return_date: Option<NaiveDate>) -> Self {
        self.return_date = return_date;
        self
    }

    pub fn trip_type(mut self, trip_type: Trip) -> Self {
        self.trip_type = trip_type;
        self
    }

    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    pub fn cabin_class(mut self, cabin_class: Seat) -> Self {
        self.cabin_class = cabin_class;
        self
    }

    pub fn build(self) -> Result<FlightSearchParams> {
        let params = FlightSearchParams {
            from_airport: self.from_airport.trim().to_uppercase(),
            to_airport: self.to_airport.trim().to_uppercase(),
            depart_date: self.depart_date,
            return_date: match self.trip_type {
                Trip::RoundTrip => self.return_date,
                Trip::OneWay => None,
            },
            trip_type: self.trip_type,
            adults: self.adults,
            cabin_class: self.cabin_class,
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passengers {
    pub adults: u32,
}

/// Body sent to the flight-search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub flights: Vec<FlightLeg>,
    pub trip: Trip,
    pub seat: Seat,
    pub passengers: Passengers,
    pub fetch_mode: FetchMode,
}
