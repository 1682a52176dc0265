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

//! # Configuration
//!
//! Built once at startup from the process environment (and `.env` when present),
//! then handed to the clients that need it.

use crate::currency::CurrencyConverter;
use farescout_query_queues::QueryQueue;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LITEAPI_BASE_URL: &str = "https://api.liteapi.travel/v3.0";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightsApiConfig {
    pub url: String,
    pub token: Option<String>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub liteapi: LiteApiConfig,
    pub flights: Option<FlightsApiConfig>,
    pub access_key: Option<String>,
    pub usd_to_krw: f64,
    pub scan_concurrency: usize,
    pub provider_qps: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injected variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let liteapi = LiteApiConfig {
            api_key: var("LITEAPI_KEY").ok_or(ConfigError::Missing("LITEAPI_KEY"))?,
            base_url: var("LITEAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LITEAPI_BASE_URL.to_string()),
            connect_timeout_secs: parse_or(&var, "LITEAPI_CONNECT_TIMEOUT_SECS", 10)?,
            timeout_secs: parse_or(&var, "LITEAPI_TIMEOUT_SECS", 60)?,
        };

        let flights = match var("FLIGHTS_API_URL") {
            Some(url) => Some(FlightsApiConfig {
                url,
                token: var("FLIGHTS_API_TOKEN"),
                connect_timeout_secs: parse_or(&var, "FLIGHTS_CONNECT_TIMEOUT_SECS", 10)?,
                timeout_secs: parse_or(&var, "FLIGHTS_TIMEOUT_SECS", 30)?,
            }),
            None => None,
        };

        let usd_to_krw: f64 = parse_or(&var, "USD_TO_KRW", CurrencyConverter::DEFAULT_USD_TO_KRW)?;
        if !(usd_to_krw.is_finite() && usd_to_krw > 0.0) {
            return Err(ConfigError::Invalid {
                name: "USD_TO_KRW",
                value: usd_to_krw.to_string(),
            });
        }

        Ok(Self {
            liteapi,
            flights,
            access_key: var("ACCESS_KEY"),
            usd_to_krw,
            scan_concurrency: parse_or(&var, "SCAN_CONCURRENCY", 1)?,
            provider_qps: parse_or(&var, "PROVIDER_QPS", 4)?,
        })
    }

    /// Flight-search settings, required by the flight modes only.
    pub fn flights(&self) -> Result<&FlightsApiConfig, ConfigError> {
        self.flights
            .as_ref()
            .ok_or(ConfigError::Missing("FLIGHTS_API_URL"))
    }

    /// Open when no key is configured, otherwise exact match.
    pub fn check_access_key(&self, provided: Option<&str>) -> bool {
        match &self.access_key {
            None => true,
            Some(expected) => provided == Some(expected.as_str()),
        }
    }

    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.usd_to_krw)
    }

    pub fn query_queue(&self) -> QueryQueue {
        QueryQueue::with_qps_limit(self.provider_qps)
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
    }
}
