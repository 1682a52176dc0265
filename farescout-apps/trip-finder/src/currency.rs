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

//! # Currency Conversion
//!
//! Flight prices come back as display strings, hotel totals in the requested
//! currency (KRW by default). A static USD→KRW rate lets both be summed.

/// Currency code inferred from a raw flight price string.
///
/// Only `$` is recognised and it is always read as USD, which misreads SGD/HKD
/// style prices. Prefer an explicit currency code when the provider sends one.
pub fn detect_currency(price_raw: &str) -> Option<&'static str> {
    price_raw.contains('$').then_some("USD")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyConverter {
    usd_to_krw: f64,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self {
            usd_to_krw: Self::DEFAULT_USD_TO_KRW,
        }
    }
}

impl CurrencyConverter {
    pub const DEFAULT_USD_TO_KRW: f64 = 1350.0;

    pub fn new(usd_to_krw: f64) -> Self {
        Self { usd_to_krw }
    }

    pub fn usd_to_krw(&self) -> f64 {
        self.usd_to_krw
    }

    /// Convert to whole KRW, truncating toward zero.
    ///
    /// USD amounts are multiplied by the rate; anything else is assumed to be
    /// KRW already.
    pub fn to_krw(&self, amount: f64, currency: Option<&str>) -> Option<i64> {
        let krw = match currency {
            Some(code) if code.eq_ignore_ascii_case("USD") => amount * self.usd_to_krw,
            _ => amount,
        };
        krw.is_finite().then(|| krw.trunc() as i64)
    }

    /// Flight (already in KRW) plus the hotel total brought into KRW.
    ///
    /// Only KRW and USD hotel totals can be summed; any other currency gives
    /// `None` rather than a mixed figure.
    pub fn combined_total(
        &self,
        flight_krw: i64,
        hotel_total: f64,
        hotel_currency: &str,
    ) -> Option<i64> {
        let hotel_krw = if hotel_currency.eq_ignore_ascii_case("KRW") {
            self.to_krw(hotel_total, None)?
        } else if hotel_currency.eq_ignore_ascii_case("USD") {
            self.to_krw(hotel_total, Some("USD"))?
        } else {
            return None;
        };
        Some(flight_krw.saturating_add(hotel_krw))
    }
}
