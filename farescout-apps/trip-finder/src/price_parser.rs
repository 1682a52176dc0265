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

//! # Price Parser
//!
//! Side-effect free extraction of a numeric price from provider values such as
//! `"₩1,234"`, `"$1,050"`, `"1 234.50 EUR"` or a bare JSON number.
//!
//! Anything that cannot be read as a non-negative number becomes `f64::INFINITY`,
//! so unparseable offers sort last and never win a minimum.

use serde_json::Value;

/// Keep only ASCII digits and `.` (in order) and parse the remainder.
pub fn parse_price_str(s: &str) -> f64 {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return f64::INFINITY;
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::INFINITY)
}

/// Parse a raw JSON price field (absent, null, number or string).
pub fn parse_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(f64::INFINITY),
        Some(Value::String(s)) => parse_price_str(s),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_currency_and_separators() {
        assert_eq!(parse_price_str("₩1,234"), 1234.0);
        assert_eq!(parse_price_str("$1,050.50"), 1050.5);
        assert_eq!(parse_price_str("  KRW 98 000 total"), 98000.0);
    }

    #[test]
    fn test_unparseable_is_infinite() {
        assert_eq!(parse_price(None), f64::INFINITY);
        assert_eq!(parse_price(Some(&Value::Null)), f64::INFINITY);
        assert_eq!(parse_price_str("abc"), f64::INFINITY);
        assert_eq!(parse_price_str("1.2.3"), f64::INFINITY);
        assert_eq!(parse_price_str("."), f64::INFINITY);
        assert_eq!(parse_price(Some(&json!(true))), f64::INFINITY);
        assert_eq!(parse_price(Some(&json!([1, 2]))), f64::INFINITY);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_price(Some(&json!(42))), 42.0);
        assert_eq!(parse_price(Some(&json!(300.25))), 300.25);
        assert_eq!(parse_price(Some(&json!(-5))), f64::INFINITY);
    }
}
