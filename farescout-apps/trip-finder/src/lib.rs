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

// Library for farescout-trip-finder
// Cheapest flight + hotel combinations (flight-search service, hotel rates API)

mod config;
mod currency;
mod errors;
mod flights_query_builder;
mod flights_results_parser;
mod flights_search;
mod hotels_query_builder;
mod hotels_results_parser;
mod hotels_search;
mod month_scanner;
mod price_parser;
mod trip_planner;

pub use config::{Config, ConfigError, FlightsApiConfig, LiteApiConfig};
pub use currency::{CurrencyConverter, detect_currency};
pub use errors::ProviderError;

// Re-export commonly used items from the flights modules
pub use flights_query_builder::{
    FetchMode, FlightLeg, FlightSearchParams, FlightSearchParamsBuilder, FlightSearchRequest,
    Passengers, Seat, Trip,
};
pub use flights_results_parser::{
    FlightOption, FlightSearchResponse, RawItinerary, cheapest_itinerary,
};
pub use flights_search::{FlightSearchProvider, FlightSearcher, HttpFlightsClient};

// Re-export the hotels modules
pub use hotels_query_builder::{
    HotelSearchParams, HotelSearchParamsBuilder, Occupancy, RatesRequest, SortField,
};
pub use hotels_results_parser::{
    HotelOption, HotelSearchResult, metadata_index, normalize_hotel, rank_hotels,
};
pub use hotels_search::{DailyHotelQuote, HotelRatesProvider, HotelSearcher, LiteApiClient};

pub use month_scanner::{MonthScan, Priced, days_in_month, first_stay, scan_month};
pub use price_parser::{parse_price, parse_price_str};
pub use trip_planner::{TripPlanner, TripQuote};
