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

//! CLI for combined flight + hotel search.
//!
//! # Examples
//!
//! ```bash
//! # Cheapest round trip of February with 4 nights on site, plus hotels
//! farescout-trip --mode month -f ICN -t CTS -L Sapporo -K JP --year 2026 --month 2 --nights 4
//!
//! # Fixed dates
//! farescout-trip --mode period -f ICN -t CTS -L Sapporo -K JP -i 2026-02-10 -o 2026-02-14
//! ```

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, ValueEnum};
use farescout_trip_finder::{
    Config, FlightSearchParams, FlightSearcher, HotelOption, HotelSearchParams, HotelSearcher,
    HttpFlightsClient, LiteApiClient, Seat, Trip, TripPlanner, TripQuote, first_stay,
};
use std::cmp::max;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "farescout-trip")]
#[command(author, version, about = "Cheapest flight + hotel combination", long_about = None)]
struct CliArgs {
    #[arg(long, value_enum, default_value = "month")]
    mode: Mode,

    /// Origin airport code (e.g., ICN)
    #[arg(short, long)]
    from: String,

    /// Destination airport code (e.g., CTS)
    #[arg(short, long)]
    to: String,

    /// Trip type: roundtrip, oneway
    #[arg(long, default_value = "roundtrip")]
    trip: String,

    /// Cabin class: economy, premium_economy, business, first
    #[arg(short, long, default_value = "economy")]
    cabin: String,

    /// Number of flight passengers (adults)
    #[arg(short, long, default_value = "1")]
    passengers: u32,

    /// Hotel city name
    #[arg(short = 'L', long)]
    city: String,

    /// Hotel country code
    #[arg(short = 'K', long)]
    country: String,

    /// Check-in / departure date (period mode)
    #[arg(short = 'i', long)]
    checkin: Option<String>,

    /// Check-out / return date (period mode)
    #[arg(short = 'o', long)]
    checkout: Option<String>,

    /// Year to scan (month mode)
    #[arg(long)]
    year: Option<i32>,

    /// Month to scan, 1-12 (month mode)
    #[arg(long)]
    month: Option<u32>,

    /// Nights on site (month mode)
    #[arg(long, default_value = "3")]
    nights: u32,

    /// Hotel guests (adults)
    #[arg(short = 'a', long, default_value = "2")]
    adults: u32,

    #[arg(long, default_value = "4")]
    min_stars: u8,

    #[arg(long, default_value = "5")]
    max_stars: u8,

    /// Hotel currency
    #[arg(short = 'C', long, default_value = "KRW")]
    currency: String,

    #[arg(long, default_value = "KR")]
    nationality: String,

    /// Hotels requested from the provider
    #[arg(long, default_value = "50")]
    limit: u32,

    /// Hotels shown
    #[arg(short = 'n', long, default_value = "10")]
    top_n: usize,

    /// Days searched in parallel (defaults to SCAN_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Shared access key, checked against ACCESS_KEY
    #[arg(long)]
    key: Option<String>,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Month,
    Period,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Parse cabin class string to Seat enum
fn parse_cabin(s: &str) -> Result<Seat> {
    match s.to_lowercase().as_str() {
        "economy" | "e" => Ok(Seat::Economy),
        "premium_economy" | "premium" | "pe" => Ok(Seat::PremiumEconomy),
        "business" | "b" => Ok(Seat::Business),
        "first" | "f" => Ok(Seat::First),
        _ => bail!(
            "Invalid cabin class: {}. Use: economy, premium_economy, business, first",
            s
        ),
    }
}

/// Parse trip type string to Trip enum
fn parse_trip(s: &str) -> Result<Trip> {
    match s.to_lowercase().as_str() {
        "roundtrip" | "round-trip" | "round" | "rt" => Ok(Trip::RoundTrip),
        "oneway" | "one-way" | "one" | "ow" => Ok(Trip::OneWay),
        _ => bail!("Invalid trip type: {}. Use: roundtrip, oneway", s),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .context(format!(
            "Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD",
            s
        ))
}

fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn fmt_krw(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-₩{}", grouped)
    } else {
        format!("₩{}", grouped)
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_hotels(hotels: &[HotelOption]) {
    let name_w = hotels
        .iter()
        .map(|h| h.name.chars().count())
        .fold(10, max)
        .min(40);
    let addr_w = get_terminal_width().saturating_sub(name_w + 35).clamp(10, 50);

    println!(
        "  {:>3}  {:<nw$}  {:<5}  {:>14}  {:<4}  {}",
        "#",
        "HOTEL",
        "STARS",
        "TOTAL",
        "CUR",
        "ADDRESS",
        nw = name_w
    );
    println!("{}", dash_bar());
    for h in hotels {
        let stars = h.star_rating.map_or("-".to_string(), |s| format!("{:.1}", s));
        println!(
            "  {:>3}  {:<nw$}  {:<5}  {:>14}  {:<4}  {}",
            h.rank,
            clip(&h.name, name_w),
            stars,
            h.total_price.trunc() as i64,
            h.currency,
            clip(&h.address, addr_w),
            nw = name_w
        );
    }
}

fn render_quote(quote: &TripQuote) {
    println!("{}", dash_bar());
    match &quote.flight {
        Some(f) => {
            let dates = match f.return_date {
                Some(ret) => format!("{} → {}", f.depart_date, ret),
                None => f.depart_date.to_string(),
            };
            println!("🛫 Flight: {}  {}  {}", dates, f.airline, f.price_raw);
            match quote.flight_price_krw {
                Some(krw) => println!("   ≈ {}", fmt_krw(krw)),
                None => println!("   (price not convertible)"),
            }
        }
        None => println!("🛫 Flight: no result"),
    }
    println!("{}\n", dash_bar());

    if quote.hotels.is_empty() {
        println!("🏨 No hotels found.\n");
    } else {
        println!("🏨 Top {} hotel(s)", quote.hotels.len());
        render_hotels(&quote.hotels);
        println!();
    }

    match quote.combined_total {
        Some(total) => println!("💰 Flight + cheapest hotel: {}", fmt_krw(total)),
        None => println!("💰 Combined total unavailable"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting farescout-trip CLI");
    tracing::debug!("Args: {:?}", args);

    let config = Config::from_env()?;
    if !config.check_access_key(args.key.as_deref()) {
        bail!("Access key rejected");
    }

    let cabin = parse_cabin(&args.cabin)?;
    let trip = parse_trip(&args.trip)?;

    let flights_client = HttpFlightsClient::new(config.flights()?)?;
    let hotels_client = LiteApiClient::new(&config.liteapi)?;
    let planner = TripPlanner::new(
        FlightSearcher::new(flights_client, config.query_queue()),
        HotelSearcher::new(hotels_client, config.query_queue()),
        config.converter(),
    )
    .with_scan_concurrency(args.concurrency.unwrap_or(config.scan_concurrency));

    let (checkin, checkout) = match args.mode {
        Mode::Period => (
            parse_date(args.checkin.as_deref().context("--checkin is required")?)?,
            parse_date(args.checkout.as_deref().context("--checkout is required")?)?,
        ),
        Mode::Month => {
            let year = args.year.context("--year is required")?;
            let month = args.month.context("--month is required")?;
            first_stay(year, month, args.nights)?
        }
    };

    let flight_params = FlightSearchParams::builder(args.from.clone(), args.to.clone(), checkin)
        .return_date(Some(checkout))
        .trip_type(trip)
        .adults(args.passengers)
        .cabin_class(cabin)
        .build()?;
    let hotel_params =
        HotelSearchParams::builder(args.city.clone(), args.country.clone(), checkin, checkout)
            .adults(args.adults)
            .stars(args.min_stars, args.max_stars)
            .currency(args.currency.clone())
            .guest_nationality(args.nationality.clone())
            .limit(args.limit)
            .build()?;

    println!(
        "\n✈️  {} → {}  +  🏨 {}, {}",
        flight_params.from_airport, flight_params.to_airport, hotel_params.city_name,
        hotel_params.country_code
    );

    let quote = match args.mode {
        Mode::Period => {
            println!("Dates: {} to {}\n", checkin, checkout);
            planner
                .plan_period(&flight_params, &hotel_params, args.top_n)
                .await
        }
        Mode::Month => {
            let nights = args.nights;
            println!(
                "Month: {}-{:02}, {} night(s)\n",
                checkin.year(),
                checkin.month(),
                nights
            );
            planner
                .plan_month(
                    &flight_params,
                    &hotel_params,
                    checkin.year(),
                    checkin.month(),
                    nights,
                    args.top_n,
                )
                .await?
        }
    };

    render_quote(&quote);
    Ok(())
}
