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

//! CLI for hotel-rates search.
//!
//! # Examples
//!
//! ## Ranked hotels for a stay
//!
//! ```bash
//! farescout-hotels --mode period -L Sapporo -K JP -i 2026-01-10 -o 2026-01-14
//! ```
//!
//! ## Cheapest check-in day of a month
//!
//! ```bash
//! # 3-night stays, every check-in day of February
//! farescout-hotels --mode month -L Sapporo -K JP --year 2026 --month 2 --nights 3
//! ```

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use farescout_trip_finder::{
    Config, DailyHotelQuote, HotelOption, HotelSearchParams, HotelSearcher, LiteApiClient,
    first_stay,
};
use std::cmp::max;

#[derive(Parser, Debug)]
#[command(name = "farescout-hotels")]
#[command(version = "0.1.0")]
#[command(about = "Cheapest hotels for a stay or for a whole month")]
struct Args {
    #[arg(long, value_enum, default_value = "period")]
    mode: Mode,
    #[arg(short = 'L', long, help = "City name (e.g., Sapporo)")]
    city: String,
    #[arg(short = 'K', long, help = "ISO country code (e.g., JP)")]
    country: String,
    #[arg(short = 'i', long, help = "Check-in date (period mode)")]
    checkin: Option<String>,
    #[arg(short = 'o', long, help = "Check-out date (period mode)")]
    checkout: Option<String>,
    #[arg(long, help = "Year to scan (month mode)")]
    year: Option<i32>,
    #[arg(long, help = "Month to scan, 1-12 (month mode)")]
    month: Option<u32>,
    #[arg(long, default_value = "3", help = "Nights per stay (month mode)")]
    nights: u32,
    #[arg(short = 'a', long, default_value = "2")]
    adults: u32,
    #[arg(long, default_value = "4")]
    min_stars: u8,
    #[arg(long, default_value = "5")]
    max_stars: u8,
    #[arg(short = 'C', long, default_value = "KRW")]
    currency: String,
    #[arg(long, default_value = "KR")]
    nationality: String,
    #[arg(long, default_value = "50", help = "Hotels requested from the provider")]
    limit: u32,
    #[arg(short = 'n', long, default_value = "10", help = "Hotels shown")]
    top_n: usize,
    #[arg(long, help = "Days searched in parallel (defaults to SCAN_CONCURRENCY)")]
    concurrency: Option<usize>,
    #[arg(long, help = "Shared access key, checked against ACCESS_KEY")]
    key: Option<String>,
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Period,
    Month,
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

/// Cut to `width` characters, marking the cut with `…`.
fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn fmt_stars(stars: Option<f64>) -> String {
    stars.map_or("-".to_string(), |s| format!("{:.1}★", s))
}

fn fmt_amount(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

fn render_hotels(hotels: &[HotelOption]) {
    let terminal_width = get_terminal_width();
    let name_w = hotels
        .iter()
        .map(|h| h.name.chars().count())
        .fold(10, max)
        .min(40);
    let addr_w = terminal_width
        .saturating_sub(name_w + 45)
        .clamp(10, 50);

    println!(
        "  {:>3}  {:<nw$}  {:<6}  {:>14}  {:<4}  {:<6}  {}",
        "#",
        "HOTEL",
        "STARS",
        "TOTAL",
        "CUR",
        "REFUND",
        "ADDRESS",
        nw = name_w
    );
    println!("{}", dash_bar());
    for h in hotels {
        println!(
            "  {:>3}  {:<nw$}  {:<6}  {:>14}  {:<4}  {:<6}  {}",
            h.rank,
            clip(&h.name, name_w),
            fmt_stars(h.star_rating),
            fmt_amount(h.total_price),
            h.currency,
            if h.refundable_tag.is_empty() { "-" } else { h.refundable_tag.as_str() },
            clip(&h.address, addr_w),
            nw = name_w
        );
    }
}

fn render_month(daily: &[DailyHotelQuote], best: Option<&DailyHotelQuote>) {
    match best {
        Some(b) => println!(
            "💰 Cheapest: {} → {}  {} {}  ({})\n",
            b.checkin,
            b.checkout,
            fmt_amount(b.price),
            b.currency,
            b.hotel_name
        ),
        None => println!("No priced stay found in this month.\n"),
    }

    println!("📅 Daily cheapest ({} day(s) with results)", daily.len());
    println!("{}", dash_bar());
    for q in daily {
        let marker = if best.is_some_and(|b| b.checkin == q.checkin) {
            " ⭐"
        } else {
            ""
        };
        println!(
            "  {} → {}  {:>14} {:<4} {}{}",
            q.checkin,
            q.checkout,
            fmt_amount(q.price),
            q.currency,
            clip(&q.hotel_name, 40),
            marker
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting farescout-hotels CLI");
    tracing::debug!("Args: {:?}", args);

    let config = Config::from_env()?;
    if !config.check_access_key(args.key.as_deref()) {
        bail!("Access key rejected");
    }

    let client = LiteApiClient::new(&config.liteapi)?;
    let searcher = HotelSearcher::new(client, config.query_queue());

    match args.mode {
        Mode::Period => {
            let checkin = parse_date(args.checkin.as_deref().context("--checkin is required")?)?;
            let checkout =
                parse_date(args.checkout.as_deref().context("--checkout is required")?)?;
            let params = HotelSearchParams::builder(
                args.city.clone(),
                args.country.clone(),
                checkin,
                checkout,
            )
            .adults(args.adults)
            .stars(args.min_stars, args.max_stars)
            .currency(args.currency.clone())
            .guest_nationality(args.nationality.clone())
            .limit(args.limit)
            .build()?;

            println!("\n🏨 Hotel Rates Search");
            println!("=======================");
            println!("City: {}, {}", params.city_name, params.country_code);
            println!(
                "Dates: {} to {} ({} night(s))",
                params.checkin,
                params.checkout,
                params.nights()
            );
            println!("Stars: {}-{}", params.min_stars, params.max_stars);
            println!("=======================\n");

            match searcher.try_search_hotels(&params).await {
                Ok(mut result) => {
                    if result.is_empty() {
                        println!("No hotels found.");
                    } else {
                        println!("Found {} priced hotel(s)\n", result.len());
                        result.truncate(args.top_n);
                        render_hotels(&result.hotels);
                    }
                }
                Err(e) => {
                    eprintln!("Search failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Mode::Month => {
            let year = args.year.context("--year is required")?;
            let month = args.month.context("--month is required")?;
            let nights = args.nights;
            let (first, template_checkout) = first_stay(year, month, nights)?;

            let params = HotelSearchParams::builder(
                args.city.clone(),
                args.country.clone(),
                first,
                template_checkout,
            )
            .adults(args.adults)
            .stars(args.min_stars, args.max_stars)
            .currency(args.currency.clone())
            .guest_nationality(args.nationality.clone())
            .limit(args.limit)
            .build()?;

            println!("\n🏨 Hotel Month Scan");
            println!("=======================");
            println!("City: {}, {}", params.city_name, params.country_code);
            println!("Month: {}-{:02}, {} night(s) per stay", year, month, nights);
            println!("=======================\n");

            let concurrency = args.concurrency.unwrap_or(config.scan_concurrency);
            let scan = searcher
                .cheapest_in_month(&params, year, month, nights, concurrency)
                .await?;
            render_month(&scan.daily, scan.best.as_ref());
        }
    }
    Ok(())
}
