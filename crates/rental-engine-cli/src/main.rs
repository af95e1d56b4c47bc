//! `rental` -- quote rental availability and pricing from a JSON inventory.
//!
//! Reads an inventory document (`{"reservables": [...], "reservations": [...]}`)
//! from a file or stdin and prints JSON to stdout. Logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                  | Default                          | Description                         |
//! |---------------------------|----------------------------------|-------------------------------------|
//! | `RENTAL_TODAY`            | current UTC day                  | Anchor for the "no past days" floor |
//! | `RENTAL_INCLUDE_INACTIVE` | `false`                          | Search inactive reservables too     |
//! | `RUST_LOG`                | `rental=info,rental_engine=info` | Log filter                          |

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::slice;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rental_engine::{
    build_availability_map, cancellation_cost, display_date_range, evaluate_reservable_by_date,
    quote_reservation, search_availability, AvailabilityResponse, CalendarDay, Inventory,
    RentalError, Reservable, ReservableFilter, ReservableSource, ReservationSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rental", version, about = "Rental availability and pricing quotes")]
struct Cli {
    /// Day treated as today; earlier days are never offered
    #[arg(long, global = true, env = "RENTAL_TODAY")]
    today: Option<CalendarDay>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the per-day availability map of one reservable
    Map {
        #[command(flatten)]
        source: Source,
        /// Reservable id
        #[arg(long, short)]
        reservable: String,
    },
    /// Quote one reservable for a date range
    Quote {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        range: Range,
        /// Reservable id
        #[arg(long, short)]
        reservable: String,
        /// Take the range as given instead of extending it to the minimum stay
        #[arg(long)]
        ignore_min_days: bool,
    },
    /// Quote every reservable for a date range
    Search {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        range: Range,
    },
    /// Checkout amounts for one reservable and date range
    Receipt {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        range: Range,
        /// Reservable id
        #[arg(long, short)]
        reservable: String,
    },
}

#[derive(Args)]
struct Source {
    /// Inventory JSON file, or `-` for stdin
    #[arg(long, short, default_value = "-")]
    inventory: PathBuf,

    /// Include reservables marked inactive
    #[arg(long, env = "RENTAL_INCLUDE_INACTIVE")]
    include_inactive: bool,
}

#[derive(Args)]
struct Range {
    /// First day (YYYY-MM-DD or any ISO datetime)
    #[arg(long, short)]
    start: String,

    /// Last day; defaults to the start day
    #[arg(long, short)]
    end: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental=info,rental_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(CalendarDay::today);

    let output = match cli.command {
        Command::Map { source, reservable } => {
            let inventory = load_inventory(&source.inventory)?;
            let reservable = find_reservable(&inventory, &reservable, source.include_inactive)?;
            let reservations = inventory.reservations(Some(slice::from_ref(&reservable.id)))?;
            let map = build_availability_map(&reservable, &reservations, today);
            tracing::info!(reservable = %reservable.id, days = map.len(), %today, "map built");
            serde_json::to_value(&map)?
        }
        Command::Quote {
            source,
            range,
            reservable,
            ignore_min_days,
        } => {
            let inventory = load_inventory(&source.inventory)?;
            let reservable = find_reservable(&inventory, &reservable, source.include_inactive)?;
            let response = quote(&inventory, &reservable, &range, today, !ignore_min_days)?;
            serde_json::to_value(&response)?
        }
        Command::Search { source, range } => {
            let inventory = load_inventory(&source.inventory)?;
            let filter = ReservableFilter {
                ids: None,
                include_inactive: source.include_inactive,
            };
            let end = range.end.as_deref().unwrap_or(&range.start);
            let results = search_availability(
                Some(range.start.as_str()),
                Some(end),
                &inventory,
                &filter,
                today,
            )?
            .ok_or_else(|| RentalError::InvalidDate(format!("'{}' to '{}'", range.start, end)))?;
            let available = results.iter().filter(|r| r.is_avail).count();
            tracing::info!(total = results.len(), available, %today, "search complete");
            serde_json::to_value(&results)?
        }
        Command::Receipt {
            source,
            range,
            reservable,
        } => {
            let inventory = load_inventory(&source.inventory)?;
            let reservable = find_reservable(&inventory, &reservable, source.include_inactive)?;
            let response = quote(&inventory, &reservable, &range, today, true)?;
            let receipt = quote_reservation(&response)?;
            let dates = display_date_range(response.start_date, Some(response.end_date), "");
            serde_json::json!({
                "reservableId": reservable.id,
                "startDate": response.start_date,
                "endDate": response.end_date,
                "dates": dates.trim(),
                "receipt": receipt,
                "cancellationCost": cancellation_cost(&response, Some(receipt.reservation_cost)),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_inventory(path: &Path) -> Result<Inventory> {
    if path == Path::new("-") {
        return Inventory::from_reader(io::stdin().lock())
            .context("failed to read inventory from stdin");
    }
    let file =
        File::open(path).with_context(|| format!("failed to open inventory {}", path.display()))?;
    Inventory::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to load inventory {}", path.display()))
}

fn find_reservable(inventory: &Inventory, id: &str, include_inactive: bool) -> Result<Reservable> {
    inventory
        .reservable(id, include_inactive)?
        .ok_or_else(|| RentalError::ReservableNotFound(id.to_string()).into())
}

fn quote(
    inventory: &Inventory,
    reservable: &Reservable,
    range: &Range,
    today: CalendarDay,
    check_min_days: bool,
) -> Result<AvailabilityResponse> {
    let reservations = inventory.reservations(Some(slice::from_ref(&reservable.id)))?;
    let response = evaluate_reservable_by_date(
        Some(range.start.as_str()),
        range.end.as_deref(),
        reservable,
        &reservations,
        today,
        check_min_days,
    )
    .ok_or_else(|| {
        RentalError::InvalidDate(format!(
            "'{}' to '{}'",
            range.start,
            range.end.as_deref().unwrap_or(&range.start)
        ))
    })?;
    tracing::info!(
        reservable = %reservable.id,
        start = %response.start_date,
        end = %response.end_date,
        is_avail = response.is_avail,
        total_cost = response.total_cost,
        "quote computed"
    );
    Ok(response)
}
