use crate::cli::layout_source;
use crate::console::{render_departure, render_occupancy, ConsoleNarrator};
use chrono::{Duration, Utc};
use clap::Args;
use parkade::config::{parse_spot_counts, AppConfig};
use parkade::error::AppError;
use parkade::facility::{
    DepartureReceipt, Lot, ManualClock, OccupancyReport, ParkingError, SpotCounts, VehicleClass,
    VehicleId,
};
use serde::Serialize;
use std::path::PathBuf;

const DEFAULT_DWELL_MINUTES: i64 = 90;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Level layout CSV (level,handicap,compact,large,motorcycle)
    #[arg(long)]
    pub(crate) layout: Option<PathBuf>,
    /// Comma-separated level ids, tried in this order
    #[arg(long)]
    pub(crate) levels: Option<String>,
    /// Spots per level as handicap,compact,large,motorcycle
    #[arg(long, value_parser = parse_spot_counts)]
    pub(crate) spots: Option<SpotCounts>,
    /// Simulated minutes between the arrivals and the departures
    #[arg(long, default_value_t = DEFAULT_DWELL_MINUTES)]
    pub(crate) dwell_minutes: i64,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            layout: None,
            levels: None,
            spots: None,
            dwell_minutes: DEFAULT_DWELL_MINUTES,
            json: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DemoSummary {
    pub(crate) parked: Vec<VehicleId>,
    pub(crate) turned_away: Vec<VehicleId>,
    pub(crate) departures: Vec<DepartureReceipt>,
    pub(crate) missing: Vec<VehicleId>,
    pub(crate) occupancy: OccupancyReport,
}

const ARRIVALS: [(&str, VehicleClass); 5] = [
    ("KA-01-1234", VehicleClass::Car),
    ("KA-02-5678", VehicleClass::Bike),
    ("KA-03-9999", VehicleClass::Bus),
    ("KA-04-4321", VehicleClass::Handicap),
    ("KA-05-1111", VehicleClass::Car),
];

const DEPARTURES: [&str; 3] = ["KA-01-1234", "KA-03-9999", "KA-09-0000"];

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        layout,
        levels,
        spots,
        dwell_minutes,
        json,
    } = args;

    let layout = layout_source(&config.layout, layout, levels, spots)?.resolve()?;
    let clock = ManualClock::starting_at(Utc::now());
    let mut lot = Lot::new(&layout)
        .with_fee_schedule(config.fees)
        .with_clock(clock.clone())
        .with_sink(ConsoleNarrator::new(!json));

    if !json {
        println!("Parkade demo");
        println!(
            "{} levels, {} spots in total\n",
            layout.levels().len(),
            layout.capacity()
        );
    }

    let summary = run_scenario(&mut lot, &clock, dwell(dwell_minutes)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if !summary.departures.is_empty() {
        println!("\nReceipts");
        for receipt in &summary.departures {
            render_departure(receipt);
        }
    }
    println!();
    render_occupancy(&summary.occupancy);
    Ok(())
}

fn dwell(minutes: i64) -> Result<Duration, AppError> {
    if minutes < 0 {
        return Err(AppError::InvalidDwell(minutes));
    }
    Duration::try_minutes(minutes).ok_or(AppError::InvalidDwell(minutes))
}

/// Parks the demo arrivals, lets `dwell` pass, then processes the departures.
/// Turned-away and unknown vehicles are ordinary outcomes, not failures.
pub(crate) fn run_scenario(
    lot: &mut Lot,
    clock: &ManualClock,
    dwell: Duration,
) -> Result<DemoSummary, AppError> {
    let mut parked = Vec::new();
    let mut turned_away = Vec::new();

    for (plate, class) in ARRIVALS {
        let vehicle = lot.vehicle(plate, class);
        match lot.park(vehicle) {
            Ok(receipt) => parked.push(receipt.vehicle),
            Err(ParkingError::LotFull { vehicle }) => turned_away.push(vehicle),
            Err(other) => return Err(other.into()),
        }
    }

    clock.advance(dwell)?;

    let mut departures = Vec::new();
    let mut missing = Vec::new();
    for plate in DEPARTURES {
        match lot.remove(&VehicleId::from(plate)) {
            Ok(receipt) => departures.push(receipt),
            Err(ParkingError::VehicleNotFound(vehicle)) => missing.push(vehicle),
            Err(other) => return Err(other.into()),
        }
    }

    Ok(DemoSummary {
        parked,
        turned_away,
        departures,
        missing,
        occupancy: lot.occupancy(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parkade::facility::{Clock, InMemoryEventLog, LotLayout, ParkingEvent};

    fn demo_lot(counts: SpotCounts) -> (Lot, ManualClock, InMemoryEventLog) {
        let layout = LotLayout::uniform(["L1", "L2"], counts).expect("layout builds");
        let start = Utc
            .with_ymd_and_hms(2025, 9, 24, 9, 0, 0)
            .single()
            .expect("valid start");
        let clock = ManualClock::starting_at(start);
        let log = InMemoryEventLog::default();
        let lot = Lot::new(&layout)
            .with_clock(clock.clone())
            .with_sink(log.clone());
        (lot, clock, log)
    }

    #[test]
    fn default_layout_parks_everyone() {
        let (mut lot, clock, log) = demo_lot(SpotCounts::new(5, 20, 10, 10));
        let summary =
            run_scenario(&mut lot, &clock, Duration::minutes(90)).expect("scenario runs");

        assert_eq!(summary.parked.len(), ARRIVALS.len());
        assert!(summary.turned_away.is_empty());
        assert_eq!(summary.departures.len(), 2);
        assert_eq!(summary.missing, vec![VehicleId::from("KA-09-0000")]);

        let car = &summary.departures[0];
        assert_eq!(car.spot.as_str(), "L1-C1");
        assert!((car.fee - 7.5).abs() < 1e-9);
        let bus = &summary.departures[1];
        assert!((bus.fee - 15.0).abs() < 1e-9);

        assert_eq!(summary.occupancy.parked_vehicles, 3);
        assert!(log
            .events()
            .iter()
            .any(|event| matches!(event, ParkingEvent::NotFound { .. })));
    }

    #[test]
    fn tight_layout_spills_and_turns_away() {
        let (mut lot, clock, _) = demo_lot(SpotCounts::new(0, 1, 1, 0));
        let summary = run_scenario(&mut lot, &clock, Duration::zero()).expect("scenario runs");

        assert_eq!(
            summary.turned_away,
            vec![VehicleId::from("KA-02-5678"), VehicleId::from("KA-04-4321")]
        );
        assert_eq!(summary.parked.len(), 3);
        assert!(summary.departures.iter().all(|receipt| receipt.fee == 0.0));
    }

    #[test]
    fn dwell_rejects_out_of_range_minutes() {
        assert_eq!(dwell(90).expect("valid dwell"), Duration::minutes(90));
        assert!(matches!(dwell(-5), Err(AppError::InvalidDwell(-5))));
        assert!(matches!(
            dwell(i64::MAX),
            Err(AppError::InvalidDwell(i64::MAX))
        ));
    }

    #[test]
    fn dwell_past_the_calendar_is_an_error() {
        let (mut lot, clock, _) = demo_lot(SpotCounts::new(5, 20, 10, 10));
        let before = clock.now();
        let long = dwell(100_000_000_000_000).expect("representable duration");

        let error = run_scenario(&mut lot, &clock, long).expect_err("clock overflows");
        assert!(matches!(error, AppError::Clock(_)));
        assert_eq!(clock.now(), before);
    }
}
