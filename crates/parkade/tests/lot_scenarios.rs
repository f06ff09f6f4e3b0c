use chrono::{DateTime, Duration, TimeZone, Utc};
use parkade::facility::{
    FeeSchedule, InMemoryEventLog, Lot, LotLayout, ManualClock, ParkingError, ParkingEvent,
    SpotCounts, SpotType, Vehicle, VehicleClass, VehicleId,
};

fn opening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 8, 0, 0)
        .single()
        .expect("valid opening time")
}

fn lot_with(levels: &[&str], counts: SpotCounts) -> (Lot, ManualClock, InMemoryEventLog) {
    let layout = LotLayout::uniform(levels.iter().copied(), counts).expect("layout builds");
    let clock = ManualClock::starting_at(opening());
    let log = InMemoryEventLog::default();
    let lot = Lot::new(&layout)
        .with_clock(clock.clone())
        .with_sink(log.clone());
    (lot, clock, log)
}

#[test]
fn single_compact_spot_is_reused_after_departure() {
    let (mut lot, clock, _) = lot_with(&["L1"], SpotCounts::new(0, 1, 0, 0));

    let first = lot
        .park(Vehicle::new("CAR-A", VehicleClass::Car))
        .expect("first car parks");
    assert_eq!(first.spot.as_str(), "L1-C1");

    let error = lot
        .park(Vehicle::new("CAR-B", VehicleClass::Car))
        .expect_err("second car is turned away");
    assert_eq!(
        error,
        ParkingError::LotFull {
            vehicle: VehicleId::from("CAR-B")
        }
    );
    assert!(lot.is_parked(&VehicleId::from("CAR-A")));

    clock
        .advance(Duration::minutes(20))
        .expect("clock advances");
    let departure = lot
        .remove(&VehicleId::from("CAR-A"))
        .expect("first car departs");
    assert!(departure.fee >= 0.0);

    let second = lot
        .park(Vehicle::new("CAR-B", VehicleClass::Car))
        .expect("second car parks in the freed spot");
    assert_eq!(second.spot, first.spot);
}

#[test]
fn buses_fill_levels_in_configured_order() {
    let (mut lot, _, _) = lot_with(&["L1", "L2"], SpotCounts::new(0, 0, 1, 0));

    let first = lot
        .park(Vehicle::new("BUS-1", VehicleClass::Bus))
        .expect("first bus parks");
    assert_eq!(first.level, "L1");
    assert_eq!(first.spot_type, SpotType::Large);

    let second = lot
        .park(Vehicle::new("BUS-2", VehicleClass::Bus))
        .expect("second bus parks");
    assert_eq!(second.level, "L2");

    let error = lot
        .park(Vehicle::new("BUS-3", VehicleClass::Bus))
        .expect_err("third bus has nowhere to go");
    assert!(matches!(error, ParkingError::LotFull { .. }));
    assert_eq!(lot.parked_count(), 2);
}

#[test]
fn car_parked_two_hours_pays_ten() {
    let (mut lot, clock, log) = lot_with(&["L1"], SpotCounts::new(0, 1, 0, 0));
    lot.park(Vehicle::new("KA-01-1234", VehicleClass::Car))
        .expect("car parks");

    clock
        .advance(Duration::hours(2))
        .expect("clock advances");
    let receipt = lot
        .remove(&VehicleId::from("KA-01-1234"))
        .expect("car departs");

    assert!((receipt.fee - 10.0).abs() < 1e-9, "fee was {}", receipt.fee);
    assert_eq!(receipt.ticket.issued_at, opening());
    assert_eq!(receipt.departed_at, opening() + Duration::hours(2));
    assert!(log.events().iter().any(|event| matches!(
        event,
        ParkingEvent::Departed { fee, .. } if (*fee - 10.0).abs() < 1e-9
    )));
}

#[test]
fn lot_built_vehicles_use_the_configured_schedule() {
    let (lot, clock, _) = lot_with(&["L1"], SpotCounts::new(0, 2, 0, 0));
    let mut fees = FeeSchedule::standard();
    fees.set_rate(VehicleClass::Car, 8.0);
    let mut lot = lot.with_fee_schedule(fees);

    let priced = lot.vehicle("CAR-A", VehicleClass::Car);
    lot.park(priced).expect("lot-built car parks");
    lot.park(Vehicle::new("CAR-B", VehicleClass::Car))
        .expect("standard car parks");

    clock
        .advance(Duration::hours(1))
        .expect("clock advances");
    let configured = lot
        .remove(&VehicleId::from("CAR-A"))
        .expect("lot-built car departs");
    let standard = lot
        .remove(&VehicleId::from("CAR-B"))
        .expect("standard car departs");

    assert!((configured.fee - 8.0).abs() < 1e-9);
    assert!((standard.fee - 5.0).abs() < 1e-9);
}

#[test]
fn parked_vehicle_cannot_park_again_until_it_leaves() {
    let (mut lot, _, log) = lot_with(&["L1", "L2"], SpotCounts::new(0, 2, 0, 0));
    lot.park(Vehicle::new("CAR-A", VehicleClass::Car))
        .expect("car parks");
    log.drain();

    let error = lot
        .park(Vehicle::new("CAR-A", VehicleClass::Car))
        .expect_err("duplicate session rejected");
    assert!(matches!(
        error,
        ParkingError::AlreadyParked { ref spot, .. } if spot.as_str() == "L1-C1"
    ));
    assert_eq!(lot.parked_count(), 1);
    let narration: Vec<String> = log.drain().iter().map(ToString::to_string).collect();
    assert_eq!(
        narration,
        vec!["vehicle CAR-A is already parked at spot L1-C1".to_string()]
    );

    lot.remove(&VehicleId::from("CAR-A")).expect("car departs");
    lot.park(Vehicle::new("CAR-A", VehicleClass::Car))
        .expect("car parks again after leaving");
}

#[test]
fn removing_unknown_vehicle_changes_nothing() {
    let (mut lot, _, log) = lot_with(&["L1", "L2"], SpotCounts::new(1, 1, 1, 1));
    lot.park(Vehicle::new("BIKE-1", VehicleClass::Bike))
        .expect("bike parks");
    let before = lot.occupancy();
    log.drain();

    let error = lot
        .remove(&VehicleId::from("GHOST"))
        .expect_err("unknown vehicle");
    assert_eq!(error, ParkingError::VehicleNotFound(VehicleId::from("GHOST")));
    assert_eq!(lot.occupancy(), before);
    assert_eq!(
        log.events(),
        vec![ParkingEvent::NotFound {
            vehicle: VehicleId::from("GHOST")
        }]
    );
}

#[test]
fn each_class_lands_on_its_spot_type() {
    let (mut lot, _, _) = lot_with(&["L1"], SpotCounts::new(1, 1, 1, 1));
    let cases = [
        ("H-1", VehicleClass::Handicap, "L1-H1"),
        ("B-1", VehicleClass::Bike, "L1-M1"),
        ("C-1", VehicleClass::Car, "L1-C1"),
        ("X-1", VehicleClass::Bus, "L1-L1"),
    ];

    for (plate, class, expected_spot) in cases {
        let receipt = lot.park(Vehicle::new(plate, class)).expect("vehicle parks");
        assert_eq!(receipt.spot.as_str(), expected_spot, "{plate} misplaced");
    }

    let report = lot.occupancy();
    assert_eq!(report.free(), 0);
    assert_eq!(report.parked_vehicles, 4);
}

#[test]
fn narration_follows_session_lifecycle() {
    let (mut lot, clock, log) = lot_with(&["L1"], SpotCounts::new(0, 1, 0, 0));
    lot.park(Vehicle::new("CAR-A", VehicleClass::Car))
        .expect("car parks");
    let _ = lot.park(Vehicle::new("CAR-B", VehicleClass::Car));
    clock
        .advance(Duration::minutes(30))
        .expect("clock advances");
    lot.remove(&VehicleId::from("CAR-A")).expect("car departs");

    let lines: Vec<String> = log.events().iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "vehicle CAR-A parked at spot L1-C1".to_string(),
            "parking full for CAR-B".to_string(),
            "vehicle CAR-A departed from spot L1-C1, fee=2.50".to_string(),
        ]
    );
}

#[test]
fn locate_reports_level_and_spot() {
    let (mut lot, _, _) = lot_with(&["G", "P1"], SpotCounts::new(0, 0, 1, 0));
    lot.park(Vehicle::new("BUS-1", VehicleClass::Bus))
        .expect("first bus parks");
    lot.park(Vehicle::new("BUS-2", VehicleClass::Bus))
        .expect("second bus parks");

    let (level, spot) = lot
        .locate(&VehicleId::from("BUS-2"))
        .expect("bus is parked");
    assert_eq!(level.id(), "P1");
    assert_eq!(spot.id().as_str(), "P1-L1");
    assert!(lot.locate(&VehicleId::from("BUS-3")).is_none());
}

#[test]
fn layout_fixture_builds_heterogeneous_levels() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/garage_layout.csv");
    let layout = LotLayout::from_path(path).expect("fixture loads");
    let mut lot = Lot::new(&layout);

    let report = lot.occupancy();
    assert_eq!(report.total(), 80);
    assert_eq!(report.free_of(SpotType::Large), 6);
    assert_eq!(report.level("P1").expect("P1 present").total(), 32);

    // P1 has no large spots, so the third bus skips it.
    for plate in ["BUS-1", "BUS-2", "BUS-3"] {
        lot.park(Vehicle::new(plate, VehicleClass::Bus))
            .expect("bus parks");
    }
    let (level, _) = lot
        .locate(&VehicleId::from("BUS-3"))
        .expect("third bus parked");
    assert_eq!(level.id(), "P2");
}
