use parkade::facility::{DepartureReceipt, EventSink, OccupancyReport, ParkingEvent, TracingSink};

/// Prints each event as a narration line on stdout, in addition to logging it.
pub(crate) struct ConsoleNarrator {
    echo: bool,
}

impl ConsoleNarrator {
    pub(crate) fn new(echo: bool) -> Self {
        Self { echo }
    }

    /// Line printed for `event`, or `None` when echo is off.
    fn line(&self, event: &ParkingEvent) -> Option<String> {
        self.echo.then(|| event.to_string())
    }
}

impl EventSink for ConsoleNarrator {
    fn emit(&self, event: &ParkingEvent) {
        TracingSink.emit(event);
        if let Some(line) = self.line(event) {
            println!("{line}");
        }
    }
}

pub(crate) fn render_departure(receipt: &DepartureReceipt) {
    println!("{}", departure_line(receipt));
}

fn departure_line(receipt: &DepartureReceipt) -> String {
    let minutes = (receipt.departed_at - receipt.ticket.issued_at).num_minutes();
    format!(
        "- {} ({}) ticket {} | {} on level {} | {} min | fee {:.2}",
        receipt.vehicle,
        receipt.class.label(),
        receipt.ticket.number,
        receipt.spot,
        receipt.level,
        minutes,
        receipt.fee
    )
}

pub(crate) fn render_occupancy(report: &OccupancyReport) {
    println!(
        "Occupancy: {} parked, {}/{} spots free",
        report.parked_vehicles,
        report.free(),
        report.total()
    );
    for level in &report.levels {
        println!(
            "- Level {}: {}/{} free",
            level.level,
            level.free(),
            level.total()
        );
        for entry in level.by_type.iter().filter(|entry| entry.total > 0) {
            println!(
                "  - {}: {} free, {} occupied",
                entry.spot_type_label, entry.free, entry.occupied
            );
        }
    }
}
