use model::analyze::{
    AllocationReport, DriverLeaderboard, DriverStats, IdleReport, LongTermUtilization, PeakUsage,
    RecentUnderuse, SlowTripReport, TripCountHistogram, UsageMetric, WEEKDAYS,
};
use model::Thresholds;

// Bars longer than this stop growing; the count column stays exact
const MAX_BAR: usize = 60;

pub fn recent_underuse(report: &RecentUnderuse) {
    let filter = match report.metric {
        UsageMetric::TripCount => format!("< {} trips", report.threshold),
        UsageMetric::Distance => format!("< {} km", report.threshold),
    };
    println!(
        "Underutilized vehicles since {} ({filter}):",
        report.cutoff
    );
    if report.rows.is_empty() {
        println!("  (none)");
        return;
    }
    println!("  {:<16} {:>8} {:>14}", "Vehicle ID", "Trips", "Distance (km)");
    for row in &report.rows {
        println!(
            "  {:<16} {:>8} {:>14.1}",
            row.vehicle, row.trips, row.distance_km
        );
    }
}

pub fn long_term(report: &LongTermUtilization, thresholds: &Thresholds) {
    println!("Long-term utilization:");
    println!(
        "  {:<16} {:>12} {:>12} {:>15} {:<14}",
        "Vehicle ID", "Days Active", "Total Trips", "Avg Trips/Week", "Status"
    );
    for vehicle in &report.vehicles {
        println!(
            "  {:<16} {:>12} {:>12} {:>15.2} {:<14}",
            vehicle.vehicle,
            vehicle.days_active,
            vehicle.total_trips,
            vehicle.avg_trips_per_week,
            vehicle.class.to_string()
        );
    }
    match report.fleet_avg_trips_per_week {
        Some(avg) => println!(
            "Vehicles under the fleet average of {:.2} trips/week over at least {} days count \
             as underutilized.",
            avg, thresholds.maturity_days
        ),
        None => println!(
            "Insufficient data: no vehicle has {} days of history yet.",
            thresholds.maturity_days
        ),
    }
    println!();
    histogram(&report.histogram);
}

fn histogram(histogram: &TripCountHistogram) {
    if histogram.counts.is_empty() {
        return;
    }
    println!("Distribution of total trips per vehicle:");
    for (idx, count) in histogram.counts.iter().enumerate() {
        let lo = histogram.min + histogram.bucket_width * idx as f64;
        let hi = lo + histogram.bucket_width;
        println!(
            "  {:>7.1} - {:<7.1} {:>4} {}",
            lo,
            hi,
            count,
            "#".repeat((*count).min(MAX_BAR))
        );
    }
    if let Some(mean) = histogram.mean {
        println!("  Fleet mean: {mean:.2} total trips per vehicle");
    }
}

pub fn allocation(report: &AllocationReport) {
    println!("Allocated vehicles: {}", report.allocated);
    println!("Available vehicles: {}", report.available);
    println!("Allocated vs available ratio: {:.2}%", report.ratio_pct);
    println!();
    println!("  {:<16} {:<16} {:>10}", "Vehicle ID", "Status", "Trips");
    for row in &report.rows {
        println!("  {:<16} {:<16} {:>10}", row.vehicle, row.status, row.trips);
    }
}

pub fn idle(report: &IdleReport) {
    println!(
        "Idle gaps over {} hours between consecutive trips:",
        report.threshold_hrs
    );
    if report.rows.is_empty() {
        println!("  (none)");
        return;
    }
    println!("  {:<16} {:<16} {:>12}", "Vehicle ID", "Trip ID", "Idle (hrs)");
    for row in &report.rows {
        println!(
            "  {:<16} {:<16} {:>12.2}",
            row.vehicle, row.trip, row.idle_hrs
        );
    }
}

pub fn peak(usage: &PeakUsage) {
    println!("Trips by hour of day:");
    for (hour, count) in usage.by_hour.iter().enumerate() {
        println!(
            "  {hour:>2}:00 {count:>5} {}",
            "#".repeat((*count).min(MAX_BAR))
        );
    }
    println!();
    println!("Trips by day of week:");
    for (idx, count) in usage.by_weekday.iter().enumerate() {
        println!(
            "  {:<10} {count:>5} {}",
            WEEKDAYS[idx],
            "#".repeat((*count).min(MAX_BAR))
        );
    }
}

pub fn leaderboard(board: &DriverLeaderboard) {
    println!("Top {} drivers by trips:", board.top.len());
    driver_table(&board.top);
    println!();
    println!("Bottom {} drivers by trips:", board.bottom.len());
    driver_table(&board.bottom);
}

fn driver_table(rows: &[DriverStats]) {
    println!("  {:<16} {:>12} {:>12}", "Driver ID", "Trip Count", "Duty Hours");
    for row in rows {
        println!(
            "  {:<16} {:>12} {:>12.2}",
            row.driver, row.trips, row.duty_hrs
        );
    }
}

pub fn slow_trips(report: &SlowTripReport) {
    println!(
        "Trips slower than {} km/h (possibly delayed or stuck):",
        report.threshold_kmh
    );
    if report.rows.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "  {:<16} {:<16} {:>10} {:>12} {:>14} {:>12}",
        "Trip ID", "Vehicle ID", "Distance", "Duration (h)", "Expected (h)", "Speed (km/h)"
    );
    for row in &report.rows {
        let vehicle = row
            .vehicle
            .as_ref()
            .map(|x| x.to_string())
            .unwrap_or_default();
        println!(
            "  {:<16} {:<16} {:>10.1} {:>12.2} {:>14.2} {:>12.2}",
            row.trip, vehicle, row.distance_km, row.duration_hrs, row.expected_hrs, row.speed_kmh
        );
    }
}
