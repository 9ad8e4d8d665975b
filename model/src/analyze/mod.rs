mod allocation;
mod drivers;
mod idle;
mod peak;
mod speed;
mod utilization;

pub use allocation::{AllocationReport, VehicleTripCount};
pub use drivers::{DriverLeaderboard, DriverStats};
pub use idle::{IdleGap, IdleReport};
pub use peak::{PeakUsage, WEEKDAYS};
pub use speed::{SlowTrip, SlowTripReport};
pub use utilization::{
    LongTermUtilization, RecentUnderuse, RecentUsage, TripCountHistogram, UsageMetric,
    UtilizationClass, VehicleActivity,
};

use anyhow::Result;
use serde::Serialize;

// All the exports build the file in memory; the front end decides where it
// lands.
fn rows_to_csv<S: Serialize>(rows: impl Iterator<Item = S>) -> Result<String> {
    let mut out = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut out);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(out)?)
}
