use anyhow::Result;
use serde::Serialize;

use crate::{checked_div, Model, TripName, VehicleName};

#[derive(Clone, Debug, Serialize)]
pub struct SlowTrip {
    #[serde(rename = "Trip ID")]
    pub trip: TripName,
    #[serde(rename = "Vehicle ID")]
    pub vehicle: Option<VehicleName>,
    #[serde(rename = "Distance")]
    pub distance_km: f64,
    #[serde(rename = "Duration (hrs)")]
    pub duration_hrs: f64,
    #[serde(rename = "Expected Duration (hrs)")]
    pub expected_hrs: f64,
    #[serde(rename = "Speed (km/h)")]
    pub speed_kmh: f64,
}

/// Trips whose average speed falls under the anomaly threshold, meaning the
/// vehicle was probably delayed or stuck.
#[derive(Debug, Serialize)]
pub struct SlowTripReport {
    pub threshold_kmh: f64,
    pub rows: Vec<SlowTrip>,
}

impl SlowTripReport {
    pub const CSV_FILENAME: &'static str = "slow_trips.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        super::rows_to_csv(self.rows.iter())
    }
}

impl Model {
    /// Compares each trip's actual speed against the assumed fleet speed.
    /// Speed is undefined for zero or missing durations or missing distance;
    /// those trips never match. Negative durations produce negative speeds,
    /// which do.
    pub fn slow_trips(&self) -> SlowTripReport {
        let mut rows = Vec::new();
        for trip in &self.trips {
            let (distance_km, duration_hrs) = match (trip.distance_km, trip.duration_hrs) {
                (Some(km), Some(hrs)) => (km, hrs),
                _ => continue,
            };
            let speed_kmh = match checked_div(distance_km, duration_hrs) {
                Some(x) => x,
                None => continue,
            };
            if speed_kmh < self.thresholds.slow_speed_kmh {
                rows.push(SlowTrip {
                    trip: trip.name.clone(),
                    vehicle: trip.vehicle.clone(),
                    distance_km,
                    duration_hrs,
                    expected_hrs: distance_km / self.thresholds.assumed_speed_kmh,
                    speed_kmh,
                });
            }
        }
        info!(
            "{} trips under {} km/h",
            rows.len(),
            self.thresholds.slow_speed_kmh
        );
        SlowTripReport {
            threshold_kmh: self.thresholds.slow_speed_kmh,
            rows,
        }
    }
}
