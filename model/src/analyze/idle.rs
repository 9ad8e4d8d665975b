use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{Model, TripName, VehicleName};

#[derive(Clone, Debug, Serialize)]
pub struct IdleGap {
    #[serde(rename = "Vehicle ID")]
    pub vehicle: VehicleName,
    /// The trip that ended the idle period.
    #[serde(rename = "Trip ID")]
    pub trip: TripName,
    #[serde(rename = "Idle Time (hrs)")]
    pub idle_hrs: f64,
}

#[derive(Debug, Serialize)]
pub struct IdleReport {
    pub threshold_hrs: f64,
    pub rows: Vec<IdleGap>,
}

impl IdleReport {
    pub const CSV_FILENAME: &'static str = "high_idle.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        super::rows_to_csv(self.rows.iter())
    }
}

impl Model {
    /// Gaps between consecutive departures of the same vehicle longer than
    /// the idle threshold. A vehicle's first trip has no gap and is never
    /// reported; trips without a departure time don't participate.
    pub fn long_idle_gaps(&self) -> IdleReport {
        let mut per_vehicle: BTreeMap<&VehicleName, Vec<(NaiveDateTime, &TripName)>> =
            BTreeMap::new();
        for trip in &self.trips {
            let (vehicle, departure) = match (&trip.vehicle, trip.departure) {
                (Some(v), Some(d)) => (v, d),
                _ => continue,
            };
            per_vehicle
                .entry(vehicle)
                .or_insert_with(Vec::new)
                .push((departure, &trip.name));
        }

        let mut rows = Vec::new();
        for (vehicle, mut departures) in per_vehicle {
            departures.sort_by_key(|(time, _)| *time);
            for pair in departures.windows(2) {
                let idle_hrs = (pair[1].0 - pair[0].0).num_seconds() as f64 / 3600.0;
                if idle_hrs > self.thresholds.idle_gap_hrs {
                    rows.push(IdleGap {
                        vehicle: vehicle.clone(),
                        trip: pair[1].1.clone(),
                        idle_hrs,
                    });
                }
            }
        }
        info!(
            "{} gaps over {} hours",
            rows.len(),
            self.thresholds.idle_gap_hrs
        );
        IdleReport {
            threshold_hrs: self.thresholds.idle_gap_hrs,
            rows,
        }
    }
}
