#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod analyze;
mod load;
mod ratio;
mod thresholds;
mod trips;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sheets::Workbook;

pub use ratio::{checked_div, pct_of};
pub use thresholds::Thresholds;
pub use trips::Trip;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripName(String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleName(String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverName(String);

impl fmt::Display for TripName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}
impl fmt::Display for VehicleName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}
impl fmt::Display for DriverName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

pub struct Model {
    pub trips: Vec<Trip>,
    /// None when the workbook had no Vehicles sheet. Only the allocation
    /// analysis needs one.
    pub vehicles: Option<Vec<Vehicle>>,
    pub thresholds: Thresholds,
}

#[derive(Clone, Debug, Serialize)]
pub struct Vehicle {
    pub name: VehicleName,
    /// Free-form; compared case-insensitively against "allocated" and
    /// "available".
    pub status: String,
}

impl Model {
    pub fn from_workbook(workbook: &Workbook, thresholds: Thresholds) -> Result<Self> {
        load::from_workbook(workbook, thresholds)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{NaiveDate, NaiveTime};

    use crate::{DriverName, Model, Thresholds, Trip, TripName, Vehicle, VehicleName};

    pub fn trip(
        name: &str,
        vehicle: &str,
        driver: &str,
        date: &str,
        start: &str,
        end: &str,
        distance_km: f64,
    ) -> Trip {
        let mut trip = Trip {
            name: TripName(name.to_string()),
            vehicle: Some(VehicleName(vehicle.to_string())),
            driver: Some(DriverName(driver.to_string())),
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            start_time: Some(NaiveTime::parse_from_str(start, "%H:%M").unwrap()),
            end_time: Some(NaiveTime::parse_from_str(end, "%H:%M").unwrap()),
            distance_km: Some(distance_km),
            departure: None,
            duration_hrs: None,
        };
        trip.derive(false);
        trip
    }

    pub fn vehicle(name: &str, status: &str) -> Vehicle {
        Vehicle {
            name: VehicleName(name.to_string()),
            status: status.to_string(),
        }
    }

    pub fn model(trips: Vec<Trip>) -> Model {
        Model {
            trips,
            vehicles: None,
            thresholds: Thresholds::default(),
        }
    }
}
