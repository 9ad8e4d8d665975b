use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::{DriverName, TripName, VehicleName};

/// One row of the Trips sheet. Anything the workbook left blank or
/// unparsable is None; downstream analyses each state whether such rows are
/// excluded or skipped in sums.
#[derive(Clone, Debug, Serialize)]
pub struct Trip {
    pub name: TripName,
    pub vehicle: Option<VehicleName>,
    pub driver: Option<DriverName>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub distance_km: Option<f64>,

    /// The trip's calendar date combined with its start time-of-day.
    pub departure: Option<NaiveDateTime>,
    /// (end - start) in hours. Negative when the end time precedes the start
    /// time, unless clamping was requested at load.
    pub duration_hrs: Option<f64>,
}

impl Trip {
    /// Fills in the derived fields from the raw date/time parts.
    pub fn derive(&mut self, clamp_negative_durations: bool) {
        self.departure = match (self.date, self.start_time) {
            (Some(date), Some(time)) => Some(NaiveDateTime::new(date, time)),
            _ => None,
        };
        self.duration_hrs = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                let hrs = (end - start).num_seconds() as f64 / 3600.0;
                if clamp_negative_durations && hrs < 0.0 {
                    Some(0.0)
                } else {
                    Some(hrs)
                }
            }
            _ => None,
        };
    }
}
