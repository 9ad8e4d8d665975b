use anyhow::Result;
use chrono::{Datelike, Timelike};
use serde::Serialize;

use crate::Model;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Two frequency distributions over trip departures: by hour of day and by
/// day of week. Weekdays are always Monday through Sunday, whatever order
/// the data arrived in.
#[derive(Debug, Serialize)]
pub struct PeakUsage {
    /// Trip counts indexed by hour, 0-23, zeros included.
    pub by_hour: Vec<usize>,
    /// Trip counts indexed Monday = 0 through Sunday = 6.
    pub by_weekday: Vec<usize>,
}

#[derive(Serialize)]
struct PeakRow {
    #[serde(rename = "Period Type")]
    kind: &'static str,
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Trip Count")]
    trips: usize,
}

impl PeakUsage {
    pub const CSV_FILENAME: &'static str = "peak_usage.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        let hours = self.by_hour.iter().enumerate().map(|(hour, trips)| PeakRow {
            kind: "Hour",
            period: hour.to_string(),
            trips: *trips,
        });
        let days = self
            .by_weekday
            .iter()
            .enumerate()
            .map(|(idx, trips)| PeakRow {
                kind: "Day of Week",
                period: WEEKDAYS[idx].to_string(),
                trips: *trips,
            });
        super::rows_to_csv(hours.chain(days))
    }
}

impl Model {
    /// Trips without a departure are excluded from both distributions.
    pub fn peak_usage(&self) -> PeakUsage {
        let mut by_hour = vec![0; 24];
        let mut by_weekday = vec![0; 7];
        for trip in &self.trips {
            let departure = match trip.departure {
                Some(x) => x,
                None => continue,
            };
            by_hour[departure.hour() as usize] += 1;
            by_weekday[departure.weekday().num_days_from_monday() as usize] += 1;
        }
        PeakUsage {
            by_hour,
            by_weekday,
        }
    }
}
