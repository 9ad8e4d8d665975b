use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::{DriverName, Model};

// Fixed size of each cohort in the report
const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, Serialize)]
pub struct DriverStats {
    #[serde(rename = "Driver ID")]
    pub driver: DriverName,
    #[serde(rename = "Trip Count")]
    pub trips: usize,
    #[serde(rename = "Duty Hours")]
    pub duty_hrs: f64,
}

/// The busiest and quietest drivers by trip count. With 10 or fewer drivers
/// the two cohorts contain everybody, overlapping.
#[derive(Debug, Serialize)]
pub struct DriverLeaderboard {
    pub top: Vec<DriverStats>,
    pub bottom: Vec<DriverStats>,
}

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    #[serde(rename = "Cohort")]
    cohort: &'static str,
    #[serde(rename = "Driver ID")]
    driver: &'a DriverName,
    #[serde(rename = "Trip Count")]
    trips: usize,
    #[serde(rename = "Duty Hours")]
    duty_hrs: f64,
}

impl DriverLeaderboard {
    pub const CSV_FILENAME: &'static str = "driver_trip_counts.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        fn row<'a>(cohort: &'static str, stats: &'a DriverStats) -> LeaderboardRow<'a> {
            LeaderboardRow {
                cohort,
                driver: &stats.driver,
                trips: stats.trips,
                duty_hrs: stats.duty_hrs,
            }
        }
        let rows = self
            .top
            .iter()
            .map(|stats| row("Top", stats))
            .chain(self.bottom.iter().map(|stats| row("Bottom", stats)));
        super::rows_to_csv(rows)
    }
}

impl Model {
    /// Trip count and total duty hours per driver. Ties sort stably, so
    /// equal counts stay in driver order; missing durations are skipped in
    /// the duty sum, and negative ones count as-is.
    pub fn driver_leaderboard(&self) -> DriverLeaderboard {
        let mut per_driver: BTreeMap<&DriverName, (usize, f64)> = BTreeMap::new();
        for trip in &self.trips {
            let driver = match &trip.driver {
                Some(x) => x,
                None => continue,
            };
            let entry = per_driver.entry(driver).or_insert((0, 0.0));
            entry.0 += 1;
            if let Some(hrs) = trip.duration_hrs {
                entry.1 += hrs;
            }
        }

        let stats: Vec<DriverStats> = per_driver
            .into_iter()
            .map(|(driver, (trips, duty_hrs))| DriverStats {
                driver: driver.clone(),
                trips,
                duty_hrs,
            })
            .collect();

        let mut top = stats.clone();
        top.sort_by(|a, b| b.trips.cmp(&a.trips));
        top.truncate(LEADERBOARD_SIZE);

        let mut bottom = stats;
        bottom.sort_by_key(|x| x.trips);
        bottom.truncate(LEADERBOARD_SIZE);

        DriverLeaderboard { top, bottom }
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{model, trip};

    #[test]
    fn few_drivers_appear_in_both_cohorts() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-01", "08:00", "09:00", 10.0),
            trip("T2", "V1", "D2", "2024-01-01", "09:00", "10:00", 10.0),
            trip("T3", "V1", "D2", "2024-01-01", "10:00", "11:00", 10.0),
        ]);
        let board = model.driver_leaderboard();
        assert_eq!(board.top.len(), 2);
        assert_eq!(board.bottom.len(), 2);
        assert_eq!(board.top[0].driver.to_string(), "D2");
        assert_eq!(board.bottom[0].driver.to_string(), "D1");
    }

    #[test]
    fn ties_keep_driver_order() {
        let model = model(vec![
            trip("T1", "V1", "D3", "2024-01-01", "08:00", "09:00", 10.0),
            trip("T2", "V1", "D1", "2024-01-01", "09:00", "10:00", 10.0),
            trip("T3", "V1", "D2", "2024-01-01", "10:00", "11:00", 10.0),
        ]);
        let board = model.driver_leaderboard();
        let order: Vec<String> = board.top.iter().map(|x| x.driver.to_string()).collect();
        assert_eq!(order, vec!["D1", "D2", "D3"]);
    }

    #[test]
    fn duty_hours_sum_durations_even_negative_ones() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-01", "08:00", "10:00", 10.0),
            trip("T2", "V1", "D1", "2024-01-01", "12:00", "11:00", 10.0),
        ]);
        let board = model.driver_leaderboard();
        assert_eq!(board.top[0].trips, 2);
        assert_eq!(board.top[0].duty_hrs, 1.0);
    }

    #[test]
    fn leaderboards_cap_at_ten() {
        let mut trips = Vec::new();
        for idx in 0..12 {
            // Driver Dxx makes idx+1 trips
            for n in 0..=idx {
                trips.push(trip(
                    &format!("T{idx}-{n}"),
                    "V1",
                    &format!("D{idx:02}"),
                    "2024-01-01",
                    "08:00",
                    "09:00",
                    10.0,
                ));
            }
        }
        let board = model(trips).driver_leaderboard();
        assert_eq!(board.top.len(), 10);
        assert_eq!(board.bottom.len(), 10);
        assert_eq!(board.top[0].trips, 12);
        assert_eq!(board.bottom[0].trips, 1);
    }
}
