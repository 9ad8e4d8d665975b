use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::{Model, VehicleName};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UsageMetric {
    TripCount,
    Distance,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecentUsage {
    #[serde(rename = "Vehicle ID")]
    pub vehicle: VehicleName,
    #[serde(rename = "Trips (7 days)")]
    pub trips: usize,
    #[serde(rename = "Distance (7 days)")]
    pub distance_km: f64,
}

/// Vehicles below the chosen activity cutoff in the trailing window.
#[derive(Debug, Serialize)]
pub struct RecentUnderuse {
    pub cutoff: NaiveDate,
    pub metric: UsageMetric,
    pub threshold: f64,
    pub rows: Vec<RecentUsage>,
}

impl RecentUnderuse {
    pub const CSV_FILENAME: &'static str = "underutilized_7days.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        super::rows_to_csv(self.rows.iter())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UtilizationClass {
    #[serde(rename = "Too New")]
    TooNew,
    Underutilized,
    Utilized,
}

impl fmt::Display for UtilizationClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UtilizationClass::TooNew => write!(f, "Too New"),
            UtilizationClass::Underutilized => write!(f, "Underutilized"),
            UtilizationClass::Utilized => write!(f, "Utilized"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VehicleActivity {
    #[serde(rename = "Vehicle ID")]
    pub vehicle: VehicleName,
    #[serde(rename = "Total Trips")]
    pub total_trips: usize,
    #[serde(rename = "Total Distance (km)")]
    pub total_distance_km: f64,
    #[serde(rename = "First Trip Date")]
    pub first_trip: NaiveDate,
    #[serde(rename = "Last Trip Date")]
    pub last_trip: NaiveDate,
    #[serde(rename = "Days Active")]
    pub days_active: i64,
    #[serde(rename = "Avg Trips/Week")]
    pub avg_trips_per_week: f64,
    #[serde(rename = "Status")]
    pub class: UtilizationClass,
}

/// Counts of total trips per vehicle in equal-width buckets, with the fleet
/// mean as a marker value. The data side of a histogram chart.
#[derive(Clone, Debug, Serialize)]
pub struct TripCountHistogram {
    pub min: f64,
    pub bucket_width: f64,
    pub counts: Vec<usize>,
    pub mean: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LongTermUtilization {
    /// Mean of avg trips/week over vehicles active at least the maturity
    /// window. None when every vehicle is too new, which callers should
    /// report as insufficient data.
    pub fleet_avg_trips_per_week: Option<f64>,
    pub vehicles: Vec<VehicleActivity>,
    pub histogram: TripCountHistogram,
}

impl LongTermUtilization {
    pub const CSV_FILENAME: &'static str = "underutilized_longterm.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        super::rows_to_csv(self.vehicles.iter())
    }
}

impl Model {
    /// Per-vehicle activity in the window ending at `today`, keeping only
    /// vehicles strictly below the threshold on the chosen metric. The window
    /// boundary is inclusive: a trip dated exactly `recent_window_days` ago
    /// counts. Trips without a date or vehicle are excluded.
    pub fn recent_underuse(
        &self,
        today: NaiveDate,
        metric: UsageMetric,
        threshold: f64,
    ) -> RecentUnderuse {
        let cutoff = today - Duration::days(self.thresholds.recent_window_days);

        let mut per_vehicle: BTreeMap<&VehicleName, (usize, f64)> = BTreeMap::new();
        for trip in &self.trips {
            let vehicle = match &trip.vehicle {
                Some(x) => x,
                None => continue,
            };
            let date = match trip.date {
                Some(x) => x,
                None => continue,
            };
            if date < cutoff {
                continue;
            }
            let entry = per_vehicle.entry(vehicle).or_insert((0, 0.0));
            entry.0 += 1;
            if let Some(km) = trip.distance_km {
                entry.1 += km;
            }
        }

        let rows: Vec<RecentUsage> = per_vehicle
            .into_iter()
            .map(|(vehicle, (trips, distance_km))| RecentUsage {
                vehicle: vehicle.clone(),
                trips,
                distance_km,
            })
            .filter(|row| match metric {
                UsageMetric::TripCount => (row.trips as f64) < threshold,
                UsageMetric::Distance => row.distance_km < threshold,
            })
            .collect();
        info!(
            "{} vehicles under the {:?} threshold of {} since {}",
            rows.len(),
            metric,
            threshold,
            cutoff
        );
        RecentUnderuse {
            cutoff,
            metric,
            threshold,
            rows,
        }
    }

    /// Classifies every vehicle's whole history against the fleet average of
    /// average trips per week. Vehicles active under the maturity window are
    /// "Too New" and sit out of the fleet average. Trips without a date or
    /// vehicle are excluded, so a vehicle with only undated trips does not
    /// appear.
    pub fn long_term_utilization(&self) -> LongTermUtilization {
        struct Acc {
            trips: usize,
            distance_km: f64,
            first: NaiveDate,
            last: NaiveDate,
        }

        let mut per_vehicle: BTreeMap<&VehicleName, Acc> = BTreeMap::new();
        for trip in &self.trips {
            let (vehicle, date) = match (&trip.vehicle, trip.date) {
                (Some(v), Some(d)) => (v, d),
                _ => continue,
            };
            let acc = per_vehicle.entry(vehicle).or_insert(Acc {
                trips: 0,
                distance_km: 0.0,
                first: date,
                last: date,
            });
            acc.trips += 1;
            if let Some(km) = trip.distance_km {
                acc.distance_km += km;
            }
            acc.first = acc.first.min(date);
            acc.last = acc.last.max(date);
        }

        let mut vehicles: Vec<VehicleActivity> = per_vehicle
            .into_iter()
            .map(|(vehicle, acc)| {
                let days_active = (acc.last - acc.first).num_days() + 1;
                VehicleActivity {
                    vehicle: vehicle.clone(),
                    total_trips: acc.trips,
                    total_distance_km: acc.distance_km,
                    first_trip: acc.first,
                    last_trip: acc.last,
                    days_active,
                    avg_trips_per_week: acc.trips as f64 / (days_active as f64 / 7.0),
                    class: UtilizationClass::TooNew,
                }
            })
            .collect();

        let mature: Vec<f64> = vehicles
            .iter()
            .filter(|v| v.days_active >= self.thresholds.maturity_days)
            .map(|v| v.avg_trips_per_week)
            .collect();
        let fleet_avg_trips_per_week = if mature.is_empty() {
            None
        } else {
            Some(mature.iter().sum::<f64>() / mature.len() as f64)
        };

        for vehicle in &mut vehicles {
            if vehicle.days_active >= self.thresholds.maturity_days {
                // fleet_avg is Some here; this vehicle contributed to it
                vehicle.class = if vehicle.avg_trips_per_week < fleet_avg_trips_per_week.unwrap() {
                    UtilizationClass::Underutilized
                } else {
                    UtilizationClass::Utilized
                };
            }
        }

        match fleet_avg_trips_per_week {
            Some(avg) => info!(
                "Fleet average {:.2} trips/week across {} mature vehicles",
                avg,
                mature.len()
            ),
            None => warn!("No vehicle has been active long enough to compute a fleet average"),
        }

        let histogram = histogram(
            &vehicles
                .iter()
                .map(|v| v.total_trips as f64)
                .collect::<Vec<_>>(),
            20,
        );
        LongTermUtilization {
            fleet_avg_trips_per_week,
            vehicles,
            histogram,
        }
    }
}

fn histogram(values: &[f64], buckets: usize) -> TripCountHistogram {
    if values.is_empty() {
        return TripCountHistogram {
            min: 0.0,
            bucket_width: 1.0,
            counts: Vec::new(),
            mean: None,
        };
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = Some(values.iter().sum::<f64>() / values.len() as f64);

    if max == min {
        return TripCountHistogram {
            min,
            bucket_width: 1.0,
            counts: vec![values.len()],
            mean,
        };
    }

    let bucket_width = (max - min) / buckets as f64;
    let mut counts = vec![0; buckets];
    for value in values {
        let idx = (((value - min) / bucket_width) as usize).min(buckets - 1);
        counts[idx] += 1;
    }
    TripCountHistogram {
        min,
        bucket_width,
        counts,
        mean,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::testutil::{model, trip};

    fn date(x: &str) -> NaiveDate {
        NaiveDate::parse_from_str(x, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-01", "08:00", "10:00", 50.0),
            trip("T2", "V1", "D1", "2024-01-08", "08:00", "09:00", 60.0),
        ]);
        let result = model.recent_underuse(date("2024-01-15"), UsageMetric::TripCount, 3.0);
        assert_eq!(result.cutoff, date("2024-01-08"));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].trips, 1);
        assert_eq!(result.rows[0].distance_km, 60.0);
    }

    #[test]
    fn threshold_is_strictly_less_than() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-14", "08:00", "09:00", 10.0),
            trip("T2", "V1", "D1", "2024-01-14", "10:00", "11:00", 10.0),
            trip("T3", "V1", "D1", "2024-01-14", "12:00", "13:00", 10.0),
            trip("T4", "V2", "D1", "2024-01-14", "08:00", "09:00", 10.0),
        ]);
        let result = model.recent_underuse(date("2024-01-15"), UsageMetric::TripCount, 3.0);
        // V1 has exactly 3 trips, so only V2 is under the threshold
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].vehicle.to_string(), "V2");
    }

    #[test]
    fn distance_metric_uses_summed_km() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-14", "08:00", "09:00", 70.0),
            trip("T2", "V1", "D1", "2024-01-14", "10:00", "11:00", 50.0),
            trip("T3", "V2", "D1", "2024-01-14", "08:00", "09:00", 30.0),
        ]);
        let result = model.recent_underuse(date("2024-01-15"), UsageMetric::Distance, 100.0);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].vehicle.to_string(), "V2");
        assert_eq!(result.rows[0].distance_km, 30.0);
    }

    #[test]
    fn maturity_window_gates_classification() {
        let mut trips = Vec::new();
        // V1 spans 27 days with heavy usage: still too new
        for idx in 0..30 {
            trips.push(trip(
                &format!("A{idx}"),
                "V1",
                "D1",
                &format!("2024-01-{:02}", 1 + (idx % 27)),
                "08:00",
                "09:00",
                10.0,
            ));
        }
        // V2 and V3 span 28 days; V3 does half the trips V2 does
        for (idx, day) in [1, 5, 9, 13, 17, 21, 25, 28].into_iter().enumerate() {
            trips.push(trip(
                &format!("B{idx}"),
                "V2",
                "D1",
                &format!("2024-01-{day:02}"),
                "08:00",
                "09:00",
                10.0,
            ));
        }
        for idx in 0..4 {
            trips.push(trip(
                &format!("C{idx}"),
                "V3",
                "D1",
                &format!("2024-01-{:02}", 1 + idx * 9),
                "08:00",
                "09:00",
                10.0,
            ));
        }
        let model = model(trips);
        let result = model.long_term_utilization();

        let by_name: std::collections::BTreeMap<String, &VehicleActivity> = result
            .vehicles
            .iter()
            .map(|v| (v.vehicle.to_string(), v))
            .collect();
        assert_eq!(by_name["V1"].days_active, 27);
        assert_eq!(by_name["V1"].class, UtilizationClass::TooNew);
        assert_eq!(by_name["V2"].days_active, 28);
        assert_eq!(by_name["V2"].class, UtilizationClass::Utilized);
        assert_eq!(by_name["V3"].days_active, 28);
        assert_eq!(by_name["V3"].class, UtilizationClass::Underutilized);
        assert!(result.fleet_avg_trips_per_week.is_some());
    }

    #[test]
    fn all_too_new_reports_no_fleet_average() {
        let model = model(vec![
            trip("T1", "V1", "D1", "2024-01-01", "08:00", "09:00", 10.0),
            trip("T2", "V2", "D1", "2024-01-05", "08:00", "09:00", 10.0),
        ]);
        let result = model.long_term_utilization();
        assert_eq!(result.fleet_avg_trips_per_week, None);
        assert!(result
            .vehicles
            .iter()
            .all(|v| v.class == UtilizationClass::TooNew));
    }

    #[test]
    fn single_day_vehicle_counts_one_day_active() {
        let model = model(vec![trip(
            "T1",
            "V1",
            "D1",
            "2024-01-01",
            "08:00",
            "09:00",
            10.0,
        )]);
        let result = model.long_term_utilization();
        assert_eq!(result.vehicles[0].days_active, 1);
        assert_eq!(result.vehicles[0].avg_trips_per_week, 7.0);
    }

    #[test]
    fn histogram_covers_all_vehicles() {
        let values = vec![1.0, 2.0, 3.0, 20.0];
        let result = super::histogram(&values, 20);
        assert_eq!(result.counts.iter().sum::<usize>(), 4);
        assert_eq!(result.mean, Some(6.5));
        // The max lands in the last bucket instead of falling off the end
        assert_eq!(*result.counts.last().unwrap(), 1);
    }

    #[test]
    fn csv_export_uses_the_report_columns() {
        let model = model(vec![trip(
            "T1",
            "V1",
            "D1",
            "2024-01-01",
            "08:00",
            "09:00",
            10.0,
        )]);
        let csv = model.long_term_utilization().export_to_csv().unwrap();
        assert!(csv.starts_with("Vehicle ID,Total Trips,Total Distance (km)"));
        assert!(csv.contains("Too New"));
    }
}
