use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::{pct_of, Model, VehicleName};

#[derive(Clone, Debug, Serialize)]
pub struct VehicleTripCount {
    #[serde(rename = "Vehicle ID")]
    pub vehicle: VehicleName,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Trip Count")]
    pub trips: usize,
}

#[derive(Debug, Serialize)]
pub struct AllocationReport {
    pub allocated: usize,
    pub available: usize,
    /// allocated / available as a percentage, with 0 available treated as 1.
    pub ratio_pct: f64,
    /// Every vehicle in sheet order with its lifetime trip count; vehicles
    /// never seen in Trips get 0.
    pub rows: Vec<VehicleTripCount>,
}

impl AllocationReport {
    pub const CSV_FILENAME: &'static str = "allocation.csv";

    pub fn export_to_csv(&self) -> Result<String> {
        super::rows_to_csv(self.rows.iter())
    }
}

impl Model {
    /// Splits the fleet into allocated and available vehicles by status.
    /// Statuses match case-insensitively; anything else counts in neither
    /// bucket but still appears in the rows.
    pub fn allocation(&self) -> Result<AllocationReport> {
        let vehicles = match &self.vehicles {
            Some(x) => x,
            None => bail!("the workbook has no Vehicles sheet, required for the allocation analysis"),
        };

        let mut trips_per_vehicle: BTreeMap<&VehicleName, usize> = BTreeMap::new();
        for trip in &self.trips {
            if let Some(vehicle) = &trip.vehicle {
                *trips_per_vehicle.entry(vehicle).or_insert(0) += 1;
            }
        }

        let mut allocated = 0;
        let mut available = 0;
        let mut rows = Vec::new();
        for vehicle in vehicles {
            match vehicle.status.to_lowercase().as_str() {
                "allocated" => allocated += 1,
                "available" => available += 1,
                _ => {}
            }
            rows.push(VehicleTripCount {
                vehicle: vehicle.name.clone(),
                status: vehicle.status.clone(),
                trips: trips_per_vehicle
                    .get(&vehicle.name)
                    .copied()
                    .unwrap_or(0),
            });
        }

        let ratio_pct = pct_of(allocated as f64, available as f64);
        info!("{allocated} allocated, {available} available ({ratio_pct:.2}%)");
        Ok(AllocationReport {
            allocated,
            available,
            ratio_pct,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{model, trip, vehicle};

    #[test]
    fn statuses_match_case_insensitively() {
        let mut model = model(vec![trip(
            "T1",
            "V1",
            "D1",
            "2024-01-01",
            "08:00",
            "09:00",
            10.0,
        )]);
        model.vehicles = Some(vec![
            vehicle("V1", "Allocated"),
            vehicle("V2", "AVAILABLE"),
            vehicle("V3", "maintenance"),
        ]);
        let report = model.allocation().unwrap();
        assert_eq!(report.allocated, 1);
        assert_eq!(report.available, 1);
        // The odd status still shows up in the join
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].trips, 1);
        assert_eq!(report.rows[1].trips, 0);
    }

    #[test]
    fn zero_available_substitutes_one() {
        let mut model = model(Vec::new());
        model.vehicles = Some(vec![
            vehicle("V1", "allocated"),
            vehicle("V2", "allocated"),
            vehicle("V3", "allocated"),
        ]);
        let report = model.allocation().unwrap();
        assert_eq!(report.ratio_pct, 300.0);
    }

    #[test]
    fn missing_vehicles_sheet_is_an_explicit_error() {
        let model = model(Vec::new());
        assert!(model.allocation().is_err());
    }
}
