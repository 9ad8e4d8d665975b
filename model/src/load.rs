use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sheets::{Sheet, Value, Workbook};

use crate::{DriverName, Model, Thresholds, Trip, TripName, Vehicle, VehicleName};

pub fn from_workbook(workbook: &Workbook, thresholds: Thresholds) -> Result<Model> {
    let trips_sheet = match workbook.sheet("Trips") {
        Some(x) => x,
        None => bail!("the workbook has no Trips sheet; every analysis needs one"),
    };
    let trips = load_trips(trips_sheet, &thresholds);

    let vehicles = match workbook.sheet("Vehicles") {
        Some(sheet) => Some(load_vehicles(sheet)),
        None => {
            warn!("No Vehicles sheet; the allocation analysis won't be available");
            None
        }
    };

    info!(
        "Loaded {} trips and {} vehicles",
        trips.len(),
        vehicles.as_ref().map(|x| x.len()).unwrap_or(0)
    );
    Ok(Model {
        trips,
        vehicles,
        thresholds,
    })
}

fn load_trips(sheet: &Sheet, thresholds: &Thresholds) -> Vec<Trip> {
    let mut trips = Vec::new();
    let mut unnamed = 0;
    let mut coerced = 0;
    for idx in 0..sheet.rows.len() {
        let name = match text_cell(sheet, idx, "Trip ID") {
            Some(x) => TripName(x),
            None => {
                unnamed += 1;
                continue;
            }
        };

        let date = date_cell(sheet, idx, "Trip Date");
        let start_time = time_cell(sheet, idx, "Start Time");
        let end_time = time_cell(sheet, idx, "End Time");
        for (parsed, column) in [
            (date.is_some(), "Trip Date"),
            (start_time.is_some(), "Start Time"),
            (end_time.is_some(), "End Time"),
        ] {
            if !parsed && has_content(sheet, idx, column) {
                coerced += 1;
            }
        }

        let mut trip = Trip {
            name,
            vehicle: text_cell(sheet, idx, "Vehicle ID").map(VehicleName),
            driver: text_cell(sheet, idx, "Driver ID").map(DriverName),
            date,
            start_time,
            end_time,
            distance_km: number_cell(sheet, idx, "Distance"),
            departure: None,
            duration_hrs: None,
        };
        trip.derive(thresholds.clamp_negative_durations);
        trips.push(trip);
    }

    if unnamed > 0 {
        warn!("Skipped {unnamed} trip rows without a Trip ID");
    }
    if coerced > 0 {
        warn!("{coerced} unparsable date/time cells in Trips coerced to missing");
    }
    trips
}

fn load_vehicles(sheet: &Sheet) -> Vec<Vehicle> {
    let mut vehicles = Vec::new();
    let mut unnamed = 0;
    for idx in 0..sheet.rows.len() {
        let name = match text_cell(sheet, idx, "Vehicle ID") {
            Some(x) => VehicleName(x),
            None => {
                unnamed += 1;
                continue;
            }
        };
        vehicles.push(Vehicle {
            name,
            status: text_cell(sheet, idx, "Status").unwrap_or_default(),
        });
    }
    if unnamed > 0 {
        warn!("Skipped {unnamed} vehicle rows without a Vehicle ID");
    }
    vehicles
}

// IDs are sometimes typed as numbers in the workbook; render those without a
// trailing ".0".
fn text_cell(sheet: &Sheet, row: usize, column: &str) -> Option<String> {
    match sheet.cell(row, column)? {
        Value::Text(x) => {
            let trimmed = x.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(x) => {
            if x.fract() == 0.0 {
                Some(format!("{}", *x as i64))
            } else {
                Some(x.to_string())
            }
        }
        _ => None,
    }
}

fn number_cell(sheet: &Sheet, row: usize, column: &str) -> Option<f64> {
    match sheet.cell(row, column)? {
        Value::Number(x) => Some(*x),
        Value::Text(x) => x.trim().parse().ok(),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

fn date_cell(sheet: &Sheet, row: usize, column: &str) -> Option<NaiveDate> {
    match sheet.cell(row, column)? {
        Value::DateTime(x) => Some(x.date()),
        Value::Text(x) => parse_date_text(x.trim()),
        _ => None,
    }
}

fn time_cell(sheet: &Sheet, row: usize, column: &str) -> Option<NaiveTime> {
    match sheet.cell(row, column)? {
        Value::DateTime(x) => Some(x.time()),
        Value::Text(x) => parse_time_text(x.trim()),
        _ => None,
    }
}

fn parse_date_text(x: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(x, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(x, format) {
            return Some(dt.date());
        }
    }
    None
}

fn parse_time_text(x: &str) -> Option<NaiveTime> {
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(x, format) {
            return Some(time);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(x, format) {
            return Some(dt.time());
        }
    }
    None
}

fn has_content(sheet: &Sheet, row: usize, column: &str) -> bool {
    !matches!(sheet.cell(row, column), None | Some(Value::Empty))
}

#[cfg(test)]
mod tests {
    use sheets::{Sheet, Value};

    use super::*;

    fn trips_sheet(rows: Vec<Vec<Value>>) -> Sheet {
        Sheet {
            headers: vec![
                "Trip ID".to_string(),
                "Vehicle ID".to_string(),
                "Driver ID".to_string(),
                "Trip Date".to_string(),
                "Start Time".to_string(),
                "End Time".to_string(),
                "Distance".to_string(),
            ],
            rows,
        }
    }

    fn text(x: &str) -> Value {
        Value::Text(x.to_string())
    }

    #[test]
    fn text_rows_parse_leniently() {
        let sheet = trips_sheet(vec![
            vec![
                text("T1"),
                text("V1"),
                Value::Number(7.0),
                text("2024-01-05"),
                text("08:30"),
                text("10:00:30"),
                Value::Number(42.5),
            ],
            vec![
                text("T2"),
                text("V1"),
                text("D2"),
                text("not a date"),
                Value::Empty,
                text("25:99"),
                text("oops"),
            ],
        ]);
        let trips = load_trips(&sheet, &Thresholds::default());
        assert_eq!(trips.len(), 2);

        assert_eq!(trips[0].driver.as_ref().unwrap().to_string(), "7");
        assert_eq!(trips[0].duration_hrs, Some(5430.0 / 3600.0));
        assert_eq!(
            trips[0].departure.unwrap().to_string(),
            "2024-01-05 08:30:00"
        );
        assert_eq!(trips[0].distance_km, Some(42.5));

        // Garbage coerces to missing, never errors
        assert_eq!(trips[1].date, None);
        assert_eq!(trips[1].end_time, None);
        assert_eq!(trips[1].departure, None);
        assert_eq!(trips[1].duration_hrs, None);
        assert_eq!(trips[1].distance_km, None);
    }

    #[test]
    fn rows_without_a_trip_id_are_skipped() {
        let sheet = trips_sheet(vec![vec![
            Value::Empty,
            text("V1"),
            text("D1"),
            text("2024-01-05"),
            text("08:00"),
            text("09:00"),
            Value::Number(10.0),
        ]]);
        assert!(load_trips(&sheet, &Thresholds::default()).is_empty());
    }
}
