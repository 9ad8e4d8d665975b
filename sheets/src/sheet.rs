use calamine::{Data, DataType, Range};
use chrono::NaiveDateTime;

/// One cell. Calamine's integer and float cells both become `Number`;
/// date/time cells become `DateTime` when the workbook stored a convertible
/// value; formula errors and anything else unconvertible become `Empty`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// One sheet: the first row as headers, the rest as cell rows padded or
/// truncated to the header width.
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Sheet {
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|x| x == header)
    }

    /// None for unknown headers or out-of-range rows, not an error.
    pub fn cell(&self, row: usize, header: &str) -> Option<&Value> {
        let idx = self.column(header)?;
        self.rows.get(row)?.get(idx)
    }
}

pub fn from_range(range: &Range<Data>) -> Sheet {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first) => first.iter().map(header_string).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for raw in rows_iter {
        let mut row: Vec<Value> = raw.iter().map(convert).collect();
        row.resize(headers.len(), Value::Empty);
        rows.push(row);
    }
    Sheet { headers, rows }
}

fn header_string(data: &Data) -> String {
    match data {
        Data::String(x) => x.trim().to_string(),
        x => x.to_string().trim().to_string(),
    }
}

fn convert(data: &Data) -> Value {
    match data {
        Data::Empty => Value::Empty,
        Data::Int(x) => Value::Number(*x as f64),
        Data::Float(x) => Value::Number(*x),
        Data::String(x) => Value::Text(x.clone()),
        Data::Bool(x) => Value::Bool(*x),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(dt) => Value::DateTime(dt),
            None => Value::Empty,
        },
        Data::DurationIso(x) => Value::Text(x.clone()),
        Data::Error(_) => Value::Empty,
    }
}
