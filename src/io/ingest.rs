//! CSV ingest and validation.
//!
//! This module turns a listings CSV into clean `Listing` records that are safe
//! to analyze.
//!
//! Design goals:
//! - **Strict schema** for the header (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no statistics or cleaning logic here
//!
//! Expected header:
//! `price,square_meter,rooms,floor,floor_total,district,date`
//! with dates in `YYYY-MM-DD`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Listing;
use crate::error::AppError;

/// Column names, in required order.
const HEADER: [&str; 7] = [
    "price",
    "square_meter",
    "rooms",
    "floor",
    "floor_total",
    "district",
    "date",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated listings plus row-level bookkeeping.
#[derive(Debug, Clone)]
pub struct IngestedListings {
    pub listings: Vec<Listing>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load listings from a CSV file, applying an optional date-range filter.
///
/// Bad rows are collected into `row_errors` rather than aborting the load; a
/// malformed header or an unreadable file is fatal.
pub fn load_listings(
    path: &Path,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<IngestedListings, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read CSV header: {e}")))?
        .clone();
    validate_header(&headers)?;

    let mut listings = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, record) in reader.records().enumerate() {
        // Data rows start on line 2, after the header.
        let line = idx + 2;
        rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record) {
            Ok(listing) => {
                if in_range(listing.date, date_from, date_to) {
                    listings.push(listing);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = listings.len();
    Ok(IngestedListings {
        listings,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn validate_header(headers: &StringRecord) -> Result<(), AppError> {
    let found: Vec<&str> = headers.iter().map(str::trim).collect();
    if found != HEADER {
        return Err(AppError::config(format!(
            "Unexpected CSV header {:?}; expected {:?}.",
            found, HEADER
        )));
    }
    Ok(())
}

fn parse_row(record: &StringRecord) -> Result<Listing, String> {
    if record.len() != HEADER.len() {
        return Err(format!(
            "Expected {} columns, found {}.",
            HEADER.len(),
            record.len()
        ));
    }

    let price: i64 = parse_field(record, 0)?;
    let square_meter: i64 = parse_field(record, 1)?;
    let rooms: f64 = parse_field(record, 2)?;
    let floor: f64 = parse_field(record, 3)?;
    let floor_total: f64 = parse_field(record, 4)?;
    let district = record[5].trim().to_string();
    let date = NaiveDate::parse_from_str(record[6].trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {e}", &record[6]))?;

    if price < 0 {
        return Err(format!("Negative price {price}."));
    }
    if square_meter < 0 {
        return Err(format!("Negative area {square_meter}."));
    }
    if district.is_empty() {
        return Err("Empty district.".to_string());
    }

    Ok(Listing {
        price,
        square_meter,
        rooms,
        floor,
        floor_total,
        district,
        date,
    })
}

fn parse_field<T: std::str::FromStr>(record: &StringRecord, index: usize) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    record[index]
        .trim()
        .parse()
        .map_err(|e| format!("Invalid {} '{}': {e}", HEADER[index], &record[index]))
}

fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if let Some(from) = from {
        if date < from {
            return false;
        }
    }
    if let Some(to) = to {
        if date > to {
            return false;
        }
    }
    true
}
