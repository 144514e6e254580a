use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::availability::CalendarAvailability;
use super::domain::{CalendarDate, DateStatus};

#[derive(Debug, thiserror::Error)]
pub enum CalendarImportError {
    #[error("failed to read calendar export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid calendar CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: unknown status '{value}' (expected available, booked, or blocked)")]
    InvalidStatus { row: usize, value: String },
}

/// Loads availability from a `date,status,price,booking_id` CSV export.
pub struct CalendarImporter;

impl CalendarImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CalendarAvailability, CalendarImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CalendarAvailability, CalendarImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut calendar = CalendarAvailability::new();

        // Row numbers count the header as row 1.
        for (index, record) in csv_reader.deserialize::<CalendarRow>().enumerate() {
            let row = record?;
            calendar.insert(row.into_entry(index + 2)?);
        }

        Ok(calendar)
    }
}

#[derive(Debug, Deserialize)]
struct CalendarRow {
    date: String,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    booking_id: Option<String>,
}

impl CalendarRow {
    fn into_entry(self, row: usize) -> Result<CalendarDate, CalendarImportError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            CalendarImportError::InvalidDate {
                row,
                value: self.date.clone(),
            }
        })?;
        let status =
            DateStatus::parse(&self.status).ok_or_else(|| CalendarImportError::InvalidStatus {
                row,
                value: self.status.clone(),
            })?;
        let price = self
            .price
            .as_deref()
            .and_then(|raw| raw.replace(',', "").parse::<u64>().ok());

        Ok(CalendarDate {
            date,
            status,
            price,
            booking_id: self.booking_id,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
