use std::io::Write;

use chrono::NaiveDate;
use villa_booking::workflows::booking::{
    AvailabilitySource, CalendarImportError, CalendarImporter, DateStatus,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, d).expect("valid date")
}

#[test]
fn imported_calendar_fills_gaps_as_available() {
    let csv = "date,status,price,booking_id\n\
2025-12-24,booked,,BK-XMAS\n\
2025-12-25,booked,,BK-XMAS\n\
2025-12-31,blocked,,\n";

    let calendar = CalendarImporter::from_reader(csv.as_bytes()).expect("import succeeds");
    let days = calendar.list_dates(day(23), day(31)).expect("valid range");

    assert_eq!(days.len(), 9);
    assert_eq!(days[0].status, DateStatus::Available);
    assert_eq!(days[1].booking_id.as_deref(), Some("BK-XMAS"));
    assert_eq!(calendar.status_on(day(31)).expect("lookup"), DateStatus::Blocked);
    assert_eq!(calendar.status_on(day(28)).expect("lookup"), DateStatus::Available);
}

#[test]
fn importer_reads_exports_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "villa-booking-calendar-{}.csv",
        std::process::id()
    ));
    {
        let mut file = std::fs::File::create(&path).expect("create export");
        writeln!(file, "date,status,price,booking_id").expect("write header");
        writeln!(file, "2025-12-02, Available ,2500000,").expect("write row");
    }

    let calendar = CalendarImporter::from_path(&path).expect("import succeeds");
    std::fs::remove_file(&path).ok();

    let days = calendar.list_dates(day(2), day(2)).expect("valid range");
    assert_eq!(days[0].price, Some(2_500_000));
}

#[test]
fn missing_export_surfaces_io_error() {
    let result = CalendarImporter::from_path("/nonexistent/villa-calendar.csv");
    assert!(matches!(result, Err(CalendarImportError::Io(_))));
}
