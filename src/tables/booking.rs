//! The `Booking-Kalender` sheet: its column contract, the typed values stored
//! in it, and the operations the overview and the entry form need.
//!
//! Rows stay untyped [`CellValue`]s so that columns added by hand in the
//! spreadsheet survive a save. Typed values ([`BookingStatus`],
//! [`ContractFlag`], [`NewBooking`]) only exist at the edges where the UI
//! reads or writes a row.
use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::currency::format_amount;
use crate::models::{CellValue, Record, Table, TableView};

/// Sheet holding the booking calendar.
pub const SHEET: &str = "Booking-Kalender";

pub const COL_DATE: &str = "Datum";
pub const COL_WEEKDAY: &str = "Wochentag";
pub const COL_ARTIST: &str = "Band/Künstler";
pub const COL_GENRE: &str = "Genre";
pub const COL_STATUS: &str = "Status";
pub const COL_FEE: &str = "Gage";
pub const COL_TICKET_PRICE: &str = "Ticketpreis";
pub const COL_EXPECTED_ATTENDANCE: &str = "Erwartete Besucher";
pub const COL_CONTACT: &str = "Ansprechpartner Band";
pub const COL_CONTRACT: &str = "Vertrag vorhanden?";

/// Column order used when a booking sheet has to be created from scratch.
pub const COLUMNS: [&str; 10] = [
    COL_DATE,
    COL_WEEKDAY,
    COL_ARTIST,
    COL_GENRE,
    COL_STATUS,
    COL_FEE,
    COL_TICKET_PRICE,
    COL_EXPECTED_ATTENDANCE,
    COL_CONTACT,
    COL_CONTRACT,
];

/// Booking state as stored in the `Status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Confirmed,
    Requested,
    Cancelled,
}

impl BookingStatus {
    /// Every status, in the order the status filter cycles through them.
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Confirmed,
        BookingStatus::Requested,
        BookingStatus::Cancelled,
    ];

    /// The value written to and read from the `Status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Bestätigt",
            BookingStatus::Requested => "Angefragt",
            BookingStatus::Cancelled => "Abgesagt",
        }
    }

    /// Exact, case-sensitive match on the stored value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a signed contract exists for the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFlag {
    Yes,
    No,
}

impl ContractFlag {
    pub const ALL: [ContractFlag; 2] = [ContractFlag::Yes, ContractFlag::No];

    /// The value written to and read from the `Vertrag vorhanden?` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ContractFlag::Yes => "Ja",
            ContractFlag::No => "Nein",
        }
    }

    /// Exact, case-sensitive match on the stored value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.as_str() == value)
    }
}

impl fmt::Display for ContractFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the derived `Wochentag` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayLocale {
    #[default]
    German,
    English,
}

impl WeekdayLocale {
    /// Full weekday name as written to the `Wochentag` column.
    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        match (self, weekday) {
            (WeekdayLocale::German, Weekday::Mon) => "Montag",
            (WeekdayLocale::German, Weekday::Tue) => "Dienstag",
            (WeekdayLocale::German, Weekday::Wed) => "Mittwoch",
            (WeekdayLocale::German, Weekday::Thu) => "Donnerstag",
            (WeekdayLocale::German, Weekday::Fri) => "Freitag",
            (WeekdayLocale::German, Weekday::Sat) => "Samstag",
            (WeekdayLocale::German, Weekday::Sun) => "Sonntag",
            (WeekdayLocale::English, Weekday::Mon) => "Monday",
            (WeekdayLocale::English, Weekday::Tue) => "Tuesday",
            (WeekdayLocale::English, Weekday::Wed) => "Wednesday",
            (WeekdayLocale::English, Weekday::Thu) => "Thursday",
            (WeekdayLocale::English, Weekday::Fri) => "Friday",
            (WeekdayLocale::English, Weekday::Sat) => "Saturday",
            (WeekdayLocale::English, Weekday::Sun) => "Sunday",
        }
    }
}

/// Filter criteria for the booking overview. `None` stands for "Alle" and
/// accepts every row; set criteria must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub genre: Option<String>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    /// Whether any criterion narrows the overview.
    pub fn is_active(&self) -> bool {
        self.genre.is_some() || self.status.is_some()
    }
}

/// Select the bookings matching `criteria` without touching the table. An
/// unknown genre, or a criterion on a column the sheet lacks, matches nothing.
pub fn filter<'a>(table: &'a Table, criteria: &BookingFilter) -> TableView<'a> {
    let genre_idx = table.column_index(COL_GENRE);
    let status_idx = table.column_index(COL_STATUS);

    TableView::matching(table, |row| {
        let genre_ok = match &criteria.genre {
            None => true,
            Some(genre) => genre_idx
                .and_then(|idx| row.get(idx))
                .is_some_and(|cell| !cell.is_empty() && cell.to_string() == *genre),
        };
        let status_ok = match criteria.status {
            None => true,
            Some(status) => status_idx
                .and_then(|idx| row.get(idx))
                .and_then(CellValue::as_text)
                .is_some_and(|text| text == status.as_str()),
        };
        genre_ok && status_ok
    })
}

/// Non-empty genre values in first-seen order.
pub fn distinct_genres(table: &Table) -> Vec<String> {
    let Some(idx) = table.column_index(COL_GENRE) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    table
        .rows()
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|cell| !cell.is_empty())
        .map(ToString::to_string)
        .filter(|genre| seen.insert(genre.clone()))
        .collect()
}

/// Insert a booking after the last row.
pub fn append(table: &mut Table, record: Record) {
    table.append(record);
}

/// Typed input for a new booking, as collected by the entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub date: NaiveDate,
    pub artist: String,
    pub genre: String,
    pub fee: Decimal,
    pub status: BookingStatus,
    pub ticket_price: Decimal,
    pub expected_attendance: u32,
    pub contact: String,
    pub contract: ContractFlag,
}

impl NewBooking {
    /// Build the sheet row. The weekday is derived here, once, from the date;
    /// amounts are stored in the `"50 €"` convention of the existing rows.
    pub fn to_record(&self, locale: WeekdayLocale) -> Record {
        vec![
            (
                COL_DATE.to_string(),
                CellValue::text(self.date.format("%d.%m.%Y").to_string()),
            ),
            (
                COL_WEEKDAY.to_string(),
                CellValue::text(locale.weekday_name(self.date.weekday())),
            ),
            (COL_ARTIST.to_string(), CellValue::text(self.artist.as_str())),
            (COL_GENRE.to_string(), CellValue::text(self.genre.as_str())),
            (COL_STATUS.to_string(), CellValue::text(self.status.as_str())),
            (COL_FEE.to_string(), CellValue::text(format_amount(self.fee))),
            (
                COL_TICKET_PRICE.to_string(),
                CellValue::text(format_amount(self.ticket_price)),
            ),
            (
                COL_EXPECTED_ATTENDANCE.to_string(),
                CellValue::Number(f64::from(self.expected_attendance)),
            ),
            (COL_CONTACT.to_string(), CellValue::text(self.contact.as_str())),
            (COL_CONTRACT.to_string(), CellValue::text(self.contract.as_str())),
        ]
    }
}
