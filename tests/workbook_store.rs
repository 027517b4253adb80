use chrono::NaiveDate;
use jazzclub_booking::tables::{
    booking, finance, BookingFilter, BookingStatus, ContractFlag, NewBooking, WeekdayLocale,
};
use jazzclub_booking::{CellValue, Store, Table, TableCollection};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn text(value: &str) -> CellValue {
    CellValue::text(value)
}

fn booking_sheet() -> Table {
    let mut table = Table::new(
        booking::SHEET,
        booking::COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    table.push_row(vec![
        text("05.01.2024"),
        text("Freitag"),
        text("Trio Nord"),
        text("Jazz"),
        text("Bestätigt"),
        text("400 €"),
        text("15 €"),
        CellValue::Number(80.0),
        text("Anna"),
        text("Ja"),
    ]);
    table.push_row(vec![
        text("10.02.2024"),
        text("Samstag"),
        text("Delta Kings"),
        text("Blues"),
        text("Angefragt"),
        text("300 €"),
        text("12 €"),
        CellValue::Number(60.0),
        CellValue::Empty,
        text("Nein"),
    ]);
    table
}

fn finance_sheet() -> Table {
    let mut table = Table::new(
        finance::SHEET,
        vec![
            "Band/Künstler".to_string(),
            finance::COL_TICKET_REVENUE.to_string(),
            finance::COL_COST.to_string(),
            finance::COL_FEE.to_string(),
        ],
    );
    table.push_row(vec![text("Trio Nord"), text("1200 €"), text("150 €"), text("400 €")]);
    table.push_row(vec![text("Delta Kings"), text("500 €"), text("100 €"), text("450 €")]);
    table
}

fn workbook() -> TableCollection {
    let mut artists = Table::new(
        "Bands-Künstler",
        vec!["Band/Künstler".to_string(), "Seit".to_string()],
    );
    artists.push_row(vec![
        text("Trio Nord"),
        CellValue::Date(
            NaiveDate::from_ymd_opt(2021, 9, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        ),
    ]);
    [booking_sheet(), artists, finance_sheet()].into_iter().collect()
}

#[test]
fn saved_workbook_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Jazzclub_Booking_Tool_Optimized.xlsx");
    let original = workbook();

    Store::new(&path).save_all(&original).unwrap();
    let first = Store::new(&path).load_all().unwrap();
    Store::new(&path).save_all(&first).unwrap();
    let second = Store::new(&path).load_all().unwrap();

    assert_eq!(first, original);
    assert_eq!(second, first);
    assert_eq!(
        second.names().collect::<Vec<_>>(),
        vec![booking::SHEET, "Bands-Künstler", finance::SHEET]
    );
}

#[test]
fn filters_apply_to_a_loaded_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booking.xlsx");
    Store::new(&path).save_all(&workbook()).unwrap();

    let tables = Store::new(&path).load_all().unwrap();
    let bookings = tables.get(booking::SHEET).unwrap();

    let jazz = booking::filter(
        bookings,
        &BookingFilter {
            genre: Some("Jazz".to_string()),
            status: None,
        },
    );
    assert_eq!(jazz.indices(), &[0]);

    let cancelled = booking::filter(
        bookings,
        &BookingFilter {
            genre: None,
            status: Some(BookingStatus::Cancelled),
        },
    );
    assert!(cancelled.is_empty());
    assert_eq!(bookings.len(), 2);
}

#[test]
fn appended_booking_is_persisted_in_euro_notation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booking.xlsx");
    let mut store = Store::new(&path);
    store.save_all(&workbook()).unwrap();

    let mut tables = store.load_all().unwrap();
    let new_booking = NewBooking {
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        artist: "Test Trio".to_string(),
        genre: "Jazz".to_string(),
        fee: Decimal::from(50),
        status: BookingStatus::Requested,
        ticket_price: Decimal::from(15),
        expected_attendance: 40,
        contact: String::new(),
        contract: ContractFlag::No,
    };
    booking::append(
        tables.get_mut(booking::SHEET).unwrap(),
        new_booking.to_record(WeekdayLocale::German),
    );
    store.save_all(&tables).unwrap();

    let reloaded = Store::new(&path).load_all().unwrap();
    let bookings = reloaded.get(booking::SHEET).unwrap();
    assert_eq!(bookings.len(), 3);
    assert_eq!(bookings.cell(2, booking::COL_ARTIST), Some(&text("Test Trio")));
    assert_eq!(bookings.cell(2, booking::COL_WEEKDAY), Some(&text("Freitag")));
    assert_eq!(bookings.cell(2, booking::COL_FEE), Some(&text("50 €")));
    assert_eq!(bookings.cell(2, booking::COL_TICKET_PRICE), Some(&text("15 €")));
    assert_eq!(bookings.cell(2, booking::COL_STATUS), Some(&text("Angefragt")));
    assert_eq!(bookings.cell(2, booking::COL_CONTRACT), Some(&text("Nein")));
}

#[test]
fn finance_view_is_derived_from_the_stored_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booking.xlsx");
    Store::new(&path).save_all(&workbook()).unwrap();

    let tables = Store::new(&path).load_all().unwrap();
    let stored = tables.get(finance::SHEET).unwrap();
    let derived = finance::with_profit_loss(stored).unwrap();

    assert_eq!(
        derived.cell(0, finance::COL_PROFIT_LOSS),
        Some(&CellValue::Number(650.0))
    );
    assert_eq!(
        derived.cell(1, finance::COL_PROFIT_LOSS),
        Some(&CellValue::Number(-50.0))
    );
    assert!(stored.column_index(finance::COL_PROFIT_LOSS).is_none());

    let totals = finance::totals(&derived).unwrap();
    assert_eq!(totals.profit_loss, Decimal::from(600));
}
