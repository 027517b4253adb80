//! Per-view state kept between key presses: selection cursors, the booking
//! filter, and the derived finance table.
//!
//! Screens never own table data. Rows are looked up from the in-memory
//! collection on every draw, so an appended booking shows up without
//! rebuilding the screen.
use crate::error::ParseError;
use crate::models::{Table, TableView};
use crate::tables::booking::{self, BookingFilter, BookingStatus};
use crate::tables::finance::{self, FinanceTotals};

/// Row cursor shared by the table screens.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Cursor {
    pub(crate) selected: usize,
}

impl Cursor {
    /// Move by `offset` rows, clamped to `0..len`.
    pub(crate) fn move_by(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, last);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

/// Booking overview: the active filter plus the genre choices it cycles.
pub(crate) struct BookingScreen {
    pub(crate) filter: BookingFilter,
    pub(crate) genres: Vec<String>,
    pub(crate) cursor: Cursor,
}

impl BookingScreen {
    /// Start unfiltered, with the genre choices taken from `table`.
    pub(crate) fn new(table: Option<&Table>) -> Self {
        Self {
            filter: BookingFilter::default(),
            genres: table.map(booking::distinct_genres).unwrap_or_default(),
            cursor: Cursor::default(),
        }
    }

    /// Pick up genres added since the screen was built.
    pub(crate) fn refresh(&mut self, table: Option<&Table>) {
        self.genres = table.map(booking::distinct_genres).unwrap_or_default();
    }

    /// Rows of `table` matching the current filter.
    pub(crate) fn view<'a>(&self, table: &'a Table) -> TableView<'a> {
        booking::filter(table, &self.filter)
    }

    /// Alle -> first genre -> ... -> last genre -> Alle.
    pub(crate) fn cycle_genre(&mut self) {
        let next = match &self.filter.genre {
            None => self.genres.first().cloned(),
            Some(current) => self
                .genres
                .iter()
                .position(|genre| genre == current)
                .and_then(|idx| self.genres.get(idx + 1))
                .cloned(),
        };
        self.filter.genre = next;
        self.cursor.select_first();
    }

    /// Alle -> Bestätigt -> Angefragt -> Abgesagt -> Alle.
    pub(crate) fn cycle_status(&mut self) {
        let all = BookingStatus::ALL;
        self.filter.status = match self.filter.status {
            None => Some(all[0]),
            Some(current) => all
                .iter()
                .position(|status| *status == current)
                .and_then(|idx| all.get(idx + 1))
                .copied(),
        };
        self.cursor.select_first();
    }

    /// Back to "Alle" for both criteria.
    pub(crate) fn reset_filters(&mut self) {
        self.filter = BookingFilter::default();
        self.cursor.select_first();
    }
}

/// Finance view. The derived table is rebuilt whenever the screen opens.
pub(crate) struct FinanceScreen {
    pub(crate) derived: Result<Table, ParseError>,
    pub(crate) totals: Option<FinanceTotals>,
    pub(crate) cursor: Cursor,
}

impl FinanceScreen {
    /// Derive profit/loss and totals from the stored finance sheet. A parse
    /// error is kept so the view can show it in place of the table.
    pub(crate) fn new(table: &Table) -> Self {
        let derived = finance::with_profit_loss(table);
        let totals = derived
            .as_ref()
            .ok()
            .and_then(|table| finance::totals(table).ok());
        Self {
            derived,
            totals,
            cursor: Cursor::default(),
        }
    }

    /// Number of rows shown, zero when the derivation failed.
    pub(crate) fn len(&self) -> usize {
        self.derived.as_ref().map_or(0, Table::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn bookings() -> Table {
        let mut table = Table::new(
            booking::SHEET,
            vec![booking::COL_GENRE.to_string(), booking::COL_STATUS.to_string()],
        );
        for (genre, status) in [("Jazz", "Bestätigt"), ("Blues", "Angefragt"), ("Jazz", "")] {
            table.push_row(vec![CellValue::text(genre), CellValue::text(status)]);
        }
        table
    }

    #[test]
    fn genre_cycle_returns_to_all() {
        let table = bookings();
        let mut screen = BookingScreen::new(Some(&table));

        screen.cycle_genre();
        assert_eq!(screen.filter.genre.as_deref(), Some("Jazz"));
        assert_eq!(screen.view(&table).indices(), [0, 2]);
        screen.cycle_genre();
        assert_eq!(screen.filter.genre.as_deref(), Some("Blues"));
        screen.cycle_genre();
        assert_eq!(screen.filter.genre, None);
    }

    #[test]
    fn status_cycle_visits_every_status() {
        let mut screen = BookingScreen::new(None);
        let mut seen = Vec::new();
        for _ in 0..4 {
            screen.cycle_status();
            seen.push(screen.filter.status);
        }
        assert_eq!(
            seen,
            [
                Some(BookingStatus::Confirmed),
                Some(BookingStatus::Requested),
                Some(BookingStatus::Cancelled),
                None
            ]
        );
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = Cursor::default();
        cursor.move_by(-3, 5);
        assert_eq!(cursor.selected, 0);
        cursor.move_by(10, 5);
        assert_eq!(cursor.selected, 4);
        cursor.select_last(2);
        assert_eq!(cursor.selected, 1);
        cursor.move_by(1, 0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn finance_screen_keeps_parse_errors_for_display() {
        let mut table = Table::new(
            finance::SHEET,
            vec![
                finance::COL_TICKET_REVENUE.to_string(),
                finance::COL_COST.to_string(),
                finance::COL_FEE.to_string(),
            ],
        );
        table.push_row(vec![
            CellValue::text("abc €"),
            CellValue::text("1 €"),
            CellValue::text("1 €"),
        ]);

        let screen = FinanceScreen::new(&table);
        assert!(screen.derived.is_err());
        assert_eq!(screen.totals, None);
        assert_eq!(screen.len(), 0);
    }
}
