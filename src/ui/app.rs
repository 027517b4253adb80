//! Application state and rendering for the booking dashboard.
//!
//! `App` owns the [`Store`] and the tables loaded from it. Every view reads
//! those tables directly; the only write path is the "Neue Buchung" form,
//! which saves the whole workbook before the in-memory copy is replaced. A
//! failed save therefore leaves both the file and the dashboard as they were,
//! and the reason is shown in the footer.
use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table as TableWidget, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::currency::format_amount;
use crate::models::{Table, TableCollection, TableView};
use crate::store::Store;
use crate::tables::{artists, booking, finance, WeekdayLocale};

use super::forms::{BookingField, BookingForm};
use super::helpers::{centered_rect, column_widths, surface_error};
use super::screens::{BookingScreen, Cursor, FinanceScreen};

/// Header space for the title and view tabs.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;
const TITLE: &str = "🎷 Jazzclub Booking Tool";
const VIEW_TITLES: [&str; 4] = [
    "📅 Buchungsübersicht",
    "🎤 Künstler & Bands",
    "💰 Finanzen",
    "➕ Neue Buchung",
];

/// The views reachable from the tab bar. "Neue Buchung" is a modal form on top
/// of the booking overview rather than a screen of its own.
enum Screen {
    Bookings(BookingScreen),
    Artists(Cursor),
    /// `None` when the workbook has no finance sheet.
    Finances(Option<FinanceScreen>),
}

impl Screen {
    /// Position in the tab bar.
    fn tab_index(&self) -> usize {
        match self {
            Screen::Bookings(_) => 0,
            Screen::Artists(_) => 1,
            Screen::Finances(_) => 2,
        }
    }
}

enum Mode {
    Normal,
    NewBooking(BookingForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: Store,
    tables: TableCollection,
    weekday_locale: WeekdayLocale,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the dashboard over tables already loaded from `store`. The
    /// booking overview is the first view shown.
    pub fn new(store: Store, tables: TableCollection, weekday_locale: WeekdayLocale) -> Self {
        let screen = Screen::Bookings(BookingScreen::new(tables.get(booking::SHEET)));
        Self {
            store,
            tables,
            weekday_locale,
            screen,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Tables as currently held in memory.
    pub fn tables(&self) -> &TableCollection {
        &self.tables
    }

    /// Route a key press to the active mode. Returns `true` once the user asked
    /// to quit; errors inside the UI end up in the footer instead.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::NewBooking(form) => self.handle_new_booking(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Keys available while no form is open: view switching, selection, and
    /// the booking filters.
    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('1') => self.open_bookings(),
            KeyCode::Char('2') => self.open_artists(),
            KeyCode::Char('3') => self.open_finances(),
            KeyCode::Char('4') | KeyCode::Char('n') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::NewBooking(BookingForm::default()));
            }
            KeyCode::Tab => self.switch_view(1),
            KeyCode::BackTab => self.switch_view(-1),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_workbook(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::End => self.move_selection(isize::MAX / 2),
            _ => self.handle_booking_filter_key(code),
        }
        Ok(Mode::Normal)
    }

    /// Filter keys only apply to the booking overview.
    fn handle_booking_filter_key(&mut self, code: KeyCode) {
        let Screen::Bookings(screen) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char('g') | KeyCode::Char('G') => screen.cycle_genre(),
            KeyCode::Char('t') | KeyCode::Char('T') => screen.cycle_status(),
            KeyCode::Char('r') | KeyCode::Char('R') => screen.reset_filters(),
            _ => return,
        }
        debug!(
            genre = screen.filter.genre.as_deref().unwrap_or("Alle"),
            status = screen.filter.status.map_or("Alle", |s| s.as_str()),
            "booking filter changed"
        );
    }

    /// Keys while the entry form is open. The form stays open until it was
    /// saved or cancelled.
    fn handle_new_booking(&mut self, code: KeyCode, mut form: BookingForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Neue Buchung abgebrochen.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_booking(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    warn!(error = %message, "booking not added");
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::NewBooking(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Append the booking to a copy of the tables and persist that copy. The
    /// in-memory tables only change once the workbook was written.
    fn save_new_booking(&mut self, form: &BookingForm) -> Result<()> {
        let new_booking = form.parse_inputs()?;

        let mut updated = self.tables.clone();
        if updated.get(booking::SHEET).is_none() {
            let columns = booking::COLUMNS.iter().map(|c| c.to_string()).collect();
            updated.insert(Table::new(booking::SHEET, columns));
        }
        let table = updated
            .get_mut(booking::SHEET)
            .context("booking sheet missing")?;
        booking::append(table, new_booking.to_record(self.weekday_locale));

        self.store
            .save_all(&updated)
            .context("failed to save workbook")?;
        self.tables = updated;
        info!(
            artist = %new_booking.artist,
            date = %new_booking.date,
            "booking added"
        );

        self.show_new_booking();
        self.set_status(
            format!("✅ Buchung für {} wurde hinzugefügt!", new_booking.artist),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Jump to the booking overview with the freshly appended row selected.
    fn show_new_booking(&mut self) {
        let table = self.tables.get(booking::SHEET);
        let mut screen = match mem::replace(&mut self.screen, Screen::Artists(Cursor::default())) {
            Screen::Bookings(mut screen) => {
                screen.refresh(table);
                screen
            }
            _ => BookingScreen::new(table),
        };
        let len = table.map_or(0, |t| screen.view(t).len());
        screen.cursor.select_last(len);
        self.screen = Screen::Bookings(screen);
    }

    fn open_bookings(&mut self) {
        if !matches!(self.screen, Screen::Bookings(_)) {
            self.screen = Screen::Bookings(BookingScreen::new(self.tables.get(booking::SHEET)));
        }
    }

    fn open_artists(&mut self) {
        if !matches!(self.screen, Screen::Artists(_)) {
            self.screen = Screen::Artists(Cursor::default());
        }
    }

    /// Profit/loss is derived afresh every time the view opens. A workbook
    /// without the finance sheet still gets the view, showing a placeholder.
    fn open_finances(&mut self) {
        let screen = self.tables.get(finance::SHEET).map(FinanceScreen::new);
        match &screen {
            Some(FinanceScreen { derived: Err(err), .. }) => warn!(error = %err, "finance table could not be derived"),
            Some(_) => {}
            None => warn!(sheet = finance::SHEET, "finance sheet missing"),
        }
        self.screen = Screen::Finances(screen);
    }

    /// Step through the tab bar, wrapping at both ends.
    fn switch_view(&mut self, offset: isize) {
        let count = 3;
        let next = (self.screen.tab_index() as isize + offset).rem_euclid(count) as usize;
        match next {
            0 => self.open_bookings(),
            1 => self.open_artists(),
            _ => self.open_finances(),
        }
    }

    /// Hand the workbook to the system's default spreadsheet application.
    fn open_workbook(&mut self) {
        let path = self.store.path().to_path_buf();
        match open_path(&path) {
            Ok(()) => self.set_status(
                format!("{} geöffnet.", path.display()),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(
                format!("Arbeitsmappe konnte nicht geöffnet werden: {err}"),
                StatusKind::Error,
            ),
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.visible_rows();
        match &mut self.screen {
            Screen::Bookings(screen) => screen.cursor.move_by(offset, len),
            Screen::Artists(cursor) => cursor.move_by(offset, len),
            Screen::Finances(Some(screen)) => screen.cursor.move_by(offset, len),
            Screen::Finances(None) => {}
        }
    }

    /// Rows in the active view, after filtering.
    fn visible_rows(&self) -> usize {
        match &self.screen {
            Screen::Bookings(screen) => self
                .tables
                .get(booking::SHEET)
                .map_or(0, |table| screen.view(table).len()),
            Screen::Artists(_) => self.tables.get(artists::SHEET).map_or(0, Table::len),
            Screen::Finances(screen) => screen.as_ref().map_or(0, FinanceScreen::len),
        }
    }

    /// Render header tabs, the active view, the footer, and the form popup
    /// when one is open.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        match &self.screen {
            Screen::Bookings(screen) => self.draw_bookings(frame, chunks[1], screen),
            Screen::Artists(cursor) => self.draw_artists(frame, chunks[1], *cursor),
            Screen::Finances(Some(screen)) => self.draw_finances(frame, chunks[1], screen),
            Screen::Finances(None) => self.draw_missing_sheet(frame, chunks[1], finance::SHEET),
        }
        self.draw_footer(frame, chunks[2]);

        if let Mode::NewBooking(form) = &self.mode {
            self.draw_booking_form(frame, area, form);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let selected = match self.mode {
            Mode::NewBooking(_) => 3,
            Mode::Normal => self.screen.tab_index(),
        };
        let tabs = Tabs::new(VIEW_TITLES)
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title(TITLE));
        frame.render_widget(tabs, area);
    }

    /// Filter bar above the filtered booking table.
    fn draw_bookings(&self, frame: &mut Frame, area: Rect, screen: &BookingScreen) {
        let Some(table) = self.tables.get(booking::SHEET) else {
            self.draw_missing_sheet(frame, area, booking::SHEET);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let view = screen.view(table);
        let value_style = Style::default().add_modifier(Modifier::BOLD);
        let filters = Paragraph::new(Line::from(vec![
            Span::raw("🎼 Genre: "),
            Span::styled(
                screen.filter.genre.clone().unwrap_or_else(|| "Alle".to_string()),
                value_style,
            ),
            Span::raw("   📌 Status: "),
            Span::styled(
                screen
                    .filter
                    .status
                    .map_or("Alle", |status| status.as_str())
                    .to_string(),
                value_style,
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Filter"));
        frame.render_widget(filters, chunks[0]);

        let title = if screen.filter.is_active() {
            format!("{} von {} Buchungen", view.len(), table.len())
        } else {
            format!("{} Buchungen", table.len())
        };
        self.render_table(frame, chunks[1], title, &view, screen.cursor.selected);
    }

    fn draw_artists(&self, frame: &mut Frame, area: Rect, cursor: Cursor) {
        let Some(table) = self.tables.get(artists::SHEET) else {
            self.draw_missing_sheet(frame, area, artists::SHEET);
            return;
        };
        let view = artists::list(table);
        let title = format!("{} Künstler & Bands", view.len());
        self.render_table(frame, area, title, &view, cursor.selected);
    }

    /// Derived finance table with a totals line, or the parse error when the
    /// sheet holds a non-numeric amount.
    fn draw_finances(&self, frame: &mut Frame, area: Rect, screen: &FinanceScreen) {
        let table = match &screen.derived {
            Ok(table) => table,
            Err(err) => {
                let message = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "Gewinn/Verlust konnte nicht berechnet werden.",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(err.to_string()),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("💰 Finanzübersicht"));
                frame.render_widget(message, area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);

        let view = TableView::all(table);
        let title = format!("💰 Finanzübersicht ({} Verträge)", view.len());
        self.render_table(frame, chunks[0], title, &view, screen.cursor.selected);

        if let Some(totals) = &screen.totals {
            let profit_style = if totals.profit_loss.is_sign_negative() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            let summary = Paragraph::new(Line::from(vec![
                Span::raw(format!(
                    "Einnahmen: {}   Kosten: {}   Gagen: {}   ",
                    format_amount(totals.ticket_revenue),
                    format_amount(totals.cost),
                    format_amount(totals.fee),
                )),
                Span::styled(
                    format!("Gewinn/Verlust: {}", format_amount(totals.profit_loss)),
                    profit_style.add_modifier(Modifier::BOLD),
                ),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Summe"));
            frame.render_widget(summary, chunks[1]);
        }
    }

    /// Draw `view` as a bordered table with `selected` highlighted, or a
    /// short notice when it has no rows.
    fn render_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: String,
        view: &TableView<'_>,
        selected: usize,
    ) {
        let block = Block::default().borders(Borders::ALL).title(title);
        if view.is_empty() {
            let message = Paragraph::new("Keine Einträge.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(view.columns().iter().map(|column| Cell::from(column.clone())))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = view
            .rows()
            .map(|cells| Row::new(cells.iter().map(|cell| Cell::from(cell.to_string()))));

        let widget = TableWidget::new(rows, column_widths(view))
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_missing_sheet(&self, frame: &mut Frame, area: Rect, sheet: &str) {
        let message = Paragraph::new(format!(
            "Tabellenblatt '{sheet}' fehlt in der Arbeitsmappe."
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = match (&self.screen, &self.mode) {
            (_, Mode::NewBooking(_)) => {
                return Line::from(vec![
                    Span::styled("[Tab/↑↓]", key_style),
                    Span::raw(" Feld   "),
                    Span::styled("[←→/Space]", key_style),
                    Span::raw(" Auswahl   "),
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Buchung hinzufügen   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Abbrechen"),
                ]);
            }
            (Screen::Bookings(_), _) => vec![
                Span::styled("[g]", key_style),
                Span::raw(" Genre   "),
                Span::styled("[t]", key_style),
                Span::raw(" Status   "),
                Span::styled("[r]", key_style),
                Span::raw(" Filter zurücksetzen   "),
            ],
            _ => Vec::new(),
        };
        spans.extend([
            Span::styled("[1-4/Tab]", key_style),
            Span::raw(" Ansicht   "),
            Span::styled("[↑↓]", key_style),
            Span::raw(" Auswahl   "),
            Span::styled("[n]", key_style),
            Span::raw(" Neue Buchung   "),
            Span::styled("[o]", key_style),
            Span::raw(" Excel öffnen   "),
            Span::styled("[q]", key_style),
            Span::raw(" Beenden"),
        ]);
        Line::from(spans)
    }

    fn draw_booking_form(&self, frame: &mut Frame, area: Rect, form: &BookingForm) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("➕ Neue Buchung hinzufügen")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookingField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter speichert • Tab wechselt das Feld • Esc bricht ab",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if !form.active.is_choice() {
            let row = BookingField::ALL
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = form.active.label().chars().count() as u16 + 2;
            frame.set_cursor_position((
                inner.x + prefix + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn seeded_app(dir: &tempfile::TempDir) -> App {
        let mut bookings = Table::new(
            booking::SHEET,
            booking::COLUMNS.iter().map(|c| c.to_string()).collect(),
        );
        bookings.append(vec![
            (booking::COL_ARTIST.to_string(), CellValue::text("Trio Nord")),
            (booking::COL_GENRE.to_string(), CellValue::text("Jazz")),
        ]);
        let tables: TableCollection = [bookings].into_iter().collect();

        let mut store = Store::new(dir.path().join("booking.xlsx"));
        store.save_all(&tables).unwrap();
        let loaded = store.load_all().unwrap();
        App::new(store, loaded, WeekdayLocale::German)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn submitting_the_form_appends_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded_app(&dir);

        app.handle_key(KeyCode::Char('n')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Test Trio");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        let table = app.tables().get(booking::SHEET).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cell(1, booking::COL_ARTIST),
            Some(&CellValue::text("Test Trio"))
        );

        let on_disk = Store::new(dir.path().join("booking.xlsx")).load_all().unwrap();
        assert_eq!(on_disk.get(booking::SHEET).map(Table::len), Some(2));
    }

    #[test]
    fn invalid_form_keeps_tables_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded_app(&dir);
        let before = app.tables().clone();

        app.handle_key(KeyCode::Char('n')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::NewBooking(form) => assert!(form.error.is_some()),
            Mode::Normal => panic!("form should stay open"),
        }
        assert_eq!(app.tables(), &before);
    }

    #[test]
    fn tab_wraps_around_without_a_finance_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded_app(&dir);
        assert!(app.tables().get(finance::SHEET).is_none());

        let mut sequence = vec![app.screen.tab_index()];
        for _ in 0..4 {
            app.handle_key(KeyCode::Tab).unwrap();
            sequence.push(app.screen.tab_index());
        }

        assert_eq!(sequence, [0, 1, 2, 0, 1]);
        app.handle_key(KeyCode::Char('3')).unwrap();
        assert!(matches!(app.screen, Screen::Finances(None)));
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::BackTab).unwrap();
        assert_eq!(app.screen.tab_index(), 1);
    }

    #[test]
    fn failed_save_keeps_tables_and_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded_app(&dir);
        app.store = Store::new(dir.path().join("missing-dir").join("booking.xlsx"));
        let before = app.tables().clone();

        app.handle_key(KeyCode::Char('n')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "X");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::NewBooking(form) => {
                assert!(form.error.is_some());
                assert_eq!(form.artist, "X");
            }
            Mode::Normal => panic!("form should stay open after a failed save"),
        }
        assert_eq!(app.tables(), &before);
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }

    #[test]
    fn q_quits_outside_the_form_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded_app(&dir);

        app.handle_key(KeyCode::Char('n')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
