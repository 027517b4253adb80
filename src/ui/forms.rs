use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use rust_decimal::Decimal;

use crate::tables::{BookingStatus, ContractFlag, NewBooking};

/// Fields of the "Neue Buchung" form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookingField {
    #[default]
    Date,
    Artist,
    Genre,
    Fee,
    Status,
    TicketPrice,
    Attendance,
    Contract,
}

impl BookingField {
    pub(crate) const ALL: [BookingField; 8] = [
        BookingField::Date,
        BookingField::Artist,
        BookingField::Genre,
        BookingField::Fee,
        BookingField::Status,
        BookingField::TicketPrice,
        BookingField::Attendance,
        BookingField::Contract,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookingField::Date => "Datum",
            BookingField::Artist => "Band/Künstler",
            BookingField::Genre => "Genre",
            BookingField::Fee => "Gage (€)",
            BookingField::Status => "Status",
            BookingField::TicketPrice => "Ticketpreis (€)",
            BookingField::Attendance => "Erwartete Besucher",
            BookingField::Contract => "Vertrag vorhanden?",
        }
    }

    /// Choice fields cycle through fixed values instead of taking text.
    pub(crate) fn is_choice(self) -> bool {
        matches!(self, BookingField::Status | BookingField::Contract)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Input state for a new booking. Text fields hold raw keystrokes until
/// [`BookingForm::parse_inputs`] turns them into a typed [`NewBooking`].
#[derive(Clone, Debug)]
pub(crate) struct BookingForm {
    pub(crate) date: String,
    pub(crate) artist: String,
    pub(crate) genre: String,
    pub(crate) fee: String,
    pub(crate) status: BookingStatus,
    pub(crate) ticket_price: String,
    pub(crate) attendance: String,
    pub(crate) contract: ContractFlag,
    pub(crate) active: BookingField,
    pub(crate) error: Option<String>,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl BookingForm {
    /// Start an empty form with the date pre-filled.
    pub(crate) fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format("%d.%m.%Y").to_string(),
            artist: String::new(),
            genre: String::new(),
            fee: "0".to_string(),
            status: BookingStatus::Confirmed,
            ticket_price: "0".to_string(),
            attendance: "0".to_string(),
            contract: ContractFlag::Yes,
            active: BookingField::Date,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        let idx = (self.active.position() + 1) % BookingField::ALL.len();
        self.active = BookingField::ALL[idx];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookingField::ALL.len();
        let idx = (self.active.position() + len - 1) % len;
        self.active = BookingField::ALL[idx];
    }

    /// Step a choice field forwards or backwards. Text fields ignore this.
    pub(crate) fn cycle_choice(&mut self, forward: bool) {
        match self.active {
            BookingField::Status => {
                let all = BookingStatus::ALL;
                let current = all.iter().position(|s| *s == self.status).unwrap_or(0);
                let next = if forward {
                    (current + 1) % all.len()
                } else {
                    (current + all.len() - 1) % all.len()
                };
                self.status = all[next];
            }
            BookingField::Contract => {
                self.contract = match self.contract {
                    ContractFlag::Yes => ContractFlag::No,
                    ContractFlag::No => ContractFlag::Yes,
                };
            }
            _ => {}
        }
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookingField::Date => {
                if ch.is_ascii_digit() || ch == '.' {
                    self.date.push(ch);
                    true
                } else {
                    false
                }
            }
            BookingField::Artist | BookingField::Genre => {
                if ch.is_control() {
                    return false;
                }
                let field = if self.active == BookingField::Artist {
                    &mut self.artist
                } else {
                    &mut self.genre
                };
                field.push(ch);
                true
            }
            BookingField::Fee | BookingField::TicketPrice => {
                let field = if self.active == BookingField::Fee {
                    &mut self.fee
                } else {
                    &mut self.ticket_price
                };
                push_amount_char(field, ch)
            }
            BookingField::Attendance => {
                if ch.is_ascii_digit() {
                    if self.attendance == "0" {
                        self.attendance.clear();
                    }
                    self.attendance.push(ch);
                    true
                } else {
                    false
                }
            }
            BookingField::Status | BookingField::Contract => {
                if ch == ' ' {
                    self.cycle_choice(true);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = match self.active {
            BookingField::Date => &mut self.date,
            BookingField::Artist => &mut self.artist,
            BookingField::Genre => &mut self.genre,
            BookingField::Fee => &mut self.fee,
            BookingField::TicketPrice => &mut self.ticket_price,
            BookingField::Attendance => &mut self.attendance,
            BookingField::Status | BookingField::Contract => return,
        };
        field.pop();
    }

    /// Validate the inputs and return the typed booking ready to append.
    pub(crate) fn parse_inputs(&self) -> Result<NewBooking> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%d.%m.%Y")
            .map_err(|_| anyhow!("Datum muss im Format TT.MM.JJJJ sein."))?;
        let artist = self.artist.trim();
        if artist.is_empty() {
            return Err(anyhow!("Band/Künstler ist erforderlich."));
        }
        let fee = parse_amount_input(&self.fee, "Gage")?;
        let ticket_price = parse_amount_input(&self.ticket_price, "Ticketpreis")?;
        let expected_attendance = if self.attendance.trim().is_empty() {
            0
        } else {
            self.attendance
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("Erwartete Besucher muss eine ganze Zahl sein."))?
        };

        Ok(NewBooking {
            date,
            artist: artist.to_string(),
            genre: self.genre.trim().to_string(),
            fee,
            status: self.status,
            ticket_price,
            expected_attendance,
            contact: String::new(),
            contract: self.contract,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookingField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if field.is_choice() {
            format!("< {value} >")
        } else if value.is_empty() && field == BookingField::Artist {
            "<erforderlich>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count of the value shown for `field`.
    pub(crate) fn value_len(&self, field: BookingField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: BookingField) -> String {
        match field {
            BookingField::Date => self.date.clone(),
            BookingField::Artist => self.artist.clone(),
            BookingField::Genre => self.genre.clone(),
            BookingField::Fee => self.fee.clone(),
            BookingField::Status => self.status.to_string(),
            BookingField::TicketPrice => self.ticket_price.clone(),
            BookingField::Attendance => self.attendance.clone(),
            BookingField::Contract => self.contract.to_string(),
        }
    }
}

/// Digits plus one decimal separator; a leading placeholder zero is replaced.
fn push_amount_char(field: &mut String, ch: char) -> bool {
    match ch {
        '0'..='9' => {
            if *field == "0" {
                field.clear();
            }
            field.push(ch);
            true
        }
        '.' | ',' if !field.contains(['.', ',']) => {
            if field.is_empty() {
                field.push('0');
            }
            field.push(ch);
            true
        }
        _ => false,
    }
}

fn parse_amount_input(raw: &str, label: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount =
        Decimal::from_str(&normalized).map_err(|_| anyhow!("{label} muss eine Zahl sein."))?;
    if amount.is_sign_negative() {
        return Err(anyhow!("{label} darf nicht negativ sein."));
    }
    Ok(amount)
}
