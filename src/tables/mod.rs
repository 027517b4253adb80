//! Operations on the three sheets of the booking workbook, split by sheet.

pub mod artists;
pub mod booking;
pub mod finance;

pub use booking::{BookingFilter, BookingStatus, ContractFlag, NewBooking, WeekdayLocale};
pub use finance::FinanceTotals;
