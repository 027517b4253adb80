//! Conversion between the `"50 €"` strings stored in the workbook and
//! `Decimal` amounts.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::CellValue;

/// Trailing unit symbol on monetary strings at rest.
pub const CURRENCY_MARKER: char = '€';

/// A cell that does not reduce to a number once the marker is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("not a currency amount")]
pub struct InvalidAmount;

/// Reduce a cell to an amount. Numeric cells are taken as they are, so a
/// column that was already converted parses again without complaint.
///
/// Returns `Ok(None)` for empty cells.
pub fn parse_amount(cell: &CellValue) -> Result<Option<Decimal>, InvalidAmount> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Number(number) => Decimal::try_from(*number)
            .map(Some)
            .map_err(|_| InvalidAmount),
        CellValue::Text(text) => {
            let stripped = text.replace(CURRENCY_MARKER, "");
            let trimmed = stripped.trim();
            if trimmed.is_empty() {
                return Err(InvalidAmount);
            }
            Decimal::from_str(trimmed).map(Some).map_err(|_| InvalidAmount)
        }
        CellValue::Bool(_) | CellValue::Date(_) => Err(InvalidAmount),
    }
}

/// Format an amount for storage, e.g. `50 €` or `12.5 €`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{} {CURRENCY_MARKER}", amount.normalize())
}

/// Numeric cell for a derived amount.
pub fn amount_cell(amount: Decimal) -> CellValue {
    amount
        .to_f64()
        .map(CellValue::Number)
        .unwrap_or(CellValue::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_and_whitespace() {
        assert_eq!(
            parse_amount(&CellValue::text("100 €")),
            Ok(Some(Decimal::from(100)))
        );
        assert_eq!(
            parse_amount(&CellValue::text("12.50€")),
            Ok(Some(Decimal::new(1250, 2)))
        );
    }

    #[test]
    fn numeric_cells_pass_through() {
        assert_eq!(
            parse_amount(&CellValue::Number(30.0)),
            Ok(Some(Decimal::from(30)))
        );
        assert_eq!(parse_amount(&CellValue::Empty), Ok(None));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(parse_amount(&CellValue::text("abc €")), Err(InvalidAmount));
        assert_eq!(parse_amount(&CellValue::text("€")), Err(InvalidAmount));
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_amount(Decimal::from(50)), "50 €");
        assert_eq!(format_amount(Decimal::new(1250, 2)), "12.5 €");
    }
}
