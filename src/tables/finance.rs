use rust_decimal::Decimal;

use crate::currency::{amount_cell, parse_amount};
use crate::error::ParseError;
use crate::models::{CellValue, Table};

/// Sheet holding contracts and fees.
pub const SHEET: &str = "Verträge & Gagen";

pub const COL_TICKET_REVENUE: &str = "Einnahmen aus Tickets";
pub const COL_COST: &str = "Kosten (Hotel, Technik)";
pub const COL_FEE: &str = "Gage";
/// Derived column, recomputed on every view and never authoritative on disk.
pub const COL_PROFIT_LOSS: &str = "Gewinn/Verlust";

/// Sums over a table returned by [`with_profit_loss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinanceTotals {
    pub ticket_revenue: Decimal,
    pub cost: Decimal,
    pub fee: Decimal,
    pub profit_loss: Decimal,
}

/// Convert the three currency columns to numbers and attach
/// `Gewinn/Verlust = Einnahmen - Gage - Kosten` to every row.
///
/// Cells that are already numeric are kept, so the result can be fed back in.
/// A row with an empty amount gets an empty profit/loss cell.
pub fn with_profit_loss(table: &Table) -> Result<Table, ParseError> {
    let mut derived = table.clone();
    let revenue_idx = required_column(table, COL_TICKET_REVENUE)?;
    let cost_idx = required_column(table, COL_COST)?;
    let fee_idx = required_column(table, COL_FEE)?;
    let profit_idx = derived.ensure_column(COL_PROFIT_LOSS);

    for (row_idx, row) in table.rows().iter().enumerate() {
        let revenue = amount_at(row, row_idx, revenue_idx, COL_TICKET_REVENUE)?;
        let cost = amount_at(row, row_idx, cost_idx, COL_COST)?;
        let fee = amount_at(row, row_idx, fee_idx, COL_FEE)?;

        derived.set_cell(row_idx, revenue_idx, revenue.map_or(CellValue::Empty, amount_cell));
        derived.set_cell(row_idx, cost_idx, cost.map_or(CellValue::Empty, amount_cell));
        derived.set_cell(row_idx, fee_idx, fee.map_or(CellValue::Empty, amount_cell));

        let profit = match (revenue, cost, fee) {
            (Some(revenue), Some(cost), Some(fee)) => amount_cell(revenue - fee - cost),
            _ => CellValue::Empty,
        };
        derived.set_cell(row_idx, profit_idx, profit);
    }

    Ok(derived)
}

/// Add up the numeric columns of a derived finance table. Empty cells count
/// as zero.
pub fn totals(table: &Table) -> Result<FinanceTotals, ParseError> {
    let revenue_idx = required_column(table, COL_TICKET_REVENUE)?;
    let cost_idx = required_column(table, COL_COST)?;
    let fee_idx = required_column(table, COL_FEE)?;
    let profit_idx = required_column(table, COL_PROFIT_LOSS)?;

    let mut totals = FinanceTotals::default();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let amount = |idx, column| {
            amount_at(row, row_idx, idx, column).map(Option::unwrap_or_default)
        };
        totals.ticket_revenue += amount(revenue_idx, COL_TICKET_REVENUE)?;
        totals.cost += amount(cost_idx, COL_COST)?;
        totals.fee += amount(fee_idx, COL_FEE)?;
        totals.profit_loss += amount(profit_idx, COL_PROFIT_LOSS)?;
    }
    Ok(totals)
}

fn required_column(table: &Table, column: &str) -> Result<usize, ParseError> {
    table
        .column_index(column)
        .ok_or_else(|| ParseError::MissingColumn {
            table: table.name().to_string(),
            column: column.to_string(),
        })
}

fn amount_at(
    row: &[CellValue],
    row_idx: usize,
    idx: usize,
    column: &str,
) -> Result<Option<Decimal>, ParseError> {
    let cell = row.get(idx).unwrap_or(&CellValue::Empty);
    parse_amount(cell).map_err(|_| ParseError::Currency {
        row: row_idx,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finances(rows: &[[&str; 3]]) -> Table {
        let mut table = Table::new(
            SHEET,
            vec![
                "Band".to_string(),
                COL_TICKET_REVENUE.to_string(),
                COL_COST.to_string(),
                COL_FEE.to_string(),
            ],
        );
        for [revenue, cost, fee] in rows {
            table.push_row(vec![
                CellValue::text("Quartett"),
                CellValue::text(*revenue),
                CellValue::text(*cost),
                CellValue::text(*fee),
            ]);
        }
        table
    }

    #[test]
    fn profit_is_revenue_minus_fee_minus_cost() {
        let table = finances(&[["100 €", "20 €", "30 €"]]);
        let derived = with_profit_loss(&table).unwrap();

        assert_eq!(derived.columns().last().map(String::as_str), Some(COL_PROFIT_LOSS));
        assert_eq!(derived.cell(0, COL_PROFIT_LOSS), Some(&CellValue::Number(50.0)));
        assert_eq!(derived.cell(0, COL_TICKET_REVENUE), Some(&CellValue::Number(100.0)));
        assert_eq!(derived.cell(0, "Band"), Some(&CellValue::text("Quartett")));
    }

    #[test]
    fn source_table_stays_untouched() {
        let table = finances(&[["100 €", "20 €", "30 €"]]);
        let before = table.clone();
        with_profit_loss(&table).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn reapplying_on_numeric_columns_is_stable() {
        let table = finances(&[["100 €", "20 €", "30 €"], ["80 €", "12.5 €", "90 €"]]);
        let once = with_profit_loss(&table).unwrap();
        let twice = with_profit_loss(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.cell(1, COL_PROFIT_LOSS), Some(&CellValue::Number(-22.5)));
    }

    #[test]
    fn non_numeric_amount_names_row_and_column() {
        let table = finances(&[["100 €", "20 €", "30 €"], ["100 €", "20 €", "abc €"]]);
        let err = with_profit_loss(&table).unwrap_err();

        assert_eq!(
            err,
            ParseError::Currency {
                row: 1,
                column: COL_FEE.to_string(),
                value: "abc €".to_string(),
            }
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let table = Table::new(SHEET, vec![COL_TICKET_REVENUE.to_string()]);
        assert!(matches!(
            with_profit_loss(&table),
            Err(ParseError::MissingColumn { column, .. }) if column == COL_COST
        ));
    }

    #[test]
    fn empty_amount_leaves_profit_empty() {
        let table = finances(&[["100 €", "", "30 €"]]);
        let derived = with_profit_loss(&table).unwrap();
        assert_eq!(derived.cell(0, COL_PROFIT_LOSS), Some(&CellValue::Empty));
    }

    #[test]
    fn totals_sum_every_row() {
        let table = finances(&[["100 €", "20 €", "30 €"], ["80 €", "10 €", "90 €"]]);
        let totals = totals(&with_profit_loss(&table).unwrap()).unwrap();

        assert_eq!(totals.ticket_revenue, Decimal::from(180));
        assert_eq!(totals.cost, Decimal::from(30));
        assert_eq!(totals.fee, Decimal::from(120));
        assert_eq!(totals.profit_loss, Decimal::from(30));
    }
}
