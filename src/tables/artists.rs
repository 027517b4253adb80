use crate::models::{Table, TableView};

/// Sheet holding the artist and band reference list.
pub const SHEET: &str = "Bands-Künstler";

/// The artist sheet is shown as it is: no filtering, no derived columns.
pub fn list(table: &Table) -> TableView<'_> {
    TableView::all(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    #[test]
    fn list_returns_every_row_in_order() {
        let mut table = Table::new(SHEET, vec!["Name".to_string(), "Genre".to_string()]);
        table.push_row(vec![CellValue::text("Trio Nord"), CellValue::text("Jazz")]);
        table.push_row(vec![CellValue::text("Delta Kings"), CellValue::text("Blues")]);

        let view = list(&table);
        assert_eq!(view.indices(), [0, 1]);
        assert_eq!(view.columns(), table.columns());
    }
}
