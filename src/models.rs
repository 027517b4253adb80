//! In-memory representation of the workbook. The types here stay plain data
//! holders: the store fills them from the xlsx file, the table modules derive
//! views from them, and the UI renders them cell by cell.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};

/// A single cell as it is held in memory. Empty strings never reach this type
/// as `Text`; use [`CellValue::text`] to keep that normalisation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Build a text cell, mapping the empty string to [`CellValue::Empty`]
    /// because the workbook cannot tell the two apart once written.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    /// Render the cell the way the dashboard shows it: integral numbers without
    /// a fraction and dates in German day-month-year order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{number}")
                }
            }
            CellValue::Bool(true) => f.write_str("WAHR"),
            CellValue::Bool(false) => f.write_str("FALSCH"),
            CellValue::Date(date) => {
                if date.time() == NaiveTime::MIN {
                    write!(f, "{}", date.format("%d.%m.%Y"))
                } else {
                    write!(f, "{}", date.format("%d.%m.%Y %H:%M"))
                }
            }
        }
    }
}

/// A row handed to [`Table::append`], keyed by column name. Order only matters
/// for columns the table does not know yet: they are added in record order.
pub type Record = Vec<(String, CellValue)>;

/// A named sheet: ordered column names plus rows holding one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Look up a cell by row position and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(idx))
    }

    pub(crate) fn set_cell(&mut self, row: usize, column: usize, value: CellValue) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = value;
        }
    }

    /// Return the index of `column`, adding it (filled with empty cells) when
    /// the table does not have it yet.
    pub fn ensure_column(&mut self, column: &str) -> usize {
        if let Some(idx) = self.column_index(column) {
            return idx;
        }
        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    /// Push positional cells, padding or truncating to the column count.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(cells);
    }

    /// Insert `record` after the last row. Existing rows keep their order and
    /// values; unknown columns are added, missing ones stay empty.
    pub fn append(&mut self, record: Record) {
        for (column, _) in &record {
            self.ensure_column(column);
        }
        let mut cells = vec![CellValue::Empty; self.columns.len()];
        for (column, value) in record {
            if let Some(idx) = self.column_index(&column) {
                cells[idx] = value;
            }
        }
        self.rows.push(cells);
    }
}

/// A borrowed selection of rows from a table, in table order.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a Table,
    indices: Vec<usize>,
}

impl<'a> TableView<'a> {
    /// A view over every row.
    pub fn all(table: &'a Table) -> Self {
        Self {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// A view over the rows accepted by `keep`.
    pub fn matching<F>(table: &'a Table, mut keep: F) -> Self
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let indices = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(row))
            .map(|(idx, _)| idx)
            .collect();
        Self { table, indices }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn columns(&self) -> &'a [String] {
        self.table.columns()
    }

    /// Positions of the selected rows within the underlying table.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [CellValue]> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |&idx| rows[idx].as_slice())
    }
}

/// Every sheet of the workbook, in sheet order, addressable by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCollection {
    tables: Vec<Table>,
}

impl TableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing a same-named one in place so sheet order holds.
    pub fn insert(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(Table::name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for TableCollection {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut collection = TableCollection::new();
        for table in iter {
            collection.insert(table);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a TableCollection {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new("Sheet", vec!["A".to_string(), "B".to_string()]);
        table.push_row(vec![CellValue::text("x"), CellValue::Number(1.0)]);
        table.push_row(vec![CellValue::text("y")]);
        table
    }

    #[test]
    fn push_row_pads_to_column_count() {
        let table = sample();
        assert_eq!(table.rows()[1], vec![CellValue::text("y"), CellValue::Empty]);
    }

    #[test]
    fn append_adds_unknown_columns_and_keeps_rows() {
        let mut table = sample();
        let before = table.rows().to_vec();
        table.append(vec![
            ("B".to_string(), CellValue::Number(2.0)),
            ("C".to_string(), CellValue::text("new")),
        ]);

        assert_eq!(table.columns(), ["A", "B", "C"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0][..2], before[0][..]);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
        assert_eq!(
            table.rows()[2],
            vec![CellValue::Empty, CellValue::Number(2.0), CellValue::text("new")]
        );
    }

    #[test]
    fn view_keeps_table_order() {
        let table = sample();
        let view = TableView::matching(&table, |row| !row[0].is_empty());
        assert_eq!(view.indices(), [0, 1]);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut tables: TableCollection =
            [Table::new("One", vec![]), Table::new("Two", vec![])].into_iter().collect();
        tables.insert(Table::new("One", vec!["X".to_string()]));

        assert_eq!(tables.names().collect::<Vec<_>>(), ["One", "Two"]);
        assert_eq!(tables.get("One").map(|t| t.columns().len()), Some(1));
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(120.0).to_string(), "120");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::text(""), CellValue::Empty);
    }
}
