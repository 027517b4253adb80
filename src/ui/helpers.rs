use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::models::TableView;

/// Widest a column may grow before its cells are clipped.
const MAX_COLUMN_WIDTH: usize = 28;
const MIN_COLUMN_WIDTH: usize = 3;

/// Size each column to its longest header or cell, within fixed bounds.
pub(crate) fn column_widths(view: &TableView<'_>) -> Vec<Constraint> {
    let mut widths: Vec<usize> = view
        .columns()
        .iter()
        .map(|column| column.chars().count())
        .collect();

    for row in view.rows() {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.to_string().chars().count());
            }
        }
    }

    widths
        .into_iter()
        .map(|width| {
            let clamped = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            Constraint::Length(clamped as u16)
        })
        .collect()
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Table};

    #[test]
    fn widths_follow_content_within_bounds() {
        let mut table = Table::new("T", vec!["Nr".to_string(), "Band/Künstler".to_string()]);
        table.push_row(vec![
            CellValue::Number(1.0),
            CellValue::text("Das sehr lange Orchester der Nordstadt"),
        ]);

        let widths = column_widths(&TableView::all(&table));
        assert_eq!(
            widths,
            vec![
                Constraint::Length(MIN_COLUMN_WIDTH as u16),
                Constraint::Length(MAX_COLUMN_WIDTH as u16)
            ]
        );
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow::anyhow!("disk full").context("failed to save workbook");
        assert_eq!(surface_error(&err), "disk full");
    }
}
