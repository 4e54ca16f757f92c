//! XLSX loading via calamine.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::{Cell, Worksheet};

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

/// Load one sheet (the first when `sheet` is None) as a row-array.
pub fn load_worksheet(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Worksheet> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names();
    let name = match sheet {
        Some(s) => names
            .iter()
            .find(|n| n.as_str() == s)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                name: s.to_string(),
                available: names.clone(),
            })?,
        None => names.first().cloned().ok_or(IngestError::EmptyWorkbook)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let ws = worksheet_from_range(&name, &range);
    debug!(sheet = %name, rows = ws.len(), "loaded worksheet");
    Ok(ws)
}

/// Convert a calamine range into absolute rows.
///
/// calamine trims leading empty rows/columns from the range; they are padded back so
/// row indices match the spreadsheet. Trailing empty cells are dropped from each row.
pub fn worksheet_from_range(name: &str, range: &Range<Data>) -> Worksheet {
    let (row_off, col_off) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_off];
    for r in range.rows() {
        let mut row: Vec<Cell> = vec![Cell::Empty; col_off];
        row.extend(r.iter().map(Cell::from));
        while row.last().is_some_and(Cell::is_empty) {
            row.pop();
        }
        rows.push(row);
    }

    Worksheet::from_rows(name, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_offsets_are_padded() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 3));
        range.set_value((2, 1), Data::String("01-Apr-2024".into()));
        range.set_value((2, 3), Data::Float(10.5));
        range.set_value((3, 2), Data::Int(7));

        let ws = worksheet_from_range("Sheet1", &range);
        assert_eq!(ws.len(), 4);
        assert!(ws.rows[0].is_empty());
        assert_eq!(
            ws.rows[2],
            vec![
                Cell::Empty,
                Cell::text("01-Apr-2024"),
                Cell::Empty,
                Cell::Number(10.5)
            ]
        );
        assert_eq!(ws.rows[3], vec![Cell::Empty, Cell::Empty, Cell::Number(7.0)]);
    }

    #[test]
    fn test_bool_and_error_cells() {
        assert_eq!(Cell::from(&Data::Bool(true)), Cell::text("TRUE"));
        assert_eq!(
            Cell::from(&Data::Error(calamine::CellErrorType::Div0)),
            Cell::Empty
        );
    }
}
