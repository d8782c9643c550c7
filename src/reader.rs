/*!
 * Tabular source boundary
 *
 * The extraction engine never touches workbook mechanics directly; it reads
 * through the `TabularSource` trait. `WorkbookSource` adapts an `.xlsx`
 * workbook via calamine, and `VecSource` provides an in-memory grid for
 * tests and fixtures.
 */

use std::collections::HashMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, DataType as _, Reader, Xlsx};

use crate::data_types::Cell;
use crate::error::{ClaimsError, ErrorContext, Result};

/// A claim table read from one sheet: the header row at the profile's
/// offset, followed by every data row the source reports (blank rows
/// included — filtering happens downstream).
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Index of the column with the given header, if present
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at (row, col) within the data rows, Empty when the row is ragged
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or(Cell::Empty)
    }
}

/// Read access to tabular data, independent of the storage format
pub trait TabularSource {
    /// Read the claim table from `sheet_name`, treating the row at
    /// `header_offset` (within the populated range) as the header row
    fn read_sheet(&mut self, sheet_name: &str, header_offset: usize) -> Result<Table>;

    /// Read a single cell at absolute sheet coordinates, outside the
    /// header/row grid. Used for fixed-coordinate cross-reference reads.
    fn read_cell(&mut self, sheet_name: &str, row: u32, col: u32) -> Result<Cell>;
}

/// An `.xlsx` workbook behind the `TabularSource` trait
pub struct WorkbookSource {
    path: PathBuf,
    workbook: Xlsx<BufReader<std::fs::File>>,
}

impl WorkbookSource {
    /// Open a workbook, failing early with a suggestion if the path is bad
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClaimsError::file_not_found(path.to_path_buf()));
        }
        let workbook = open_workbook(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    fn range(&mut self, sheet_name: &str) -> Result<calamine::Range<Data>> {
        if !self
            .workbook
            .sheet_names()
            .iter()
            .any(|s| s == sheet_name)
        {
            return Err(ClaimsError::MissingSheet {
                sheet: sheet_name.to_string(),
                path: self.path.clone(),
            });
        }
        self.workbook
            .worksheet_range(sheet_name)
            .map_err(ClaimsError::from)
    }
}

impl TabularSource for WorkbookSource {
    fn read_sheet(&mut self, sheet_name: &str, header_offset: usize) -> Result<Table> {
        let range = self.range(sheet_name)?;
        let mut rows = range.rows().skip(header_offset);

        let header_row = rows.next().ok_or_else(|| ClaimsError::SheetRead {
            message: format!(
                "sheet '{}' has no header row at offset {}",
                sheet_name, header_offset
            ),
            context: ErrorContext::for_file(self.path.clone()),
        })?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|d| convert(d).as_text().unwrap_or_default())
            .collect();
        let data: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(convert).collect())
            .collect();

        Ok(Table {
            sheet_name: sheet_name.to_string(),
            headers,
            rows: data,
        })
    }

    fn read_cell(&mut self, sheet_name: &str, row: u32, col: u32) -> Result<Cell> {
        let range = self.range(sheet_name)?;
        Ok(range
            .get_value((row, col))
            .map(convert)
            .unwrap_or(Cell::Empty))
    }
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) => data.as_date().map(Cell::Date).unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// In-memory tabular source backed by plain cell grids.
///
/// Mainly for tests: fixtures can exercise the full extraction path without
/// workbook files on disk.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    sheets: HashMap<String, Vec<Vec<Cell>>>,
}

impl VecSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet as a full grid, preamble rows included
    pub fn with_sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.insert(name.to_string(), rows);
        self
    }
}

impl TabularSource for VecSource {
    fn read_sheet(&mut self, sheet_name: &str, header_offset: usize) -> Result<Table> {
        let grid = self.sheets.get(sheet_name).ok_or_else(|| ClaimsError::MissingSheet {
            sheet: sheet_name.to_string(),
            path: PathBuf::from("<memory>"),
        })?;

        let header_row = grid.get(header_offset).ok_or_else(|| ClaimsError::SheetRead {
            message: format!(
                "sheet '{}' has no header row at offset {}",
                sheet_name, header_offset
            ),
            context: ErrorContext::default(),
        })?;

        Ok(Table {
            sheet_name: sheet_name.to_string(),
            headers: header_row
                .iter()
                .map(|c| c.as_text().unwrap_or_default())
                .collect(),
            rows: grid[header_offset + 1..].to_vec(),
        })
    }

    fn read_cell(&mut self, sheet_name: &str, row: u32, col: u32) -> Result<Cell> {
        let grid = self.sheets.get(sheet_name).ok_or_else(|| ClaimsError::MissingSheet {
            sheet: sheet_name.to_string(),
            path: PathBuf::from("<memory>"),
        })?;
        Ok(grid
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .cloned()
            .unwrap_or(Cell::Empty))
    }
}
