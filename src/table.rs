//! In-memory tab-delimited table.
//!
//! Both curation stages work column-wise over whole tables: they read a
//! handful of named columns, add or overwrite derived ones and carry every
//! other column through untouched. `Table` keeps the header order and the row
//! order of the input so the written output lines up with what was read.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};

use crate::constants::TSV_DELIMITER;
use crate::error::{CurateError, Result};

/// A single field. Empty TSV fields are read as `None`.
pub type Cell = Option<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Where the table came from, used in error messages
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals, mostly useful in tests.
    /// Empty strings become `None` just like when reading a file.
    pub fn from_strs(name: &str, headers: &[&str], rows: &[&[&str]]) -> Result<Self> {
        let mut table = Self::new(name, headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| cell_from_field(v)).collect())?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| CurateError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Fail on the first missing column, in the order given.
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        for column in columns {
            self.require_column(column)?;
        }
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(CurateError::RaggedRow {
                table: self.name.clone(),
                row: self.rows.len() + 1,
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Value of `column` in data row `row` (0-based), `None` when null or absent.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Add `column` (appended after the existing columns) or overwrite it in
    /// place, computing each value from the row as it was before this call.
    pub fn set_column_with<F>(&mut self, column: &str, mut value: F) -> usize
    where
        F: FnMut(&[Cell]) -> Cell,
    {
        let values = self.rows.iter().map(|row| value(row)).collect();
        self.install_column(column, values)
    }

    /// Fallible variant of [`Table::set_column_with`]. Every value is computed
    /// before the table is touched, so on error the table is left unchanged.
    pub fn try_set_column_with<F>(&mut self, column: &str, mut value: F) -> Result<usize>
    where
        F: FnMut(usize, &[Cell]) -> Result<Cell>,
    {
        let values = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| value(i, row))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.install_column(column, values))
    }

    /// Install precomputed values, one per row.
    pub fn set_column(&mut self, column: &str, values: Vec<Cell>) -> usize {
        debug_assert_eq!(values.len(), self.rows.len());
        self.install_column(column, values)
    }

    fn install_column(&mut self, column: &str, values: Vec<Cell>) -> usize {
        match self.column_index(column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
                idx
            }
            None => {
                self.headers.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
                self.headers.len() - 1
            }
        }
    }

    /// Copy of this table keeping only the rows accepted by `keep`, in order.
    /// `keep` receives the 0-based row index and the row.
    pub fn filter_rows<F>(&self, name: impl Into<String>, mut keep: F) -> Table
    where
        F: FnMut(usize, &[Cell]) -> bool,
    {
        Table {
            name: name.into(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, row)| keep(*i, row))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }

    /// Parse a tab-delimited table with a header row. `location` names the
    /// source in errors and becomes the table name.
    pub fn read_tsv<R: Read>(location: &str, reader: R) -> Result<Table> {
        let csv_err = |source| CurateError::Csv {
            location: location.to_string(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .delimiter(TSV_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut table = Table::new(location, headers);

        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            table.push_row(record.iter().map(cell_from_field).collect())?;
        }

        Ok(table)
    }

    /// Write the header row and every data row; `None` becomes an empty field.
    pub fn write_tsv<W: Write>(&self, location: &str, writer: W) -> Result<()> {
        let csv_err = |source| CurateError::Csv {
            location: location.to_string(),
            source,
        };

        let mut wtr = WriterBuilder::new()
            .delimiter(TSV_DELIMITER)
            .from_writer(writer);

        wtr.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
                .map_err(csv_err)?;
        }
        wtr.flush().map_err(|source| CurateError::Csv {
            location: location.to_string(),
            source: source.into(),
        })?;
        Ok(())
    }
}

fn cell_from_field(field: &str) -> Cell {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
