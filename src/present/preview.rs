//! Plain-text preview of the uploaded table.

use crate::data::RawTable;
use std::fmt;

/// Rows shown when no count is given.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// The first rows of a raw table, rendered as aligned columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPreview {
    head: RawTable,
    total_rows: usize,
}

impl DataPreview {
    pub fn new(table: &RawTable, rows: usize) -> Self {
        Self {
            head: table.head(rows),
            total_rows: table.len(),
        }
    }

    pub fn table(&self) -> &RawTable {
        &self.head
    }

    /// Row count of the full table.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}

impl fmt::Display for DataPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.head.headers();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.head
                    .rows()
                    .iter()
                    .map(|row| row[i].chars().count())
                    .fold(h.chars().count(), usize::max)
            })
            .collect();

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_line(f, headers)?;
        for row in self.head.rows() {
            write_line(f, row)?;
        }
        if self.total_rows > self.head.len() {
            writeln!(f, "... {} more rows", self.total_rows - self.head.len())?;
        }
        Ok(())
    }
}
