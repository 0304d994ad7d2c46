use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::app::ports::{TableSinkPort, TableSourcePort};
use crate::error::{CurateError, Result};
use crate::table::Table;

/// File-based implementation of the table ports.
/// Reads and writes tab-delimited files with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvFileAdapter;

impl TsvFileAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> CurateError + '_ {
    move |source| CurateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TableSourcePort for TsvFileAdapter {
    fn read_table(&self, location: &Path) -> Result<Table> {
        let file = File::open(location).map_err(io_err(location))?;
        let table = Table::read_tsv(&location.display().to_string(), BufReader::new(file))?;
        debug!(path = %location.display(), rows = table.len(), "Read table");
        Ok(table)
    }
}

impl TableSinkPort for TsvFileAdapter {
    fn write_table(&self, location: &Path, table: &Table) -> Result<()> {
        if let Some(dir) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err(dir))?;
        }

        let file = File::create(location).map_err(io_err(location))?;
        let mut writer = BufWriter::new(file);
        table.write_tsv(&location.display().to_string(), &mut writer)?;
        writer.flush().map_err(io_err(location))?;

        debug!(path = %location.display(), rows = table.len(), "Wrote table");
        Ok(())
    }
}
