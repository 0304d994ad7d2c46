use std::path::Path;

use crate::error::Result;
use crate::table::Table;

/// Where the use cases load tables from
pub trait TableSourcePort: Send + Sync {
    fn read_table(&self, location: &Path) -> Result<Table>;
}

/// Where the use cases write finished tables
pub trait TableSinkPort: Send + Sync {
    fn write_table(&self, location: &Path, table: &Table) -> Result<()>;
}
