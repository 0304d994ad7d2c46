use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::ports::{TableSinkPort, TableSourcePort};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::clade_filter::{cross_validate, CrossValidationSummary, CLADE_I_GROUP};

#[derive(Debug, Clone)]
pub struct RefineNextcladeRequest {
    /// Nextclade results from the run over every clade
    pub input_all: PathBuf,
    /// Nextclade results from the clade I dataset run
    pub input_clade_i: PathBuf,
    pub output_clade_i: PathBuf,
}

/// Use case for cross-validating clade I Nextclade calls against the all-clades run
pub struct RefineNextcladeUseCase {
    source: Box<dyn TableSourcePort>,
    sink: Box<dyn TableSinkPort>,
}

impl RefineNextcladeUseCase {
    pub fn new(source: Box<dyn TableSourcePort>, sink: Box<dyn TableSinkPort>) -> Self {
        Self { source, sink }
    }

    pub fn run(&self, request: &RefineNextcladeRequest) -> Result<CrossValidationSummary> {
        let span = tracing::info_span!(
            "refine_nextclade",
            input_all = %request.input_all.display(),
            input_clade_i = %request.input_clade_i.display()
        );
        let _enter = span.enter();

        let clade_group = self.source.read_table(&request.input_clade_i)?;
        let all_clades = self.source.read_table(&request.input_all)?;
        info!(
            all_clades_rows = all_clades.len(),
            clade_group_rows = clade_group.len(),
            "Loaded Nextclade results"
        );

        let result = cross_validate(&all_clades, &clade_group, &CLADE_I_GROUP)?;
        let summary = result.summary;

        if summary.dropped_by_clade > 0 {
            warn!(
                rows = summary.dropped_by_clade,
                "Clade I results contained rows outside the clade group"
            );
        }
        if summary.pruned_by_membership > 0 {
            warn!(
                rows = summary.pruned_by_membership,
                "Clade I rows not confirmed by the all-clades run were dropped"
            );
        }

        self.sink.write_table(&request.output_clade_i, &result.table)?;

        metrics::nextclade::run_completed(&summary);
        info!(
            emitted = summary.emitted,
            output = %request.output_clade_i.display(),
            "Refined clade I Nextclade results"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{LINEAGE, SEQ_NAME};
    use crate::error::CurateError;
    use crate::table::Table;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemoryTables {
        tables: Arc<Mutex<HashMap<PathBuf, Table>>>,
    }

    impl MemoryTables {
        fn insert(&self, location: &str, table: Table) {
            self.tables.lock().unwrap().insert(PathBuf::from(location), table);
        }

        fn get(&self, location: &str) -> Option<Table> {
            self.tables.lock().unwrap().get(Path::new(location)).cloned()
        }
    }

    impl TableSourcePort for MemoryTables {
        fn read_table(&self, location: &Path) -> Result<Table> {
            self.get(&location.to_string_lossy()).ok_or_else(|| CurateError::Io {
                path: location.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    impl TableSinkPort for MemoryTables {
        fn write_table(&self, location: &Path, table: &Table) -> Result<()> {
            self.insert(&location.to_string_lossy(), table.clone());
            Ok(())
        }
    }

    fn request() -> RefineNextcladeRequest {
        RefineNextcladeRequest {
            input_all: PathBuf::from("nextclade_all.tsv"),
            input_clade_i: PathBuf::from("nextclade_cladeI.tsv"),
            output_clade_i: PathBuf::from("nextclade_cladeI_refined.tsv"),
        }
    }

    fn qc(name: &str, rows: &[&[&str]]) -> Table {
        Table::from_strs(name, &["index", "seqName", "clade"], rows).unwrap()
    }

    #[test]
    fn test_refine_nextclade_use_case_writes_confirmed_rows() {
        let store = MemoryTables::default();
        store.insert(
            "nextclade_all.tsv",
            qc("nextclade_all.tsv", &[&["0", "PP1", "Ia"], &["1", "PP2", "IIb"], &["2", "PP3", "Ib"]]),
        );
        store.insert(
            "nextclade_cladeI.tsv",
            qc("nextclade_cladeI.tsv", &[&["0", "PP1", "Ia"], &["1", "PP2", "I"], &["2", "PP3", "Ib"]]),
        );
        let use_case = RefineNextcladeUseCase::new(Box::new(store.clone()), Box::new(store.clone()));

        let summary = use_case.run(&request()).unwrap();
        assert_eq!(summary.emitted, 2);
        assert_eq!(summary.pruned_by_membership, 1);

        let out = store.get("nextclade_cladeI_refined.tsv").unwrap();
        assert_eq!(out.get(0, SEQ_NAME), Some("PP1"));
        assert_eq!(out.get(1, SEQ_NAME), Some("PP3"));
        assert_eq!(out.headers().last().map(String::as_str), Some(LINEAGE));
    }

    #[test]
    fn test_schema_error_writes_nothing() {
        let store = MemoryTables::default();
        store.insert(
            "nextclade_all.tsv",
            Table::from_strs("nextclade_all.tsv", &["seqName"], &[&["PP1"]]).unwrap(),
        );
        store.insert(
            "nextclade_cladeI.tsv",
            qc("nextclade_cladeI.tsv", &[&["0", "PP1", "Ia"]]),
        );
        let use_case = RefineNextcladeUseCase::new(Box::new(store.clone()), Box::new(store.clone()));

        let err = use_case.run(&request()).unwrap_err();
        assert!(matches!(err, CurateError::MissingColumn { .. }));
        assert!(store.get("nextclade_cladeI_refined.tsv").is_none());
    }
}
