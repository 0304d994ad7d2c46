use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::app::ports::{TableSinkPort, TableSourcePort};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::finalize::{finalize_metadata, FinalizeSummary};

#[derive(Debug, Clone)]
pub struct FinalizeMetadataRequest {
    pub input_metadata: PathBuf,
    pub output_metadata: PathBuf,
    pub output_update: PathBuf,
    /// Date every submission is measured against, captured once per run
    pub reference_date: NaiveDate,
}

/// Use case for finalizing the GenBank metadata table and its recent-updates subset
pub struct FinalizeMetadataUseCase {
    source: Box<dyn TableSourcePort>,
    sink: Box<dyn TableSinkPort>,
}

impl FinalizeMetadataUseCase {
    pub fn new(source: Box<dyn TableSourcePort>, sink: Box<dyn TableSinkPort>) -> Self {
        Self { source, sink }
    }

    /// Read, transform and write. Both outputs are built in memory before
    /// either is written.
    pub fn run(&self, request: &FinalizeMetadataRequest) -> Result<FinalizeSummary> {
        let span = tracing::info_span!(
            "finalize_metadata",
            input = %request.input_metadata.display(),
            reference_date = %request.reference_date
        );
        let _enter = span.enter();

        let table = self.source.read_table(&request.input_metadata)?;
        info!(rows = table.len(), columns = table.headers().len(), "Loaded metadata");

        let finalized = finalize_metadata(table, request.reference_date)?;

        self.sink.write_table(&request.output_metadata, &finalized.full)?;
        self.sink.write_table(&request.output_update, &finalized.recent)?;

        let summary = finalized.summary;
        metrics::finalize::run_completed(&summary);
        info!(
            rows = summary.rows,
            classified = summary.classified,
            without_submission_date = summary.without_submission_date,
            recent = summary.recent,
            output = %request.output_metadata.display(),
            updates = %request.output_update.display(),
            "Finalized metadata"
        );

        Ok(summary)
    }
}
