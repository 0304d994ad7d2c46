use chrono::NaiveDate;
use tracing::debug;

use crate::constants::{
    ACCESSION, DATABASE, DATE, DATE_SUBMITTED, DATE_YEAR, GENBANK, NOTE,
    REQUIRED_METADATA_COLUMNS, STRAIN, UPDATE,
};
use crate::error::{CurateError, Result};
use crate::pipeline::recency::{classify, Recency, SubmissionDateError};
use crate::table::Table;

/// Output of the metadata finalizer
#[derive(Debug, Clone)]
pub struct FinalizedMetadata {
    /// Every input row with the derived columns
    pub full: Table,
    /// Rows submitted within the last two weeks, in input order
    pub recent: Table,
    pub summary: FinalizeSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizeSummary {
    pub rows: usize,
    /// Rows that received an `update` value
    pub classified: usize,
    pub without_submission_date: usize,
    pub recent: usize,
}

/// Year component of a possibly partial ISO date: everything before the first `-`.
pub fn derive_date_year(date: &str) -> &str {
    date.split_once('-').map_or(date, |(year, _)| year)
}

/// Recency bucket for one row. Rows without a submission date get none.
pub fn derive_update(
    date_submitted: Option<&str>,
    reference: NaiveDate,
) -> std::result::Result<Option<Recency>, SubmissionDateError> {
    date_submitted
        .map(|submitted| classify(submitted, reference))
        .transpose()
}

/// Annotate the metadata table and split out recently submitted rows.
///
/// `strain` is replaced by `accession` after its original value has been kept
/// in `note`. A malformed `date_submitted` fails the whole table; nothing is
/// returned for partial output.
pub fn finalize_metadata(mut table: Table, reference: NaiveDate) -> Result<FinalizedMetadata> {
    table.require_columns(&REQUIRED_METADATA_COLUMNS)?;
    let accession = table.require_column(ACCESSION)?;
    let strain = table.require_column(STRAIN)?;
    let date = table.require_column(DATE)?;
    let submitted = table.require_column(DATE_SUBMITTED)?;

    // Classify first so a bad date aborts before any column is touched.
    let updates = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            derive_update(row[submitted].as_deref(), reference).map_err(|source| {
                CurateError::DateParse {
                    row: i + 1,
                    column: DATE_SUBMITTED.to_string(),
                    value: row[submitted].clone().unwrap_or_default(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    table.set_column_with(DATABASE, |_| Some(GENBANK.to_string()));
    table.set_column_with(NOTE, |row| row[strain].clone());
    table.set_column_with(STRAIN, |row| row[accession].clone());
    table.set_column_with(DATE_YEAR, |row| {
        row[date].as_deref().map(|d| derive_date_year(d).to_string())
    });
    table.set_column(
        UPDATE,
        updates
            .iter()
            .map(|update| update.map(|r| r.label().to_string()))
            .collect(),
    );

    let recent_name = format!("{} (recent)", table.name());
    let recent = table.filter_rows(recent_name, |i, _| {
        updates[i].is_some_and(Recency::is_recent)
    });

    let summary = FinalizeSummary {
        rows: table.len(),
        classified: updates.iter().filter(|u| u.is_some()).count(),
        without_submission_date: updates.iter().filter(|u| u.is_none()).count(),
        recent: recent.len(),
    };
    debug!(?summary, %reference, "Finalized metadata table");

    Ok(FinalizedMetadata {
        full: table,
        recent,
        summary,
    })
}
