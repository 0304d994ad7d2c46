//! Metrics for the curation runs.
//!
//! Recording goes through the `metrics` facade; without an installed recorder
//! every call is a no-op, so library users and tests pay nothing. The binary
//! installs a Prometheus recorder and logs the rendered snapshot at the end
//! of a run.

use std::fmt;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Metadata finalizer
    MetadataRuns,
    MetadataRows,
    MetadataRowsClassified,
    MetadataRowsWithoutSubmissionDate,
    MetadataRecentRows,

    // Nextclade cross-validation
    NextcladeRuns,
    NextcladeAllCladesRows,
    NextcladeCladeGroupRows,
    NextcladeRowsDroppedByClade,
    NextcladeRowsPruned,
    NextcladeRowsEmitted,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::MetadataRuns => "curate_metadata_runs_total",
            MetricName::MetadataRows => "curate_metadata_rows_total",
            MetricName::MetadataRowsClassified => "curate_metadata_rows_classified_total",
            MetricName::MetadataRowsWithoutSubmissionDate => {
                "curate_metadata_rows_without_submission_date_total"
            }
            MetricName::MetadataRecentRows => "curate_metadata_recent_rows_total",

            MetricName::NextcladeRuns => "curate_nextclade_runs_total",
            MetricName::NextcladeAllCladesRows => "curate_nextclade_all_clades_rows_total",
            MetricName::NextcladeCladeGroupRows => "curate_nextclade_clade_group_rows_total",
            MetricName::NextcladeRowsDroppedByClade => {
                "curate_nextclade_rows_dropped_by_clade_total"
            }
            MetricName::NextcladeRowsPruned => "curate_nextclade_rows_pruned_total",
            MetricName::NextcladeRowsEmitted => "curate_nextclade_rows_emitted_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            MetadataRuns,
            MetadataRows,
            MetadataRowsClassified,
            MetadataRowsWithoutSubmissionDate,
            MetadataRecentRows,
            NextcladeRuns,
            NextcladeAllCladesRows,
            NextcladeCladeGroupRows,
            NextcladeRowsDroppedByClade,
            NextcladeRowsPruned,
            NextcladeRowsEmitted,
        ]
        .into_iter()
    }
}

fn count(name: MetricName, value: usize) {
    ::metrics::counter!(name.as_str()).increment(value as u64);
}

/// Install the in-process Prometheus recorder. No listener or push gateway
/// is started; call [`PrometheusHandle::render`] to read the values.
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    info!("Metrics system initialized");
    Ok(handle)
}

pub mod finalize {
    use super::{count, MetricName};
    use crate::pipeline::finalize::FinalizeSummary;

    /// Record the outcome of one metadata finalizer run
    pub fn run_completed(summary: &FinalizeSummary) {
        count(MetricName::MetadataRuns, 1);
        count(MetricName::MetadataRows, summary.rows);
        count(MetricName::MetadataRowsClassified, summary.classified);
        count(
            MetricName::MetadataRowsWithoutSubmissionDate,
            summary.without_submission_date,
        );
        count(MetricName::MetadataRecentRows, summary.recent);
    }
}

pub mod nextclade {
    use super::{count, MetricName};
    use crate::pipeline::clade_filter::CrossValidationSummary;

    /// Record the outcome of one cross-validation run
    pub fn run_completed(summary: &CrossValidationSummary) {
        count(MetricName::NextcladeRuns, 1);
        count(MetricName::NextcladeAllCladesRows, summary.all_clades_rows);
        count(MetricName::NextcladeCladeGroupRows, summary.clade_group_rows);
        count(MetricName::NextcladeRowsDroppedByClade, summary.dropped_by_clade);
        count(MetricName::NextcladeRowsPruned, summary.pruned_by_membership);
        count(MetricName::NextcladeRowsEmitted, summary.emitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_counters() {
        let names: HashSet<_> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("curate_") && n.ends_with("_total")));
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        finalize::run_completed(&Default::default());
        nextclade::run_completed(&Default::default());
    }
}
