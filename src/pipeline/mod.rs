//! Pure table transformations for the two curation stages.
//!
//! Nothing in here touches the filesystem; reading and writing tables is the
//! job of the use cases in `app` and the adapters in `infra`.

pub mod clade_filter;
pub mod finalize;
pub mod recency;

pub use clade_filter::{cross_validate, CrossValidation, CrossValidationSummary, CLADE_I_GROUP};
pub use finalize::{finalize_metadata, FinalizeSummary, FinalizedMetadata};
pub use recency::{classify, Recency, SubmissionDateError, RECENCY_THRESHOLDS, RECENT_UPDATES};
