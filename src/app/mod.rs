pub mod ports;
pub mod finalize_metadata_use_case;
pub mod refine_nextclade_use_case;

pub use finalize_metadata_use_case::{FinalizeMetadataRequest, FinalizeMetadataUseCase};
pub use refine_nextclade_use_case::{RefineNextcladeRequest, RefineNextcladeUseCase};
