/// Column names shared by the metadata and Nextclade tables.
/// Upstream tools fix these headers, so they are matched exactly.

// Metadata table, as produced by the ingest workflow
pub const ACCESSION: &str = "accession";
pub const STRAIN: &str = "strain";
pub const DATE: &str = "date";
pub const DATE_SUBMITTED: &str = "date_submitted";

// Columns derived by the metadata finalizer
pub const DATABASE: &str = "database";
pub const NOTE: &str = "note";
pub const DATE_YEAR: &str = "date_year";
pub const UPDATE: &str = "update";

// Nextclade QC table
pub const SEQ_NAME: &str = "seqName";
pub const CLADE: &str = "clade";
pub const LINEAGE: &str = "lineage";

/// Provenance stamped on every finalized metadata row
pub const GENBANK: &str = "GenBank";

/// Columns the metadata finalizer reads
pub const REQUIRED_METADATA_COLUMNS: [&str; 4] = [ACCESSION, STRAIN, DATE, DATE_SUBMITTED];

/// Columns the clade cross-validator reads
pub const REQUIRED_NEXTCLADE_COLUMNS: [&str; 2] = [SEQ_NAME, CLADE];

/// Field delimiter of every table read or written
pub const TSV_DELIMITER: u8 = b'\t';
