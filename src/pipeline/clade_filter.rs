use std::collections::HashSet;

use tracing::debug;

use crate::constants::{CLADE, LINEAGE, REQUIRED_NEXTCLADE_COLUMNS, SEQ_NAME};
use crate::error::Result;
use crate::table::Table;

/// Clades that make up the clade I build
pub const CLADE_I_GROUP: [&str; 3] = ["I", "Ia", "Ib"];

/// Result of cross-validating the clade-group table against the all-clades table
#[derive(Debug, Clone)]
pub struct CrossValidation {
    pub table: Table,
    pub summary: CrossValidationSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossValidationSummary {
    pub all_clades_rows: usize,
    /// Rows of the all-clades table inside the clade group
    pub all_clades_in_group: usize,
    pub clade_group_rows: usize,
    /// Clade-group rows whose clade is outside the group
    pub dropped_by_clade: usize,
    /// In-group rows with no matching in-group row in the all-clades table
    pub pruned_by_membership: usize,
    pub emitted: usize,
}

impl CrossValidationSummary {
    /// True when the two upstream tables disagreed about group membership
    pub fn has_drift(&self) -> bool {
        self.dropped_by_clade > 0 || self.pruned_by_membership > 0
    }
}

fn in_group(clade: Option<&str>, group: &[&str]) -> bool {
    clade.is_some_and(|clade| group.iter().any(|member| *member == clade))
}

/// Keep only rows whose `clade` belongs to `group`.
pub fn filter_to_group(table: &Table, group: &[&str]) -> Result<Table> {
    let clade = table.require_column(CLADE)?;
    Ok(table.filter_rows(table.name(), |_, row| in_group(row[clade].as_deref(), group)))
}

/// Restrict `clade_group` to sequences the all-clades run also places in
/// `group`, then add an empty `lineage` column.
///
/// `clade_group` is re-filtered by clade even though upstream already
/// restricted it; the all-clades table decides membership.
pub fn cross_validate(
    all_clades: &Table,
    clade_group: &Table,
    group: &[&str],
) -> Result<CrossValidation> {
    all_clades.require_columns(&REQUIRED_NEXTCLADE_COLUMNS)?;
    clade_group.require_columns(&REQUIRED_NEXTCLADE_COLUMNS)?;

    let group_filtered = filter_to_group(clade_group, group)?;
    let all_filtered = filter_to_group(all_clades, group)?;

    let all_seq = all_filtered.require_column(SEQ_NAME)?;
    let members: HashSet<&str> = all_filtered
        .rows()
        .iter()
        .filter_map(|row| row[all_seq].as_deref())
        .collect();

    let group_seq = group_filtered.require_column(SEQ_NAME)?;
    let mut table = group_filtered.filter_rows(clade_group.name(), |_, row| {
        row[group_seq]
            .as_deref()
            .is_some_and(|name| members.contains(name))
    });
    table.set_column_with(LINEAGE, |_| Some(String::new()));

    let summary = CrossValidationSummary {
        all_clades_rows: all_clades.len(),
        all_clades_in_group: all_filtered.len(),
        clade_group_rows: clade_group.len(),
        dropped_by_clade: clade_group.len() - group_filtered.len(),
        pruned_by_membership: group_filtered.len() - table.len(),
        emitted: table.len(),
    };
    debug!(?summary, ?group, "Cross-validated clade group");

    Ok(CrossValidation { table, summary })
}
