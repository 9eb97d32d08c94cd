use std::collections::HashSet;

use crate::model::{ItemKind, RawItem};

use super::filter::DisplaySequence;

/// Matched original-buffer indices declared by a query item. Empty for
/// anything that is not a query and for malformed `matched_indices`,
/// never an error.
pub fn resolve_matches(item: &RawItem) -> Vec<usize> {
    if item.kind != ItemKind::Query {
        return Vec::new();
    }
    item.matched_indices()
}

/// Project matched original indices onto the current display sequence.
///
/// Each original index contributes every display position mapping to it (a
/// prompt can surface as both request and completion). Originals hidden by
/// the active filter contribute nothing. Positions come back ascending and
/// without duplicates.
pub fn project_to_display(matched: &[usize], display: &DisplaySequence) -> Vec<usize> {
    if matched.is_empty() {
        return Vec::new();
    }
    let wanted: HashSet<usize> = matched.iter().copied().collect();
    display
        .index_map
        .iter()
        .enumerate()
        .filter(|(_, original)| wanted.contains(original))
        .map(|(pos, _)| pos)
        .collect()
}
