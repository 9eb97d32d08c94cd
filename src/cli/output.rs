use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StatsJson {
    pub items: usize,
    pub timeline_entries: usize,
    pub counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub tags: IndexMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct DumpEntryJson {
    pub position: usize,
    pub original_index: usize,
    pub kind: String,
    pub timestamp: String,
    pub summary: String,
}
