use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::{ItemKind, RawItem};

use super::expand::ExpandedItem;

/// The type dimension of the filter. Both synthetic halves of a prompt
/// filter under `Prompt`; every unrecognized recorded type filters under
/// `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    Event,
    Query,
    Prompt,
    Other,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Event,
        FilterKind::Query,
        FilterKind::Prompt,
        FilterKind::Other,
    ];

    pub fn of_item(kind: &ItemKind) -> FilterKind {
        match kind {
            ItemKind::Event => FilterKind::Event,
            ItemKind::Query => FilterKind::Query,
            ItemKind::Prompt => FilterKind::Prompt,
            ItemKind::Other(_) => FilterKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::Event => "event",
            FilterKind::Query => "query",
            FilterKind::Prompt => "prompt",
            FilterKind::Other => "other",
        }
    }
}

/// Active filter: a set of visible kinds, and per-tag-key accepted values.
///
/// An entry passes iff its source kind is active AND, for every key with a
/// non-empty accepted set, the item carries that tag with at least one value
/// in the set (OR within a key, AND across keys). An empty accepted set means
/// "no constraint for that key".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub active_kinds: BTreeSet<FilterKind>,
    pub active_tags: IndexMap<String, BTreeSet<String>>,
}

impl Default for FilterState {
    /// Everything visible: all kinds active, no tag constraints.
    fn default() -> Self {
        FilterState {
            active_kinds: FilterKind::ALL.into_iter().collect(),
            active_tags: IndexMap::new(),
        }
    }
}

impl FilterState {
    /// Whether any constraint is in effect.
    pub fn is_constrained(&self) -> bool {
        self.active_kinds.len() < FilterKind::ALL.len()
            || self.active_tags.values().any(|set| !set.is_empty())
    }

    pub fn toggle_kind(&mut self, kind: FilterKind) {
        if !self.active_kinds.remove(&kind) {
            self.active_kinds.insert(kind);
        }
    }

    pub fn toggle_tag_value(&mut self, key: &str, value: &str) {
        let set = self.active_tags.entry(key.to_string()).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    pub fn is_tag_value_active(&self, key: &str, value: &str) -> bool {
        self.active_tags
            .get(key)
            .is_some_and(|set| set.contains(value))
    }

    fn passes(&self, item: &RawItem) -> bool {
        if !self.active_kinds.contains(&FilterKind::of_item(&item.kind)) {
            return false;
        }
        for (key, accepted) in &self.active_tags {
            if accepted.is_empty() {
                continue;
            }
            match item.tag(key) {
                Some(tag) => {
                    if !tag.iter().any(|v| accepted.contains(v)) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}

/// The filtered, ordered subset of expanded entries currently shown, plus
/// the parallel map from display position to original buffer index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySequence {
    pub items: Vec<ExpandedItem>,
    pub index_map: Vec<usize>,
}

impl DisplaySequence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First display position mapping to the given original index (a prompt
    /// may also have a later completion position).
    pub fn position_of_original(&self, original_index: usize) -> Option<usize> {
        self.index_map.iter().position(|&o| o == original_index)
    }
}

/// Apply the filter to the expanded timeline. Pure: relative order is
/// preserved and nothing is mutated; cheap enough to re-run on every toggle.
pub fn apply_filter(
    expanded: &[ExpandedItem],
    buffer: &[RawItem],
    filter: &FilterState,
) -> DisplaySequence {
    let mut items = Vec::new();
    let mut index_map = Vec::new();
    for entry in expanded {
        let Some(source) = buffer.get(entry.original_index) else {
            continue;
        };
        if filter.passes(source) {
            items.push(*entry);
            index_map.push(entry.original_index);
        }
    }
    DisplaySequence { items, index_map }
}

/// Collect every tag key with its observed values across the buffer, for the
/// filter panel. Keys and multi-valued tags appear in first-seen order;
/// values are kept sorted.
pub fn collect_tags(buffer: &[RawItem]) -> IndexMap<String, BTreeSet<String>> {
    let mut out: IndexMap<String, BTreeSet<String>> = IndexMap::new();
    for item in buffer {
        for (key, tag) in &item.tags {
            let set = out.entry(key.clone()).or_default();
            for value in tag.iter() {
                set.insert(value.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagValue;
    use crate::timeline::expand::expand;
    use serde_json::{Value, json};

    fn raw_tagged(kind: ItemKind, ts: i64, tags: &[(&str, TagValue)]) -> RawItem {
        let mut map = IndexMap::new();
        for (k, v) in tags {
            map.insert(k.to_string(), v.clone());
        }
        RawItem::new(kind, json!(ts), map, Value::Null)
    }

    fn sample_buffer() -> Vec<RawItem> {
        vec![
            raw_tagged(
                ItemKind::Event,
                10,
                &[("env", TagValue::One("prod".into()))],
            ),
            raw_tagged(
                ItemKind::Event,
                20,
                &[(
                    "env",
                    TagValue::Many(vec!["prod".into(), "staging".into()]),
                )],
            ),
            raw_tagged(ItemKind::Query, 30, &[("env", TagValue::One("dev".into()))]),
            raw_tagged(ItemKind::Event, 40, &[]),
        ]
    }

    #[test]
    fn default_filter_shows_everything() {
        let buffer = sample_buffer();
        let expanded = expand(&buffer);
        let display = apply_filter(&expanded, &buffer, &FilterState::default());
        assert_eq!(display.len(), 4);
        assert_eq!(display.index_map, vec![0, 1, 2, 3]);
        assert!(!FilterState::default().is_constrained());
    }

    #[test]
    fn kind_filter_drops_inactive_kinds() {
        let buffer = sample_buffer();
        let expanded = expand(&buffer);
        let mut filter = FilterState::default();
        filter.toggle_kind(FilterKind::Event);
        let display = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(display.index_map, vec![2]);
    }

    #[test]
    fn multi_valued_tags_match_on_any_value() {
        let buffer = sample_buffer();
        let expanded = expand(&buffer);

        let mut filter = FilterState::default();
        filter.toggle_tag_value("env", "staging");
        let display = apply_filter(&expanded, &buffer, &filter);
        // Only item 1 carries staging; items without the env tag drop out
        assert_eq!(display.index_map, vec![1]);

        let mut filter = FilterState::default();
        filter.toggle_tag_value("env", "dev");
        let display = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(display.index_map, vec![2]);
    }

    #[test]
    fn distinct_tag_keys_and_with_each_other() {
        let buffer = vec![
            raw_tagged(
                ItemKind::Event,
                10,
                &[
                    ("env", TagValue::One("prod".into())),
                    ("region", TagValue::One("eu".into())),
                ],
            ),
            raw_tagged(
                ItemKind::Event,
                20,
                &[("env", TagValue::One("prod".into()))],
            ),
        ];
        let expanded = expand(&buffer);
        let mut filter = FilterState::default();
        filter.toggle_tag_value("env", "prod");
        filter.toggle_tag_value("region", "eu");
        let display = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(display.index_map, vec![0]);
    }

    #[test]
    fn empty_value_set_means_no_constraint() {
        let buffer = sample_buffer();
        let expanded = expand(&buffer);
        let mut filter = FilterState::default();
        // Toggle a value on and back off: the key stays with an empty set
        filter.toggle_tag_value("env", "prod");
        filter.toggle_tag_value("env", "prod");
        assert!(!filter.is_constrained());
        let display = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(display.len(), 4);
    }

    #[test]
    fn filtering_is_idempotent() {
        let buffer = sample_buffer();
        let expanded = expand(&buffer);
        let mut filter = FilterState::default();
        filter.toggle_tag_value("env", "prod");
        let once = apply_filter(&expanded, &buffer, &filter);
        let twice = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn prompt_halves_filter_under_prompt() {
        let buffer = vec![RawItem::new(
            ItemKind::Prompt,
            json!(20),
            IndexMap::new(),
            json!({"completion": {"completion_timestamp": 30}}),
        )];
        let expanded = expand(&buffer);
        assert_eq!(expanded.len(), 2);

        let mut filter = FilterState::default();
        filter.toggle_kind(FilterKind::Prompt);
        let display = apply_filter(&expanded, &buffer, &filter);
        assert!(display.is_empty());

        filter.toggle_kind(FilterKind::Prompt);
        let display = apply_filter(&expanded, &buffer, &filter);
        assert_eq!(display.len(), 2);
        // Both halves map back to the same original index
        assert_eq!(display.index_map, vec![0, 0]);
        assert_eq!(display.position_of_original(0), Some(0));
    }

    #[test]
    fn collect_tags_indexes_every_value() {
        let buffer = sample_buffer();
        let tags = collect_tags(&buffer);
        let env: Vec<_> = tags["env"].iter().cloned().collect();
        assert_eq!(env, vec!["dev", "prod", "staging"]);
    }
}
