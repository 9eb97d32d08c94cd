use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::RawItem;

use super::expand::{ExpandedItem, expand};
use super::filter::{DisplaySequence, FilterKind, FilterState, apply_filter, collect_tags};
use super::matches::{project_to_display, resolve_matches};

/// Selection and playback position. Mutated only through [`Timeline`]
/// intents, so the displayed highlight can never diverge from the recorded
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_original: Option<usize>,
    matched_originals: Vec<usize>,
    cursor: usize,
}

impl SelectionState {
    /// Original-buffer index of the selected item. Survives refilters even
    /// when the item is no longer visible.
    pub fn selected_original(&self) -> Option<usize> {
        self.selected_original
    }

    /// Original-buffer indices declared by the selected query (empty when
    /// the selection is not a query).
    pub fn matched_originals(&self) -> &[usize] {
        &self.matched_originals
    }

    /// Playback position in the current display sequence. Always a valid
    /// index, or 0 == len when the sequence is empty.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// The timeline core: the immutable raw buffer, its expansion, the active
/// filter, the derived display sequence, and the selection state machine.
/// One instance per view; there is no shared global state.
#[derive(Debug)]
pub struct Timeline {
    buffer: Vec<RawItem>,
    expanded: Vec<ExpandedItem>,
    tag_index: IndexMap<String, BTreeSet<String>>,
    filter: FilterState,
    display: DisplaySequence,
    selection: SelectionState,
}

impl Timeline {
    /// Build a timeline over a buffer loaded at startup. The buffer is
    /// expanded once; filter and selection start at their defaults.
    pub fn new(buffer: Vec<RawItem>) -> Self {
        let expanded = expand(&buffer);
        let tag_index = collect_tags(&buffer);
        let filter = FilterState::default();
        let display = apply_filter(&expanded, &buffer, &filter);
        Timeline {
            buffer,
            expanded,
            tag_index,
            filter,
            display,
            selection: SelectionState::default(),
        }
    }

    // --- read surface -----------------------------------------------------

    pub fn buffer(&self) -> &[RawItem] {
        &self.buffer
    }

    pub fn expanded(&self) -> &[ExpandedItem] {
        &self.expanded
    }

    /// Every tag key/value observed in the buffer, for the filter panel.
    pub fn tag_index(&self) -> &IndexMap<String, BTreeSet<String>> {
        &self.tag_index
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn display(&self) -> &DisplaySequence {
        &self.display
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.selection.cursor
    }

    pub fn selected_original(&self) -> Option<usize> {
        self.selection.selected_original
    }

    /// The selected raw item, visible or not.
    pub fn selected_item(&self) -> Option<&RawItem> {
        self.buffer.get(self.selection.selected_original?)
    }

    /// Whether the selected item currently has at least one display position.
    pub fn is_selection_visible(&self) -> bool {
        self.selection
            .selected_original
            .is_some_and(|o| self.display.position_of_original(o).is_some())
    }

    /// Expanded entry and its source item at a display position.
    pub fn item_at_display(&self, pos: usize) -> Option<(&ExpandedItem, &RawItem)> {
        let entry = self.display.items.get(pos)?;
        let source = self.buffer.get(entry.original_index)?;
        Some((entry, source))
    }

    /// Display positions highlighted for the selected query, derived from
    /// the stored original indices on every call so a refilter is enough to
    /// keep the highlight consistent.
    pub fn matched_display_positions(&self) -> Vec<usize> {
        project_to_display(&self.selection.matched_originals, &self.display)
    }

    // --- intents ----------------------------------------------------------

    /// Select the entry at a display position: records its original index,
    /// moves the playback cursor there, and resolves query matches (cleared
    /// for non-queries). Out-of-range positions are ignored.
    pub fn select_display(&mut self, pos: usize) {
        let Some(&original) = self.display.index_map.get(pos) else {
            return;
        };
        self.selection.cursor = pos;
        self.selection.selected_original = Some(original);
        self.selection.matched_originals = match self.buffer.get(original) {
            Some(item) => resolve_matches(item),
            None => Vec::new(),
        };
    }

    /// Advance the cursor by one, selecting the new entry. No-op at the end
    /// of the display sequence.
    pub fn step_forward(&mut self) {
        if self.selection.cursor + 1 < self.display.len() {
            self.select_display(self.selection.cursor + 1);
        }
    }

    /// Retreat the cursor by one, selecting the new entry. No-op at 0.
    pub fn step_backward(&mut self) {
        if self.selection.cursor > 0 && !self.display.is_empty() {
            self.select_display(self.selection.cursor - 1);
        }
    }

    pub fn jump_to(&mut self, pos: usize) {
        self.select_display(pos);
    }

    pub fn jump_to_start(&mut self) {
        self.select_display(0);
    }

    pub fn jump_to_end(&mut self) {
        if !self.display.is_empty() {
            self.select_display(self.display.len() - 1);
        }
    }

    /// Replace the filter and recompute the display sequence.
    ///
    /// The cursor follows the previously selected item when it is still
    /// visible, otherwise it clamps to 0; the selection itself is kept
    /// either way, so the detail pane can keep showing an item the timeline
    /// currently hides.
    pub fn refilter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.display = apply_filter(&self.expanded, &self.buffer, &self.filter);
        self.selection.cursor = match self.selection.selected_original {
            Some(original) => self.display.position_of_original(original).unwrap_or(0),
            None => self
                .selection
                .cursor
                .min(self.display.len().saturating_sub(1)),
        };
    }

    pub fn toggle_kind(&mut self, kind: FilterKind) {
        let mut filter = self.filter.clone();
        filter.toggle_kind(kind);
        self.refilter(filter);
    }

    pub fn toggle_tag_value(&mut self, key: &str, value: &str) {
        let mut filter = self.filter.clone();
        filter.toggle_tag_value(key, value);
        self.refilter(filter);
    }
}
