use crate::model::{ItemKind, RawItem};

/// Kind of a timeline entry after prompt expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Event,
    Query,
    PromptRequest,
    PromptCompletion,
    Other,
}

impl DisplayKind {
    /// Label for the synthetic prompt halves; other entries are labeled by
    /// their source item's recorded type.
    pub fn label<'a>(&self, source: &'a RawItem) -> &'a str {
        match self {
            DisplayKind::PromptRequest => "prompt-request",
            DisplayKind::PromptCompletion => "prompt-completion",
            _ => source.kind.label(),
        }
    }
}

/// One entry of the expanded timeline: a raw item, or one of the up-to-two
/// synthetic halves of a prompt. Identity is the integer `original_index`
/// into the raw buffer, shared by a request/completion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedItem {
    pub kind: DisplayKind,
    pub timestamp_ms: i64,
    pub original_index: usize,
}

/// Row text for a timeline entry: a completion half shows its completion
/// text, every other entry shows its source item's summary.
pub fn entry_summary(entry: &ExpandedItem, source: &RawItem) -> String {
    match entry.kind {
        DisplayKind::PromptCompletion => source
            .completion_text()
            .map(str::to_string)
            .unwrap_or_else(|| source.summary()),
        _ => source.summary(),
    }
}

/// Expand the raw buffer into chronological timeline entries.
///
/// Each prompt emits a request entry at its own timestamp and, when the
/// payload records a parseable completion timestamp, a completion entry at
/// that later time. All other items map one-to-one. The result is sorted by
/// normalized timestamp with a stable tie-break on emission order: items with
/// equal timestamps keep buffer order, and a request always precedes its own
/// completion.
pub fn expand(buffer: &[RawItem]) -> Vec<ExpandedItem> {
    let mut out = Vec::with_capacity(buffer.len());
    for (i, item) in buffer.iter().enumerate() {
        match item.kind {
            ItemKind::Prompt => {
                out.push(ExpandedItem {
                    kind: DisplayKind::PromptRequest,
                    timestamp_ms: item.timestamp_ms,
                    original_index: i,
                });
                if let Some(completion_ms) = item.completion_timestamp_ms() {
                    out.push(ExpandedItem {
                        kind: DisplayKind::PromptCompletion,
                        timestamp_ms: completion_ms,
                        original_index: i,
                    });
                }
            }
            ItemKind::Event => out.push(ExpandedItem {
                kind: DisplayKind::Event,
                timestamp_ms: item.timestamp_ms,
                original_index: i,
            }),
            ItemKind::Query => out.push(ExpandedItem {
                kind: DisplayKind::Query,
                timestamp_ms: item.timestamp_ms,
                original_index: i,
            }),
            ItemKind::Other(_) => out.push(ExpandedItem {
                kind: DisplayKind::Other,
                timestamp_ms: item.timestamp_ms,
                original_index: i,
            }),
        }
    }
    out.sort_by_key(|e| e.timestamp_ms);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::{Value, json};

    fn raw(kind: ItemKind, ts: i64, data: Value) -> RawItem {
        RawItem::new(kind, json!(ts), IndexMap::new(), data)
    }

    #[test]
    fn prompts_split_into_request_and_completion() {
        let buffer = vec![
            raw(ItemKind::Event, 10, Value::Null),
            raw(
                ItemKind::Prompt,
                20,
                json!({"completion": {"completion_timestamp": 30}}),
            ),
            raw(ItemKind::Query, 25, json!({"matched_indices": [0]})),
        ];
        let expanded = expand(&buffer);
        let kinds: Vec<_> = expanded.iter().map(|e| (e.kind, e.original_index)).collect();
        assert_eq!(
            kinds,
            vec![
                (DisplayKind::Event, 0),
                (DisplayKind::PromptRequest, 1),
                (DisplayKind::Query, 2),
                (DisplayKind::PromptCompletion, 1),
            ]
        );
        assert_eq!(
            expanded.iter().map(|e| e.timestamp_ms).collect::<Vec<_>>(),
            vec![10, 20, 25, 30]
        );
    }

    #[test]
    fn prompt_without_completion_emits_one_entry() {
        let buffer = vec![raw(ItemKind::Prompt, 20, json!({"prompt": "hi"}))];
        let expanded = expand(&buffer);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].kind, DisplayKind::PromptRequest);
    }

    #[test]
    fn result_is_sorted_even_when_buffer_is_not() {
        let buffer = vec![
            raw(ItemKind::Event, 50, Value::Null),
            raw(ItemKind::Event, 10, Value::Null),
            raw(ItemKind::Event, 30, Value::Null),
        ];
        let ts: Vec<_> = expand(&buffer).iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(ts, vec![10, 30, 50]);
    }

    #[test]
    fn equal_timestamps_keep_buffer_order() {
        let buffer = vec![
            raw(ItemKind::Event, 10, Value::Null),
            raw(ItemKind::Query, 10, Value::Null),
            raw(ItemKind::Event, 10, Value::Null),
        ];
        let order: Vec<_> = expand(&buffer).iter().map(|e| e.original_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn request_precedes_completion_at_equal_timestamps() {
        let buffer = vec![raw(
            ItemKind::Prompt,
            20,
            json!({"completion": {"completion_timestamp": 20}}),
        )];
        let expanded = expand(&buffer);
        assert_eq!(expanded[0].kind, DisplayKind::PromptRequest);
        assert_eq!(expanded[1].kind, DisplayKind::PromptCompletion);
    }

    #[test]
    fn unparseable_timestamps_sort_to_the_front() {
        let buffer = vec![
            raw(ItemKind::Event, 10, Value::Null),
            RawItem::new(ItemKind::Event, Value::Null, IndexMap::new(), Value::Null),
        ];
        let order: Vec<_> = expand(&buffer).iter().map(|e| e.original_index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn unrecognized_kinds_pass_through() {
        let buffer = vec![RawItem::new(
            ItemKind::Other("custom".into()),
            json!(5),
            IndexMap::new(),
            Value::Null,
        )];
        let expanded = expand(&buffer);
        assert_eq!(expanded[0].kind, DisplayKind::Other);
        assert_eq!(expanded[0].kind.label(&buffer[0]), "custom");
    }
}
