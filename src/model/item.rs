use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::timestamp::{UNPARSEABLE_MS, normalize_timestamp};

/// Kind of a recorded item. `event`, `query` and `prompt` are the recognized
/// set; any other type string passes through opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Event,
    Query,
    Prompt,
    Other(String),
}

impl ItemKind {
    pub fn from_type_str(s: &str) -> ItemKind {
        match s {
            "event" => ItemKind::Event,
            "query" => ItemKind::Query,
            "prompt" => ItemKind::Prompt,
            other => ItemKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ItemKind::Event => "event",
            ItemKind::Query => "query",
            ItemKind::Prompt => "prompt",
            ItemKind::Other(s) => s.as_str(),
        }
    }
}

/// A tag value: a single string or an ordered multi-value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    One(String),
    Many(Vec<String>),
}

impl TagValue {
    /// Lenient conversion from recorded JSON. Strings map to `One`; arrays
    /// keep their scalar elements (stringified); bare scalars are
    /// stringified; null, objects, and empty arrays drop the tag entirely.
    pub(crate) fn from_json(v: &Value) -> Option<TagValue> {
        match v {
            Value::String(s) => Some(TagValue::One(s.clone())),
            Value::Array(arr) => {
                let vals: Vec<String> = arr.iter().filter_map(scalar_to_string).collect();
                if vals.is_empty() {
                    None
                } else {
                    Some(TagValue::Many(vals))
                }
            }
            Value::Number(_) | Value::Bool(_) => scalar_to_string(v).map(TagValue::One),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            TagValue::One(s) => std::slice::from_ref(s).iter().map(String::as_str),
            TagValue::Many(vs) => vs.as_slice().iter().map(String::as_str),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }

    pub fn first(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Comma-joined form for tag chips and summaries.
    pub fn display(&self) -> String {
        match self {
            TagValue::One(s) => s.clone(),
            TagValue::Many(vs) => vs.join(", "),
        }
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One immutable logged occurrence, as received from the payload.
///
/// `data` stays free-form JSON; every type-specific field is read through the
/// accessors below, which tolerate absent or oddly-shaped payloads.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub kind: ItemKind,
    /// Normalized epoch milliseconds (see `model::timestamp`).
    pub timestamp_ms: i64,
    /// The timestamp exactly as recorded, for the detail pane.
    pub timestamp_raw: Value,
    pub tags: IndexMap<String, TagValue>,
    pub data: Value,
}

impl RawItem {
    pub fn new(
        kind: ItemKind,
        timestamp_raw: Value,
        tags: IndexMap<String, TagValue>,
        data: Value,
    ) -> Self {
        let timestamp_ms = normalize_timestamp(&timestamp_raw);
        RawItem {
            kind,
            timestamp_ms,
            timestamp_raw,
            tags,
            data,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// First value of a tag, for single-valued lookups like `model`.
    pub fn tag_first(&self, key: &str) -> Option<&str> {
        self.tags.get(key).and_then(TagValue::first)
    }

    // --- prompt payload ---------------------------------------------------

    pub fn prompt_text(&self) -> Option<&str> {
        self.data.get("prompt").and_then(Value::as_str)
    }

    /// Completion text, resolved through the one fallback chain used
    /// everywhere completions are read:
    /// `completion.response` → `completion.text` → string `completion` →
    /// `response` → `answer` → `content` → `choices[0].text` →
    /// `choices[0].message.content` → `choices[0].content`.
    pub fn completion_text(&self) -> Option<&str> {
        if let Some(completion) = self.data.get("completion") {
            match completion {
                Value::Object(obj) => {
                    if let Some(s) = obj.get("response").and_then(Value::as_str) {
                        return Some(s);
                    }
                    if let Some(s) = obj.get("text").and_then(Value::as_str) {
                        return Some(s);
                    }
                }
                Value::String(s) => return Some(s),
                _ => {}
            }
        }
        for key in ["response", "answer", "content"] {
            if let Some(s) = self.data.get(key).and_then(Value::as_str) {
                return Some(s);
            }
        }
        let first_choice = self.data.get("choices").and_then(|c| c.get(0))?;
        first_choice
            .get("text")
            .and_then(Value::as_str)
            .or_else(|| {
                first_choice
                    .get("message")
                    .and_then(|m| m.get("content"))
                    .and_then(Value::as_str)
            })
            .or_else(|| first_choice.get("content").and_then(Value::as_str))
    }

    /// Timestamp of the prompt's completion, when one is recorded and
    /// parseable. A malformed completion timestamp is treated as absent, so
    /// no synthetic completion entry is emitted for it.
    pub fn completion_timestamp_ms(&self) -> Option<i64> {
        let raw = self
            .data
            .get("completion")
            .and_then(|c| c.get("completion_timestamp"))?;
        let ms = normalize_timestamp(raw);
        (ms != UNPARSEABLE_MS).then_some(ms)
    }

    /// Whether a prompt has a resolvable completion text.
    pub fn is_complete(&self) -> bool {
        self.completion_text().is_some()
    }

    // --- query payload ----------------------------------------------------

    pub fn op_name(&self) -> Option<&str> {
        self.data.get("op_name").and_then(Value::as_str)
    }

    /// The query's declared matched original-buffer indices, verbatim.
    /// Returns empty unless `data.matched_indices` is an array whose elements
    /// are all non-negative integers.
    pub fn matched_indices(&self) -> Vec<usize> {
        let Some(Value::Array(arr)) = self.data.get("matched_indices") else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(arr.len());
        for v in arr {
            match v.as_u64() {
                Some(n) => out.push(n as usize),
                None => return Vec::new(),
            }
        }
        out
    }

    pub fn parameters(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.get("parameters").and_then(Value::as_object)
    }

    // --- event payload ----------------------------------------------------

    pub fn event_kind(&self) -> Option<&str> {
        self.tag_first("event_type")
    }

    pub fn message(&self) -> Option<&str> {
        self.data
            .get("payload")
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
    }

    pub fn metadata(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.get("metadata").and_then(Value::as_object)
    }

    // --- summaries --------------------------------------------------------

    /// One-line description, used by timeline rows, the matched-items list,
    /// and `tln dump`.
    pub fn summary(&self) -> String {
        match self.kind {
            ItemKind::Event => format!(
                "{}: {}",
                self.event_kind().unwrap_or("unknown"),
                self.message().unwrap_or("")
            ),
            ItemKind::Query => self.op_name().unwrap_or("query operation").to_string(),
            ItemKind::Prompt => format!(
                "{}: {}",
                self.tag_first("model").unwrap_or("unknown"),
                self.prompt_text().unwrap_or("")
            ),
            ItemKind::Other(_) => self.kind.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(kind: ItemKind, data: Value) -> RawItem {
        RawItem::new(kind, json!(0), IndexMap::new(), data)
    }

    #[test]
    fn completion_chain_prefers_completion_response() {
        let it = item(
            ItemKind::Prompt,
            json!({
                "completion": {"response": "from completion", "text": "ignored"},
                "response": "ignored",
                "answer": "ignored"
            }),
        );
        assert_eq!(it.completion_text(), Some("from completion"));
    }

    #[test]
    fn completion_chain_falls_through() {
        let it = item(ItemKind::Prompt, json!({"completion": {"text": "t"}}));
        assert_eq!(it.completion_text(), Some("t"));

        let it = item(ItemKind::Prompt, json!({"completion": "bare string"}));
        assert_eq!(it.completion_text(), Some("bare string"));

        let it = item(ItemKind::Prompt, json!({"answer": "a"}));
        assert_eq!(it.completion_text(), Some("a"));

        let it = item(
            ItemKind::Prompt,
            json!({"choices": [{"message": {"content": "openai style"}}]}),
        );
        assert_eq!(it.completion_text(), Some("openai style"));

        let it = item(ItemKind::Prompt, json!({"prompt": "only a prompt"}));
        assert_eq!(it.completion_text(), None);
        assert!(!it.is_complete());
    }

    #[test]
    fn matched_indices_require_well_formed_array() {
        let it = item(ItemKind::Query, json!({"matched_indices": [1, 3, 0]}));
        assert_eq!(it.matched_indices(), vec![1, 3, 0]);

        // Any malformed element rejects the whole array
        let it = item(ItemKind::Query, json!({"matched_indices": [1, -2]}));
        assert!(it.matched_indices().is_empty());
        let it = item(ItemKind::Query, json!({"matched_indices": [1, "2"]}));
        assert!(it.matched_indices().is_empty());
        let it = item(ItemKind::Query, json!({"matched_indices": "nope"}));
        assert!(it.matched_indices().is_empty());
        let it = item(ItemKind::Query, json!({}));
        assert!(it.matched_indices().is_empty());
    }

    #[test]
    fn completion_timestamp_requires_parseable_value() {
        let it = item(
            ItemKind::Prompt,
            json!({"completion": {"completion_timestamp": 30}}),
        );
        assert_eq!(it.completion_timestamp_ms(), Some(30));

        let it = item(
            ItemKind::Prompt,
            json!({"completion": {"completion_timestamp": "garbage"}}),
        );
        assert_eq!(it.completion_timestamp_ms(), None);

        let it = item(ItemKind::Prompt, json!({"completion": {}}));
        assert_eq!(it.completion_timestamp_ms(), None);
    }

    #[test]
    fn tag_values_convert_leniently() {
        assert_eq!(
            TagValue::from_json(&json!("prod")),
            Some(TagValue::One("prod".into()))
        );
        assert_eq!(
            TagValue::from_json(&json!(["prod", "staging"])),
            Some(TagValue::Many(vec!["prod".into(), "staging".into()]))
        );
        // Scalars stringify; nested non-scalars are dropped
        assert_eq!(
            TagValue::from_json(&json!([1, true, {"x": 1}])),
            Some(TagValue::Many(vec!["1".into(), "true".into()]))
        );
        assert_eq!(
            TagValue::from_json(&json!(7)),
            Some(TagValue::One("7".into()))
        );
        assert_eq!(TagValue::from_json(&json!(null)), None);
        assert_eq!(TagValue::from_json(&json!({})), None);
        assert_eq!(TagValue::from_json(&json!([])), None);
    }

    #[test]
    fn summaries() {
        let mut tags = IndexMap::new();
        tags.insert("event_type".to_string(), TagValue::One("tool_call".into()));
        let it = RawItem::new(
            ItemKind::Event,
            json!(0),
            tags,
            json!({"payload": {"message": "ran a tool"}}),
        );
        assert_eq!(it.summary(), "tool_call: ran a tool");

        let mut tags = IndexMap::new();
        tags.insert("model".to_string(), TagValue::One("gpt-4o".into()));
        let it = RawItem::new(ItemKind::Prompt, json!(0), tags, json!({"prompt": "hi"}));
        assert_eq!(it.summary(), "gpt-4o: hi");

        let it = item(ItemKind::Query, json!({}));
        assert_eq!(it.summary(), "query operation");
    }
}
