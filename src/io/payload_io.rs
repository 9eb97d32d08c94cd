use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::model::{ItemKind, RawItem, TagValue};

/// Errors loading the recorded buffer payload.
///
/// These cover the payload as a whole. Individual malformed items inside
/// `buffer_items` never fail the load; absent or oddly-shaped fields fall
/// back to defaults item by item.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("could not read payload {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("payload has no `buffer_items` array")]
    MissingBufferItems,
}

/// Load a payload file: a JSON object with a `buffer_items` array.
pub fn load_payload(path: &Path) -> Result<Vec<RawItem>, PayloadError> {
    let text = fs::read_to_string(path).map_err(|e| PayloadError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_payload(&text)
}

/// Parse payload text into the raw buffer.
pub fn parse_payload(text: &str) -> Result<Vec<RawItem>, PayloadError> {
    let root: Value = serde_json::from_str(text)?;
    let Some(Value::Array(items)) = root.get("buffer_items") else {
        return Err(PayloadError::MissingBufferItems);
    };
    Ok(items.iter().map(item_from_value).collect())
}

/// Convert one recorded entry. Every field is optional: a missing `type`
/// becomes the opaque `default` kind, a missing timestamp is unparseable,
/// tags convert leniently, and `data` defaults to null.
fn item_from_value(v: &Value) -> RawItem {
    let obj = v.as_object();
    let kind = obj
        .and_then(|o| o.get("type"))
        .and_then(Value::as_str)
        .map(ItemKind::from_type_str)
        .unwrap_or_else(|| ItemKind::Other("default".to_string()));
    let timestamp_raw = obj
        .and_then(|o| o.get("timestamp"))
        .cloned()
        .unwrap_or(Value::Null);
    let mut tags = IndexMap::new();
    if let Some(Value::Object(tag_obj)) = obj.and_then(|o| o.get("tags")) {
        for (key, tv) in tag_obj {
            if let Some(tag) = TagValue::from_json(tv) {
                tags.insert(key.clone(), tag);
            }
        }
    }
    let data = obj
        .and_then(|o| o.get("data"))
        .cloned()
        .unwrap_or(Value::Null);
    RawItem::new(kind, timestamp_raw, tags, data)
}
