//! Context sanitisation for captured records.
//!
//! Hosts hand us whatever key/value pairs they have. Entries that would
//! break the record model (empty or oversized keys, whitespace or control
//! characters, the reserved `_` namespace, repeated keys) are dropped and
//! the drop count is kept on the record under [`DROPPED_KEY`].

use serde_json::Value;

use super::record::Context;

pub const DROPPED_KEY: &str = "_dropped";
pub const MAX_KEY_LEN: usize = 64;

/// Pass to `capture` when there is nothing to attach.
pub const NO_CONTEXT: [(&str, &str); 0] = [];

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('_')
        && !key.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Accumulates accepted entries and counts the rejected ones.
#[derive(Debug, Default)]
struct ContextBuilder {
    entries: Context,
    dropped: usize,
}

impl ContextBuilder {
    fn offer(&mut self, key: String, value: String) {
        if valid_key(&key) && !self.entries.contains_key(&key) {
            self.entries.insert(key, value);
        } else {
            self.dropped += 1;
        }
    }

    fn finish(mut self) -> (Context, usize) {
        if self.dropped > 0 {
            self.entries
                .insert(DROPPED_KEY.to_string(), self.dropped.to_string());
        }
        (self.entries, self.dropped)
    }
}

/// Returns the cleaned context and how many entries were dropped.
pub fn sanitize<I, K, V>(entries: I) -> (Context, usize)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut builder = ContextBuilder::default();
    for (k, v) in entries {
        builder.offer(k.into(), v.into());
    }
    builder.finish()
}

/// Same policy for loosely typed context. Strings are kept, numbers and
/// bools are stringified, everything else is dropped. `null` means no
/// context at all; any other non-object counts as one dropped entry.
pub fn sanitize_json(value: Value) -> (Context, usize) {
    let mut builder = ContextBuilder::default();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (k, v) in map {
                match v {
                    Value::String(s) => builder.offer(k, s),
                    Value::Number(n) => builder.offer(k, n.to_string()),
                    Value::Bool(b) => builder.offer(k, b.to_string()),
                    Value::Null | Value::Array(_) | Value::Object(_) => builder.dropped += 1,
                }
            }
        }
        _ => builder.dropped += 1,
    }
    builder.finish()
}
