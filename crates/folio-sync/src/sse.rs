//! Server-sent events.
//!
//! A small incremental parser for `text/event-stream` bodies and the
//! path-addressed updates a realtime database sends over them.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name (`message` when the stream did not name it)
    pub event: String,
    /// Data lines joined with `\n`
    pub data: String,
}

/// Incremental event-stream parser.
///
/// Feed it body chunks as they arrive; complete events come out. Chunks may
/// split lines or UTF-8 sequences anywhere.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return the events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Payload of `put` and `patch` events
#[derive(Debug, Clone, Deserialize)]
pub struct PathUpdate {
    /// Slash-separated path below the subscribed node
    pub path: String,
    /// New value at the path
    pub data: Value,
}

/// How a path update combines with the cached node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Replace the value at the path
    Put,
    /// Set each child of the value at the path
    Patch,
}

/// Apply a path update to a cached node.
///
/// Intermediate values that are not objects become objects; arrays become
/// index-keyed objects, which is the shape the database itself reports
/// once an element is addressed directly. `null` deletes.
pub fn apply_update(root: &mut Value, kind: UpdateKind, update: PathUpdate) {
    let segments: Vec<&str> = update
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let Some((last, parents)) = segments.split_last() else {
        match kind {
            UpdateKind::Put => *root = update.data,
            UpdateKind::Patch => patch_children(root, update.data),
        }
        return;
    };

    let mut current = root;
    for segment in parents {
        current = as_object(current)
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let parent = as_object(current);
    match kind {
        UpdateKind::Put => {
            if update.data.is_null() {
                parent.remove(*last);
            } else {
                parent.insert(last.to_string(), update.data);
            }
        }
        UpdateKind::Patch => {
            let child = parent
                .entry(last.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            patch_children(child, update.data);
        }
    }
}

fn patch_children(target: &mut Value, data: Value) {
    let Value::Object(children) = data else {
        return;
    };
    let object = as_object(target);
    for (key, value) in children {
        if value.is_null() {
            object.remove(&key);
        } else {
            object.insert(key, value);
        }
    }
}

fn as_object(value: &mut Value) -> &mut Map<String, Value> {
    if let Value::Array(items) = value {
        let keyed: Map<String, Value> = std::mem::take(items)
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(index, item)| (index.to_string(), item))
            .collect();
        *value = Value::Object(keyed);
    }
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just made an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: put\nda").is_empty());
        let events = parser.feed(b"ta: {\"path\":\"/\",\"data\":1}\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: "put".into(),
                data: "{\"path\":\"/\",\"data\":1}".into()
            }]
        );
    }

    #[test]
    fn test_comments_crlf_and_multiline_data() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": ping\r\nevent: keep-alive\r\ndata: null\r\n\r\ndata: a\ndata: b\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "keep-alive");
        assert_eq!(events[1].event, "message");
        assert_eq!(events[1].data, "a\nb");
    }

    #[test]
    fn test_event_without_data_is_dropped() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: put\n\n").is_empty());
        let events = parser.feed(b"data: x\n\n");
        assert_eq!(events[0].event, "message");
    }

    fn update(path: &str, data: Value) -> PathUpdate {
        PathUpdate {
            path: path.into(),
            data,
        }
    }

    #[test]
    fn test_put_at_root_replaces() {
        let mut node = json!({"a": 1});
        apply_update(&mut node, UpdateKind::Put, update("/", json!({"b": 2})));
        assert_eq!(node, json!({"b": 2}));
    }

    #[test]
    fn test_put_nested_creates_parents() {
        let mut node = Value::Null;
        apply_update(
            &mut node,
            UpdateKind::Put,
            update("/general/phone", json!("555")),
        );
        assert_eq!(node, json!({"general": {"phone": "555"}}));
    }

    #[test]
    fn test_put_null_deletes() {
        let mut node = json!({"general": {"phone": "1", "email": "e"}});
        apply_update(&mut node, UpdateKind::Put, update("/general/phone", Value::Null));
        assert_eq!(node, json!({"general": {"email": "e"}}));
    }

    #[test]
    fn test_patch_sets_children() {
        let mut node = json!({"general": {"phone": "1", "email": "e"}});
        apply_update(
            &mut node,
            UpdateKind::Patch,
            update("/general", json!({"phone": "2", "email": null, "tagline": "t"})),
        );
        assert_eq!(node, json!({"general": {"phone": "2", "tagline": "t"}}));
    }

    #[test]
    fn test_array_element_update_keys_the_list() {
        let mut node = json!({"services": [{"id": "a"}, {"id": "b"}]});
        apply_update(
            &mut node,
            UpdateKind::Put,
            update("/services/1/id", json!("c")),
        );
        assert_eq!(node, json!({"services": {"0": {"id": "a"}, "1": {"id": "c"}}}));
    }
}
