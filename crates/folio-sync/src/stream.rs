//! Snapshot streams.

use serde_json::Value;
use tokio::sync::watch;

use crate::SnapshotStream;

/// Convert a watch of the remote node into a snapshot stream.
///
/// Yields the current value first if one is loaded, then the value after
/// every change. Intermediate values may be coalesced; each snapshot is the
/// whole node. The stream ends when the sender is dropped.
pub fn watch_to_stream(mut rx: watch::Receiver<Option<Value>>) -> SnapshotStream {
    Box::pin(async_stream::stream! {
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(value) = current {
                yield value;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_current_value_comes_first() {
        let (tx, rx) = watch::channel(Some(json!({"a": 1})));
        let mut stream = watch_to_stream(rx);
        assert_eq!(stream.next().await, Some(json!({"a": 1})));

        tx.send_replace(Some(json!({"a": 2})));
        assert_eq!(stream.next().await, Some(json!({"a": 2})));

        drop(tx);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_unloaded_node_yields_nothing_until_set() {
        let (tx, rx) = watch::channel(None);
        let mut stream = watch_to_stream(rx);

        tx.send_replace(Some(Value::Null));
        assert_eq!(stream.next().await, Some(Value::Null));
    }
}
