//! Change feeds as streams

use std::pin::Pin;

use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

/// Boxed stream handed out by [`ContentStore::changes`](crate::ContentStore::changes)
pub type ChangeFeed<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Turns a broadcast subscription into a stream that ends when the sender
/// is dropped.
///
/// A slow consumer skips what it missed. Each change carries the whole
/// document, so the newest item supersedes the skipped ones.
pub fn broadcast_to_stream<T: Clone + Send + 'static>(
    mut rx: broadcast::Receiver<T>,
) -> ChangeFeed<T> {
    Box::pin(async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(change) => yield change,
                Err(RecvError::Lagged(missed)) => {
                    debug!(missed, "Change feed consumer fell behind");
                }
                Err(RecvError::Closed) => return,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_slow_consumer_sees_newest() {
        let (tx, rx) = broadcast::channel::<u32>(2);
        let feed = broadcast_to_stream(rx);

        for version in 0..5 {
            tx.send(version).unwrap();
        }
        drop(tx);

        assert_eq!(feed.collect::<Vec<_>>().await, vec![3, 4]);
    }
}
