//! Bounded hand-off queue between the producer and consumer loops.

use collector_core::limits::HANDOFF_CAPACITY;
use collector_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Blocking single-producer/single-consumer queue.
///
/// Holds both channel halves, so the channel stays open for as long as any
/// clone of the queue exists. The receiver sits behind an async mutex so a
/// restarted consumer loop picks up the same queue.
pub struct HandoffQueue<T> {
    tx: mpsc::Sender<T>,
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for HandoffQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T: Send> HandoffQueue<T> {
    /// Single-slot queue.
    pub fn new() -> Self {
        Self::with_capacity(HANDOFF_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Waits for a free slot, then enqueues.
    pub async fn push(&self, item: T) -> Result<()> {
        self.tx.send(item).await.map_err(|_| Error::QueueClosed)
    }

    /// Waits for an item.
    pub async fn pop(&self) -> Result<T> {
        self.rx.lock().await.recv().await.ok_or(Error::QueueClosed)
    }

    /// Items currently buffered.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

impl<T: Send> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
