//! Keyed debounced writes.
//!
//! [`DebouncedWriter::schedule`] delays a write and cancels any pending
//! write for the same key, so a burst of edits produces exactly one
//! persistence call carrying the final state. [`flush`](DebouncedWriter::flush)
//! short-circuits the delay for commit-on-blur.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

type WriteFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The write future sits in this slot until either the timer task or a
/// flush takes it; the mutex guarantees exactly one of them runs it.
type WriteSlot = Arc<Mutex<Option<WriteFuture>>>;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
    write: WriteSlot,
}

struct Inner {
    pending: Mutex<HashMap<String, Pending>>,
    generation: AtomicU64,
}

/// Keyed write scheduler with replace-on-schedule semantics.
///
/// Cheap to clone; clones share the pending table.
#[derive(Clone)]
pub struct DebouncedWriter {
    inner: Arc<Inner>,
}

impl Default for DebouncedWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebouncedWriter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Schedule `write` to run after `delay`, replacing any pending write
    /// for the same key.
    ///
    /// A replaced write that has not started yet is dropped without
    /// running; one already in flight is left to finish (the newer write
    /// supersedes its effect server-side).
    pub fn schedule<F>(&self, key: &str, delay: Duration, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let slot: WriteSlot = Arc::new(Mutex::new(Some(Box::pin(write) as WriteFuture)));

        let inner = Arc::clone(&self.inner);
        let task_slot = Arc::clone(&slot);
        let task_key = key.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let write = task_slot.lock().unwrap().take();
            if let Some(write) = write {
                write.await;
            }
            // Drop our own entry unless a newer schedule replaced it.
            let mut pending = inner.pending.lock().unwrap();
            if pending.get(&task_key).map(|p| p.generation) == Some(generation) {
                pending.remove(&task_key);
            }
        });

        let previous = self.inner.pending.lock().unwrap().insert(
            key.to_string(),
            Pending {
                generation,
                handle,
                write: slot,
            },
        );
        if let Some(previous) = previous {
            // Only abort the timer if the write has not been taken yet;
            // a write already running must not be cancelled mid-flight.
            let untaken = previous.write.lock().unwrap().take();
            if untaken.is_some() {
                previous.handle.abort();
            }
        }
    }

    /// Run the pending write for `key` immediately, if any.
    pub async fn flush(&self, key: &str) {
        let entry = self.inner.pending.lock().unwrap().remove(key);
        if let Some(entry) = entry {
            let write = entry.write.lock().unwrap().take();
            if let Some(write) = write {
                entry.handle.abort();
                write.await;
            }
        }
    }

    /// Drop the pending write for `key` without running it.
    pub fn cancel(&self, key: &str) {
        if let Some(entry) = self.inner.pending.lock().unwrap().remove(key) {
            let untaken = entry.write.lock().unwrap().take();
            if untaken.is_some() {
                entry.handle.abort();
            }
        }
    }

    /// Drop every pending write. Used on teardown.
    pub fn cancel_all(&self) {
        let entries: Vec<_> = self.inner.pending.lock().unwrap().drain().collect();
        for (_, entry) in entries {
            let untaken = entry.write.lock().unwrap().take();
            if untaken.is_some() {
                entry.handle.abort();
            }
        }
    }

    /// Number of writes currently waiting on their timer.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    const DELAY: Duration = Duration::from_millis(600);

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_produces_exactly_one_write() {
        let writer = DebouncedWriter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let last_value = Arc::new(Mutex::new(String::new()));

        for value in ["B", "Bu", "Buy", "Buy t", "Buy thread"] {
            let calls = Arc::clone(&calls);
            let last_value = Arc::clone(&last_value);
            writer.schedule("workflow:1:content", DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *last_value.lock().unwrap() = value.to_string();
            });
        }
        assert_eq!(writer.pending_count(), 1);

        tokio::time::sleep(DELAY + Duration::from_millis(50)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last_value.lock().unwrap().as_str(), "Buy thread");
        assert_eq!(writer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_do_not_interfere() {
        let writer = DebouncedWriter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["workflow:1:content", "workflow:2:content"] {
            let calls = Arc::clone(&calls);
            writer.schedule(key, DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(DELAY + Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_runs_the_write_immediately_and_only_once() {
        let writer = DebouncedWriter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            writer.schedule("note:loic", DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        writer.flush("note:loic").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The timer was cancelled; waiting past the delay adds nothing.
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_of_unknown_key_is_a_noop() {
        let writer = DebouncedWriter::new();
        writer.flush("nothing-here").await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_write() {
        let writer = DebouncedWriter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            writer.schedule("planning:4", DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        writer.cancel("planning:4");

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(writer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_restarts_the_quiet_period() {
        let writer = DebouncedWriter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            writer.schedule("k", DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Just before the timer fires, a new edit arrives.
        tokio::time::sleep(DELAY - Duration::from_millis(50)).await;
        {
            let calls = Arc::clone(&calls);
            writer.schedule("k", DELAY, async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        // The original deadline passes without a write.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // The rescheduled write fires after its own full delay.
        tokio::time::sleep(DELAY).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
