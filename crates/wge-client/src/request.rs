use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::Result;

// ─── RequestState ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            RequestState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

struct Snapshot<T> {
    generation: u64,
    state: RequestState<T>,
}

// ─── RequestSlot ──────────────────────────────────────────────────────────

/// Holds the state of one logical request and at most one task serving it.
///
/// Each [`issue`](Self::issue) starts a new generation and aborts the task
/// of the previous one. A finishing task only writes its result if its
/// generation is still current, so stale responses never overwrite newer
/// state. [`teardown`](Self::teardown), also run on drop, ends the current
/// generation without starting another: nothing is applied afterwards.
///
/// `issue` spawns onto the current Tokio runtime and must be called from
/// within one.
pub struct RequestSlot<T> {
    label: String,
    tx: Arc<watch::Sender<Snapshot<T>>>,
    task: Option<JoinHandle<()>>,
}

impl<T> RequestSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(label: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            generation: 0,
            state: RequestState::Idle,
        });
        RequestSlot {
            label: label.into(),
            tx: Arc::new(tx),
            task: None,
        }
    }

    /// Start a request, superseding any in flight. Returns its generation.
    pub fn issue<F>(&mut self, request: F) -> u64
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.abort_task();

        let mut generation = 0;
        self.tx.send_modify(|s| {
            s.generation += 1;
            s.state = RequestState::Loading;
            generation = s.generation;
        });
        tracing::debug!(request = %self.label, generation, "request issued");

        let tx = Arc::clone(&self.tx);
        let label = self.label.clone();
        self.task = Some(tokio::spawn(async move {
            let next = match request.await {
                Ok(value) => RequestState::Ready(value),
                Err(e) => {
                    tracing::warn!(request = %label, generation, error = %e, "request failed");
                    RequestState::Failed(e.to_string())
                }
            };
            let applied = tx.send_if_modified(|s| {
                if s.generation == generation {
                    s.state = next;
                    true
                } else {
                    false
                }
            });
            if !applied {
                tracing::debug!(request = %label, generation, "discarding stale response");
            }
        }));

        generation
    }

    pub fn state(&self) -> RequestState<T> {
        self.tx.borrow().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    /// Wait until the current request is no longer loading.
    pub async fn settled(&self) -> RequestState<T> {
        let mut rx = self.tx.subscribe();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if !snapshot.state.is_loading() {
                    return snapshot.state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }
}

impl<T> RequestSlot<T> {
    /// Discard whatever is in flight and return to idle.
    pub fn teardown(&mut self) {
        self.abort_task();
        self.tx.send_modify(|s| {
            s.generation += 1;
            s.state = RequestState::Idle;
        });
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for RequestSlot<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
