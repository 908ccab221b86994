//! Generation-guarded asynchronous load slots.
//!
//! A [`Slot`] stands for one page instance's data. Each load gets a
//! [`Ticket`]; a result is applied only while its ticket is still current,
//! so a slow response can never overwrite a newer one.

use crate::error::SiteError;
use parking_lot::Mutex;
use std::{fmt, future::Future, sync::Arc};
use tokio::{sync::watch, task::AbortHandle};

/// Observable state of a slot.
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(Arc<T>),
    /// Terminal until the next load begins.
    Failed(Arc<SiteError>),
}

impl<T> LoadState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<Arc<T>> {
        match self {
            Self::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }
}

// Manual impls: `Arc<T>` is cloneable for any `T`
impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(value) => Self::Ready(Arc::clone(value)),
            Self::Failed(err) => Self::Failed(Arc::clone(err)),
        }
    }
}

impl<T> fmt::Debug for LoadState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Loading => f.write_str("Loading"),
            Self::Ready(_) => f.write_str("Ready(..)"),
            Self::Failed(err) => write!(f, "Failed({err})"),
        }
    }
}

/// Identifies one load. Only the most recently issued ticket may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

struct Inner<T> {
    generation: u64,
    state: LoadState<T>,
    task: Option<AbortHandle>,
}

/// Single-owner load slot, cheap to clone (shared handle).
pub struct Slot<T> {
    inner: Arc<Mutex<Inner<T>>>,
    /// Bumped whenever the slot leaves `Loading`
    settled: Arc<watch::Sender<u64>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            settled: Arc::clone(&self.settled),
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                state: LoadState::Idle,
                task: None,
            })),
            settled: Arc::new(watch::Sender::new(0)),
        }
    }

    pub fn state(&self) -> LoadState<T> {
        self.inner.lock().state.clone()
    }

    /// Loaded value, if the slot is ready.
    pub fn ready(&self) -> Option<Arc<T>> {
        self.inner.lock().state.ready()
    }

    #[allow(unused)]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.inner.lock().generation == ticket.0
    }

    /// Start a new load, invalidating any earlier ticket.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = LoadState::Loading;
        Ticket(inner.generation)
    }

    /// Apply `result` if `ticket` is still current. Returns whether it was applied.
    pub fn settle(&self, ticket: Ticket, result: Result<T, SiteError>) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.generation != ticket.0 {
                return false;
            }
            inner.state = match result {
                Ok(value) => LoadState::Ready(Arc::new(value)),
                Err(err) => LoadState::Failed(Arc::new(err)),
            };
            inner.task = None;
        }
        self.notify();
        true
    }

    /// Invalidate any in-flight load and return to idle.
    pub fn cancel(&self) {
        {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state = LoadState::Idle;
            if let Some(task) = inner.task.take() {
                task.abort();
            }
        }
        self.notify();
    }

    fn notify(&self) {
        self.settled.send_modify(|n| *n = n.wrapping_add(1));
    }

    /// Wait until the slot is no longer loading and return its state.
    pub async fn settled(&self) -> LoadState<T> {
        let mut rx = self.settled.subscribe();
        loop {
            let state = self.state();
            if !state.is_loading() {
                return state;
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }
}

impl<T: Send + Sync + 'static> Slot<T> {
    /// Run `load` on the tokio runtime, aborting the previous in-flight task.
    ///
    /// Must be called from within a runtime.
    pub fn spawn_load<F>(&self, load: F) -> Ticket
    where
        F: Future<Output = Result<T, SiteError>> + Send + 'static,
    {
        let ticket = self.begin();
        let slot = self.clone();
        let handle = tokio::spawn(async move {
            let result = load.await;
            slot.settle(ticket, result);
        });

        let mut inner = self.inner.lock();
        if let Some(previous) = inner.task.replace(handle.abort_handle()) {
            previous.abort();
        }
        // The task may already have settled before we stored its handle
        if inner.generation != ticket.0 || !inner.state.is_loading() {
            inner.task = None;
        }
        ticket
    }
}
