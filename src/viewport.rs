//! Viewport resize notifications.
//!
//! A [`ResizeBus`] fans each new width out to its subscribers. Subscribing
//! returns a [`ResizeListener`] guard; dropping the guard unregisters it, so
//! a torn-down container never keeps a live listener behind. Widths are
//! delivered as notified, without debouncing.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Default)]
struct Listeners {
    next_id: u64,
    senders: Vec<(u64, Sender<u32>)>,
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Source of viewport width changes. Clones share the same listeners.
#[derive(Clone, Default)]
pub struct ResizeBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the guard is dropped.
    pub fn subscribe(&self) -> ResizeListener {
        let (tx, rx) = channel();
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.push((id, tx));
        tracing::debug!(id, "resize listener registered");
        ResizeListener {
            id,
            bus: Arc::downgrade(&self.listeners),
            rx,
        }
    }

    /// Deliver a new viewport width to every listener.
    pub fn notify(&self, width: u32) {
        let mut listeners = lock(&self.listeners);
        listeners.senders.retain(|(_, tx)| tx.send(width).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).senders.len()
    }
}

/// Registration guard returned by [`ResizeBus::subscribe`].
pub struct ResizeListener {
    id: u64,
    bus: Weak<Mutex<Listeners>>,
    rx: Receiver<u32>,
}

impl ResizeListener {
    /// The most recent width notified since the last call, if any.
    pub fn latest(&self) -> Option<u32> {
        self.rx.try_iter().last()
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Some(listeners) = self.bus.upgrade() {
            lock(&listeners).senders.retain(|(id, _)| *id != self.id);
            tracing::debug!(id = self.id, "resize listener released");
        }
    }
}
