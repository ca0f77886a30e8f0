//! Remote store seam for the guestbook, plus an in-process implementation.

use crate::guestbook::{GuestbookEvent, GuestbookMessage};
use crate::session::UserId;
use crate::timestamp::Timestamp;
use flume::Sender;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Sending half of the channel the guestbook reducer is fed from.
pub type EventSink = Sender<GuestbookEvent>;

/// Slash-separated collection path, e.g. `/artifacts/{appId}/public/data/guestbook`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn guestbook(app_id: &str) -> Self {
        Self(format!("/artifacts/{}/public/data/guestbook", app_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields written on submit. The timestamp is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub message: String,
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("store responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("could not decode store response: {0}")]
    Decode(#[from] crate::firebase::DecodeError),
}

/// Handle to a live subscription. Dropping it stops snapshot delivery.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Request bookkeeping for a polling subscription: at most one list request
/// runs, and a refresh asked for while it runs is queued behind it.
#[derive(Debug, Default)]
pub struct PollGate {
    in_flight: Cell<bool>,
    stale: Cell<bool>,
}

impl PollGate {
    /// Timer tick. Returns whether a request should start now.
    pub fn try_start(&self) -> bool {
        !self.in_flight.replace(true)
    }

    /// Refresh after a local write. A request already running may have been
    /// answered before the write landed, so it is followed by another.
    pub fn request_refresh(&self) -> bool {
        if self.in_flight.get() {
            self.stale.set(true);
            false
        } else {
            self.try_start()
        }
    }

    /// A request completed. Returns whether a queued refresh should start now.
    pub fn finish(&self) -> bool {
        self.in_flight.set(false);
        self.stale.replace(false) && self.try_start()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }
}

/// The hosted document store, seen from the guestbook.
///
/// Both operations report back through the sink rather than returning, so the
/// reducer only ever runs on the UI loop.
pub trait GuestbookStore {
    /// Deliver a full snapshot of `path` now and after every change.
    fn subscribe(&self, path: &CollectionPath, sink: EventSink) -> Subscription;

    /// Append one message; reports `WriteSucceeded` or `WriteFailed`.
    fn create(&self, path: &CollectionPath, message: NewMessage, sink: EventSink);
}

#[derive(Default)]
struct MemoryInner {
    docs: Vec<(CollectionPath, GuestbookMessage)>,
    listeners: Vec<(u64, CollectionPath, EventSink)>,
    next_listener: u64,
    next_doc: u64,
    clock_millis: i64,
    fail_writes: bool,
}

impl MemoryInner {
    fn snapshot(&self, path: &CollectionPath) -> Vec<GuestbookMessage> {
        self.docs
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Listeners on `path` with the snapshot they should receive.
    fn fan_out(&self, path: &CollectionPath) -> (Vec<GuestbookMessage>, Vec<EventSink>) {
        let sinks = self
            .listeners
            .iter()
            .filter(|(_, p, _)| p == path)
            .map(|(_, _, sink)| sink.clone())
            .collect();
        (self.snapshot(path), sinks)
    }
}

/// In-process store. Cloning shares the same collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the clock used for server-assigned timestamps.
    pub fn with_clock_millis(clock_millis: i64) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().clock_millis = clock_millis;
        store
    }

    /// Make subsequent writes fail, to exercise the error path.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn len(&self, path: &CollectionPath) -> usize {
        self.inner.borrow().snapshot(path).len()
    }

    pub fn is_empty(&self, path: &CollectionPath) -> bool {
        self.len(path) == 0
    }
}

impl GuestbookStore for MemoryStore {
    fn subscribe(&self, path: &CollectionPath, sink: EventSink) -> Subscription {
        let (id, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, path.clone(), sink.clone()));
            (id, inner.snapshot(path))
        };
        _ = sink.send(GuestbookEvent::SnapshotReceived(snapshot));
        let weak: Weak<RefCell<MemoryInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _, _)| *lid != id);
            }
        })
    }

    fn create(&self, path: &CollectionPath, message: NewMessage, sink: EventSink) {
        // sinks are fed only after the borrow is released
        let written = {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_writes {
                None
            } else {
                inner.clock_millis += 1;
                inner.next_doc += 1;
                let doc = GuestbookMessage {
                    id: format!("mem-{:06}", inner.next_doc),
                    message: message.message,
                    user_id: Some(message.user_id.as_str().to_string()),
                    timestamp: Some(Timestamp::from_millis(inner.clock_millis)),
                };
                inner.docs.push((path.clone(), doc));
                Some(inner.fan_out(path))
            }
        };
        let Some((snapshot, listeners)) = written else {
            _ = sink.send(GuestbookEvent::WriteFailed(StoreError::Transport(
                "memory store is rejecting writes".into(),
            )));
            return;
        };
        _ = sink.send(GuestbookEvent::WriteSucceeded);
        let mut dead = false;
        for listener in &listeners {
            dead |= listener
                .send(GuestbookEvent::SnapshotReceived(snapshot.clone()))
                .is_err();
        }
        if dead {
            self.inner
                .borrow_mut()
                .listeners
                .retain(|(_, _, sink)| !sink.is_disconnected());
        }
    }
}
