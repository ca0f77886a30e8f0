//! Guestbook state as a reducer over store and UI events.
//!
//! The list is always the last snapshot re-sorted newest-first; delivery
//! order from the store is never trusted.

use crate::constants::{AUTHOR_LABEL_CHARS, SEND_FAILED_LABEL, UNKNOWN_AUTHOR};
use crate::session::{SessionContext, UserId};
use crate::store::{
    CollectionPath, EventSink, GuestbookStore, NewMessage, StoreError, Subscription,
};
use crate::timestamp::Timestamp;
use flume::Receiver;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestbookMessage {
    pub id: String,
    pub message: String,
    pub user_id: Option<String>,
    pub timestamp: Option<Timestamp>,
}

impl GuestbookMessage {
    /// Short author tag shown under each message.
    pub fn author_label(&self) -> String {
        match self.user_id.as_deref() {
            Some(id) if !id.is_empty() => id.chars().take(AUTHOR_LABEL_CHARS).collect(),
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum GuestbookEvent {
    InputChanged(String),
    SnapshotReceived(Vec<GuestbookMessage>),
    SubmitRequested,
    WriteSucceeded,
    WriteFailed(StoreError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuestbookEffect {
    Create(NewMessage),
}

pub type Effects = SmallVec<[GuestbookEffect; 1]>;

/// Newest first; messages still missing a server timestamp go last and ties
/// break on id so the order is stable across snapshots.
pub fn sort_newest_first(messages: &mut [GuestbookMessage]) {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
}

#[derive(Debug)]
pub struct Guestbook {
    user_id: UserId,
    messages: Vec<GuestbookMessage>,
    input: String,
    status: Option<&'static str>,
    revision: u64,
}

impl Guestbook {
    pub fn new(session: &SessionContext) -> Self {
        Self {
            user_id: session.user_id().clone(),
            messages: Vec::new(),
            input: String::new(),
            status: None,
            revision: 0,
        }
    }

    pub fn messages(&self) -> &[GuestbookMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Passive notice after a failed send; cleared by the next submit.
    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    /// Bumped on every visible change so views can skip redundant redraws.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, event: GuestbookEvent) -> Effects {
        let mut effects = Effects::new();
        match event {
            GuestbookEvent::InputChanged(text) => {
                if text != self.input {
                    self.input = text;
                    self.touch();
                }
            }
            GuestbookEvent::SnapshotReceived(mut docs) => {
                sort_newest_first(&mut docs);
                log::debug!("[guestbook] snapshot with {} messages", docs.len());
                self.messages = docs;
                self.touch();
            }
            GuestbookEvent::SubmitRequested => {
                if self.input.trim().is_empty() {
                    return effects;
                }
                self.status = None;
                effects.push(GuestbookEffect::Create(NewMessage {
                    message: self.input.clone(),
                    user_id: self.user_id.clone(),
                }));
                self.touch();
            }
            GuestbookEvent::WriteSucceeded => {
                self.input.clear();
                self.status = None;
                self.touch();
            }
            GuestbookEvent::WriteFailed(err) => {
                log::error!("[guestbook] error adding message: {}", err);
                self.status = Some(SEND_FAILED_LABEL);
                self.touch();
            }
        }
        effects
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Owns the one live subscription for the current identity and performs the
/// reducer's effects against the store.
pub struct GuestbookSync<S: GuestbookStore> {
    store: S,
    path: CollectionPath,
    sink: EventSink,
    current: Option<(UserId, Subscription)>,
}

impl<S: GuestbookStore> GuestbookSync<S> {
    pub fn new(store: S, path: CollectionPath, sink: EventSink) -> Self {
        Self {
            store,
            path,
            sink,
            current: None,
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn is_subscribed(&self) -> bool {
        self.current.is_some()
    }

    /// Subscribe for `session`. A subscription for a different identity is
    /// released first; the same identity keeps its existing one.
    pub fn attach(&mut self, session: &SessionContext) {
        if let Some((uid, _)) = &self.current {
            if uid == session.user_id() {
                return;
            }
        }
        self.detach();
        log::info!("[guestbook] subscribing to {}", self.path);
        let sub = self.store.subscribe(&self.path, self.sink.clone());
        self.current = Some((session.user_id().clone(), sub));
    }

    pub fn detach(&mut self) {
        if let Some((uid, sub)) = self.current.take() {
            log::info!("[guestbook] releasing subscription for {}", uid);
            drop(sub);
        }
    }

    pub fn perform(&self, effects: Effects) {
        for effect in effects {
            match effect {
                GuestbookEffect::Create(message) => {
                    self.store.create(&self.path, message, self.sink.clone());
                }
            }
        }
    }
}

impl<S: GuestbookStore> Drop for GuestbookSync<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Drain every queued event through the reducer, performing effects as they
/// come. Returns whether anything was processed.
pub fn pump<S: GuestbookStore>(
    book: &mut Guestbook,
    events: &Receiver<GuestbookEvent>,
    sync: &GuestbookSync<S>,
) -> bool {
    let mut any = false;
    while let Ok(event) = events.try_recv() {
        any = true;
        let effects = book.apply(event);
        sync.perform(effects);
    }
    any
}
