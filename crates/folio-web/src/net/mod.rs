pub mod auth;
pub mod firestore;
pub mod http;

use folio_core::{CollectionPath, EventSink, GuestbookStore, MemoryStore, NewMessage, Subscription};

pub use firestore::FirestoreStore;

/// Guestbook backend picked at startup from the resolved config.
#[derive(Clone)]
pub enum WebStore {
    Firestore(FirestoreStore),
    /// Placeholder-config development builds keep messages in the page.
    Memory(MemoryStore),
}

impl GuestbookStore for WebStore {
    fn subscribe(&self, path: &CollectionPath, sink: EventSink) -> Subscription {
        match self {
            WebStore::Firestore(s) => s.subscribe(path, sink),
            WebStore::Memory(s) => s.subscribe(path, sink),
        }
    }

    fn create(&self, path: &CollectionPath, message: NewMessage, sink: EventSink) {
        match self {
            WebStore::Firestore(s) => s.create(path, message, sink),
            WebStore::Memory(s) => s.create(path, message, sink),
        }
    }
}
