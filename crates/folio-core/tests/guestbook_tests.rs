// Host-side tests for the guestbook reducer and its subscription lifecycle.

use folio_core::constants::{SEND_FAILED_LABEL, UNKNOWN_AUTHOR};
use folio_core::{
    pump, CollectionPath, Guestbook, GuestbookEffect, GuestbookEvent, GuestbookMessage,
    GuestbookStore, GuestbookSync, MemoryStore, PollGate, SessionContext, StoreError, Timestamp,
    UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn session() -> SessionContext {
    SessionContext::local(&mut StdRng::seed_from_u64(11))
}

fn msg(id: &str, ts: Option<i64>) -> GuestbookMessage {
    GuestbookMessage {
        id: id.to_string(),
        message: format!("hi from {id}"),
        user_id: Some("user-abcdefghijk".to_string()),
        timestamp: ts.map(Timestamp::from_secs),
    }
}

fn timestamps(book: &Guestbook) -> Vec<Option<i64>> {
    book.messages()
        .iter()
        .map(|m| m.timestamp.map(|t| t.seconds()))
        .collect()
}

#[test]
fn snapshot_is_sorted_newest_first() {
    let mut book = Guestbook::new(&session());
    book.apply(GuestbookEvent::SnapshotReceived(vec![
        msg("a", Some(3)),
        msg("b", Some(1)),
        msg("c", Some(2)),
    ]));
    assert_eq!(timestamps(&book), vec![Some(3), Some(2), Some(1)]);
}

#[test]
fn snapshot_replaces_rather_than_appends() {
    let mut book = Guestbook::new(&session());
    book.apply(GuestbookEvent::SnapshotReceived(vec![msg("a", Some(1))]));
    book.apply(GuestbookEvent::SnapshotReceived(vec![
        msg("b", Some(5)),
        msg("a", Some(1)),
    ]));
    let ids: Vec<_> = book.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn pending_timestamps_sort_last() {
    let mut book = Guestbook::new(&session());
    book.apply(GuestbookEvent::SnapshotReceived(vec![
        msg("p", None),
        msg("a", Some(1)),
        msg("b", Some(9)),
    ]));
    assert_eq!(timestamps(&book), vec![Some(9), Some(1), None]);
}

#[test]
fn author_label_truncates_or_falls_back() {
    let mut m = msg("a", Some(1));
    assert_eq!(m.author_label(), "user-abc");
    m.user_id = None;
    assert_eq!(m.author_label(), UNKNOWN_AUTHOR);
    m.user_id = Some(String::new());
    assert_eq!(m.author_label(), UNKNOWN_AUTHOR);
    m.user_id = Some("ünï".to_string());
    assert_eq!(m.author_label(), "ünï");
}

#[test]
fn blank_submit_emits_nothing() {
    let mut book = Guestbook::new(&session());
    book.apply(GuestbookEvent::SnapshotReceived(vec![msg("a", Some(1))]));
    for text in ["", "   ", "\t\n"] {
        book.apply(GuestbookEvent::InputChanged(text.to_string()));
        let effects = book.apply(GuestbookEvent::SubmitRequested);
        assert!(effects.is_empty());
    }
    assert_eq!(book.messages().len(), 1);
}

#[test]
fn submit_carries_text_and_session_user() {
    let s = session();
    let mut book = Guestbook::new(&s);
    book.apply(GuestbookEvent::InputChanged("  hello  ".into()));
    let effects = book.apply(GuestbookEvent::SubmitRequested);
    assert_eq!(effects.len(), 1);
    let GuestbookEffect::Create(new) = &effects[0];
    assert_eq!(new.message, "  hello  ");
    assert_eq!(&new.user_id, s.user_id());
}

#[test]
fn success_clears_input_and_failure_keeps_it() {
    let mut book = Guestbook::new(&session());
    book.apply(GuestbookEvent::InputChanged("hello".into()));
    book.apply(GuestbookEvent::SubmitRequested);
    book.apply(GuestbookEvent::WriteFailed(StoreError::Transport("offline".into())));
    assert_eq!(book.input(), "hello");
    assert_eq!(book.status(), Some(SEND_FAILED_LABEL));

    book.apply(GuestbookEvent::SubmitRequested);
    assert_eq!(book.status(), None);
    book.apply(GuestbookEvent::WriteSucceeded);
    assert_eq!(book.input(), "");
}

#[test]
fn revision_moves_only_on_visible_change() {
    let mut book = Guestbook::new(&session());
    let r0 = book.revision();
    book.apply(GuestbookEvent::SubmitRequested);
    assert_eq!(book.revision(), r0);
    book.apply(GuestbookEvent::InputChanged("x".into()));
    let r1 = book.revision();
    assert!(r1 > r0);
    book.apply(GuestbookEvent::InputChanged("x".into()));
    assert_eq!(book.revision(), r1);
}

#[test]
fn memory_store_round_trip_through_channel() {
    let s = session();
    let (tx, rx) = flume::unbounded();
    let store = MemoryStore::with_clock_millis(1_000);
    let path = CollectionPath::guestbook("app-1");
    let mut sync = GuestbookSync::new(store.clone(), path.clone(), tx.clone());
    let mut book = Guestbook::new(&s);

    sync.attach(&s);
    assert!(pump(&mut book, &rx, &sync));
    assert!(book.messages().is_empty());

    for text in ["first", "second", "third"] {
        _ = tx.send(GuestbookEvent::InputChanged(text.into()));
        _ = tx.send(GuestbookEvent::SubmitRequested);
        pump(&mut book, &rx, &sync);
        assert_eq!(book.input(), "");
    }
    let texts: Vec<_> = book.messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert_eq!(store.len(&path), 3);
}

#[test]
fn failed_write_performs_no_insert() {
    let s = session();
    let (tx, rx) = flume::unbounded();
    let store = MemoryStore::new();
    store.set_fail_writes(true);
    let path = CollectionPath::guestbook("app-1");
    let mut sync = GuestbookSync::new(store.clone(), path.clone(), tx.clone());
    let mut book = Guestbook::new(&s);
    sync.attach(&s);

    _ = tx.send(GuestbookEvent::InputChanged("hello".into()));
    _ = tx.send(GuestbookEvent::SubmitRequested);
    pump(&mut book, &rx, &sync);
    assert_eq!(book.input(), "hello");
    assert!(store.is_empty(&path));
}

#[test]
fn one_subscription_per_identity() {
    let (tx, _rx) = flume::unbounded();
    let store = MemoryStore::new();
    let mut sync = GuestbookSync::new(store.clone(), CollectionPath::guestbook("a"), tx);
    let first = session();
    sync.attach(&first);
    sync.attach(&first);
    assert_eq!(store.listener_count(), 1);

    let other = SessionContext::local(&mut StdRng::seed_from_u64(99));
    assert_ne!(other.user_id(), first.user_id());
    sync.attach(&other);
    assert_eq!(store.listener_count(), 1);

    sync.detach();
    assert_eq!(store.listener_count(), 0);
    assert!(!sync.is_subscribed());
}

#[test]
fn dropping_sync_releases_listener() {
    let (tx, _rx) = flume::unbounded();
    let store = MemoryStore::new();
    {
        let mut sync = GuestbookSync::new(store.clone(), CollectionPath::guestbook("a"), tx);
        sync.attach(&session());
        assert_eq!(store.listener_count(), 1);
    }
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn released_subscription_gets_no_more_snapshots() {
    let (tx, rx) = flume::unbounded();
    let store = MemoryStore::new();
    let path = CollectionPath::guestbook("a");
    let sub = store.subscribe(&path, tx.clone());
    drop(sub);
    while rx.try_recv().is_ok() {}

    let (wtx, _wrx) = flume::unbounded();
    store.create(
        &path,
        folio_core::NewMessage {
            message: "late".into(),
            user_id: UserId::new("u"),
        },
        wtx,
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn collections_are_isolated_by_path() {
    let (tx, _rx) = flume::unbounded();
    let store = MemoryStore::new();
    let a = CollectionPath::guestbook("a");
    let b = CollectionPath::guestbook("b");
    store.create(
        &a,
        folio_core::NewMessage {
            message: "only in a".into(),
            user_id: UserId::new("u"),
        },
        tx,
    );
    assert_eq!(store.len(&a), 1);
    assert!(store.is_empty(&b));
}

#[test]
fn write_prunes_listeners_whose_receiver_is_gone() {
    let store = MemoryStore::new();
    let path = CollectionPath::guestbook("a");
    let (gone_tx, gone_rx) = flume::unbounded();
    let (live_tx, live_rx) = flume::unbounded();
    let _gone = store.subscribe(&path, gone_tx);
    let _live = store.subscribe(&path, live_tx);
    drop(gone_rx);
    while live_rx.try_recv().is_ok() {}
    assert_eq!(store.listener_count(), 2);

    let (wtx, wrx) = flume::unbounded();
    store.create(
        &path,
        folio_core::NewMessage {
            message: "hello".into(),
            user_id: UserId::new("u"),
        },
        wtx,
    );
    assert!(matches!(wrx.try_recv(), Ok(GuestbookEvent::WriteSucceeded)));
    assert!(matches!(
        live_rx.try_recv(),
        Ok(GuestbookEvent::SnapshotReceived(docs)) if docs.len() == 1
    ));
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn draft_handed_over_at_connect_survives_the_first_snapshot() {
    let s = session();
    let (tx, rx) = flume::unbounded();
    let store = MemoryStore::new();
    let mut sync = GuestbookSync::new(store, CollectionPath::guestbook("a"), tx.clone());
    let mut book = Guestbook::new(&s);

    sync.attach(&s);
    _ = tx.send(GuestbookEvent::InputChanged("typed early".into()));
    pump(&mut book, &rx, &sync);
    assert_eq!(book.input(), "typed early");

    _ = tx.send(GuestbookEvent::SubmitRequested);
    pump(&mut book, &rx, &sync);
    let texts: Vec<_> = book.messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["typed early"]);
}

#[test]
fn refresh_during_a_running_poll_is_queued_behind_it() {
    let gate = PollGate::default();
    assert!(gate.try_start());
    // timer ticks while a request runs are skipped
    assert!(!gate.try_start());
    assert!(!gate.request_refresh());
    // the stale result lands and another request starts at once
    assert!(gate.finish());
    assert!(gate.is_in_flight());
    assert!(!gate.finish());
    assert!(!gate.is_in_flight());
}

#[test]
fn refresh_when_idle_starts_immediately() {
    let gate = PollGate::default();
    assert!(gate.request_refresh());
    assert!(!gate.finish());
    assert!(gate.try_start());
}
