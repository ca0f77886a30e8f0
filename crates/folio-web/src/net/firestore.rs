//! Firestore-backed guestbook store.
//!
//! The REST surface has no push channel, so a subscription is a poller that
//! lists the whole collection on an interval and forwards each result as a
//! full snapshot. Local writes trigger an extra poll right away.

use super::http;
use crate::constants::POLL_INTERVAL_MS;
use folio_core::firebase::{auto_id, commit_body, commit_url, decode_list_page, list_url};
use folio_core::{
    CollectionPath, EventSink, FirebaseConfig, GuestbookEvent, GuestbookMessage, GuestbookStore,
    NewMessage, PollGate, StoreError, Subscription,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct Poller {
    config: Rc<FirebaseConfig>,
    id_token: Option<Rc<str>>,
    path: CollectionPath,
    sink: EventSink,
    active: Cell<bool>,
    gate: PollGate,
}

impl Poller {
    fn poll(self: &Rc<Self>) {
        if self.active.get() && self.gate.try_start() {
            self.fetch();
        }
    }

    fn refresh(self: &Rc<Self>) {
        if self.active.get() && self.gate.request_refresh() {
            self.fetch();
        }
    }

    fn fetch(self: &Rc<Self>) {
        let this = self.clone();
        spawn_local(async move {
            let result = list_all(&this.config, &this.path, this.id_token.as_deref()).await;
            let again = this.gate.finish();
            if !this.active.get() {
                return;
            }
            match result {
                Ok(messages) => {
                    _ = this.sink.send(GuestbookEvent::SnapshotReceived(messages));
                }
                Err(e) => log::warn!("[guestbook] snapshot fetch failed: {}", e),
            }
            if again {
                this.fetch();
            }
        });
    }
}

/// Follow `nextPageToken` until the collection is exhausted.
async fn list_all(
    config: &FirebaseConfig,
    path: &CollectionPath,
    id_token: Option<&str>,
) -> Result<Vec<GuestbookMessage>, StoreError> {
    let mut out = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let url = list_url(config, path, token.as_deref());
        let body = http::send_json("GET", &url, None, id_token).await?;
        let (mut page, next) = decode_list_page(&body)?;
        out.append(&mut page);
        match next {
            Some(t) => token = Some(t),
            None => return Ok(out),
        }
    }
}

#[derive(Clone)]
pub struct FirestoreStore {
    config: Rc<FirebaseConfig>,
    id_token: Option<Rc<str>>,
    pollers: Rc<RefCell<Vec<Weak<Poller>>>>,
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig, id_token: Option<String>) -> Self {
        Self {
            config: Rc::new(config),
            id_token: id_token.map(Rc::from),
            pollers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn refresh_subscribers(pollers: &Rc<RefCell<Vec<Weak<Poller>>>>) {
        let live: Vec<Rc<Poller>> = {
            let mut list = pollers.borrow_mut();
            list.retain(|w| w.strong_count() > 0);
            list.iter().filter_map(Weak::upgrade).collect()
        };
        for p in live {
            p.refresh();
        }
    }
}

impl GuestbookStore for FirestoreStore {
    fn subscribe(&self, path: &CollectionPath, sink: EventSink) -> Subscription {
        let poller = Rc::new(Poller {
            config: self.config.clone(),
            id_token: self.id_token.clone(),
            path: path.clone(),
            sink,
            active: Cell::new(true),
            gate: PollGate::default(),
        });
        self.pollers.borrow_mut().push(Rc::downgrade(&poller));
        poller.poll();

        let Some(window) = web::window() else {
            log::error!("[guestbook] no window; live updates disabled");
            return Subscription::new(move || poller.active.set(false));
        };
        let tick_poller = poller.clone();
        let tick = Closure::wrap(Box::new(move || tick_poller.poll()) as Box<dyn FnMut()>);
        let handle = match window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            POLL_INTERVAL_MS,
        ) {
            Ok(h) => Some(h),
            Err(e) => {
                log::error!("[guestbook] setInterval failed: {:?}", e);
                None
            }
        };
        Subscription::new(move || {
            poller.active.set(false);
            if let Some(h) = handle {
                window.clear_interval_with_handle(h);
            }
            drop(tick);
        })
    }

    fn create(&self, path: &CollectionPath, message: NewMessage, sink: EventSink) {
        let config = self.config.clone();
        let id_token = self.id_token.clone();
        let pollers = self.pollers.clone();
        let path = path.clone();
        spawn_local(async move {
            let doc_id = auto_id(&mut rand::thread_rng());
            let body = commit_body(&config, &path, &doc_id, &message);
            let url = commit_url(&config);
            match http::send_json("POST", &url, Some(&body), id_token.as_deref()).await {
                Ok(_) => {
                    log::info!("[guestbook] message {} written", doc_id);
                    _ = sink.send(GuestbookEvent::WriteSucceeded);
                    FirestoreStore::refresh_subscribers(&pollers);
                }
                Err(e) => {
                    _ = sink.send(GuestbookEvent::WriteFailed(e));
                }
            }
        });
    }
}
