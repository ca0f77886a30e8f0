#![cfg(target_arch = "wasm32")]
use folio_core::config::{
    ENV_API_KEY, ENV_APP_ID, ENV_AUTH_DOMAIN, ENV_MESSAGING_SENDER_ID, ENV_PROJECT_ID,
    ENV_STORAGE_BUCKET,
};
use folio_core::{
    Backend, BuildProfile, CollectionPath, FirebaseConfig, Guestbook, GuestbookSync, MemoryStore,
    SessionContext,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod guestbook_view;
mod input;
mod net;
mod overlay;
mod render;
mod state;

use guestbook_view::{GuestbookRuntime, GuestbookView};
use net::{FirestoreStore, WebStore};

/// Firebase settings baked in at build time.
fn build_env(name: &'static str) -> Option<String> {
    let value = match name {
        ENV_API_KEY => option_env!("FIREBASE_API_KEY"),
        ENV_AUTH_DOMAIN => option_env!("FIREBASE_AUTH_DOMAIN"),
        ENV_PROJECT_ID => option_env!("FIREBASE_PROJECT_ID"),
        ENV_STORAGE_BUCKET => option_env!("FIREBASE_STORAGE_BUCKET"),
        ENV_MESSAGING_SENDER_ID => option_env!("FIREBASE_MESSAGING_SENDER_ID"),
        ENV_APP_ID => option_env!("FIREBASE_APP_ID"),
        _ => None,
    };
    value.map(str::to_owned)
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::by_id(&document, constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
    wire_canvas_resize(&canvas);

    let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
    let state = Rc::new(RefCell::new(state::SceneState::new(aspect)));
    let overlay = overlay::Overlay::find(&document);
    events::wire_input_handlers(&canvas, &state, &overlay);

    // sign-in runs alongside GPU setup; the frame loop picks the guestbook up
    // once it lands here
    let guestbook: Rc<RefCell<Option<GuestbookRuntime>>> = Rc::new(RefCell::new(None));
    let view = GuestbookView::find(&document);
    if view.is_none() {
        log::warn!("[guestbook] guestbook elements not found");
    }
    spawn_local(start_guestbook(view, guestbook.clone()));

    let gpu = frame::init_gpu(&canvas).await;
    overlay::hide_loader(&document);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        state,
        guestbook,
        canvas,
        overlay,
        gpu,
        motion: Default::default(),
        started: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

async fn start_guestbook(
    view: Option<GuestbookView>,
    slot: Rc<RefCell<Option<GuestbookRuntime>>>,
) {
    let backend = match FirebaseConfig::resolve(build_env, BuildProfile::current()) {
        Ok(b) => b,
        Err(e) => {
            log::error!("[config] {}", e);
            if let Some(v) = &view {
                v.show_unavailable();
            }
            return;
        }
    };

    let mut rng = rand::thread_rng();
    let path = CollectionPath::guestbook(&backend.config().app_id);
    let (session, store) = match backend {
        Backend::Placeholder(_) => {
            log::info!("[guestbook] placeholder config; messages stay in this page");
            let store = MemoryStore::with_clock_millis(js_sys::Date::now() as i64);
            (SessionContext::local(&mut rng), WebStore::Memory(store))
        }
        Backend::Firebase(config) => {
            let auth = net::auth::sign_in_anonymously(&config).await;
            let id_token = match &auth {
                Ok(Some(user)) => user.id_token.clone(),
                _ => None,
            };
            let session = SessionContext::resolve(auth, &mut rng);
            let store = WebStore::Firestore(FirestoreStore::new(config, id_token));
            (session, store)
        }
    };

    let (tx, rx) = flume::unbounded();
    let book = Guestbook::new(&session);
    let mut sync = GuestbookSync::new(store, path, tx.clone());
    sync.attach(&session);
    if let Some(v) = &view {
        v.connect(tx);
    }
    *slot.borrow_mut() = Some(GuestbookRuntime {
        book,
        events: rx,
        sync,
        view,
    });
}
