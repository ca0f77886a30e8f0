//! DOM side of the guestbook: renders reducer state and turns form input into
//! events on the guestbook channel.

use crate::constants::{
    GUESTBOOK_FORM_ID, GUESTBOOK_INPUT_ID, GUESTBOOK_LIST_ID, GUESTBOOK_STATUS_ID,
    GUESTBOOK_USER_ID, UNAVAILABLE_LABEL,
};
use crate::dom;
use crate::net::WebStore;
use flume::Receiver;
use folio_core::constants::EMPTY_GUESTBOOK_LABEL;
use folio_core::{pump, EventSink, Guestbook, GuestbookEvent, GuestbookSync};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub struct GuestbookView {
    document: web::Document,
    list: web::HtmlElement,
    input: web::HtmlInputElement,
    send: Option<web::Element>,
    // empty until a session is resolved; events before that are dropped
    sink: Rc<RefCell<Option<EventSink>>>,
    user: Option<web::HtmlElement>,
    status: Option<web::HtmlElement>,
    rendered_revision: Option<u64>,
}

impl GuestbookView {
    /// Look up the form and take over its submit straight away, so the page
    /// never does a native form post while sign-in is still running.
    pub fn find(document: &web::Document) -> Option<Self> {
        let view = Self {
            document: document.clone(),
            list: dom::by_id(document, GUESTBOOK_LIST_ID)?,
            input: dom::by_id(document, GUESTBOOK_INPUT_ID)?,
            send: None,
            sink: Rc::new(RefCell::new(None)),
            user: dom::by_id(document, GUESTBOOK_USER_ID),
            status: dom::by_id(document, GUESTBOOK_STATUS_ID),
            rendered_revision: None,
        };
        Some(view.wire_form())
    }

    fn wire_form(mut self) -> Self {
        let input = self.input.clone();
        let input_sink = self.sink.clone();
        dom::add_listener::<web::Event>(&self.input, "input", move |_| {
            if let Some(sink) = input_sink.borrow().as_ref() {
                _ = sink.send(GuestbookEvent::InputChanged(input.value()));
            }
        });
        if let Some(form) = self.document.get_element_by_id(GUESTBOOK_FORM_ID) {
            self.send = form.query_selector("button[type=submit]").ok().flatten();
            let submit_sink = self.sink.clone();
            dom::add_listener::<web::Event>(&form, "submit", move |ev| {
                ev.prevent_default();
                if let Some(sink) = submit_sink.borrow().as_ref() {
                    _ = sink.send(GuestbookEvent::SubmitRequested);
                }
            });
        }
        self
    }

    /// Start forwarding typing and submits into the reducer's channel. Text
    /// typed before this point is handed over first.
    pub fn connect(&self, sink: EventSink) {
        _ = sink.send(GuestbookEvent::InputChanged(self.input.value()));
        *self.sink.borrow_mut() = Some(sink);
    }

    /// Redraw if the reducer changed since the last call.
    pub fn render(&mut self, book: &Guestbook) {
        if self.rendered_revision == Some(book.revision()) {
            return;
        }
        self.rendered_revision = Some(book.revision());

        self.list.set_inner_html("");
        if book.messages().is_empty() {
            if let Some(p) = self.element("p", "guestbook-empty", EMPTY_GUESTBOOK_LABEL) {
                _ = self.list.append_child(&p);
            }
        }
        for msg in book.messages() {
            let Ok(item) = self.document.create_element("div") else {
                continue;
            };
            item.set_class_name("guestbook-item");
            if let Some(text) = self.element("p", "guestbook-text", &msg.message) {
                _ = item.append_child(&text);
            }
            let by = format!("by {}", msg.author_label());
            if let Some(author) = self.element("p", "guestbook-author", &by) {
                _ = item.append_child(&author);
            }
            _ = self.list.append_child(&item);
        }

        if self.input.value() != book.input() {
            self.input.set_value(book.input());
        }
        if let Some(user) = &self.user {
            user.set_text_content(Some(&format!("Your user ID: {}", book.user_id())));
        }
        if let Some(status) = &self.status {
            status.set_text_content(book.status());
            dom::set_visible(status, book.status().is_some());
        }
    }

    /// Shown when no backend could be configured.
    pub fn show_unavailable(&self) {
        self.list.set_text_content(Some(UNAVAILABLE_LABEL));
        self.input.set_disabled(true);
        if let Some(send) = &self.send {
            _ = send.set_attribute("disabled", "");
        }
    }

    // text goes through textContent, never innerHTML
    fn element(&self, tag: &str, class: &str, text: &str) -> Option<web::Element> {
        let el = self.document.create_element(tag).ok()?;
        el.set_class_name(class);
        el.set_text_content(Some(text));
        Some(el)
    }
}

/// Reducer, store link and view for a resolved session. Lives from the end
/// of sign-in until the page goes away.
pub struct GuestbookRuntime {
    pub book: Guestbook,
    pub events: Receiver<GuestbookEvent>,
    pub sync: GuestbookSync<WebStore>,
    pub view: Option<GuestbookView>,
}

impl GuestbookRuntime {
    /// Once per frame: drain the channel, then redraw if anything changed.
    pub fn tick(&mut self) {
        pump(&mut self.book, &self.events, &self.sync);
        if let Some(view) = &mut self.view {
            view.render(&self.book);
        }
    }
}
