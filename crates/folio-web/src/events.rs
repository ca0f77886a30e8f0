//! Pointer, wheel and card-button wiring.

use crate::constants::CLICK_SLOP_PX;
use crate::dom;
use crate::input;
use crate::overlay::Overlay;
use crate::state::SceneState;
use folio_core::picking::{pick_panel, screen_to_world_ray};
use folio_core::PanelId;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub fn wire_input_handlers(
    canvas: &web::HtmlCanvasElement,
    state: &Rc<RefCell<SceneState>>,
    overlay: &Overlay,
) {
    wire_pointerdown(canvas, state);
    wire_pointermove(canvas, state);
    wire_pointerup(canvas, state);
    wire_wheel(canvas, state);
    wire_card_buttons(overlay, state);
}

fn panel_under(state: &SceneState, canvas: &web::HtmlCanvasElement, px: Vec2) -> Option<PanelId> {
    let ndc = input::canvas_px_to_ndc(px, canvas.width() as f32, canvas.height() as f32);
    let ray = screen_to_world_ray(&state.camera, ndc);
    pick_panel(&ray, &state.panels)
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, state: &Rc<RefCell<SceneState>>) {
    let c = canvas.clone();
    let state = state.clone();
    dom::add_listener::<web::PointerEvent>(canvas, "pointerdown", move |ev| {
        let pos = input::pointer_canvas_px(&ev, &c);
        state.borrow_mut().drag.begin(pos);
        _ = c.set_pointer_capture(ev.pointer_id());
    });
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, state: &Rc<RefCell<SceneState>>) {
    let c = canvas.clone();
    let state = state.clone();
    dom::add_listener::<web::PointerEvent>(canvas, "pointermove", move |ev| {
        let pos = input::pointer_canvas_px(&ev, &c);
        let mut s = state.borrow_mut();
        if s.drag.active {
            let delta = s.drag.step(pos);
            if s.orbit.enabled() {
                let eye = s.orbit.rotate(s.rig.position(), delta.x, delta.y, c.height() as f32);
                s.rig.set_position(eye);
            }
        }
        let hovered = panel_under(&s, &c, pos);
        if hovered != s.hovered {
            s.hovered = hovered;
            dom::set_style(&c, "cursor", if hovered.is_some() { "pointer" } else { "" });
        }
    });
}

fn wire_pointerup(canvas: &web::HtmlCanvasElement, state: &Rc<RefCell<SceneState>>) {
    let c = canvas.clone();
    let state = state.clone();
    dom::add_listener::<web::PointerEvent>(canvas, "pointerup", move |ev| {
        _ = c.release_pointer_capture(ev.pointer_id());
        let pos = input::pointer_canvas_px(&ev, &c);
        let mut s = state.borrow_mut();
        if !s.drag.finish(CLICK_SLOP_PX) {
            return;
        }
        if let Some(panel) = panel_under(&s, &c, pos) {
            s.select(panel);
        }
    });
    let state_cancel = state.clone();
    dom::add_listener::<web::PointerEvent>(canvas, "pointercancel", move |_| {
        state_cancel.borrow_mut().drag.active = false;
    });
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, state: &Rc<RefCell<SceneState>>) {
    let state = state.clone();
    dom::add_listener::<web::WheelEvent>(canvas, "wheel", move |ev| {
        let mut s = state.borrow_mut();
        if !s.orbit.enabled() {
            return;
        }
        let delta = input::wheel_delta_px(ev.delta_y(), ev.delta_mode());
        let eye = s.orbit.zoom(s.rig.position(), delta);
        s.rig.set_position(eye);
    });
}

fn wire_card_buttons(overlay: &Overlay, state: &Rc<RefCell<SceneState>>) {
    for (panel, button) in overlay.buttons() {
        let state = state.clone();
        dom::add_click_listener(button, move || state.borrow_mut().select(panel));
    }
}
