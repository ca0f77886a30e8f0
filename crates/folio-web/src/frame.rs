use crate::guestbook_view::GuestbookRuntime;
use crate::overlay::Overlay;
use crate::render;
use crate::state::SceneState;
use folio_core::panel_transforms;
use folio_core::scene::BackgroundMotion;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub state: Rc<RefCell<SceneState>>,
    pub guestbook: Rc<RefCell<Option<GuestbookRuntime>>>,
    pub canvas: web::HtmlCanvasElement,
    pub overlay: Overlay,
    pub gpu: Option<render::GpuState>,
    pub motion: BackgroundMotion,
    pub started: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        if let Ok(mut gb) = self.guestbook.try_borrow_mut() {
            if let Some(rt) = gb.as_mut() {
                rt.tick();
            }
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let w = self.canvas.width();
        let h = self.canvas.height();
        let dpr = web::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0) as f32;

        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let rig = s.rig.tick(&s.selection);
        s.orbit.set_enabled(rig.controls_enabled);
        s.camera.apply_pose(rig.pose);
        s.camera.aspect = w.max(1) as f32 / h.max(1) as f32;
        s.panels = panel_transforms(elapsed);
        self.motion.advance(elapsed);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w, h);
            let scene = render::SceneFrame {
                camera: &s.camera,
                panels: &s.panels,
                hovered: s.hovered,
                motion: &self.motion,
            };
            if let Err(e) = g.render(&scene) {
                log::error!("[gpu] render error: {:?}", e);
            }
        }

        self.overlay.layout(
            &s.camera,
            &s.panels,
            &s.selection,
            w as f32,
            h as f32,
            dpr,
        );
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
