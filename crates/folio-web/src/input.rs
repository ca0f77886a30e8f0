use glam::Vec2;
use web_sys as web;

/// Canvas-space pointer tracking used for orbit drags and click detection.
#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub active: bool,
    pub start: Vec2,
    pub last: Vec2,
    pub travelled: f32,
}

impl DragState {
    pub fn begin(&mut self, at: Vec2) {
        self.active = true;
        self.start = at;
        self.last = at;
        self.travelled = 0.0;
    }

    /// Record a move and return the delta since the previous sample.
    pub fn step(&mut self, at: Vec2) -> Vec2 {
        let delta = at - self.last;
        self.travelled += delta.length();
        self.last = at;
        delta
    }

    /// End the drag; true when the pointer barely moved, i.e. a click.
    pub fn finish(&mut self, slop_px: f32) -> bool {
        let was_active = self.active;
        self.active = false;
        was_active && self.travelled <= slop_px
    }
}

/// Canvas backing-store pixels to normalized device coordinates (+Y up).
#[inline]
pub fn canvas_px_to_ndc(px: Vec2, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((2.0 * px.x / w) - 1.0, 1.0 - (2.0 * px.y / h))
}

#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let rw = (rect.width() as f32).max(1.0);
    let rh = (rect.height() as f32).max(1.0);
    let sx = (x_css / rw) * canvas.width() as f32;
    let sy = (y_css / rh) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Wheel delta in pixel units regardless of the event's delta mode.
#[inline]
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32) -> f32 {
    match delta_mode {
        1 => (delta_y * 16.0) as f32,  // lines
        2 => (delta_y * 800.0) as f32, // pages
        _ => delta_y as f32,
    }
}
