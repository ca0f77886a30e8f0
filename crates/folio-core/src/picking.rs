use crate::camera::Camera;
use crate::constants::{PANEL_HEIGHT, PANEL_WIDTH};
use crate::panel::{PanelId, PanelTransform};
use glam::{Vec2, Vec3, Vec4};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Compute a world-space ray through normalized device coordinates
/// (`x`, `y` in \[-1, 1\], +Y up) for the given camera.
pub fn screen_to_world_ray(camera: &Camera, ndc: Vec2) -> Ray {
    let inv = camera.view_proj().inverse();
    let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    Ray {
        origin: camera.eye,
        dir: (p1 - camera.eye).normalize(),
    }
}

/// Distance along `ray` to the panel rectangle, if it is hit from either side.
pub fn ray_panel(ray: &Ray, panel: &PanelTransform) -> Option<f32> {
    let normal = panel.normal();
    let denom = normal.dot(ray.dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (panel.center - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    let local = panel.rotation.inverse() * (ray.origin + ray.dir * t - panel.center);
    let inside = local.x.abs() <= PANEL_WIDTH * 0.5 && local.y.abs() <= PANEL_HEIGHT * 0.5;
    inside.then_some(t)
}

/// Nearest panel under the ray.
pub fn pick_panel(ray: &Ray, panels: &[PanelTransform]) -> Option<PanelId> {
    let mut best = None::<(PanelId, f32)>;
    for panel in panels {
        if let Some(t) = ray_panel(ray, panel) {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((panel.id, t)),
            }
        }
    }
    best.map(|(id, _)| id)
}

/// Project a world point to canvas pixels (origin top-left). `None` when the
/// point is behind the camera.
pub fn world_to_screen(camera: &Camera, world: Vec3, width: f32, height: f32) -> Option<Vec2> {
    let clip = camera.view_proj() * world.extend(1.0);
    if clip.w <= 1e-6 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * width,
        (1.0 - (ndc.y * 0.5 + 0.5)) * height,
    ))
}

/// Screen footprint of a panel, used to lay the HTML card over it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPanel {
    pub center: Vec2,
    /// Distance in pixels between the projected left and right edge midpoints.
    pub width_px: f32,
}

pub fn project_panel(
    camera: &Camera,
    panel: &PanelTransform,
    z_offset: f32,
    width: f32,
    height: f32,
) -> Option<ProjectedPanel> {
    let center = panel.center + panel.normal() * z_offset;
    let half = panel.rotation * Vec3::X * (PANEL_WIDTH * 0.5);
    let c = world_to_screen(camera, center, width, height)?;
    let l = world_to_screen(camera, center - half, width, height)?;
    let r = world_to_screen(camera, center + half, width, height)?;
    Some(ProjectedPanel {
        center: c,
        width_px: l.distance(r),
    })
}
