use crate::constants::{ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_POLAR_EPS, ORBIT_ZOOM_SCALE};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Rotate/zoom controls around a fixed target. Panning is not supported.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    enabled: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            enabled: true,
        }
    }
}

impl OrbitControls {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("[camera] orbit controls enabled={}", enabled);
        }
        self.enabled = enabled;
    }

    /// Drag rotation. One full viewport height of drag turns the camera by a
    /// full circle in either axis. Returns the new eye position, or `eye`
    /// unchanged while disabled.
    pub fn rotate(&self, eye: Vec3, dx_px: f32, dy_px: f32, viewport_height_px: f32) -> Vec3 {
        if !self.enabled || viewport_height_px <= 0.0 {
            return eye;
        }
        let (radius, mut theta, mut phi) = to_spherical(eye - self.target);
        theta -= TAU * dx_px / viewport_height_px;
        phi -= TAU * dy_px / viewport_height_px;
        phi = phi.clamp(ORBIT_POLAR_EPS, PI - ORBIT_POLAR_EPS);
        self.target + from_spherical(radius, theta, phi)
    }

    /// Wheel zoom; positive deltas move away from the target.
    pub fn zoom(&self, eye: Vec3, wheel_delta: f32) -> Vec3 {
        if !self.enabled {
            return eye;
        }
        let offset = eye - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return eye;
        }
        let factor = ORBIT_ZOOM_SCALE.powf(-wheel_delta / 100.0);
        let next = (distance * factor).clamp(self.min_distance, self.max_distance);
        self.target + offset * (next / distance)
    }
}

// theta: azimuth around +Y measured from +Z, phi: polar angle from +Y
fn to_spherical(offset: Vec3) -> (f32, f32, f32) {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return (0.0, 0.0, PI / 2.0);
    }
    let theta = offset.x.atan2(offset.z);
    let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    (radius, theta, phi)
}

fn from_spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_preserves_distance() {
        let c = OrbitControls::default();
        let eye = Vec3::new(0.0, 0.0, 8.0);
        let next = c.rotate(eye, 120.0, -40.0, 800.0);
        assert!((next.length() - 8.0).abs() < 1e-4);
        assert!(next.distance(eye) > 0.1);
    }

    #[test]
    fn zoom_is_clamped() {
        let c = OrbitControls::default();
        let eye = Vec3::new(0.0, 0.0, 8.0);
        assert!((c.zoom(eye, 100_000.0).length() - ORBIT_MAX_DISTANCE).abs() < 1e-4);
        assert!((c.zoom(eye, -100_000.0).length() - ORBIT_MIN_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut c = OrbitControls::default();
        c.set_enabled(false);
        let eye = Vec3::new(1.0, 2.0, 7.0);
        assert_eq!(c.rotate(eye, 50.0, 50.0, 600.0), eye);
        assert_eq!(c.zoom(eye, 300.0), eye);
    }
}
