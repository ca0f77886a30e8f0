//! Camera description and the per-frame easing rig.
//!
//! The rig is pure: selection in, pose out. The renderer and the DOM overlay
//! both read the resulting [`Camera`].

use crate::constants::{
    CAMERA_BLEND, CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR, FOCUS_OFFSET, HOME_LOOK_AT,
    HOME_POSITION,
};
use crate::panel::{PanelId, PanelSelection};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: HOME_POSITION,
            target: HOME_LOOK_AT,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn apply_pose(&mut self, pose: CameraPose) {
        self.eye = pose.position;
        self.target = pose.look_at;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const HOME: CameraPose = CameraPose {
        position: HOME_POSITION,
        look_at: HOME_LOOK_AT,
    };

    pub fn focused(panel: PanelId) -> Self {
        let p = panel.position();
        Self {
            position: p + FOCUS_OFFSET,
            look_at: p,
        }
    }

    pub fn target_for(selection: &PanelSelection) -> Self {
        match selection.active() {
            Some(panel) => Self::focused(panel),
            None => Self::HOME,
        }
    }
}

/// Result of one rig tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigFrame {
    pub pose: CameraPose,
    /// Orbit/zoom input is honoured only while no panel is focused.
    pub controls_enabled: bool,
}

/// Eases the camera position toward the pose implied by the selection.
///
/// Each tick moves `BLEND` of the remaining distance, so the error after `k`
/// ticks toward a fixed target is `(1 - BLEND)^k` of the initial error. The
/// look-at point is not eased.
#[derive(Clone, Debug)]
pub struct CameraRig {
    position: Vec3,
    blend: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(HOME_POSITION)
    }
}

impl CameraRig {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            blend: CAMERA_BLEND,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera directly, e.g. from orbit controls. The next tick eases
    /// from here.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn tick(&mut self, selection: &PanelSelection) -> RigFrame {
        let target = CameraPose::target_for(selection);
        self.position = self.position.lerp(target.position, self.blend);
        RigFrame {
            pose: CameraPose {
                position: self.position,
                look_at: target.look_at,
            },
            controls_enabled: selection.active().is_none(),
        }
    }
}
