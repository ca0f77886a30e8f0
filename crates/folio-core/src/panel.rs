//! The four content panels and the single-selection state that drives the
//! camera.

use crate::constants::{PANEL_FLOAT_AMPLITUDE, PANEL_HEIGHT, PANEL_WIDTH};
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelId {
    About,
    Skills,
    Projects,
    Contact,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::About,
        PanelId::Skills,
        PanelId::Projects,
        PanelId::Contact,
    ];

    /// Stable lowercase key, used for DOM ids and `data-panel` attributes.
    pub fn key(self) -> &'static str {
        match self {
            PanelId::About => "about",
            PanelId::Skills => "skills",
            PanelId::Projects => "projects",
            PanelId::Contact => "contact",
        }
    }

    pub fn from_key(key: &str) -> Option<PanelId> {
        PanelId::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelId::About => "About",
            PanelId::Skills => "Skills",
            PanelId::Projects => "Projects",
            PanelId::Contact => "Contact",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PanelId::About => 0,
            PanelId::Skills => 1,
            PanelId::Projects => 2,
            PanelId::Contact => 3,
        }
    }

    /// Fixed world position. Camera targeting always uses this, never the
    /// floated position.
    pub fn position(self) -> Vec3 {
        match self {
            PanelId::About => Vec3::new(-4.0, 2.0, 0.0),
            PanelId::Skills => Vec3::new(-4.0, -2.0, 0.0),
            PanelId::Projects => Vec3::new(4.0, 2.0, 0.0),
            PanelId::Contact => Vec3::new(4.0, -2.0, 0.0),
        }
    }

    /// Rotation about Y; left-hand panels turn toward the centre, right-hand
    /// panels the other way.
    pub fn yaw(self) -> f32 {
        match self {
            PanelId::About | PanelId::Skills => 0.5,
            PanelId::Projects | PanelId::Contact => -0.5,
        }
    }
}

/// Which panel, if any, currently has focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelSelection {
    active: Option<PanelId>,
}

impl PanelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<PanelId> {
        self.active
    }

    pub fn is_active(&self, panel: PanelId) -> bool {
        self.active == Some(panel)
    }

    /// Toggle `panel`: selecting the active panel clears focus, any other
    /// panel replaces it.
    pub fn select(&mut self, panel: PanelId) -> Option<PanelId> {
        self.active = match self.active {
            Some(current) if current == panel => None,
            _ => Some(panel),
        };
        log::debug!("[panel] select {} -> {:?}", panel.key(), self.active);
        self.active
    }
}

/// Where a panel is drawn this frame.
#[derive(Clone, Copy, Debug)]
pub struct PanelTransform {
    pub id: PanelId,
    pub center: Vec3,
    pub rotation: Quat,
}

impl PanelTransform {
    /// Panel placement at `elapsed_secs` including the idle float.
    pub fn at(id: PanelId, elapsed_secs: f64) -> Self {
        let base = id.position();
        let center = Vec3::new(base.x, float_offset(base.y, elapsed_secs, id.index()), base.z);
        Self {
            id,
            center,
            rotation: Quat::from_rotation_y(id.yaw()),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Model matrix for a unit quad in the XY plane scaled to panel size and
    /// pushed `z_offset` along the panel normal.
    pub fn model_matrix(&self, z_offset: f32) -> Mat4 {
        let center = self.center + self.normal() * z_offset;
        Mat4::from_scale_rotation_translation(
            Vec3::new(PANEL_WIDTH, PANEL_HEIGHT, 1.0),
            self.rotation,
            center,
        )
    }
}

#[inline]
pub fn float_offset(base_y: f32, elapsed_secs: f64, index: usize) -> f32 {
    base_y + ((elapsed_secs + index as f64).sin() as f32) * PANEL_FLOAT_AMPLITUDE
}

pub fn panel_transforms(elapsed_secs: f64) -> [PanelTransform; 4] {
    PanelId::ALL.map(|id| PanelTransform::at(id, elapsed_secs))
}
