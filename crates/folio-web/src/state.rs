use crate::input::DragState;
use folio_core::{
    panel_transforms, Camera, CameraRig, OrbitControls, PanelId, PanelSelection, PanelTransform,
};

/// Scene state shared between DOM handlers and the frame loop.
pub struct SceneState {
    pub selection: PanelSelection,
    pub rig: CameraRig,
    pub orbit: OrbitControls,
    pub camera: Camera,
    /// Floated transforms from the latest frame; picking uses these.
    pub panels: [PanelTransform; 4],
    pub hovered: Option<PanelId>,
    pub drag: DragState,
}

impl SceneState {
    pub fn new(aspect: f32) -> Self {
        Self {
            selection: PanelSelection::new(),
            rig: CameraRig::default(),
            orbit: OrbitControls::default(),
            camera: Camera::new(aspect),
            panels: panel_transforms(0.0),
            hovered: None,
            drag: DragState::default(),
        }
    }

    /// Toggle focus on `panel` from a card button or a mesh click.
    pub fn select(&mut self, panel: PanelId) {
        let active = self.selection.select(panel);
        log::info!(
            "[camera] target {}",
            active.map(|p| p.key()).unwrap_or("home")
        );
    }
}
