// Host-side tests for panel selection, camera easing and picking.

use folio_core::constants::{CAMERA_BLEND, FOCUS_OFFSET, HOME_POSITION};
use folio_core::picking::{pick_panel, project_panel, screen_to_world_ray, world_to_screen, Ray};
use folio_core::{
    panel_transforms, Camera, CameraPose, CameraRig, OrbitControls, PanelId, PanelSelection,
};
use glam::{Vec2, Vec3};

#[test]
fn selection_starts_idle() {
    assert_eq!(PanelSelection::new().active(), None);
}

#[test]
fn selecting_twice_returns_to_none() {
    for p in PanelId::ALL {
        let mut s = PanelSelection::new();
        assert_eq!(s.select(p), Some(p));
        assert!(s.is_active(p));
        assert_eq!(s.select(p), None);
        assert_eq!(s.active(), None);
    }
}

#[test]
fn selecting_another_panel_replaces_focus() {
    let mut s = PanelSelection::new();
    s.select(PanelId::About);
    s.select(PanelId::Contact);
    assert_eq!(s.active(), Some(PanelId::Contact));
    assert!(!s.is_active(PanelId::About));
}

#[test]
fn at_most_one_panel_is_ever_active() {
    // deterministic pseudo-random click sequence
    let mut s = PanelSelection::new();
    let mut x: u32 = 0x1234_5678;
    for _ in 0..1000 {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        let p = PanelId::ALL[(x % 4) as usize];
        let before = s.active();
        s.select(p);
        let count = PanelId::ALL.iter().filter(|q| s.is_active(**q)).count();
        assert!(count <= 1);
        if before == Some(p) {
            assert_eq!(s.active(), None);
        } else {
            assert_eq!(s.active(), Some(p));
        }
    }
}

#[test]
fn focused_pose_sits_in_front_of_panel() {
    let pose = CameraPose::focused(PanelId::Projects);
    assert_eq!(pose.look_at, Vec3::new(4.0, 2.0, 0.0));
    assert_eq!(pose.position, Vec3::new(4.0, 2.0, 0.0) + FOCUS_OFFSET);
    assert_eq!(CameraPose::HOME.position, Vec3::new(0.0, 0.0, 8.0));
    assert_eq!(CameraPose::HOME.look_at, Vec3::ZERO);
}

#[test]
fn camera_error_decays_by_blend_factor_each_frame() {
    let mut sel = PanelSelection::new();
    sel.select(PanelId::About);
    let target = CameraPose::focused(PanelId::About).position;
    let mut rig = CameraRig::new(HOME_POSITION);
    let initial = rig.position().distance(target);
    let mut prev = initial;
    for k in 1..=60 {
        let frame = rig.tick(&sel);
        let err = frame.pose.position.distance(target);
        let expected = initial * (1.0 - CAMERA_BLEND).powi(k);
        assert!((err - expected).abs() < 1e-3, "frame {k}: {err} vs {expected}");
        assert!(err < prev);
        prev = err;
        assert_eq!(frame.pose.look_at, PanelId::About.position());
    }
}

#[test]
fn look_at_retargets_immediately() {
    let mut sel = PanelSelection::new();
    let mut rig = CameraRig::default();
    sel.select(PanelId::Skills);
    let frame = rig.tick(&sel);
    assert_eq!(frame.pose.look_at, PanelId::Skills.position());
    // position only moved a fraction of the way
    assert!(frame.pose.position.distance(HOME_POSITION) < 1.0);
}

#[test]
fn controls_disabled_only_while_focused() {
    let mut sel = PanelSelection::new();
    let mut rig = CameraRig::default();
    assert!(rig.tick(&sel).controls_enabled);
    sel.select(PanelId::Contact);
    assert!(!rig.tick(&sel).controls_enabled);
    sel.select(PanelId::Contact);
    assert!(rig.tick(&sel).controls_enabled);
}

#[test]
fn orbit_offset_is_pulled_back_home() {
    let sel = PanelSelection::new();
    let controls = OrbitControls::default();
    let mut rig = CameraRig::default();
    let moved = controls.rotate(rig.position(), 200.0, 0.0, 800.0);
    rig.set_position(moved);
    for _ in 0..400 {
        rig.tick(&sel);
    }
    assert!(rig.position().distance(HOME_POSITION) < 1e-3);
}

#[test]
fn centre_ray_from_home_looks_down_negative_z() {
    let cam = Camera::new(16.0 / 9.0);
    let ray = screen_to_world_ray(&cam, Vec2::ZERO);
    assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
    assert_eq!(ray.origin, HOME_POSITION);
}

#[test]
fn picking_hits_the_panel_in_front() {
    let panels = panel_transforms(0.0);
    let about = panels[PanelId::About.index()];
    let ray = Ray {
        origin: about.center + Vec3::new(0.0, 0.0, 5.0),
        dir: Vec3::NEG_Z,
    };
    assert_eq!(pick_panel(&ray, &panels), Some(PanelId::About));

    let miss = Ray {
        origin: Vec3::new(0.0, 0.0, 8.0),
        dir: Vec3::NEG_Z,
    };
    assert_eq!(pick_panel(&miss, &panels), None);
}

#[test]
fn projected_panel_round_trips_through_picking() {
    let mut cam = Camera::new(1.5);
    cam.apply_pose(CameraPose::HOME);
    let panels = panel_transforms(1.25);
    for panel in &panels {
        let px = world_to_screen(&cam, panel.center, 1200.0, 800.0).expect("in front");
        let ndc = Vec2::new(px.x / 1200.0 * 2.0 - 1.0, 1.0 - px.y / 800.0 * 2.0);
        let ray = screen_to_world_ray(&cam, ndc);
        assert_eq!(pick_panel(&ray, &panels), Some(panel.id));
    }
}

#[test]
fn focused_card_projects_larger_than_at_home() {
    let panel = panel_transforms(0.0)[PanelId::About.index()];
    let mut cam = Camera::new(1.5);
    cam.apply_pose(CameraPose::HOME);
    let home = project_panel(&cam, &panel, 0.1, 1200.0, 800.0).expect("visible from home");
    cam.apply_pose(CameraPose::focused(PanelId::About));
    let near = project_panel(&cam, &panel, 0.1, 1200.0, 800.0).expect("visible when focused");
    assert!(near.width_px > home.width_px * 2.0);
    assert!((near.center.x - 600.0).abs() < 60.0);
}

#[test]
fn panel_behind_camera_has_no_projection() {
    let panel = panel_transforms(0.0)[PanelId::Skills.index()];
    let mut cam = Camera::new(1.0);
    cam.eye = Vec3::new(0.0, 0.0, -8.0);
    cam.target = Vec3::new(0.0, 0.0, -20.0);
    assert_eq!(project_panel(&cam, &panel, 0.0, 800.0, 800.0), None);
}
