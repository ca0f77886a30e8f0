use glam::Vec3;

// Shared scene and interaction tuning constants.

// Camera easing
pub const CAMERA_BLEND: f32 = 0.05; // per-frame lerp factor toward the target pose
pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 0.0, 8.0);
pub const HOME_LOOK_AT: Vec3 = Vec3::ZERO;
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 3.0); // toward the viewer from a focused panel

// Projection
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Orbit controls
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;
pub const ORBIT_ZOOM_SCALE: f32 = 0.95; // distance factor per 100 units of wheel delta
pub const ORBIT_POLAR_EPS: f32 = 1e-3; // keeps the polar angle off the poles

// Panels
pub const PANEL_WIDTH: f32 = 3.0;
pub const PANEL_HEIGHT: f32 = 2.0;
pub const PANEL_FLOAT_AMPLITUDE: f32 = 0.1;
pub const PANEL_FACE_OFFSET: f32 = 0.05; // emissive plane sits in front of the backing plane
pub const PANEL_BACKING_OPACITY: f32 = 0.1;

pub const PANEL_COLOR_IDLE: u32 = 0x33334e;
pub const PANEL_COLOR_HOVER: u32 = 0x00eaff;
pub const PANEL_EMISSIVE_IDLE: u32 = 0x00aaff;
pub const PANEL_EMISSIVE_HOVER: u32 = 0x00eaff;
pub const PANEL_EMISSIVE_INTENSITY_IDLE: f32 = 0.5;
pub const PANEL_EMISSIVE_INTENSITY_HOVER: f32 = 2.0;

// Starfield
pub const STAR_COUNT: usize = 5000;
pub const STAR_EXTENT: f32 = 25.0; // side of the cube the stars are scattered in
pub const STAR_SPIN_PER_FRAME: f32 = 0.0005; // radians about X and Y
pub const STAR_SIZE: f32 = 0.02;
pub const STAR_OPACITY: f32 = 0.6;
pub const STAR_SEED: u64 = 0x5EED_57A2;

// Globe
pub const GLOBE_RADIUS: f32 = 1.5;
pub const GLOBE_WIDTH_SEGMENTS: u32 = 32;
pub const GLOBE_HEIGHT_SEGMENTS: u32 = 32;
pub const GLOBE_SPIN_PER_SEC: f32 = 0.1;
pub const GLOBE_POINT_SIZE: f32 = 0.01;

pub const ACCENT_COLOR: u32 = 0x00eaff;
pub const BACKGROUND_COLOR: u32 = 0x0d0d1b;

// Lights
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 10.0);
pub const KEY_LIGHT_COLOR: u32 = 0x00aaff;
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-10.0, -10.0, -10.0);
pub const FILL_LIGHT_COLOR: u32 = 0xeaff00;
pub const POINT_LIGHT_INTENSITY: f32 = 1.0;

// Title
pub const TITLE_TEXT: &str = "ALEX CHEN";
pub const TITLE_POSITION: Vec3 = Vec3::new(0.0, 4.0, 0.0);

// Guestbook
pub const AUTHOR_LABEL_CHARS: usize = 8;
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const EMPTY_GUESTBOOK_LABEL: &str = "No messages yet. Be the first to say hi!";
pub const SEND_FAILED_LABEL: &str = "Message not sent. Try again.";
