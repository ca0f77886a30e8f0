//! Background geometry and colour helpers.
//!
//! Everything here is generated on the CPU once and uploaded by the renderer;
//! the per-frame part is just the rotation angles.

use crate::constants::{
    GLOBE_HEIGHT_SEGMENTS, GLOBE_RADIUS, GLOBE_SPIN_PER_SEC, GLOBE_WIDTH_SEGMENTS, STAR_COUNT,
    STAR_EXTENT, STAR_SPIN_PER_FRAME,
};
use glam::{Mat4, Vec3};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// An sRGB colour given as `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn srgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    /// Linear-light components, for shading into an sRGB surface.
    pub fn linear(self) -> [f32; 3] {
        self.srgb().map(srgb_to_linear)
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Scatter `count` points uniformly in a cube of side `extent` centred at the
/// origin.
pub fn starfield_positions(count: usize, extent: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            )
        })
        .collect()
}

pub fn default_starfield(seed: u64) -> Vec<Vec3> {
    starfield_positions(STAR_COUNT, STAR_EXTENT, seed)
}

/// Vertex positions of a UV sphere, laid out like a
/// `(width_segments + 1) x (height_segments + 1)` grid from the north pole
/// down. Pole rows repeat the same point.
pub fn sphere_points(radius: f32, width_segments: u32, height_segments: u32) -> Vec<Vec3> {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut out = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let x = -radius * (u * TAU).cos() * (v * PI).sin();
            let y = radius * (v * PI).cos();
            let z = radius * (u * TAU).sin() * (v * PI).sin();
            out.push(Vec3::new(x, y, z));
        }
    }
    out
}

pub fn globe_points() -> Vec<Vec3> {
    sphere_points(GLOBE_RADIUS, GLOBE_WIDTH_SEGMENTS, GLOBE_HEIGHT_SEGMENTS)
}

/// Rotation state of the animated background.
#[derive(Clone, Debug, Default)]
pub struct BackgroundMotion {
    pub star_rotation_x: f32,
    pub star_rotation_y: f32,
    pub globe_rotation_y: f32,
}

impl BackgroundMotion {
    /// Advance by one rendered frame. The starfield spins a fixed amount per
    /// frame while the globe follows the elapsed clock.
    pub fn advance(&mut self, elapsed_secs: f64) {
        self.star_rotation_x = (self.star_rotation_x + STAR_SPIN_PER_FRAME) % TAU;
        self.star_rotation_y = (self.star_rotation_y + STAR_SPIN_PER_FRAME) % TAU;
        self.globe_rotation_y = ((elapsed_secs * GLOBE_SPIN_PER_SEC as f64) % TAU as f64) as f32;
    }

    pub fn star_model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.star_rotation_y) * Mat4::from_rotation_x(self.star_rotation_x)
    }

    pub fn globe_model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.globe_rotation_y)
    }
}
