//! Bilinear cubemap projector.
//!
//! Every output pixel is mapped to a longitude `u ∈ [-π, π]` (left to right)
//! and a latitude `v ∈ [π/2, -π/2]` (top to bottom). The view direction
//!
//! ```text
//! x = cos v · sin u      (right)
//! y = sin v              (up)
//! z = cos v · cos u      (front)
//! ```
//!
//! selects the face by its dominant axis and is projected onto that face's
//! plane, giving face coordinates in `[-0.5, 0.5]`. The face is then sampled
//! bilinearly. The front face sits at the center of the output, the back
//! face on both vertical edges.

use std::f64::consts::{FRAC_PI_2, PI};

use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use super::{CubeFaces, ProjectionError, Projector};
use crate::coord::Face;

/// Projector sampling the faces bilinearly, one output row per rayon task.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubemapProjector;

impl CubemapProjector {
    pub fn new() -> Self {
        Self
    }
}

impl Projector for CubemapProjector {
    fn project(
        &self,
        faces: &CubeFaces,
        height: u32,
        width: u32,
    ) -> Result<RgbImage, ProjectionError> {
        if height == 0 || width == 0 {
            return Err(ProjectionError::EmptyOutput);
        }

        let mut output = RgbImage::new(width, height);
        let row_len = width as usize * 3;
        let u_step = if width > 1 { 2.0 * PI / f64::from(width - 1) } else { 0.0 };
        let v_step = if height > 1 { PI / f64::from(height - 1) } else { 0.0 };

        let buffer: &mut [u8] = &mut output;
        buffer
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, pixels)| {
                let v = FRAC_PI_2 - v_step * row as f64;
                for (column, pixel) in pixels.chunks_exact_mut(3).enumerate() {
                    let u = -PI + u_step * column as f64;
                    let (face, face_x, face_y) = face_coordinates(u, v);
                    pixel.copy_from_slice(&sample_bilinear(faces.face(face), face_x, face_y));
                }
            });

        debug!(
            face_size = faces.face_size(),
            width, height, "Cube faces projected"
        );
        Ok(output)
    }

    fn name(&self) -> &str {
        "cubemap-bilinear"
    }
}

/// Face hit by the direction at `(u, v)` and the position on it, both axes
/// in `[-0.5, 0.5]` with `(-0.5, -0.5)` at the face's top-left corner.
fn face_coordinates(u: f64, v: f64) -> (Face, f64, f64) {
    let x = v.cos() * u.sin();
    let y = v.sin();
    let z = v.cos() * u.cos();

    let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

    if ay >= ax && ay >= az {
        if y > 0.0 {
            (Face::Up, 0.5 * x / ay, 0.5 * z / ay)
        } else {
            (Face::Down, 0.5 * x / ay, -0.5 * z / ay)
        }
    } else {
        // Rotate the side face onto the front plane: (horizontal, depth)
        let (face, h, d) = if az >= ax {
            if z > 0.0 {
                (Face::Front, x, z)
            } else {
                (Face::Back, -x, -z)
            }
        } else if x > 0.0 {
            (Face::Right, -z, x)
        } else {
            (Face::Left, z, -x)
        };
        (face, 0.5 * h / d, -0.5 * y / d)
    }
}

fn sample_bilinear(face: &RgbImage, face_x: f64, face_y: f64) -> [u8; 3] {
    let size = face.width();
    let max = f64::from(size - 1);
    let to_pixel = |c: f64| ((c.clamp(-0.5, 0.5) + 0.5) * f64::from(size) - 0.5).clamp(0.0, max);

    let px = to_pixel(face_x);
    let py = to_pixel(face_y);

    let x0 = px.floor() as u32;
    let y0 = py.floor() as u32;
    let x1 = (x0 + 1).min(size - 1);
    let y1 = (y0 + 1).min(size - 1);
    let fx = px - f64::from(x0);
    let fy = py - f64::from(y0);

    let p00 = face.get_pixel(x0, y0).0;
    let p10 = face.get_pixel(x1, y0).0;
    let p01 = face.get_pixel(x0, y1).0;
    let p11 = face.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
