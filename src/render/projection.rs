use crate::foundation::core::{Canvas, Vec3, WorldViewport};
use crate::scene::config::CameraConfig;

/// A world point mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f64,
    /// Vertical pixel coordinate (down is positive).
    pub y: f64,
    /// Pixels per world unit at the point's depth.
    pub px_per_unit: f64,
}

/// Pinhole projection of the hero camera onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    canvas: Canvas,
    camera_z: f64,
    focal_px: f64,
}

impl Projection {
    /// Projection for `camera` rendering into `canvas`.
    pub fn new(camera: &CameraConfig, canvas: Canvas) -> Self {
        let focal_px =
            f64::from(canvas.height) / (2.0 * (camera.fov_deg.to_radians() / 2.0).tan());
        Self {
            canvas,
            camera_z: camera.z,
            focal_px,
        }
    }

    /// Map `p` to the canvas. `None` when the point is at or behind the camera.
    pub fn project(&self, p: Vec3) -> Option<ScreenPoint> {
        let depth = self.camera_z - p.z;
        if depth <= 1e-3 {
            return None;
        }
        let k = self.focal_px / depth;
        Some(ScreenPoint {
            x: f64::from(self.canvas.width) / 2.0 + p.x * k,
            y: f64::from(self.canvas.height) / 2.0 - p.y * k,
            px_per_unit: k,
        })
    }

    /// Visible world rectangle at z = 0.
    pub fn world_viewport(&self) -> WorldViewport {
        let height = f64::from(self.canvas.height) * self.camera_z / self.focal_px;
        WorldViewport {
            width: height * self.canvas.aspect(),
            height,
        }
    }

    /// Canvas the projection targets.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/projection.rs"]
mod tests;
