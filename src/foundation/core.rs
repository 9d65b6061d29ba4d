use crate::foundation::error::{SequencerError, SequencerResult};

pub use kurbo::{Affine, Point, Rect};

/// Host time in whole milliseconds since the sequencer was started.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// The mount instant.
    pub const ZERO: Self = Self(0);

    /// Convert to floating-point seconds.
    pub fn as_secs_f64(self) -> f64 {
        (self.0 as f64) / 1000.0
    }

    /// Saturating addition of a millisecond offset.
    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`, or zero when `earlier` is in the future.
    pub fn saturating_since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Timestamp of frame `frame` at `fps` frames per second (floor semantics).
    pub fn from_frame(frame: u64, fps: u32) -> Self {
        let fps = u64::from(fps.max(1));
        Self(frame.saturating_mul(1000) / fps)
    }
}

/// Three-component vector used for world-space positions and Euler rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All-zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Build a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Move each component toward `target` by factor `k` in `[0, 1]`.
    pub fn approach(&mut self, target: Vec3, k: f64) {
        let k = k.clamp(0.0, 1.0);
        self.x += (target.x - self.x) * k;
        self.y += (target.y - self.y) * k;
        self.z += (target.z - self.z) * k;
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate that the canvas is non-empty and rasterisable.
    pub fn validate(self) -> SequencerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SequencerError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SequencerError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(())
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Size of the visible world plane at z = 0, in world units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorldViewport {
    /// Visible width in world units.
    pub width: f64,
    /// Visible height in world units.
    pub height: f64,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (straight alpha) into a premultiplied color.
    pub fn from_hex(s: &str) -> SequencerResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| SequencerError::validation(format!("color '{s}' must start with '#'")))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(SequencerError::validation(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let channel = |i: usize| -> SequencerResult<u8> {
            let part = hex.get(i..i + 2).ok_or_else(|| {
                SequencerError::validation(format!("color '{s}' has a truncated channel"))
            })?;
            u8::from_str_radix(part, 16)
                .map_err(|e| SequencerError::validation(format!("color '{s}': {e}")))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::from_straight_rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Hex color as written in configuration files.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    /// Resolve to a premultiplied color.
    pub fn resolve(&self) -> SequencerResult<Rgba8Premul> {
        Rgba8Premul::from_hex(&self.0)
    }
}

impl From<&str> for HexColor {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
