use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::animation::logo::LogoConfig;
use crate::animation::particle::ParticleConfig;
use crate::clock::phase_clock::PhaseConfig;
use crate::foundation::core::{Canvas, HexColor, Rgba8Premul, WorldViewport};
use crate::foundation::error::{SequencerError, SequencerResult};
use crate::overlay::handoff::HandoffConfig;
use crate::overlay::reveal::OverlayConfig;
use crate::scene::catalog::{CategoryDef, ElementSpec, compose_elements, default_catalog};

/// Perspective camera looking down -z at the origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera distance from the z = 0 plane, in world units.
    pub z: f64,
    /// Vertical field of view, in degrees.
    pub fov_deg: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            z: 8.0,
            fov_deg: 60.0,
        }
    }
}

impl CameraConfig {
    /// Reject cameras that cannot see anything.
    pub fn validate(&self) -> SequencerResult<()> {
        if !self.z.is_finite() || self.z <= 0.0 {
            return Err(SequencerError::validation("camera.z must be finite and > 0"));
        }
        if !self.fov_deg.is_finite() || self.fov_deg <= 0.0 || self.fov_deg >= 180.0 {
            return Err(SequencerError::validation(
                "camera.fov_deg must be inside (0, 180)",
            ));
        }
        Ok(())
    }

    /// Visible world rectangle at z = 0 for a canvas of the given aspect.
    pub fn world_viewport(&self, canvas: Canvas) -> WorldViewport {
        let height = 2.0 * self.z * (self.fov_deg.to_radians() / 2.0).tan();
        WorldViewport {
            width: height * canvas.aspect(),
            height,
        }
    }
}

/// Top-level sequencer configuration, usually loaded from JSON.
///
/// Every field has a default, so `{}` is a valid configuration that reproduces the stock hero.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Projection camera.
    pub camera: CameraConfig,
    /// Background; transparent when unset.
    pub clear: Option<HexColor>,
    /// Particle-field constants.
    pub particles: ParticleConfig,
    /// Phase schedules and thresholds.
    pub phases: PhaseConfig,
    /// Logo halves.
    pub logo: LogoConfig,
    /// Call-to-action overlay.
    pub overlay: OverlayConfig,
    /// Handoff dot.
    pub handoff: HandoffConfig,
    /// Sprite categories.
    pub catalog: Vec<CategoryDef>,
    /// Directory image assets and fonts are resolved against.
    pub assets_root: PathBuf,
    /// Optional font used to rasterise emoji sprites, relative to `assets_root`.
    pub emoji_font: Option<PathBuf>,
    /// Edge length of rasterised sprite textures, in pixels.
    pub sprite_px: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            camera: CameraConfig::default(),
            clear: None,
            particles: ParticleConfig::default(),
            phases: PhaseConfig::default(),
            logo: LogoConfig::default(),
            overlay: OverlayConfig::default(),
            handoff: HandoffConfig::default(),
            catalog: default_catalog(),
            assets_root: PathBuf::from("."),
            emoji_font: None,
            sprite_px: 128,
        }
    }
}

impl SequencerConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SequencerResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SequencerError::serde(format!("parse sequencer config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    ///
    /// A relative `assets_root` is resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> SequencerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SequencerError::validation(format!("open sequencer config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if cfg.assets_root.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.assets_root = dir.join(&cfg.assets_root);
        }
        Ok(cfg)
    }

    /// Validate every section.
    pub fn validate(&self) -> SequencerResult<()> {
        self.canvas.validate()?;
        self.camera.validate()?;
        self.particles.validate()?;
        self.phases.validate()?;
        self.logo.validate()?;
        self.overlay.validate()?;
        self.handoff.validate()?;
        if self.catalog.is_empty() {
            return Err(SequencerError::validation("catalog must not be empty"));
        }
        if self.sprite_px == 0 || self.sprite_px > 2048 {
            return Err(SequencerError::validation("sprite_px must be in 1..=2048"));
        }
        self.clear_color()?;
        compose_elements(&self.catalog).map(|_| ())
    }

    /// Visible world rectangle at z = 0.
    pub fn world_viewport(&self) -> WorldViewport {
        self.camera.world_viewport(self.canvas)
    }

    /// Resolved background color.
    pub fn clear_color(&self) -> SequencerResult<Rgba8Premul> {
        match &self.clear {
            Some(c) => c.resolve(),
            None => Ok(Rgba8Premul::transparent()),
        }
    }

    /// Element specs of the configured catalog.
    pub fn elements(&self) -> SequencerResult<Vec<ElementSpec>> {
        compose_elements(&self.catalog)
    }

    /// Resolve a path relative to `assets_root`.
    pub fn asset_path(&self, rel: &Path) -> PathBuf {
        self.assets_root.join(rel)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
