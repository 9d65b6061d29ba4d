use std::f64::consts::PI;

use crate::animation::particle::FrameInput;
use crate::clock::phase::Phase;
use crate::foundation::core::Vec3;
use crate::foundation::error::{SequencerError, SequencerResult};
use crate::scene::catalog::AssetRef;

/// Which half of the logo an animator drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoHalf {
    /// Starts above the frame and crosses to the bottom.
    Top,
    /// Mirror image of [`LogoHalf::Top`].
    Bottom,
}

impl LogoHalf {
    fn mirror(self) -> f64 {
        match self {
            Self::Top => 1.0,
            Self::Bottom => -1.0,
        }
    }
}

/// Pose a half moves toward while a phase is current. Given for the top half.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoTarget {
    /// World position.
    pub position: Vec3,
    /// Euler rotation, in radians.
    pub rotation: Vec3,
    /// How many `gap * gap_scale` units are added to `position.y`.
    #[serde(default)]
    pub gap_factor: f64,
    /// Rotation of the bottom half. Mirrored from `rotation` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_rotation: Option<Vec3>,
}

impl LogoTarget {
    const fn new(y: f64, gap_factor: f64, rotation: Vec3) -> Self {
        Self {
            position: Vec3::new(0.0, y, 0.0),
            rotation,
            gap_factor,
            bottom_rotation: None,
        }
    }

    const fn with_bottom_rotation(mut self, rotation: Vec3) -> Self {
        self.bottom_rotation = Some(rotation);
        self
    }
}

/// Per-phase targets of the top half.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoTargets {
    /// Off-frame resting pose.
    pub initial: LogoTarget,
    /// Crossed-over entry pose.
    pub primary: LogoTarget,
    /// Crossed-over settled pose.
    pub secondary: LogoTarget,
    /// Close approach.
    pub approach: LogoTarget,
    /// Merged pose.
    pub merged: LogoTarget,
}

impl Default for LogoTargets {
    fn default() -> Self {
        Self {
            initial: LogoTarget::new(7.0, 1.0, Vec3::new(-PI / 6.0, 0.08, 0.05)),
            primary: LogoTarget::new(-2.8, -1.0, Vec3::new(-PI / 8.0, 0.05, 0.0)),
            secondary: LogoTarget::new(-2.8, -1.0, Vec3::new(-PI / 10.0, 0.03, 0.0))
                .with_bottom_rotation(Vec3::new(PI / 9.0, -0.03, 0.0)),
            approach: LogoTarget::new(1.05, 0.0, Vec3::new(0.08, 0.0, 0.0)),
            merged: LogoTarget::new(0.21, 0.0, Vec3::ZERO),
        }
    }
}

impl LogoTargets {
    /// Target for `phase`.
    pub fn for_phase(&self, phase: Phase) -> &LogoTarget {
        match phase {
            Phase::Initial => &self.initial,
            Phase::Primary => &self.primary,
            Phase::Secondary => &self.secondary,
            Phase::Approach => &self.approach,
            Phase::Merged => &self.merged,
        }
    }
}

/// Logo-half choreography constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Asset of the top half.
    pub top: AssetRef,
    /// Asset of the bottom half.
    pub bottom: AssetRef,
    /// Edge length of a half at scale 1, in world units.
    pub size: f64,
    /// Resting scale.
    pub scale: f64,
    /// World units per pixel of gap.
    pub gap_scale: f64,
    /// Per-phase targets of the top half; the bottom half mirrors them unless a target sets
    /// `bottom_rotation`.
    pub targets: LogoTargets,
    /// Position damping rate under full motion, per second.
    pub damp: f64,
    /// Position damping rate under reduced motion, per second.
    pub reduced_damp: f64,
    /// Rotation and opacity damping rate, per second.
    pub rotation_damp: f64,
    /// Relative scale swing while approaching.
    pub breathe_amplitude: f64,
    /// Angular rate of the swing, radians per second.
    pub breathe_rate: f64,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            top: AssetRef::Image("logo-top.svg".to_owned()),
            bottom: AssetRef::Image("logo-bottom.svg".to_owned()),
            size: 2.4,
            scale: 1.0,
            gap_scale: 0.0042,
            targets: LogoTargets::default(),
            damp: 6.0,
            reduced_damp: 12.0,
            rotation_damp: 6.0,
            breathe_amplitude: 0.02,
            breathe_rate: 3.0,
        }
    }
}

impl LogoConfig {
    /// Reject non-positive sizes and rates.
    pub fn validate(&self) -> SequencerResult<()> {
        for (name, v) in [
            ("size", self.size),
            ("scale", self.scale),
            ("damp", self.damp),
            ("reduced_damp", self.reduced_damp),
            ("rotation_damp", self.rotation_damp),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(SequencerError::animation(format!(
                    "logo.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Resolved pose of `half` for `phase` at the given gap.
    pub fn target(&self, half: LogoHalf, phase: Phase, gap: f64) -> (Vec3, Vec3) {
        let t = self.targets.for_phase(phase);
        let m = half.mirror();
        let y = t.position.y + t.gap_factor * gap * self.gap_scale;
        let rotation = match (half, t.bottom_rotation) {
            (LogoHalf::Bottom, Some(r)) => r,
            _ => Vec3::new(t.rotation.x * m, t.rotation.y * m, t.rotation.z * m),
        };
        (Vec3::new(t.position.x, y * m, t.position.z), rotation)
    }

    /// Asset of `half`.
    pub fn asset(&self, half: LogoHalf) -> &AssetRef {
        match half {
            LogoHalf::Top => &self.top,
            LogoHalf::Bottom => &self.bottom,
        }
    }
}

/// Frame-updated state of one logo half.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LogoState {
    /// World position.
    pub position: Vec3,
    /// Euler rotation, in radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether the half draws at all.
    pub visible: bool,
}

/// Damps one logo half toward its current phase target every frame.
#[derive(Clone, Debug)]
pub struct LogoAnimator {
    half: LogoHalf,
    state: LogoState,
}

impl LogoAnimator {
    /// Park the half on its initial pose, hidden.
    pub fn new(half: LogoHalf, cfg: &LogoConfig, gap: f64) -> Self {
        let (position, rotation) = cfg.target(half, Phase::Initial, gap);
        Self {
            half,
            state: LogoState {
                position,
                rotation,
                scale: cfg.scale,
                opacity: 0.0,
                visible: false,
            },
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &FrameInput, cfg: &LogoConfig, gap: f64) {
        let (pos_target, rot_target) = cfg.target(self.half, input.phase, gap);
        let dt = input.dt_s.max(0.0);
        let damp = if input.reduced_motion {
            cfg.reduced_damp
        } else {
            cfg.damp
        };

        let s = &mut self.state;
        s.visible = input.phase >= Phase::Primary;
        s.position.approach(pos_target, (damp * dt).min(1.0));
        s.rotation.approach(rot_target, (cfg.rotation_damp * dt).min(1.0));

        let target_opacity = if s.visible { 1.0 } else { 0.0 };
        s.opacity += (target_opacity - s.opacity) * (cfg.rotation_damp * dt).min(1.0);

        s.scale = if !input.reduced_motion && input.phase == Phase::Approach {
            let k = (input.time_s * cfg.breathe_rate).sin() * cfg.breathe_amplitude;
            cfg.scale * (1.0 + k)
        } else {
            cfg.scale
        };
    }

    /// Which half this is.
    pub fn half(&self) -> LogoHalf {
        self.half
    }

    /// Current state.
    pub fn state(&self) -> &LogoState {
        &self.state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/logo.rs"]
mod tests;
