use std::f64::consts::PI;

use crate::animation::ease::Ease;
use crate::animation::seed::ElementAnimationParams;
use crate::clock::phase::Phase;
use crate::foundation::core::Vec3;
use crate::foundation::error::{SequencerError, SequencerResult};
use crate::foundation::math::lerp;
use crate::scene::catalog::ElementSpec;

/// Delay/duration multipliers for one motion preference.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingMultipliers {
    /// Per-index stagger, in seconds.
    pub delay_s: f64,
    /// Base travel duration, in seconds.
    pub duration_s: f64,
}

/// Particle-field constants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Radius of the ring the particles gather on, in world units.
    pub ring_radius: f64,
    /// Eased progress at which the ring is fully formed.
    pub ring_progress_threshold: f64,
    /// Eased progress at which particles start merging into the origin.
    pub merge_start_threshold: f64,
    /// Scale once fully converged.
    pub base_scale: f64,
    /// Extra scale at the start of travel.
    pub scale_variation: f64,
    /// Amplitude of the idle float.
    pub float_amplitude: f64,
    /// Angular step between consecutive indices, in degrees.
    pub golden_angle_deg: f64,
    /// Start radius as a fraction of the larger viewport side.
    pub radius_multiplier: f64,
    /// Random start-radius multiplier range.
    pub radius_variation_range: [f64; 2],
    /// Timing under full motion.
    pub normal: TimingMultipliers,
    /// Timing under reduced motion.
    pub reduced: TimingMultipliers,
    /// Index period of the start stagger.
    pub stagger_cycle: u32,
    /// Opacity lost per unit of eased progress.
    pub fade_rate: f64,
    /// Opacity at or below which an element is dead.
    pub dead_epsilon: f64,
    /// Depth gained over the whole travel.
    pub depth_travel: f64,
    /// Sprite edge length in world units.
    pub sprite_size: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            ring_radius: 0.75,
            ring_progress_threshold: 0.85,
            merge_start_threshold: 0.85,
            base_scale: 0.9,
            scale_variation: 0.2,
            float_amplitude: 0.03,
            golden_angle_deg: 137.5,
            radius_multiplier: 0.6,
            radius_variation_range: [0.8, 1.2],
            normal: TimingMultipliers {
                delay_s: 0.2,
                duration_s: 4.0,
            },
            reduced: TimingMultipliers {
                delay_s: 0.1,
                duration_s: 2.0,
            },
            stagger_cycle: 30,
            fade_rate: 1.4,
            dead_epsilon: 0.01,
            depth_travel: 0.6,
            sprite_size: 1.0,
        }
    }
}

impl ParticleConfig {
    /// Timing for the given motion preference.
    pub fn timing(&self, reduced_motion: bool) -> TimingMultipliers {
        if reduced_motion {
            self.reduced
        } else {
            self.normal
        }
    }

    /// Reject values that would make the animation degenerate.
    pub fn validate(&self) -> SequencerResult<()> {
        let unit = |name: &str, v: f64| -> SequencerResult<()> {
            if !v.is_finite() || v <= 0.0 || v >= 1.0 {
                return Err(SequencerError::animation(format!(
                    "particles.{name} must be inside (0, 1), got {v}"
                )));
            }
            Ok(())
        };
        unit("ring_progress_threshold", self.ring_progress_threshold)?;
        unit("merge_start_threshold", self.merge_start_threshold)?;
        unit("dead_epsilon", self.dead_epsilon)?;

        for (name, t) in [("normal", self.normal), ("reduced", self.reduced)] {
            if !t.duration_s.is_finite()
                || t.duration_s <= 0.0
                || !t.delay_s.is_finite()
                || t.delay_s < 0.0
            {
                return Err(SequencerError::animation(format!(
                    "particles.{name} timing needs duration > 0 and delay >= 0"
                )));
            }
        }
        let [lo, hi] = self.radius_variation_range;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || hi < lo {
            return Err(SequencerError::animation(
                "particles.radius_variation_range must be [lo, hi] with 0 < lo <= hi",
            ));
        }
        if !self.fade_rate.is_finite() || self.fade_rate <= 0.0 {
            return Err(SequencerError::animation("particles.fade_rate must be > 0"));
        }
        if !self.sprite_size.is_finite() || self.sprite_size <= 0.0 {
            return Err(SequencerError::animation("particles.sprite_size must be > 0"));
        }
        Ok(())
    }
}

/// Everything an animator reads for one frame. All animators see the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Animation time in seconds since start.
    pub time_s: f64,
    /// Seconds since the previous frame (0 on the first frame).
    pub dt_s: f64,
    /// Current phase.
    pub phase: Phase,
    /// Whether motion is reduced.
    pub reduced_motion: bool,
}

/// Frame-updated state of one particle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleState {
    /// Group position in world units.
    pub position: Vec3,
    /// Vertical float of the sprite inside its group.
    pub mesh_offset_y: f64,
    /// Sprite spin, in radians.
    pub rotation_z: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Eased travel progress.
    pub eased: f64,
    /// Whether the element draws at all.
    pub visible: bool,
    /// One-way terminal flag: fully faded, hidden and inert.
    pub dead: bool,
}

/// Animates one particle sprite along its inbound → ring → merge path.
#[derive(Clone, Debug)]
pub struct ParticleAnimator {
    spec: ElementSpec,
    params: ElementAnimationParams,
    state: ParticleState,
    updates: u64,
}

impl ParticleAnimator {
    /// Place a particle at its seeded start, fully opaque.
    pub fn new(spec: ElementSpec, params: ElementAnimationParams, cfg: &ParticleConfig) -> Self {
        Self {
            spec,
            state: ParticleState {
                position: Vec3::new(params.start_x, params.start_y, 0.0),
                mesh_offset_y: 0.0,
                rotation_z: 0.0,
                scale: cfg.base_scale + cfg.scale_variation,
                opacity: 1.0,
                eased: 0.0,
                visible: true,
                dead: false,
            },
            params,
            updates: 0,
        }
    }

    /// Recompute this frame's transform and opacity in place.
    ///
    /// Returns `false` without touching anything once the element is dead.
    pub fn update(&mut self, input: &FrameInput, cfg: &ParticleConfig) -> bool {
        if self.state.dead || !self.state.visible {
            return false;
        }
        self.updates += 1;

        let p = &self.params;
        let t = input.time_s.max(0.0);
        let adjusted = (t - p.delay_s).max(0.0);
        let progress = (adjusted / p.duration_s).min(1.0);
        let eased = Ease::InOutQuart.apply(progress);
        let still = input.reduced_motion;

        let base_x = p.start_x * (1.0 - eased);
        let base_y = p.start_y * (1.0 - eased);

        let (path_offset, organic_x, organic_y) = if still {
            (0.0, 0.0, 0.0)
        } else {
            (
                (eased * PI).sin() * p.path_curvature * 0.5,
                (p.drift_phase_x + t * p.drift_freq_x).sin() * 0.25 * (1.0 - eased),
                (p.drift_phase_y + t * p.drift_freq_y).sin() * 0.18 * (1.0 - eased),
            )
        };

        let ring_progress = (eased / cfg.ring_progress_threshold).min(1.0);
        let merge_progress = ((eased - cfg.merge_start_threshold)
            / (1.0 - cfg.merge_start_threshold))
            .max(0.0);

        let ring_x = p.angle.cos() * cfg.ring_radius;
        let ring_y = p.angle.sin() * cfg.ring_radius;
        let x_to_ring = lerp(base_x + path_offset + organic_x, ring_x, ring_progress);
        let y_to_ring = lerp(base_y + organic_y, ring_y, ring_progress);

        let s = &mut self.state;
        s.position = Vec3::new(
            lerp(x_to_ring, 0.0, merge_progress),
            lerp(y_to_ring, 0.0, merge_progress),
            eased * cfg.depth_travel,
        );

        if still {
            s.mesh_offset_y = 0.0;
            s.rotation_z = 0.0;
        } else {
            s.mesh_offset_y =
                (t * 1.2 + p.float_offset).sin() * cfg.float_amplitude * (1.0 - eased * 0.8);
            s.rotation_z = t * p.rotation_speed;
        }

        s.scale = cfg.base_scale + (1.0 - eased) * cfg.scale_variation;
        s.opacity = (1.0 - eased * cfg.fade_rate).max(0.0);
        s.eased = eased;

        if s.opacity <= cfg.dead_epsilon {
            s.visible = false;
            s.dead = true;
        }
        true
    }

    /// Element descriptor.
    pub fn spec(&self) -> &ElementSpec {
        &self.spec
    }

    /// Seeded parameters.
    pub fn params(&self) -> &ElementAnimationParams {
        &self.params
    }

    /// Current runtime state.
    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    /// Whether the element has fully faded.
    pub fn is_dead(&self) -> bool {
        self.state.dead
    }

    /// Number of updates that did work.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/particle.rs"]
mod tests;
