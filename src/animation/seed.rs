use std::f64::consts::{PI, TAU};

use crate::animation::particle::ParticleConfig;
use crate::foundation::core::WorldViewport;
use crate::foundation::math::lerp;

/// Small, fast, deterministic PRNG (mulberry32) keyed by an explicit seed.
///
/// Each element owns its own generator seeded with its index, so parameters never depend on
/// render order or on any shared RNG state.
#[derive(Clone, Copy, Debug)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Create a generator from a seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Per-element animation parameters, derived once per mount and read-only afterward.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ElementAnimationParams {
    /// Starting x in world units.
    pub start_x: f64,
    /// Starting y in world units.
    pub start_y: f64,
    /// Delay before the element starts moving, in seconds.
    pub delay_s: f64,
    /// Travel duration, in seconds.
    pub duration_s: f64,
    /// Sideways bow of the inbound path.
    pub path_curvature: f64,
    /// Phase offset of the vertical float.
    pub float_offset: f64,
    /// Spin rate in radians per second.
    pub rotation_speed: f64,
    /// Phase of the horizontal drift.
    pub drift_phase_x: f64,
    /// Phase of the vertical drift.
    pub drift_phase_y: f64,
    /// Frequency of the horizontal drift.
    pub drift_freq_x: f64,
    /// Frequency of the vertical drift.
    pub drift_freq_y: f64,
    /// Golden-angle direction, in radians.
    pub angle: f64,
}

impl ElementAnimationParams {
    /// Derive parameters for element `index`.
    ///
    /// Pure: the same inputs always give bit-identical output. Random draws happen in a fixed
    /// order whatever `reduced_motion` is, so toggling it only changes the fields it zeroes.
    /// Duration, curvature and rotation are drawn and then discarded under reduced motion
    /// instead of skipped, which keeps `float_offset` and the drift values identical across the
    /// flag rather than shifting them along the stream.
    pub fn derive(
        index: u32,
        viewport: WorldViewport,
        reduced_motion: bool,
        cfg: &ParticleConfig,
    ) -> Self {
        let mut rnd = SeededRandom::new(index);
        let angle = f64::from(index) * cfg.golden_angle_deg * (PI / 180.0);

        let [lo, hi] = cfg.radius_variation_range;
        let radius_variation = lerp(lo, hi, rnd.next_f64());
        let base_radius =
            viewport.width.max(viewport.height) * cfg.radius_multiplier * radius_variation;

        let timing = cfg.timing(reduced_motion);
        let stagger = index % cfg.stagger_cycle.max(1);

        let duration_jitter = rnd.next_f64() * 2.0;
        let curvature = (rnd.next_f64() - 0.5) * 2.0;
        let float_offset = rnd.next_f64() * TAU;
        let rotation = (rnd.next_f64() - 0.5) * 0.1;
        let drift_phase_x = rnd.next_f64() * TAU;
        let drift_phase_y = rnd.next_f64() * TAU;
        let drift_freq_x = 0.6 + rnd.next_f64() * 0.5;
        let drift_freq_y = 0.8 + rnd.next_f64() * 0.6;

        Self {
            start_x: angle.cos() * base_radius,
            start_y: angle.sin() * base_radius,
            delay_s: f64::from(stagger) * timing.delay_s,
            duration_s: timing.duration_s + if reduced_motion { 0.0 } else { duration_jitter },
            path_curvature: if reduced_motion { 0.0 } else { curvature },
            float_offset,
            rotation_speed: if reduced_motion { 0.0 } else { rotation },
            drift_phase_x,
            drift_phase_y,
            drift_freq_x,
            drift_freq_y,
            angle,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/seed.rs"]
mod tests;
