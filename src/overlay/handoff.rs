use crate::clock::timer::TimerQueue;
use crate::foundation::core::{HexColor, Millis};
use crate::foundation::error::{SequencerError, SequencerResult};

/// Timing and look of the pulsing dot shown while the particle field hands over to the logo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    /// Offset from start at which the dot appears (full motion).
    pub transition_ms: u64,
    /// Offset from start at which the dot disappears (full motion).
    pub logo_ms: u64,
    /// Appearance offset under reduced motion.
    pub reduced_transition_ms: u64,
    /// Disappearance offset under reduced motion.
    pub reduced_logo_ms: u64,
    /// Dot color.
    pub color: HexColor,
    /// Radius of the solid core, in pixels.
    pub core_radius_px: f64,
    /// Largest radius of the pulse ring, in pixels.
    pub ring_radius_px: f64,
    /// Pulse period.
    pub pulse_ms: u64,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            transition_ms: 4500,
            logo_ms: 5000,
            reduced_transition_ms: 2000,
            reduced_logo_ms: 2200,
            color: HexColor::from("#3B82F6"),
            core_radius_px: 3.0,
            ring_radius_px: 12.0,
            pulse_ms: 1000,
        }
    }
}

impl HandoffConfig {
    /// The dot must appear before it disappears.
    pub fn validate(&self) -> SequencerResult<()> {
        if self.transition_ms >= self.logo_ms || self.reduced_transition_ms >= self.reduced_logo_ms
        {
            return Err(SequencerError::validation(
                "handoff transition_ms must be < logo_ms",
            ));
        }
        if self.pulse_ms == 0 {
            return Err(SequencerError::validation("handoff.pulse_ms must be > 0"));
        }
        if !self.core_radius_px.is_finite() || self.core_radius_px <= 0.0 {
            return Err(SequencerError::validation(
                "handoff.core_radius_px must be > 0",
            ));
        }
        self.color.resolve()?;
        Ok(())
    }

    /// `(show, hide)` offsets for the motion preference.
    pub fn window_ms(&self, reduced_motion: bool) -> (u64, u64) {
        if reduced_motion {
            (self.reduced_transition_ms, self.reduced_logo_ms)
        } else {
            (self.transition_ms, self.logo_ms)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HandoffEvent {
    Show,
    Hide,
}

/// Drawable state of the dot for one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct HandoffSample {
    /// Solid core radius, in pixels.
    pub core_radius_px: f64,
    /// Pulse ring radius, in pixels; zero under reduced motion.
    pub ring_radius_px: f64,
    /// Pulse ring opacity.
    pub ring_opacity: f64,
}

/// Show/hide timers for the handoff dot.
#[derive(Debug)]
pub struct HandoffIndicator {
    reduced_motion: bool,
    timers: TimerQueue<HandoffEvent>,
    shown_at: Option<Millis>,
    started: bool,
    done: bool,
}

impl HandoffIndicator {
    /// An idle indicator; nothing is scheduled until [`HandoffIndicator::start`].
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            timers: TimerQueue::new(),
            shown_at: None,
            started: false,
            done: false,
        }
    }

    /// Schedule the show and hide timers relative to `now`.
    pub fn start(&mut self, now: Millis, cfg: &HandoffConfig) {
        if self.started || self.done {
            return;
        }
        self.started = true;
        let (show, hide) = cfg.window_ms(self.reduced_motion);
        self.timers.schedule(now.saturating_add(show), HandoffEvent::Show);
        self.timers.schedule(now.saturating_add(hide), HandoffEvent::Hide);
    }

    /// Fire due timers. The pulse is timed from the show deadline.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some((deadline, ev)) = self.timers.pop_due(now) {
            match ev {
                HandoffEvent::Show => {
                    if !self.done {
                        self.shown_at = Some(deadline);
                    }
                }
                HandoffEvent::Hide => {
                    self.shown_at = None;
                    self.done = true;
                }
            }
        }
    }

    /// Drop pending timers and hide.
    pub fn cancel(&mut self) {
        self.timers.cancel_all();
        self.shown_at = None;
        self.done = true;
    }

    /// Whether the dot is currently shown.
    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    /// Dot geometry at `now`, or `None` when hidden.
    pub fn sample(&self, now: Millis, cfg: &HandoffConfig) -> Option<HandoffSample> {
        let shown_at = self.shown_at?;
        if self.reduced_motion {
            return Some(HandoffSample {
                core_radius_px: cfg.core_radius_px,
                ring_radius_px: 0.0,
                ring_opacity: 0.0,
            });
        }
        let phase = (now.saturating_since(shown_at) % cfg.pulse_ms.max(1)) as f64
            / (cfg.pulse_ms.max(1) as f64);
        Some(HandoffSample {
            core_radius_px: cfg.core_radius_px,
            ring_radius_px: cfg.core_radius_px
                + (cfg.ring_radius_px - cfg.core_radius_px).max(0.0) * phase,
            ring_opacity: 0.5 * (1.0 - phase),
        })
    }

    /// Timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/handoff.rs"]
mod tests;
