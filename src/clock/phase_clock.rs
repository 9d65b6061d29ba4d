use crate::clock::phase::{Phase, PhaseSchedule, PhaseThresholds};
use crate::clock::timer::TimerQueue;
use crate::foundation::core::Millis;
use crate::foundation::error::SequencerResult;

/// Phase timing configuration for both driving modes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Timer schedule under full motion.
    pub normal: PhaseSchedule,
    /// Timer schedule under reduced motion.
    pub reduced: PhaseSchedule,
    /// Progress thresholds for scroll/intersection driving.
    pub thresholds: PhaseThresholds,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            normal: PhaseSchedule::NORMAL,
            reduced: PhaseSchedule::REDUCED,
            thresholds: PhaseThresholds::default(),
        }
    }
}

impl PhaseConfig {
    /// Validate every schedule and the thresholds.
    pub fn validate(&self) -> SequencerResult<()> {
        self.normal.validate()?;
        self.reduced.validate()?;
        self.thresholds.validate()
    }

    /// The schedule that applies for `reduced_motion`.
    pub fn schedule(&self, reduced_motion: bool) -> PhaseSchedule {
        if reduced_motion {
            self.reduced
        } else {
            self.normal
        }
    }
}

/// How a [`PhaseClock`] is driven. Exactly one mode is active per instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriveMode {
    /// Wall-clock timers at fixed offsets from start; every phase is visited.
    Timer(PhaseSchedule),
    /// Sampled progress in `[0, 1]`; a fast jump may skip phases.
    Progress(PhaseThresholds),
}

/// One recorded phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseTransition {
    /// Phase before the change.
    pub from: Phase,
    /// Phase after the change.
    pub to: Phase,
    /// Host time of the change; the timer deadline in timer mode.
    pub at: Millis,
}

/// Forward-only phase sequencer.
///
/// Timer mode schedules one timer per non-initial phase on [`PhaseClock::start`]; the owner
/// fires them by calling [`PhaseClock::advance_to`] each frame. [`PhaseClock::cancel`] clears
/// every pending timer, after which the clock never moves again.
#[derive(Debug)]
pub struct PhaseClock {
    mode: DriveMode,
    reduced_motion: bool,
    phase: Phase,
    started_at: Option<Millis>,
    timers: TimerQueue<Phase>,
    history: Vec<PhaseTransition>,
    progress: f64,
    cancelled: bool,
}

impl PhaseClock {
    /// Build a clock from configuration.
    ///
    /// With `progress_driven` the clock follows [`PhaseClock::set_progress`]; otherwise it uses
    /// the timer schedule matching `reduced_motion`.
    pub fn new(
        config: &PhaseConfig,
        progress_driven: bool,
        reduced_motion: bool,
    ) -> SequencerResult<Self> {
        config.validate()?;
        let mode = if progress_driven {
            DriveMode::Progress(config.thresholds)
        } else {
            DriveMode::Timer(config.schedule(reduced_motion))
        };
        Ok(Self::with_mode(mode, reduced_motion))
    }

    /// Build a clock with an explicit, already validated mode.
    pub fn with_mode(mode: DriveMode, reduced_motion: bool) -> Self {
        Self {
            mode,
            reduced_motion,
            phase: Phase::Initial,
            started_at: None,
            timers: TimerQueue::new(),
            history: Vec::new(),
            progress: 0.0,
            cancelled: false,
        }
    }

    /// Arm the clock. In timer mode this schedules every phase timer relative to `now`.
    ///
    /// Starting twice, or after cancellation, does nothing.
    pub fn start(&mut self, now: Millis) {
        if self.started_at.is_some() || self.cancelled {
            return;
        }
        self.started_at = Some(now);
        if let DriveMode::Timer(schedule) = self.mode {
            for (phase, offset) in schedule.entries() {
                self.timers.schedule(now.saturating_add(offset), phase);
            }
        }
        tracing::debug!(mode = ?self.mode, reduced_motion = self.reduced_motion, "phase clock started");
    }

    /// Fire every timer due at `now`. Returns the phase if it changed.
    ///
    /// Each transition is stamped with its timer's deadline, not with `now`.
    pub fn advance_to(&mut self, now: Millis) -> Option<Phase> {
        if self.cancelled {
            return None;
        }
        let before = self.phase;
        while let Some((deadline, target)) = self.timers.pop_due(now) {
            self.enter(target, deadline);
        }
        (self.phase != before).then_some(self.phase)
    }

    /// Feed a sampled progress value (progress mode only). Returns the phase if it changed.
    ///
    /// Progress never moves backward: a lower sample than the current high-water mark is
    /// ignored, as are non-finite samples.
    pub fn set_progress(&mut self, progress: f64, now: Millis) -> Option<Phase> {
        let DriveMode::Progress(thresholds) = self.mode else {
            return None;
        };
        if self.cancelled || !progress.is_finite() {
            return None;
        }
        self.progress = self.progress.max(progress.clamp(0.0, 1.0));
        let target = thresholds.phase_for(self.progress);
        let before = self.phase;
        self.enter(target, now);
        (self.phase != before).then_some(self.phase)
    }

    /// Cancel all pending timers. The clock stays frozen on its current phase.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        let dropped = self.timers.cancel_all();
        tracing::debug!(phase = %self.phase, dropped, "phase clock cancelled");
    }

    fn enter(&mut self, target: Phase, now: Millis) {
        if target <= self.phase {
            return;
        }
        tracing::debug!(from = %self.phase, to = %target, at_ms = now.0, "phase transition");
        self.history.push(PhaseTransition {
            from: self.phase,
            to: target,
            at: now,
        });
        self.phase = target;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the terminal phase has been reached.
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Host time at which the terminal phase was entered.
    pub fn terminal_at(&self) -> Option<Millis> {
        self.history
            .iter()
            .find(|t| t.to.is_terminal())
            .map(|t| t.at)
    }

    /// Active drive mode.
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Reduced-motion flag the clock was built with.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// High-water progress (progress mode).
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Start time, if started.
    pub fn started_at(&self) -> Option<Millis> {
        self.started_at
    }

    /// Every phase change so far, oldest first.
    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether [`PhaseClock::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/phase_clock.rs"]
mod tests;
