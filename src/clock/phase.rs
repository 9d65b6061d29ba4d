use crate::foundation::error::{SequencerError, SequencerResult};

/// Named phases of the hero sequence, in their fixed total order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing but the particle field; logo halves are hidden.
    Initial,
    /// Logo halves enter and cross over.
    Primary,
    /// Logo halves settle on their crossed positions.
    Secondary,
    /// Logo halves approach each other.
    Approach,
    /// Logo halves are merged. Terminal.
    Merged,
}

impl Phase {
    /// Every phase, in order.
    pub const ALL: [Phase; 5] = [
        Phase::Initial,
        Phase::Primary,
        Phase::Secondary,
        Phase::Approach,
        Phase::Merged,
    ];

    /// The phase after this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Self::Initial => Some(Self::Primary),
            Self::Primary => Some(Self::Secondary),
            Self::Secondary => Some(Self::Approach),
            Self::Approach => Some(Self::Merged),
            Self::Merged => None,
        }
    }

    /// Whether this is the terminal phase.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Approach => "approach",
            Self::Merged => "merged",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer offsets (milliseconds after start) at which each non-initial phase begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhaseSchedule {
    /// Offset of [`Phase::Primary`].
    pub primary_ms: u64,
    /// Offset of [`Phase::Secondary`].
    pub secondary_ms: u64,
    /// Offset of [`Phase::Approach`].
    pub approach_ms: u64,
    /// Offset of [`Phase::Merged`].
    pub merged_ms: u64,
}

impl PhaseSchedule {
    /// Stock schedule for full motion.
    pub const NORMAL: Self = Self {
        primary_ms: 800,
        secondary_ms: 2100,
        approach_ms: 3600,
        merged_ms: 5200,
    };

    /// Stock schedule under reduced motion: same phases, compressed.
    pub const REDUCED: Self = Self {
        primary_ms: 200,
        secondary_ms: 500,
        approach_ms: 900,
        merged_ms: 1400,
    };

    /// `(phase, offset)` pairs in firing order.
    pub fn entries(&self) -> [(Phase, u64); 4] {
        [
            (Phase::Primary, self.primary_ms),
            (Phase::Secondary, self.secondary_ms),
            (Phase::Approach, self.approach_ms),
            (Phase::Merged, self.merged_ms),
        ]
    }

    /// Offset at which the terminal phase is reached.
    pub fn total_ms(&self) -> u64 {
        self.merged_ms
    }

    /// Offsets must be strictly increasing.
    pub fn validate(&self) -> SequencerResult<()> {
        let entries = self.entries();
        for pair in entries.windows(2) {
            let (a, a_ms) = pair[0];
            let (b, b_ms) = pair[1];
            if b_ms <= a_ms {
                return Err(SequencerError::animation(format!(
                    "phase '{b}' offset ({b_ms} ms) must be after '{a}' ({a_ms} ms)"
                )));
            }
        }
        Ok(())
    }
}

/// Progress thresholds in `[0, 1]` at which each non-initial phase begins.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseThresholds {
    /// Threshold of [`Phase::Primary`].
    pub primary: f64,
    /// Threshold of [`Phase::Secondary`].
    pub secondary: f64,
    /// Threshold of [`Phase::Approach`].
    pub approach: f64,
    /// Threshold of [`Phase::Merged`].
    pub merged: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            primary: 0.2,
            secondary: 0.4,
            approach: 0.6,
            merged: 0.8,
        }
    }
}

impl PhaseThresholds {
    /// Quantize a progress value into a phase.
    pub fn phase_for(&self, progress: f64) -> Phase {
        let p = progress.clamp(0.0, 1.0);
        if p >= self.merged {
            Phase::Merged
        } else if p >= self.approach {
            Phase::Approach
        } else if p >= self.secondary {
            Phase::Secondary
        } else if p >= self.primary {
            Phase::Primary
        } else {
            Phase::Initial
        }
    }

    /// Thresholds must be finite, inside `[0, 1]` and strictly increasing.
    pub fn validate(&self) -> SequencerResult<()> {
        let values = [self.primary, self.secondary, self.approach, self.merged];
        if values.iter().any(|v| !v.is_finite() || !(0.0..=1.0).contains(v)) {
            return Err(SequencerError::animation(
                "phase thresholds must be finite and inside [0, 1]",
            ));
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SequencerError::animation(
                "phase thresholds must be strictly increasing",
            ));
        }
        Ok(())
    }
}

/// Progress of a page scroll, in `[0, 1]`.
///
/// Returns 0 when the document does not scroll at all.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let max_scroll = scroll_height - viewport_height;
    if max_scroll.is_nan() || max_scroll <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / max_scroll).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/clock/phase.rs"]
mod tests;
