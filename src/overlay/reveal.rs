use std::path::PathBuf;

use crate::animation::ease::{Ease, tween};
use crate::foundation::core::{HexColor, Millis};
use crate::foundation::error::{SequencerError, SequencerResult};

/// Overlay visibility. `Hidden → Shown` happens once and never reverses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    /// Not yet revealed.
    #[default]
    Hidden,
    /// Revealed; the call to action is reachable.
    Shown,
}

/// Reveal timing, copy and entrance choreography of the call-to-action overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Delay from the terminal phase to the reveal under full motion.
    pub reveal_delay_ms: u64,
    /// Delay from the terminal phase to the reveal under reduced motion.
    pub reduced_reveal_delay_ms: u64,
    /// Link target of the call to action.
    pub href: String,
    /// Wordmark, animated letter by letter.
    pub wordmark: String,
    /// Line shown under the wordmark.
    pub subtitle: String,
    /// Optional font for the wordmark and subtitle, relative to the assets root.
    pub font: Option<PathBuf>,
    /// Wordmark size in pixels.
    pub font_size_px: f32,
    /// Text color.
    pub color: HexColor,
    /// Vertical anchor as a fraction of the canvas height.
    pub anchor_y: f64,
    /// Container entrance duration, in seconds.
    pub container_s: f64,
    /// Stagger between wordmark letters, in seconds.
    pub letter_stagger_s: f64,
    /// Duration of one letter's entrance, in seconds.
    pub letter_s: f64,
    /// Subtitle delay from the terminal phase, in seconds.
    pub subtitle_delay_s: f64,
    /// Subtitle fade duration, in seconds.
    pub subtitle_s: f64,
    /// Period of the breathing opacity loop, in seconds.
    pub breathe_period_s: f64,
    /// Lowest opacity of the breathing loop.
    pub breathe_floor: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 1400,
            reduced_reveal_delay_ms: 300,
            href: "/contact".to_owned(),
            wordmark: "ozenstudio".to_owned(),
            subtitle: "We design and build with özen: care, precision, intent.".to_owned(),
            font: None,
            font_size_px: 48.0,
            color: HexColor::from("#111827"),
            anchor_y: 0.65,
            container_s: 1.8,
            letter_stagger_s: 0.05,
            letter_s: 0.8,
            subtitle_delay_s: 2.8,
            subtitle_s: 1.2,
            breathe_period_s: 4.0,
            breathe_floor: 0.85,
        }
    }
}

impl OverlayConfig {
    /// Reject non-finite or negative timings and an unparsable color.
    pub fn validate(&self) -> SequencerResult<()> {
        for (name, v) in [
            ("container_s", self.container_s),
            ("letter_stagger_s", self.letter_stagger_s),
            ("letter_s", self.letter_s),
            ("subtitle_delay_s", self.subtitle_delay_s),
            ("subtitle_s", self.subtitle_s),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SequencerError::validation(format!(
                    "overlay.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.breathe_period_s.is_finite() || self.breathe_period_s <= 0.0 {
            return Err(SequencerError::validation(
                "overlay.breathe_period_s must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.breathe_floor) {
            return Err(SequencerError::validation(
                "overlay.breathe_floor must be in [0, 1]",
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(SequencerError::validation("overlay.font_size_px must be > 0"));
        }
        if self.href.is_empty() {
            return Err(SequencerError::validation("overlay.href must be non-empty"));
        }
        self.color.resolve()?;
        Ok(())
    }

    /// Reveal delay for the given motion preference.
    pub fn reveal_delay_ms(&self, reduced_motion: bool) -> u64 {
        if reduced_motion {
            self.reduced_reveal_delay_ms
        } else {
            self.reveal_delay_ms
        }
    }
}

/// Container transform at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ContainerSample {
    /// Opacity in `[0, 1]`, breathing included.
    pub opacity: f64,
    /// Vertical offset in pixels (positive is down).
    pub y_px: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Tilt around the horizontal axis, in degrees.
    pub rotate_x_deg: f64,
}

/// One wordmark letter at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LetterSample {
    /// The letter.
    pub ch: char,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset in pixels.
    pub y_px: f64,
    /// Tilt around the horizontal axis, in degrees.
    pub rotate_x_deg: f64,
}

/// Subtitle at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SubtitleSample {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset in pixels.
    pub y_px: f64,
}

/// Everything the renderer needs to draw the overlay for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverlaySample {
    /// Current visibility.
    pub state: OverlayState,
    /// Container transform.
    pub container: ContainerSample,
    /// Per-letter transforms, in wordmark order.
    pub letters: Vec<LetterSample>,
    /// Subtitle transform.
    pub subtitle: SubtitleSample,
}

const CONTAINER_START: ContainerSample = ContainerSample {
    opacity: 0.0,
    y_px: 80.0,
    scale: 0.5,
    rotate_x_deg: 90.0,
};

const LETTER_Y_PX: f64 = 30.0;
const LETTER_ROTATE_DEG: f64 = -90.0;
const SUBTITLE_Y_PX: f64 = 24.0;

/// Call-to-action overlay revealed after the terminal phase.
#[derive(Clone, Debug)]
pub struct RevealOverlay {
    reduced_motion: bool,
    delay_ms: u64,
    armed_at: Option<Millis>,
    shown_at: Option<Millis>,
    sample: OverlaySample,
}

impl RevealOverlay {
    /// A hidden overlay. Letter slots are allocated here once.
    pub fn new(cfg: &OverlayConfig, reduced_motion: bool) -> Self {
        let letters = cfg
            .wordmark
            .chars()
            .map(|ch| LetterSample {
                ch,
                opacity: 0.0,
                y_px: LETTER_Y_PX,
                rotate_x_deg: LETTER_ROTATE_DEG,
            })
            .collect();
        Self {
            reduced_motion,
            delay_ms: cfg.reveal_delay_ms(reduced_motion),
            armed_at: None,
            shown_at: None,
            sample: OverlaySample {
                state: OverlayState::Hidden,
                container: CONTAINER_START,
                letters,
                subtitle: SubtitleSample {
                    opacity: 0.0,
                    y_px: SUBTITLE_Y_PX,
                },
            },
        }
    }

    /// Arm the reveal: the terminal phase was reached at `at`. Later calls are ignored.
    pub fn notify_terminal(&mut self, at: Millis) {
        if self.armed_at.is_some() {
            return;
        }
        tracing::debug!(at_ms = at.0, delay_ms = self.delay_ms, "overlay reveal armed");
        self.armed_at = Some(at);
    }

    /// Advance to `now`. Returns `true` on the frame the overlay becomes shown.
    pub fn update(&mut self, now: Millis, cfg: &OverlayConfig) -> bool {
        let Some(armed_at) = self.armed_at else {
            return false;
        };
        let reveal_at = armed_at.saturating_add(self.delay_ms);
        let mut revealed = false;
        if self.shown_at.is_none() && now >= reveal_at {
            self.shown_at = Some(reveal_at);
            self.sample.state = OverlayState::Shown;
            tracing::debug!(at_ms = now.0, "overlay shown");
            revealed = true;
        }
        if self.shown_at.is_some() {
            let since_armed_s = (now.saturating_since(armed_at) as f64) / 1000.0;
            let delay_s = (self.delay_ms as f64) / 1000.0;
            self.choreograph(since_armed_s, delay_s, cfg);
        }
        revealed
    }

    fn choreograph(&mut self, t: f64, delay_s: f64, cfg: &OverlayConfig) {
        let s = &mut self.sample;
        if self.reduced_motion {
            s.container = ContainerSample {
                opacity: 1.0,
                y_px: 0.0,
                scale: 1.0,
                rotate_x_deg: 0.0,
            };
            for l in &mut s.letters {
                l.opacity = 1.0;
                l.y_px = 0.0;
                l.rotate_x_deg = 0.0;
            }
            s.subtitle = SubtitleSample {
                opacity: 1.0,
                y_px: 0.0,
            };
            return;
        }

        // The breathing loop runs from mount and multiplies the entrance fade.
        let k = tween(Ease::InOutCubic, t, delay_s, cfg.container_s);
        let breathe = breathing(
            (t - delay_s).max(0.0),
            cfg.breathe_period_s,
            cfg.breathe_floor,
        );
        s.container = ContainerSample {
            opacity: k * breathe,
            y_px: CONTAINER_START.y_px * (1.0 - k),
            scale: CONTAINER_START.scale + (1.0 - CONTAINER_START.scale) * k,
            rotate_x_deg: CONTAINER_START.rotate_x_deg * (1.0 - k),
        };

        for (i, l) in s.letters.iter_mut().enumerate() {
            let k = tween(
                Ease::InOutCubic,
                t,
                (i as f64) * cfg.letter_stagger_s,
                cfg.letter_s,
            );
            l.opacity = k;
            l.y_px = LETTER_Y_PX * (1.0 - k);
            l.rotate_x_deg = LETTER_ROTATE_DEG * (1.0 - k);
        }

        let k = tween(Ease::OutCubic, t, cfg.subtitle_delay_s, cfg.subtitle_s);
        s.subtitle = SubtitleSample {
            opacity: k,
            y_px: SUBTITLE_Y_PX * (1.0 - k),
        };
    }

    /// Current visibility.
    pub fn state(&self) -> OverlayState {
        self.sample.state
    }

    /// Whether the reveal has been armed.
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Instant the overlay became shown.
    pub fn shown_at(&self) -> Option<Millis> {
        self.shown_at
    }

    /// Latest sample.
    pub fn sample(&self) -> &OverlaySample {
        &self.sample
    }
}

/// Opacity of the `[1, floor, 1]` loop at `t` seconds into it.
fn breathing(t: f64, period_s: f64, floor: f64) -> f64 {
    let u = (t / period_s).fract();
    let tri = if u < 0.5 { u * 2.0 } else { (1.0 - u) * 2.0 };
    1.0 - (1.0 - floor) * Ease::InOutCubic.apply(tri)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/reveal.rs"]
mod tests;
