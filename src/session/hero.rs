use std::cell::Cell;
use std::rc::Rc;

use crate::animation::logo::{LogoAnimator, LogoHalf, LogoState};
use crate::animation::particle::{FrameInput, ParticleAnimator};
use crate::animation::seed::ElementAnimationParams;
use crate::assets::cache::{CacheStats, ResourceFactory};
use crate::assets::sprite::{SpriteFactory, SpriteTexture, UnitQuad};
use crate::clock::phase::Phase;
use crate::clock::phase_clock::{PhaseClock, PhaseTransition};
use crate::foundation::core::Millis;
use crate::foundation::error::SequencerResult;
use crate::overlay::handoff::HandoffIndicator;
use crate::overlay::reveal::{OverlayState, RevealOverlay};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{RenderStats, SceneRenderer, SceneView};
use crate::scene::config::SequencerConfig;

/// Host-provided flags fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeroOptions {
    /// Honour the user's reduced-motion preference.
    pub reduced_motion: bool,
    /// Drive phases from [`HeroSession::set_progress`] instead of timers.
    pub progress_driven: bool,
    /// Initial logo gap in pixels; see [`HeroSession::set_gap`].
    pub gap: f64,
}

/// Shared view of a session's liveness flag.
///
/// Hosts keep one around deferred callbacks and check it before touching the session.
#[derive(Clone, Debug)]
pub struct LivenessToken(Rc<Cell<bool>>);

impl LivenessToken {
    /// Whether the session is still mounted.
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

/// Serialisable state of one particle.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ElementSnapshot {
    /// Element index.
    pub index: u32,
    /// Category tag.
    pub category: String,
    /// Asset label.
    pub asset: String,
    /// World position.
    pub position: [f64; 3],
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether the element is drawn.
    pub visible: bool,
    /// Whether the element has fully faded.
    pub dead: bool,
}

/// Serialisable state of one logo half.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LogoSnapshot {
    /// Which half.
    pub half: LogoHalf,
    /// Current pose.
    #[serde(flatten)]
    pub state: LogoState,
}

/// Headless inspection record of a session.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    /// Whether the session is still mounted.
    pub alive: bool,
    /// Current phase.
    pub phase: Phase,
    /// Phase changes so far.
    pub transitions: Vec<PhaseTransition>,
    /// Animation time fed to particles, in seconds.
    pub time_s: f64,
    /// High-water progress (progress mode).
    pub progress: f64,
    /// Overlay state.
    pub overlay: OverlayState,
    /// Hyperlink target of the overlay.
    pub href: String,
    /// Whether the handoff dot is shown.
    pub handoff_visible: bool,
    /// Particles, in draw order.
    pub elements: Vec<ElementSnapshot>,
    /// Logo halves.
    pub logos: Vec<LogoSnapshot>,
    /// Resource cache counters.
    pub cache: CacheStats,
    /// Renderer counters.
    pub render: RenderStats,
}

/// One mount of the hero scene.
///
/// Owns the phase clock, every animator, the overlay, the handoff dot and the renderer (which in
/// turn owns the resource cache). The host calls [`HeroSession::start`], then
/// [`HeroSession::frame`] once per display frame, and finally [`HeroSession::stop`]. After stop
/// every entry point is a silent no-op.
pub struct HeroSession<F: ResourceFactory = SpriteFactory> {
    cfg: SequencerConfig,
    opts: HeroOptions,
    clock: PhaseClock,
    particles: Vec<ParticleAnimator>,
    logos: [LogoAnimator; 2],
    overlay: RevealOverlay,
    handoff: HandoffIndicator,
    renderer: SceneRenderer<F>,
    alive: Rc<Cell<bool>>,
    visible: bool,
    gap: f64,
    started_at: Option<Millis>,
    last_frame: Option<Millis>,
    time_s: f64,
    timeline_s: f64,
}

impl HeroSession<SpriteFactory> {
    /// Session using the default [`SpriteFactory`].
    pub fn new(cfg: SequencerConfig, opts: HeroOptions) -> SequencerResult<Self> {
        cfg.validate()?;
        let factory = SpriteFactory::from_config(&cfg)?;
        Self::with_factory(cfg, opts, factory)
    }
}

impl<F> HeroSession<F>
where
    F: ResourceFactory<Texture = SpriteTexture, Quad = UnitQuad>,
{
    /// Session creating resources through `factory`.
    pub fn with_factory(cfg: SequencerConfig, opts: HeroOptions, factory: F) -> SequencerResult<Self> {
        cfg.validate()?;
        let viewport = cfg.world_viewport();
        let reduced = opts.reduced_motion;

        let particles: Vec<ParticleAnimator> = cfg
            .elements()?
            .into_iter()
            .map(|spec| {
                let params =
                    ElementAnimationParams::derive(spec.index, viewport, reduced, &cfg.particles);
                ParticleAnimator::new(spec, params, &cfg.particles)
            })
            .collect();
        let timeline_s = particles
            .iter()
            .map(|p| p.params().delay_s + p.params().duration_s)
            .fold(0.0, f64::max);

        let gap = if opts.gap.is_finite() { opts.gap } else { 0.0 };
        let logos = [
            LogoAnimator::new(LogoHalf::Top, &cfg.logo, gap),
            LogoAnimator::new(LogoHalf::Bottom, &cfg.logo, gap),
        ];

        Ok(Self {
            clock: PhaseClock::new(&cfg.phases, opts.progress_driven, reduced)?,
            overlay: RevealOverlay::new(&cfg.overlay, reduced),
            handoff: HandoffIndicator::new(reduced),
            renderer: SceneRenderer::new(&cfg, factory)?,
            particles,
            logos,
            alive: Rc::new(Cell::new(true)),
            visible: true,
            gap,
            started_at: None,
            last_frame: None,
            time_s: 0.0,
            timeline_s,
            cfg,
            opts,
        })
    }

    /// Arm timers and open the render gate (if visible). Repeat calls do nothing.
    pub fn start(&mut self, now: Millis) {
        if !self.alive.get() {
            tracing::trace!("start after stop ignored");
            return;
        }
        if self.started_at.is_some() {
            return;
        }
        self.started_at = Some(now);
        self.clock.start(now);
        self.handoff.start(now, &self.cfg.handoff);
        self.renderer.set_active(self.visible);
        tracing::debug!(
            at_ms = now.0,
            elements = self.particles.len(),
            reduced_motion = self.opts.reduced_motion,
            "hero session started"
        );
    }

    /// Tear the session down: cancel every timer, dispose resources, clear liveness.
    pub fn stop(&mut self) {
        if !self.alive.replace(false) {
            return;
        }
        self.clock.cancel();
        self.handoff.cancel();
        self.renderer.dispose();
        tracing::debug!(phase = %self.clock.phase(), "hero session stopped");
    }

    /// Per-frame callback.
    ///
    /// Fires due timers, runs every animator against the same phase, then renders. Returns
    /// `None` before start, after stop, and while the section is not visible.
    #[tracing::instrument(skip_all, fields(now_ms = now.0))]
    pub fn frame(&mut self, now: Millis) -> SequencerResult<Option<FrameRGBA>> {
        if !self.alive.get() {
            tracing::trace!("frame after stop ignored");
            return Ok(None);
        }
        let Some(started_at) = self.started_at else {
            return Ok(None);
        };

        self.clock.advance_to(now);
        if let Some(at) = self.clock.terminal_at() {
            self.overlay.notify_terminal(at);
        }
        if self.overlay.update(now, &self.cfg.overlay) {
            tracing::debug!(href = %self.cfg.overlay.href, "overlay revealed");
        }
        self.handoff.advance_to(now);

        let dt_s = self
            .last_frame
            .map_or(0.0, |last| Millis(now.saturating_since(last)).as_secs_f64());
        self.last_frame = Some(now);
        let wall_s = Millis(now.saturating_since(started_at)).as_secs_f64();
        self.time_s = if self.opts.progress_driven {
            self.time_s.max(self.clock.progress() * self.timeline_s)
        } else {
            self.time_s.max(wall_s)
        };

        if !self.visible {
            return Ok(None);
        }

        let phase = self.clock.phase();
        let reduced_motion = self.opts.reduced_motion;
        let particle_input = FrameInput {
            time_s: self.time_s,
            dt_s,
            phase,
            reduced_motion,
        };
        for p in &mut self.particles {
            p.update(&particle_input, &self.cfg.particles);
        }
        let logo_input = FrameInput {
            time_s: wall_s,
            ..particle_input
        };
        for logo in &mut self.logos {
            logo.update(&logo_input, &self.cfg.logo, self.gap);
        }

        let view = SceneView {
            particles: &self.particles,
            particle_cfg: &self.cfg.particles,
            logos: &self.logos,
            logo_cfg: &self.cfg.logo,
            handoff: self.handoff.sample(now, &self.cfg.handoff),
            overlay: self.overlay.sample(),
        };
        self.renderer.render(&view)
    }

    /// Feed sampled scroll/intersection progress (progress mode).
    pub fn set_progress(&mut self, progress: f64, now: Millis) {
        if !self.alive.get() {
            tracing::trace!("progress after stop ignored");
            return;
        }
        self.clock.set_progress(progress, now);
    }

    /// Visibility/intersection signal. Toggles the render gate once started.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.alive.get() {
            tracing::trace!("visibility change after stop ignored");
            return;
        }
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if self.started_at.is_some() {
            self.renderer.set_active(visible);
        }
        tracing::debug!(visible, "hero visibility changed");
    }

    /// New logo gap, typically after a resize. Non-finite values are ignored.
    pub fn set_gap(&mut self, gap: f64) {
        if !self.alive.get() || !gap.is_finite() {
            return;
        }
        self.gap = gap;
    }

    /// The host's rendering context went away.
    pub fn notify_context_lost(&mut self) {
        if !self.alive.get() {
            tracing::trace!("context loss after stop ignored");
            return;
        }
        self.renderer.notify_context_lost();
    }

    /// Serialisable view of the current state.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            alive: self.alive.get(),
            phase: self.clock.phase(),
            transitions: self.clock.history().to_vec(),
            time_s: self.time_s,
            progress: self.clock.progress(),
            overlay: self.overlay.state(),
            href: self.cfg.overlay.href.clone(),
            handoff_visible: self.handoff.is_visible(),
            elements: self
                .particles
                .iter()
                .map(|p| {
                    let s = p.state();
                    ElementSnapshot {
                        index: p.spec().index,
                        category: p.spec().category.clone(),
                        asset: p.spec().asset.label().to_owned(),
                        position: [s.position.x, s.position.y, s.position.z],
                        scale: s.scale,
                        opacity: s.opacity,
                        visible: s.visible,
                        dead: s.dead,
                    }
                })
                .collect(),
            logos: self
                .logos
                .iter()
                .map(|l| LogoSnapshot {
                    half: l.half(),
                    state: *l.state(),
                })
                .collect(),
            cache: self.renderer.cache_stats(),
            render: self.renderer.stats(),
        }
    }

    /// Token observing this session's liveness.
    pub fn liveness(&self) -> LivenessToken {
        LivenessToken(self.alive.clone())
    }

    /// Whether [`HeroSession::stop`] has not run yet.
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    /// Overlay state.
    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Hyperlink target of the overlay.
    pub fn href(&self) -> &str {
        &self.cfg.overlay.href
    }

    /// The phase clock.
    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    /// Particle animators, in draw order.
    pub fn particles(&self) -> &[ParticleAnimator] {
        &self.particles
    }

    /// Logo-half animators.
    pub fn logos(&self) -> &[LogoAnimator] {
        &self.logos
    }

    /// The overlay.
    pub fn overlay(&self) -> &RevealOverlay {
        &self.overlay
    }

    /// The handoff dot.
    pub fn handoff(&self) -> &HandoffIndicator {
        &self.handoff
    }

    /// The renderer.
    pub fn renderer(&self) -> &SceneRenderer<F> {
        &self.renderer
    }

    /// Configuration this session was built from.
    pub fn config(&self) -> &SequencerConfig {
        &self.cfg
    }

    /// Options this session was built with.
    pub fn options(&self) -> HeroOptions {
        self.opts
    }

    /// Seconds of animation time covering every particle's full path.
    pub fn timeline_s(&self) -> f64 {
        self.timeline_s
    }
}

impl<F: ResourceFactory> Drop for HeroSession<F> {
    fn drop(&mut self) {
        if self.alive.replace(false) {
            self.clock.cancel();
            self.handoff.cancel();
            tracing::debug!("hero session dropped while live");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/hero.rs"]
mod tests;
