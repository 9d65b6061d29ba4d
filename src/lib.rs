//! hero-sequencer drives a phased hero animation: a seeded particle field converging into a
//! ring, two logo halves merging through a fixed phase sequence, and a call-to-action overlay
//! revealed once the sequence completes.
//!
//! The public API is session-oriented:
//!
//! - Load and validate a [`SequencerConfig`]
//! - Create a [`HeroSession`] and [`HeroSession::start`] it
//! - Call [`HeroSession::frame`] once per display frame to get a [`FrameRGBA`]
//! - [`HeroSession::stop`] when the section unmounts
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod clock;
/// Call-to-action overlay and handoff indicator.
pub mod overlay;
/// CPU rendering backend.
pub mod render;
/// Boundary scene model and configuration.
pub mod scene;
/// Session lifecycle API.
pub mod session;

pub use crate::foundation::core::{
    Affine, Canvas, HexColor, Millis, Point, Rect, Rgba8Premul, Vec3, WorldViewport,
};
pub use crate::foundation::error::{SequencerError, SequencerResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::logo::{
    LogoAnimator, LogoConfig, LogoHalf, LogoState, LogoTarget, LogoTargets,
};
pub use crate::animation::particle::{
    FrameInput, ParticleAnimator, ParticleConfig, ParticleState, TimingMultipliers,
};
pub use crate::animation::seed::{ElementAnimationParams, SeededRandom};
pub use crate::assets::cache::{AssetKey, CacheStats, ResourceCache, ResourceFactory};
pub use crate::assets::sprite::{SpriteFactory, SpriteTexture, UnitQuad};
pub use crate::clock::phase::{Phase, PhaseSchedule, PhaseThresholds, scroll_progress};
pub use crate::clock::phase_clock::{DriveMode, PhaseClock, PhaseConfig, PhaseTransition};
pub use crate::clock::timer::{TimerId, TimerQueue};
pub use crate::overlay::handoff::{HandoffConfig, HandoffIndicator, HandoffSample};
pub use crate::overlay::reveal::{OverlayConfig, OverlayState, RevealOverlay};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{RenderStats, SceneRenderer, SceneView};
pub use crate::scene::catalog::{AssetRef, CategoryDef, ElementSpec, compose_elements};
pub use crate::scene::config::{CameraConfig, SequencerConfig};
pub use crate::session::hero::{FrameSnapshot, HeroOptions, HeroSession, LivenessToken};
