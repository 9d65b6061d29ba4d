use kurbo::{Circle, RoundedRect, Shape};

use crate::animation::logo::{LogoAnimator, LogoConfig};
use crate::animation::particle::{ParticleAnimator, ParticleConfig};
use crate::assets::cache::{CacheStats, ResourceCache, ResourceFactory};
use crate::assets::sprite::{SpriteFactory, SpriteTexture, UnitQuad};
use crate::assets::text::{LoadedFont, ShapedText, TextBrushRgba8, TextLayoutEngine, fill_glyphs};
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul};
use crate::foundation::error::{SequencerError, SequencerResult};
use crate::overlay::handoff::HandoffSample;
use crate::overlay::reveal::{OverlaySample, OverlayState};
use crate::render::backend::FrameRGBA;
use crate::render::projection::Projection;
use crate::scene::config::SequencerConfig;

/// Everything drawn in one frame, borrowed from the session.
pub struct SceneView<'a> {
    /// Particle animators, in draw order.
    pub particles: &'a [ParticleAnimator],
    /// Particle constants.
    pub particle_cfg: &'a ParticleConfig,
    /// Logo-half animators.
    pub logos: &'a [LogoAnimator],
    /// Logo constants.
    pub logo_cfg: &'a LogoConfig,
    /// Handoff dot, when shown.
    pub handoff: Option<HandoffSample>,
    /// Overlay sample.
    pub overlay: &'a OverlaySample,
}

/// Renderer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames composed on a live surface.
    pub frames: u64,
    /// Blank frames returned while the context was lost.
    pub blank_frames: u64,
    /// Render surfaces created.
    pub surfaces_created: u64,
    /// Render surfaces torn down.
    pub surfaces_torn_down: u64,
    /// Sprite draws skipped because their texture was unavailable.
    pub sprites_skipped: u64,
}

struct CpuSurface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

struct OverlayText {
    font: LoadedFont,
    wordmark: ShapedText,
    subtitle: ShapedText,
}

struct OverlayStyle {
    anchor_y: f64,
    font_size_px: f64,
    color: Rgba8Premul,
    text: Option<OverlayText>,
}

/// CPU scene renderer powered by `vello_cpu`.
///
/// Owns the resource cache, the render surface and the activity gate. While inactive nothing is
/// drawn and no surface exists; after a context loss every frame is blank until the next
/// activation creates a fresh surface.
pub struct SceneRenderer<F: ResourceFactory = SpriteFactory> {
    canvas: Canvas,
    width: u16,
    height: u16,
    projection: Projection,
    clear: Rgba8Premul,
    handoff_color: Rgba8Premul,
    overlay: OverlayStyle,
    cache: ResourceCache<F>,
    surface: Option<CpuSurface>,
    active: bool,
    context_lost: bool,
    stats: RenderStats,
}

impl<F> SceneRenderer<F>
where
    F: ResourceFactory<Texture = SpriteTexture, Quad = UnitQuad>,
{
    /// An inactive renderer for `cfg`, creating resources through `factory`.
    pub fn new(cfg: &SequencerConfig, factory: F) -> SequencerResult<Self> {
        cfg.canvas.validate()?;
        let width: u16 = cfg
            .canvas
            .width
            .try_into()
            .map_err(|_| SequencerError::render("canvas width exceeds u16"))?;
        let height: u16 = cfg
            .canvas
            .height
            .try_into()
            .map_err(|_| SequencerError::render("canvas height exceeds u16"))?;

        let color = cfg.overlay.color.resolve()?;
        let text = match &cfg.overlay.font {
            None => None,
            Some(rel) => match load_overlay_text(cfg, &cfg.asset_path(rel), color) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(error = %e, "overlay font unavailable; drawing placeholder wordmark");
                    None
                }
            },
        };

        Ok(Self {
            canvas: cfg.canvas,
            width,
            height,
            projection: Projection::new(&cfg.camera, cfg.canvas),
            clear: cfg.clear_color()?,
            handoff_color: cfg.handoff.color.resolve()?,
            overlay: OverlayStyle {
                anchor_y: cfg.overlay.anchor_y,
                font_size_px: f64::from(cfg.overlay.font_size_px),
                color,
                text,
            },
            cache: ResourceCache::new(factory),
            surface: None,
            active: false,
            context_lost: false,
            stats: RenderStats::default(),
        })
    }

    /// Open or close the activity gate.
    ///
    /// Closing tears the surface down; reopening builds a fresh one and clears a context loss.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            if self.cache.is_disposed() {
                tracing::trace!("activation after dispose ignored");
                self.active = false;
                return;
            }
            self.surface = Some(CpuSurface {
                ctx: vello_cpu::RenderContext::new(self.width, self.height),
                pixmap: vello_cpu::Pixmap::new(self.width, self.height),
            });
            self.context_lost = false;
            self.stats.surfaces_created += 1;
            tracing::debug!(w = self.width, h = self.height, "render surface created");
        } else {
            self.teardown_surface();
        }
    }

    /// The rendering context went away. Frames are blank until the next activation.
    pub fn notify_context_lost(&mut self) {
        if self.context_lost {
            return;
        }
        tracing::warn!("render context lost; rendering blank frames");
        self.context_lost = true;
        self.teardown_surface();
    }

    fn teardown_surface(&mut self) {
        if self.surface.take().is_some() {
            self.stats.surfaces_torn_down += 1;
            tracing::debug!("render surface torn down");
        }
    }

    /// Compose one frame. `None` while the gate is closed.
    #[tracing::instrument(skip_all, fields(particles = view.particles.len()))]
    pub fn render(&mut self, view: &SceneView<'_>) -> SequencerResult<Option<FrameRGBA>> {
        if !self.active {
            return Ok(None);
        }
        let Some(mut surface) = self.surface.take() else {
            self.stats.blank_frames += 1;
            return Ok(Some(FrameRGBA::blank(self.canvas.width, self.canvas.height)));
        };
        let Some(quad) = self.cache.shared_quad().copied() else {
            self.surface = Some(surface);
            return Err(SequencerError::render("render after resources were disposed"));
        };

        let ctx = &mut surface.ctx;
        ctx.reset();
        ctx.set_paint_transform(Affine::IDENTITY);
        if self.clear.a > 0 {
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_paint(paint_color(self.clear, 1.0));
            ctx.fill_rect(&Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }

        self.draw_particles(ctx, view, quad);
        self.draw_logos(ctx, view, quad);
        if let Some(h) = view.handoff {
            self.draw_handoff(ctx, h);
        }
        if view.overlay.state == OverlayState::Shown {
            self.draw_overlay(ctx, view.overlay);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);
        let frame = FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: surface.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.surface = Some(surface);
        self.stats.frames += 1;
        Ok(Some(frame))
    }

    fn draw_particles(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        view: &SceneView<'_>,
        quad: UnitQuad,
    ) {
        for p in view.particles {
            let s = p.state();
            if s.dead || !s.visible || s.opacity <= 0.0 {
                continue;
            }
            let Some(tex) = self.cache.get_or_create(&p.spec().asset).cloned() else {
                self.stats.sprites_skipped += 1;
                continue;
            };
            let Some(sp) = self.projection.project(s.position) else {
                continue;
            };

            let size_px = view.particle_cfg.sprite_size * s.scale * sp.px_per_unit;
            let cy = sp.y - s.mesh_offset_y * sp.px_per_unit;
            let opacity = s.opacity as f32;

            ctx.push_opacity_layer(opacity);
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_paint(paint_color(p.spec().tint, 0.22));
            ctx.fill_path(&Circle::new((sp.x, cy), size_px * 0.55).to_path(0.1));

            let (w, h) = (f64::from(tex.width), f64::from(tex.height));
            let k = size_px / w.max(h).max(1.0);
            ctx.set_transform(
                Affine::translate((sp.x, cy))
                    * Affine::rotate(-s.rotation_z)
                    * Affine::scale(k)
                    * Affine::translate((-w / 2.0, -h / 2.0)),
            );
            ctx.set_paint(tex.paint);
            ctx.fill_rect(&quad.sized(w, h));
            ctx.pop_layer();
        }
    }

    fn draw_logos(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        view: &SceneView<'_>,
        quad: UnitQuad,
    ) {
        for logo in view.logos {
            let s = logo.state();
            if !s.visible || s.opacity <= 1e-3 {
                continue;
            }
            let Some(tex) = self
                .cache
                .get_or_create(view.logo_cfg.asset(logo.half()))
                .cloned()
            else {
                self.stats.sprites_skipped += 1;
                continue;
            };
            let Some(sp) = self.projection.project(s.position) else {
                continue;
            };

            let (w, h) = (f64::from(tex.width), f64::from(tex.height));
            let k = view.logo_cfg.size * s.scale * sp.px_per_unit / w.max(h).max(1.0);
            let squash_x = s.rotation.y.cos().abs().max(0.05);
            let squash_y = s.rotation.x.cos().abs().max(0.05);

            ctx.push_opacity_layer(s.opacity as f32);
            ctx.set_transform(
                Affine::translate((sp.x, sp.y))
                    * Affine::rotate(-s.rotation.z)
                    * Affine::scale_non_uniform(k * squash_x, k * squash_y)
                    * Affine::translate((-w / 2.0, -h / 2.0)),
            );
            ctx.set_paint(tex.paint);
            ctx.fill_rect(&quad.sized(w, h));
            ctx.pop_layer();
        }
    }

    fn draw_handoff(&self, ctx: &mut vello_cpu::RenderContext, h: HandoffSample) {
        let c = (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0);
        ctx.set_transform(Affine::IDENTITY);
        if h.ring_opacity > 0.0 && h.ring_radius_px > 0.0 {
            ctx.set_paint(paint_color(self.handoff_color, h.ring_opacity));
            ctx.fill_path(&Circle::new(c, h.ring_radius_px).to_path(0.1));
        }
        ctx.set_paint(paint_color(self.handoff_color, 1.0));
        ctx.fill_path(&Circle::new(c, h.core_radius_px).to_path(0.1));
    }

    fn draw_overlay(&self, ctx: &mut vello_cpu::RenderContext, o: &OverlaySample) {
        let c = &o.container;
        if c.opacity <= 0.0 {
            return;
        }
        let anchor = (
            f64::from(self.width) / 2.0,
            f64::from(self.height) * self.overlay.anchor_y + c.y_px,
        );
        let container = Affine::translate(anchor)
            * Affine::scale_non_uniform(c.scale, c.scale * tilt(c.rotate_x_deg));
        let size = self.overlay.font_size_px;

        ctx.push_opacity_layer(c.opacity as f32);
        match &self.overlay.text {
            Some(text) => {
                let left = -f64::from(text.wordmark.width) / 2.0;
                let n = text.wordmark.glyphs.len();
                for (i, g) in text.wordmark.glyphs.iter().enumerate() {
                    let Some(l) = letter_for_glyph(o, i, n) else {
                        continue;
                    };
                    let (gx, gy) = (f64::from(g.x), f64::from(g.y));
                    ctx.push_opacity_layer(l.opacity as f32);
                    ctx.set_transform(
                        container
                            * Affine::translate((left, l.y_px - size * 0.3))
                            * Affine::translate((gx, gy))
                            * Affine::scale_non_uniform(1.0, tilt(l.rotate_x_deg))
                            * Affine::translate((-gx, -gy)),
                    );
                    fill_glyphs(ctx, &text.font, std::slice::from_ref(g));
                    ctx.pop_layer();
                }

                ctx.push_opacity_layer(o.subtitle.opacity as f32);
                ctx.set_transform(
                    container
                        * Affine::translate((
                            -f64::from(text.subtitle.width) / 2.0,
                            size * 0.9 + o.subtitle.y_px,
                        )),
                );
                fill_glyphs(ctx, &text.font, &text.subtitle.glyphs);
                ctx.pop_layer();
            }
            None => {
                let advance = size * 0.55;
                let left = -advance * (o.letters.len() as f64) / 2.0;
                ctx.set_paint(paint_color(self.overlay.color, 1.0));
                for (i, l) in o.letters.iter().enumerate() {
                    let x = left + advance * (i as f64);
                    ctx.push_opacity_layer(l.opacity as f32);
                    ctx.set_transform(
                        container
                            * Affine::translate((x, l.y_px))
                            * Affine::scale_non_uniform(1.0, tilt(l.rotate_x_deg)),
                    );
                    ctx.fill_path(
                        &RoundedRect::new(0.0, -size * 0.35, advance * 0.8, size * 0.35, size * 0.1)
                            .to_path(0.1),
                    );
                    ctx.pop_layer();
                }

                ctx.push_opacity_layer(o.subtitle.opacity as f32);
                ctx.set_transform(container * Affine::translate((0.0, size * 0.9 + o.subtitle.y_px)));
                ctx.fill_rect(&Rect::new(-size * 3.0, -size * 0.06, size * 3.0, size * 0.06));
                ctx.pop_layer();
            }
        }
        ctx.pop_layer();
    }

    /// Release every cached resource and the surface. Further frames render nothing.
    pub fn dispose(&mut self) {
        self.cache.dispose();
        self.teardown_surface();
        self.active = false;
    }

    /// Whether the activity gate is open.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a render surface currently exists.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether a context loss is pending recovery.
    pub fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    /// Counters of the owned resource cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The owned resource cache.
    pub fn cache(&self) -> &ResourceCache<F> {
        &self.cache
    }

    /// Renderer counters.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// World-to-pixel projection.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}

fn load_overlay_text(
    cfg: &SequencerConfig,
    path: &std::path::Path,
    color: Rgba8Premul,
) -> SequencerResult<OverlayText> {
    let bytes = std::fs::read(path).map_err(|e| {
        SequencerError::asset(format!("read overlay font '{}': {e}", path.display()))
    })?;
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_font(bytes)?;
    let brush = TextBrushRgba8::from(color);
    let size = cfg.overlay.font_size_px;
    Ok(OverlayText {
        wordmark: engine.shape(&cfg.overlay.wordmark, &font, size, brush)?,
        subtitle: engine.shape(&cfg.overlay.subtitle, &font, size * 0.32, brush)?,
        font,
    })
}

fn letter_for_glyph(
    o: &OverlaySample,
    glyph: usize,
    glyphs: usize,
) -> Option<&crate::overlay::reveal::LetterSample> {
    if o.letters.is_empty() {
        return None;
    }
    // Ligatures or clusters can break the 1:1 mapping; spread glyphs over letters.
    let i = if glyphs == o.letters.len() {
        glyph
    } else {
        glyph * o.letters.len() / glyphs.max(1)
    };
    o.letters.get(i.min(o.letters.len() - 1))
}

fn tilt(deg: f64) -> f64 {
    deg.to_radians().cos().abs().max(0.02)
}

fn paint_color(c: Rgba8Premul, opacity: f64) -> vello_cpu::peniko::Color {
    if c.a == 0 {
        return vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 0);
    }
    // peniko colors are straight alpha.
    let ca = u16::from(c.a);
    let straight = |v: u8| ((u16::from(v) * 255 + ca / 2) / ca).min(255) as u8;
    let a = (f64::from(c.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(straight(c.r), straight(c.g), straight(c.b), a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
