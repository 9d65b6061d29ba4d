use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use kurbo::Shape;

use crate::assets::cache::{AssetKey, ResourceFactory};
use crate::assets::decode::{
    DecodedImage, decode_image, normalize_rel_path, parse_svg, rasterize_svg_fit,
};
use crate::assets::text::{LoadedFont, TextBrushRgba8, TextLayoutEngine, fill_glyphs};
use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{SequencerError, SequencerResult};
use crate::foundation::math::hash_tagged_str;
use crate::scene::catalog::AssetRef;
use crate::scene::config::SequencerConfig;

/// A rasterised sprite ready to be used as an image paint.
#[derive(Clone)]
pub struct SpriteTexture {
    pub(crate) paint: vello_cpu::Image,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for SpriteTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SpriteTexture {
    pub(crate) fn from_decoded(img: DecodedImage) -> SequencerResult<Self> {
        let (width, height) = (img.width, img.height);
        Ok(Self {
            paint: img.into_paint()?,
            width,
            height,
        })
    }

    fn from_pixmap(pixmap: vello_cpu::Pixmap) -> Self {
        let (width, height) = (u32::from(pixmap.width()), u32::from(pixmap.height()));
        Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        }
    }
}

/// Unit square every sprite is drawn through, sized per texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitQuad {
    rect: Rect,
}

impl UnitQuad {
    /// The quad stretched to `w × h` pixels.
    pub fn sized(&self, w: f64, h: f64) -> Rect {
        Rect::new(
            self.rect.x0 * w,
            self.rect.y0 * h,
            self.rect.x1 * w,
            self.rect.y1 * h,
        )
    }
}

impl Default for UnitQuad {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// Default [`ResourceFactory`]: rasterises emoji and decodes image assets from disk.
pub struct SpriteFactory {
    assets_root: PathBuf,
    sprite_px: u16,
    text: TextLayoutEngine,
    emoji_font: Option<LoadedFont>,
    live: usize,
}

impl SpriteFactory {
    /// Factory resolving image assets against `assets_root`, rasterising sprites at `sprite_px`.
    pub fn new(assets_root: impl Into<PathBuf>, sprite_px: u32) -> SequencerResult<Self> {
        let sprite_px = u16::try_from(sprite_px)
            .ok()
            .filter(|&px| px > 0)
            .ok_or_else(|| SequencerError::validation("sprite_px must be in 1..=65535"))?;
        Ok(Self {
            assets_root: assets_root.into(),
            sprite_px,
            text: TextLayoutEngine::new(),
            emoji_font: None,
            live: 0,
        })
    }

    /// Factory for `cfg`. A configured emoji font that fails to load is logged and ignored.
    pub fn from_config(cfg: &SequencerConfig) -> SequencerResult<Self> {
        let mut factory = Self::new(&cfg.assets_root, cfg.sprite_px)?;
        if let Some(rel) = &cfg.emoji_font {
            let path = cfg.asset_path(rel);
            if let Err(e) = factory.load_emoji_font(&path) {
                tracing::warn!(path = %path.display(), error = %e, "emoji font unavailable; using procedural sprites");
            }
        }
        Ok(factory)
    }

    /// Rasterise emoji with the font at `path` from now on.
    pub fn load_emoji_font(&mut self, path: &Path) -> SequencerResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.emoji_font = Some(self.text.load_font(bytes)?);
        Ok(())
    }

    /// Textures created and not yet disposed.
    pub fn live_textures(&self) -> usize {
        self.live
    }

    fn emoji_texture(&mut self, s: &str) -> SequencerResult<SpriteTexture> {
        let px = self.sprite_px;
        if let Some(font) = self.emoji_font.clone() {
            let shaped = self.text.shape(
                s,
                &font,
                f32::from(px) * 0.75,
                TextBrushRgba8 {
                    r: 17,
                    g: 24,
                    b: 39,
                    a: 255,
                },
            )?;
            if !shaped.glyphs.is_empty() {
                let dx = (f64::from(px) - f64::from(shaped.width)) / 2.0;
                let dy = (f64::from(px) - f64::from(shaped.height)) / 2.0;
                let pixmap = rasterize(px, |ctx| {
                    ctx.set_transform(Affine::translate((dx, dy)));
                    fill_glyphs(ctx, &font, &shaped.glyphs);
                });
                return Ok(SpriteTexture::from_pixmap(pixmap));
            }
        }
        Ok(SpriteTexture::from_pixmap(procedural_stamp(s, px)))
    }

    fn image_texture(&mut self, rel: &str) -> SequencerResult<SpriteTexture> {
        let rel = normalize_rel_path(rel)?;
        let path = self.assets_root.join(&rel);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;

        let is_svg = Path::new(&rel)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let decoded = if is_svg {
            let tree = parse_svg(&bytes)?;
            rasterize_svg_fit(&tree, u32::from(self.sprite_px) * 2)?
        } else {
            decode_image(&bytes)?
        };
        SpriteTexture::from_decoded(decoded)
    }
}

impl ResourceFactory for SpriteFactory {
    type Texture = SpriteTexture;
    type Quad = UnitQuad;

    fn create_texture(&mut self, key: &AssetKey) -> SequencerResult<SpriteTexture> {
        let texture = match key {
            AssetRef::Emoji(s) => self.emoji_texture(s)?,
            AssetRef::Image(rel) => self.image_texture(rel)?,
        };
        self.live += 1;
        Ok(texture)
    }

    fn create_quad(&mut self) -> UnitQuad {
        UnitQuad::default()
    }

    fn dispose_texture(&mut self, key: &AssetKey, texture: SpriteTexture) {
        tracing::trace!(asset = key.label(), w = texture.width, h = texture.height, "texture released");
        self.live = self.live.saturating_sub(1);
    }

    fn dispose_quad(&mut self, _quad: UnitQuad) {}
}

fn rasterize(px: u16, draw: impl FnOnce(&mut vello_cpu::RenderContext)) -> vello_cpu::Pixmap {
    let mut ctx = vello_cpu::RenderContext::new(px, px);
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(px, px);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

/// Deterministic stand-in for a glyph: a disc with a ring of petals, colored from the hash of `s`.
fn procedural_stamp(s: &str, px: u16) -> vello_cpu::Pixmap {
    let h = hash_tagged_str(b'E', s);
    let bytes = h.to_le_bytes();
    let lift = |b: u8| 96 + b / 2;
    let base = vello_cpu::peniko::Color::from_rgba8(lift(bytes[0]), lift(bytes[1]), lift(bytes[2]), 255);
    let accent = vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 200);
    let petals = 3 + (bytes[3] % 5) as usize;
    let spin = f64::from(bytes[4]) / 255.0 * std::f64::consts::TAU;

    let size = f64::from(px);
    let c = Point::new(size / 2.0, size / 2.0);

    rasterize(px, |ctx| {
        ctx.set_paint(base);
        ctx.fill_path(&kurbo::Circle::new(c, size * 0.34).to_path(0.1));

        ctx.set_paint(accent);
        ctx.fill_path(&kurbo::Circle::new(c, size * 0.12).to_path(0.1));
        for i in 0..petals {
            let a = spin + (i as f64) * std::f64::consts::TAU / (petals as f64);
            let p = Point::new(
                c.x + a.cos() * size * 0.24,
                c.y + a.sin() * size * 0.24,
            );
            ctx.fill_path(&kurbo::Circle::new(p, size * 0.06).to_path(0.1));
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite.rs"]
mod tests;
