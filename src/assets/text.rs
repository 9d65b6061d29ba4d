use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{SequencerError, SequencerResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8Premul> for TextBrushRgba8 {
    fn from(c: Rgba8Premul) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A font loaded once and shared by layout and glyph rasterisation.
#[derive(Clone)]
pub(crate) struct LoadedFont {
    family: String,
    pub(crate) data: vello_cpu::peniko::FontData,
}

/// Builds Parley layouts against fonts registered from raw bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register `font_bytes` and keep a rasterisation handle to them.
    pub(crate) fn load_font(&mut self, font_bytes: Vec<u8>) -> SequencerResult<LoadedFont> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SequencerError::asset("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SequencerError::asset("registered font family has no name"))?
            .to_string();

        Ok(LoadedFont {
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    /// Shape a single line of `text`.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SequencerResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SequencerError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// One shaped glyph with its absolute baseline origin inside the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) font_size: f32,
    pub(crate) brush: TextBrushRgba8,
}

/// Flatten `layout` into placed glyphs, in layout order.
pub(crate) fn place_glyphs(layout: &parley::Layout<TextBrushRgba8>) -> Vec<PlacedGlyph> {
    let mut out = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            let font_size = run.run().font_size();
            out.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                id: g.id,
                x: g.x,
                y: g.y,
                font_size,
                brush,
            }));
        }
    }
    out
}

/// Fill `glyphs` with `font` at the context's current transform.
pub(crate) fn fill_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    font: &LoadedFont,
    glyphs: &[PlacedGlyph],
) {
    for g in glyphs {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            g.brush.r, g.brush.g, g.brush.b, g.brush.a,
        ));
        ctx.glyph_run(&font.data)
            .font_size(g.font_size)
            .fill_glyphs(std::iter::once(vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
    }
}

/// A shaped single line ready to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ShapedText {
    pub(crate) glyphs: Vec<PlacedGlyph>,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl TextLayoutEngine {
    /// Shape `text` and flatten it into placed glyphs.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SequencerResult<ShapedText> {
        let layout = self.layout_line(text, font, size_px, brush)?;
        Ok(ShapedText {
            glyphs: place_glyphs(&layout),
            width: layout.width(),
            height: layout.height(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
