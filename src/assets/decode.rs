use anyhow::Context;

use crate::foundation::error::{SequencerError, SequencerResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DecodedImage {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Vec<u8>,
}

impl DecodedImage {
    /// Convert into a paint usable by `vello_cpu`.
    pub(crate) fn into_paint(self) -> SequencerResult<vello_cpu::Image> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| SequencerError::asset("image width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| SequencerError::asset("image height exceeds u16"))?;
        if self.rgba8_premul.len() != self.width as usize * self.height as usize * 4 {
            return Err(SequencerError::asset("decoded image byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let pixels = self
            .rgba8_premul
            .chunks_exact(4)
            .map(|px| {
                may_have_opacities |= px[3] != 255;
                vello_cpu::peniko::color::PremulRgba8 {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
            })
            .collect::<Vec<_>>();

        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }
}

pub(crate) fn decode_image(bytes: &[u8]) -> SequencerResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul,
    })
}

pub(crate) fn parse_svg(bytes: &[u8]) -> SequencerResult<usvg::Tree> {
    let opts = usvg::Options::default();
    Ok(usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?)
}

/// Rasterise `tree` so that its longer side is `max_px`, keeping the aspect ratio.
pub(crate) fn rasterize_svg_fit(tree: &usvg::Tree, max_px: u32) -> SequencerResult<DecodedImage> {
    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(SequencerError::asset("svg has invalid width/height"));
    }
    let k = (max_px.max(1) as f32) / sw.max(sh);
    let width = ((sw * k).ceil() as u32).max(1);
    let height = ((sh * k).ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SequencerError::asset("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        (width as f32) / sw,
        (height as f32) / sh,
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: pixmap.data().to_vec(),
    })
}

/// Normalize and validate an assets-root-relative path.
///
/// Uses `/` separators, drops `.` segments, and rejects absolute paths and `..`.
pub(crate) fn normalize_rel_path(source: &str) -> SequencerResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SequencerError::validation("asset paths must be relative"));
    }

    let parts = s
        .split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .map(|p| {
            if p == ".." {
                Err(SequencerError::validation("asset paths must not contain '..'"))
            } else {
                Ok(p)
            }
        })
        .collect::<SequencerResult<Vec<_>>>()?;

    if parts.is_empty() {
        return Err(SequencerError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
