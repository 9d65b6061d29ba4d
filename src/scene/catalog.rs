use crate::foundation::core::{HexColor, Rgba8Premul};
use crate::foundation::error::{SequencerError, SequencerResult};

/// Identity of a visual asset.
///
/// Resources are cached by this value, so two elements showing the same emoji share one texture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    /// A single emoji (or any short glyph string) rasterised into a sprite.
    Emoji(String),
    /// A raster (PNG/JPEG) or SVG file, relative to the configured assets root.
    Image(String),
}

impl AssetRef {
    /// Short human-readable label used in logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Emoji(s) | Self::Image(s) => s,
        }
    }
}

/// One category of input sprites as written in configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryDef {
    /// Category tag, e.g. `"visual"`.
    pub tag: String,
    /// Tint drawn behind each sprite of the category.
    pub color: HexColor,
    /// Emoji shown by the category, in order.
    pub items: Vec<String>,
}

impl CategoryDef {
    fn new(tag: &str, color: &str, items: &[&str]) -> Self {
        Self {
            tag: tag.to_owned(),
            color: HexColor::from(color),
            items: items.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// The five stock categories, six emoji each.
pub fn default_catalog() -> Vec<CategoryDef> {
    vec![
        CategoryDef::new("visual", "#3B82F6", &["📱", "🎨", "📸", "🌈", "🖥️", "✨"]),
        CategoryDef::new("experience", "#F59E0B", &["🚀", "🎧", "🥑", "🎮", "📚", "💪"]),
        CategoryDef::new("data", "#10B981", &["📊", "💻", "📈", "🧠", "☁️", "🔥"]),
        CategoryDef::new("emotion", "#EF4444", &["💖", "😍", "🥺", "🤯", "✨", "🔮"]),
        CategoryDef::new("nature", "#8B5CF6", &["🌿", "🌊", "🏔️", "🌙", "⭐", "🦋"]),
    ]
}

/// Immutable per-element descriptor, created once when the element set is composed.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    /// Stable element index; seeds the element's animation parameters.
    pub index: u32,
    /// Visual asset shown by the element.
    pub asset: AssetRef,
    /// Category tag.
    pub category: String,
    /// Category tint.
    pub tint: Rgba8Premul,
}

/// Flatten categories into element specs.
///
/// Indices run category by category, item by item, starting at 0.
pub fn compose_elements(categories: &[CategoryDef]) -> SequencerResult<Vec<ElementSpec>> {
    let mut out = Vec::with_capacity(categories.iter().map(|c| c.items.len()).sum());
    for category in categories {
        if category.tag.is_empty() {
            return Err(SequencerError::validation("catalog category tag must be non-empty"));
        }
        let tint = category.color.resolve()?;
        for item in &category.items {
            if item.is_empty() {
                return Err(SequencerError::validation(format!(
                    "catalog category '{}' has an empty item",
                    category.tag
                )));
            }
            let index = u32::try_from(out.len())
                .map_err(|_| SequencerError::validation("catalog has too many items"))?;
            out.push(ElementSpec {
                index,
                asset: AssetRef::Emoji(item.clone()),
                category: category.tag.clone(),
                tint,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/catalog.rs"]
mod tests;
