use std::collections::HashMap;

use crate::foundation::error::SequencerResult;
use crate::scene::catalog::AssetRef;

/// Resources are keyed by asset identity: elements showing the same asset share one texture.
pub type AssetKey = AssetRef;

/// Creates and releases the graphic resources a [`ResourceCache`] hands out.
pub trait ResourceFactory {
    /// Per-asset texture.
    type Texture;
    /// Geometry shared by every sprite.
    type Quad;

    /// Build the texture for `key`. Errors are cached as "absent" and never retried.
    fn create_texture(&mut self, key: &AssetKey) -> SequencerResult<Self::Texture>;

    /// Build the shared quad.
    fn create_quad(&mut self) -> Self::Quad;

    /// Release a texture. Called exactly once per created texture.
    fn dispose_texture(&mut self, key: &AssetKey, texture: Self::Texture);

    /// Release the shared quad. Called at most once.
    fn dispose_quad(&mut self, quad: Self::Quad);
}

/// Lifetime counters of a [`ResourceCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Textures successfully created.
    pub created: u64,
    /// Texture creations that failed.
    pub failed: u64,
    /// Textures released.
    pub disposed: u64,
    /// Lookups answered from the cache.
    pub hits: u64,
}

/// Create-on-miss texture cache plus one lazily created shared quad.
///
/// Owned by one renderer. [`ResourceCache::dispose`] releases everything exactly once; after that
/// every lookup returns `None`. Dropping the cache disposes it.
pub struct ResourceCache<F: ResourceFactory> {
    factory: F,
    textures: HashMap<AssetKey, Option<F::Texture>>,
    quad: Option<F::Quad>,
    disposed: bool,
    stats: CacheStats,
}

impl<F: ResourceFactory> ResourceCache<F> {
    /// An empty cache around `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            textures: HashMap::new(),
            quad: None,
            disposed: false,
            stats: CacheStats::default(),
        }
    }

    /// Texture for `key`, creating it on first use. `None` if creation failed or after dispose.
    pub fn get_or_create(&mut self, key: &AssetKey) -> Option<&F::Texture> {
        if self.disposed {
            return None;
        }
        if self.textures.contains_key(key) {
            self.stats.hits += 1;
        } else {
            let slot = match self.factory.create_texture(key) {
                Ok(t) => {
                    self.stats.created += 1;
                    tracing::debug!(asset = key.label(), "texture created");
                    Some(t)
                }
                Err(e) => {
                    self.stats.failed += 1;
                    tracing::warn!(asset = key.label(), error = %e, "texture unavailable; element skipped");
                    None
                }
            };
            self.textures.insert(key.clone(), slot);
        }
        self.textures.get(key).and_then(Option::as_ref)
    }

    /// Cached texture for `key` without creating it.
    pub fn get(&self, key: &AssetKey) -> Option<&F::Texture> {
        self.textures.get(key).and_then(Option::as_ref)
    }

    /// The shared quad, created on first use. `None` after dispose.
    pub fn shared_quad(&mut self) -> Option<&F::Quad> {
        if self.disposed {
            return None;
        }
        if self.quad.is_none() {
            self.quad = Some(self.factory.create_quad());
        }
        self.quad.as_ref()
    }

    /// Release every resource. Returns the number of textures released; zero on repeat calls.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;

        let mut released = 0;
        for (key, slot) in self.textures.drain() {
            if let Some(texture) = slot {
                self.factory.dispose_texture(&key, texture);
                released += 1;
            }
        }
        if let Some(quad) = self.quad.take() {
            self.factory.dispose_quad(quad);
        }
        self.stats.disposed += released as u64;
        tracing::debug!(released, "resource cache disposed");
        released
    }

    /// Whether [`ResourceCache::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of keys seen, including failed ones.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no key has been looked up yet (or the cache was disposed).
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Lifetime counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The underlying factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: ResourceFactory> Drop for ResourceCache<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
