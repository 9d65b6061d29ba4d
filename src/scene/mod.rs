/// Sprite catalog and element composition.
pub mod catalog;
/// JSON-facing configuration.
pub mod config;
