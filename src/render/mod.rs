//! Frame composition (CPU-first).

/// Frame type handed to callers.
pub mod backend;
/// `vello_cpu` scene renderer.
pub mod cpu;
/// Perspective camera mapping world units to canvas pixels.
pub mod projection;
