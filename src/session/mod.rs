//! Mount lifecycle tying clock, animators, overlay and renderer together.

/// The hero session and its inspection snapshots.
pub mod hero;
