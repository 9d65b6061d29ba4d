pub(crate) mod phase;
pub(crate) mod phase_clock;
pub(crate) mod timer;
