/// Handoff dot between the particle field and the logo.
pub mod handoff;
/// Call-to-action reveal and its entrance choreography.
pub mod reveal;
