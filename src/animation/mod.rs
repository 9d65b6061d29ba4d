pub(crate) mod ease;
pub(crate) mod logo;
pub(crate) mod particle;
pub(crate) mod seed;
