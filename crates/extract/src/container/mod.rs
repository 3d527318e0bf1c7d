//! Readers for metadata embedded in book containers.

pub(crate) mod epub;
pub(crate) mod pdf;
