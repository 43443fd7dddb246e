//! Access token values returned by the FlexMLS token endpoint.

pub mod record;
pub mod secret;
