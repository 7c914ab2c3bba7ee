//! Clip-to-VRMA converters
//!
//! The exporter drives conversion through the [`VrmaConverter`] trait.
//! [`ExternalToolConverter`] runs a configured converter program.

pub mod external;
pub mod traits;

pub use external::{ExternalToolConverter, ScratchAvatar};
pub use traits::VrmaConverter;
