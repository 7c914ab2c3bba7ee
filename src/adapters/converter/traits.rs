//! Converter abstraction traits
//!
//! This module defines the trait a clip-to-VRMA converter must implement to
//! be driven by the batch exporter.

use crate::domain::{AnimationClipRef, ConversionError, ExpressionIndex, ReferenceRig};

/// Clip-to-VRMA converter
///
/// The converter owns humanoid retargeting and VRMA serialization. The
/// exporter only creates one reference avatar per clip, hands it the clip,
/// and releases the avatar afterwards.
pub trait VrmaConverter {
    /// Transient reference avatar built from a bone map
    type Avatar;

    /// Builds a reference avatar for `rig`
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::AvatarCreationFailed`] if the avatar cannot
    /// be built.
    fn create_reference_avatar(&self, rig: &ReferenceRig)
        -> Result<Self::Avatar, ConversionError>;

    /// Releases a reference avatar
    ///
    /// Must not fail; cleanup problems are logged by the implementation.
    fn destroy_reference_avatar(&self, avatar: Self::Avatar);

    /// Converts one clip to VRMA bytes
    ///
    /// # Arguments
    ///
    /// * `avatar` - Reference avatar the clip is retargeted onto
    /// * `clip` - Humanoid clip to convert
    /// * `expressions` - Blend-shape to expression mapping, in the expression-aware flow
    ///
    /// # Errors
    ///
    /// Returns an error if the clip is malformed, its bones cannot be mapped,
    /// or the converter fails.
    fn convert(
        &self,
        avatar: &Self::Avatar,
        clip: &AnimationClipRef,
        expressions: Option<&ExpressionIndex>,
    ) -> Result<Vec<u8>, ConversionError>;
}
