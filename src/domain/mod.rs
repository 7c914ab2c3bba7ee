//! Domain models and types for the VRMA batch exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated paths** ([`AssetPath`])
//! - **Clips** ([`AnimationClipRef`])
//! - **Expressions** ([`ExpressionPreset`], [`ExpressionKey`], [`ExpressionIndex`])
//! - **Avatars and rigs** ([`AvatarDefinition`], [`ReferenceRig`])
//! - **Error types** ([`AppError`], [`PathError`], [`ConversionError`], [`ResolutionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Project-relative paths are wrapped in [`AssetPath`], which normalizes
//! separators and rejects absolute or escaping paths:
//!
//! ```rust
//! use vrma_batch::domain::AssetPath;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let clip = AssetPath::new("Assets\\Animations\\Clip\\walk.anim")?;
//! assert_eq!(clip.as_str(), "Assets/Animations/Clip/walk.anim");
//! assert!(AssetPath::new("../outside").is_err());
//! # Ok(())
//! # }
//! ```

pub mod avatar;
pub mod clip;
pub mod errors;
pub mod expression;
pub mod ids;
pub mod result;
pub mod rig;

// Re-export commonly used types for convenience
pub use avatar::{AvatarDefinition, SceneNode, SkinnedMesh};
pub use clip::AnimationClipRef;
pub use errors::{AppError, ConversionError, PathError, ResolutionError};
pub use expression::{
    ExpressionClip, ExpressionDefinition, ExpressionIndex, ExpressionKey, ExpressionPreset,
    MorphTargetBinding,
};
pub use ids::AssetPath;
pub use result::Result;
pub use rig::{ReferenceRig, RigBone, RigSource};
