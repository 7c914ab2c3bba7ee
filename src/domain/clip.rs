//! Animation clip references

use super::ids::AssetPath;
use serde::{Deserialize, Serialize};

/// Identifies a source animation clip in the project
///
/// Owned by the asset store; the exporter only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClipRef {
    /// Project-relative path of the clip asset
    pub path: AssetPath,

    /// Clip name (defaults to the file stem)
    pub name: String,

    /// Whether the clip is authored against the humanoid rig
    pub is_human_motion: bool,
}

impl AnimationClipRef {
    /// Creates a clip reference named after the file stem of `path`
    pub fn new(path: AssetPath, is_human_motion: bool) -> Self {
        let name = path.file_stem().to_string();
        Self {
            path,
            name,
            is_human_motion,
        }
    }

    /// Overrides the clip name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_name_defaults_to_stem() {
        let clip = AnimationClipRef::new(AssetPath::new("Assets/Clips/walk.anim").unwrap(), true);
        assert_eq!(clip.name, "walk");
        assert!(clip.is_human_motion);
    }

    #[test]
    fn test_clip_with_name() {
        let clip = AnimationClipRef::new(AssetPath::new("Assets/Clips/walk.anim").unwrap(), false)
            .with_name("Walk Cycle");
        assert_eq!(clip.name, "Walk Cycle");
    }
}
