//! Source avatar description
//!
//! An avatar description is a JSON document exported from the authoring
//! tool. It lists the humanoid bone assignment, the scene nodes (with their
//! skinned meshes and blend shape names) and the expression slots.
//!
//! ```json
//! {
//!   "name": "Alicia",
//!   "humanoid_bones": { "hips": "Armature/Hips", "head": "Armature/Hips/Spine/Head" },
//!   "nodes": [
//!     { "path": "Armature/Hips", "translation": [0.0, 0.95, 0.0] },
//!     { "path": "Face", "skinned_mesh": { "blend_shapes": ["Fcl_ALL_Joy", "Fcl_EYE_Close"] } }
//!   ],
//!   "expressions": [
//!     { "preset": "happy", "clip": { "name": "Joy", "morph_target_bindings": [
//!         { "relative_path": "Face", "index": 0 } ] } }
//!   ]
//! }
//! ```

use super::errors::{AppError, ResolutionError};
use super::expression::{ExpressionDefinition, MorphTargetBinding};
use super::rig::REQUIRED_HUMAN_BONES;
use super::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Skinned mesh attached to a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinnedMesh {
    /// Blend shape names, indexed by blend shape index
    #[serde(default)]
    pub blend_shapes: Vec<String>,
}

/// Node of the avatar hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Path relative to the avatar root, `/` separated
    pub path: String,

    /// Local translation in meters
    #[serde(default)]
    pub translation: [f32; 3],

    #[serde(default)]
    pub skinned_mesh: Option<SkinnedMesh>,
}

/// Avatar description used by the expression-aware flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDefinition {
    pub name: String,

    /// Humanoid bone name (VRM naming) to node path
    #[serde(default)]
    pub humanoid_bones: BTreeMap<String, String>,

    #[serde(default)]
    pub nodes: Vec<SceneNode>,

    #[serde(default)]
    pub expressions: Vec<ExpressionDefinition>,
}

impl AvatarDefinition {
    /// Loads an avatar description from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppError::Configuration(format!(
                "Avatar description not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read avatar description {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to parse avatar description {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Finds a node by path; leading and trailing separators are ignored
    pub fn find_node(&self, relative_path: &str) -> Option<&SceneNode> {
        let wanted = normalize_node_path(relative_path);
        self.nodes
            .iter()
            .find(|node| normalize_node_path(&node.path) == wanted)
    }

    /// Node path assigned to a humanoid bone
    pub fn bone_node(&self, bone: &str) -> Option<&SceneNode> {
        self.humanoid_bones
            .get(bone)
            .and_then(|path| self.find_node(path))
    }

    /// Resolves the blend shape name targeted by a binding
    pub fn blend_shape_name(
        &self,
        binding: &MorphTargetBinding,
    ) -> std::result::Result<&str, ResolutionError> {
        let node = self
            .find_node(&binding.relative_path)
            .ok_or_else(|| ResolutionError::NodeNotFound(binding.relative_path.clone()))?;

        let mesh = node
            .skinned_mesh
            .as_ref()
            .ok_or_else(|| ResolutionError::NoSkinnedMesh(binding.relative_path.clone()))?;

        mesh.blend_shapes
            .get(binding.index)
            .map(String::as_str)
            .ok_or_else(|| ResolutionError::BlendShapeIndexOutOfRange {
                path: binding.relative_path.clone(),
                index: binding.index,
                count: mesh.blend_shapes.len(),
            })
    }

    /// Required humanoid bones that are not assigned to an existing node
    pub fn missing_required_bones(&self) -> Vec<&'static str> {
        REQUIRED_HUMAN_BONES
            .iter()
            .copied()
            .filter(|bone| self.bone_node(bone).is_none())
            .collect()
    }

    /// Validates that the avatar can drive a humanoid export
    pub fn validate_humanoid(&self) -> std::result::Result<(), String> {
        let missing = self.missing_required_bones();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "Avatar '{}' is not a valid humanoid, missing bones: {}",
                self.name,
                missing.join(", ")
            ))
        }
    }
}

fn normalize_node_path(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rig::tests::humanoid_avatar;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    #[test]
    fn test_blend_shape_resolution() {
        let avatar = humanoid_avatar();
        let binding = MorphTargetBinding {
            relative_path: "/Face/".to_string(),
            index: 1,
            weight: 1.0,
        };
        assert_eq!(avatar.blend_shape_name(&binding).unwrap(), "Fcl_EYE_Close");
    }

    #[test]
    fn test_blend_shape_resolution_errors() {
        let avatar = humanoid_avatar();

        let missing = MorphTargetBinding {
            relative_path: "Glasses".to_string(),
            index: 0,
            weight: 1.0,
        };
        assert_eq!(
            avatar.blend_shape_name(&missing),
            Err(ResolutionError::NodeNotFound("Glasses".to_string()))
        );

        let no_mesh = MorphTargetBinding {
            relative_path: "Armature/hips".to_string(),
            index: 0,
            weight: 1.0,
        };
        assert!(matches!(
            avatar.blend_shape_name(&no_mesh),
            Err(ResolutionError::NoSkinnedMesh(_))
        ));

        let out_of_range = MorphTargetBinding {
            relative_path: "Face".to_string(),
            index: 99,
            weight: 1.0,
        };
        assert!(matches!(
            avatar.blend_shape_name(&out_of_range),
            Err(ResolutionError::BlendShapeIndexOutOfRange { index: 99, .. })
        ));
    }

    #[test]
    fn test_validate_humanoid() {
        let mut avatar = humanoid_avatar();
        assert!(avatar.validate_humanoid().is_ok());

        avatar.humanoid_bones.remove("hips");
        let err = avatar.validate_humanoid().unwrap_err();
        assert!(err.contains("hips"));
    }

    #[test_case("spine")]
    #[test_case("head")]
    #[test_case("leftFoot")]
    #[test_case("rightHand")]
    fn test_validate_humanoid_requires_every_bone(bone: &str) {
        let mut avatar = humanoid_avatar();
        avatar.humanoid_bones.remove(bone);

        assert_eq!(avatar.missing_required_bones(), vec![bone]);
        assert!(avatar.validate_humanoid().unwrap_err().contains(bone));
    }

    #[test]
    fn test_validate_humanoid_rejects_dangling_bone_node() {
        let mut avatar = humanoid_avatar();
        avatar.nodes.retain(|node| node.path != "Armature/leftLowerLeg");

        assert_eq!(avatar.missing_required_bones(), vec!["leftLowerLeg"]);
    }

    #[test]
    fn test_from_file() {
        let json = serde_json::to_string(&humanoid_avatar()).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let loaded = AvatarDefinition::from_file(file.path()).unwrap();
        assert_eq!(loaded, humanoid_avatar());
    }

    #[test]
    fn test_from_file_missing_or_invalid() {
        assert!(matches!(
            AvatarDefinition::from_file("does/not/exist.json"),
            Err(AppError::Configuration(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            AvatarDefinition::from_file(file.path()),
            Err(AppError::Configuration(_))
        ));
    }
}
