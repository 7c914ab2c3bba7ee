//! Humanoid bone maps used to build reference avatars
//!
//! A [`ReferenceRig`] is the bone hierarchy handed to the converter when it
//! creates a reference avatar. It comes either from the built-in standard
//! T-pose or from the humanoid bones of a source avatar.

use super::avatar::AvatarDefinition;
use super::errors::AppError;
use super::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bones every humanoid avatar must assign
pub const REQUIRED_HUMAN_BONES: [&str; 15] = [
    "hips",
    "spine",
    "head",
    "leftUpperArm",
    "leftLowerArm",
    "leftHand",
    "rightUpperArm",
    "rightLowerArm",
    "rightHand",
    "leftUpperLeg",
    "leftLowerLeg",
    "leftFoot",
    "rightUpperLeg",
    "rightLowerLeg",
    "rightFoot",
];

// (bone, parent, local translation in meters), parents listed before children
const STANDARD_SKELETON: [(&str, Option<&str>, [f32; 3]); 23] = [
    ("hips", None, [0.0, 0.95, 0.0]),
    ("spine", Some("hips"), [0.0, 0.10, 0.0]),
    ("chest", Some("spine"), [0.0, 0.12, 0.0]),
    ("upperChest", Some("chest"), [0.0, 0.12, 0.0]),
    ("neck", Some("upperChest"), [0.0, 0.12, 0.0]),
    ("head", Some("neck"), [0.0, 0.10, 0.0]),
    ("leftShoulder", Some("upperChest"), [0.02, 0.10, 0.0]),
    ("leftUpperArm", Some("leftShoulder"), [0.08, 0.0, 0.0]),
    ("leftLowerArm", Some("leftUpperArm"), [0.25, 0.0, 0.0]),
    ("leftHand", Some("leftLowerArm"), [0.24, 0.0, 0.0]),
    ("rightShoulder", Some("upperChest"), [-0.02, 0.10, 0.0]),
    ("rightUpperArm", Some("rightShoulder"), [-0.08, 0.0, 0.0]),
    ("rightLowerArm", Some("rightUpperArm"), [-0.25, 0.0, 0.0]),
    ("rightHand", Some("rightLowerArm"), [-0.24, 0.0, 0.0]),
    ("leftUpperLeg", Some("hips"), [0.08, -0.05, 0.0]),
    ("leftLowerLeg", Some("leftUpperLeg"), [0.0, -0.42, 0.0]),
    ("leftFoot", Some("leftLowerLeg"), [0.0, -0.42, 0.0]),
    ("leftToes", Some("leftFoot"), [0.0, -0.05, 0.12]),
    ("rightUpperLeg", Some("hips"), [-0.08, -0.05, 0.0]),
    ("rightLowerLeg", Some("rightUpperLeg"), [0.0, -0.42, 0.0]),
    ("rightFoot", Some("rightLowerLeg"), [0.0, -0.42, 0.0]),
    ("rightToes", Some("rightFoot"), [0.0, -0.05, 0.12]),
    ("jaw", Some("head"), [0.0, 0.02, 0.05]),
];

/// Where the reference avatar's bone map comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigSource {
    /// Built-in standard T-pose
    #[default]
    Standard,
    /// Humanoid bones of the configured source avatar
    Avatar,
}

impl fmt::Display for RigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigSource::Standard => f.write_str("standard"),
            RigSource::Avatar => f.write_str("avatar"),
        }
    }
}

impl FromStr for RigSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(RigSource::Standard),
            "avatar" => Ok(RigSource::Avatar),
            _ => Err(format!(
                "Invalid reference rig '{s}'. Must be one of: standard, avatar"
            )),
        }
    }
}

/// One bone of a reference rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigBone {
    pub bone: String,
    pub parent: Option<String>,
    pub local_position: [f32; 3],
}

/// Bone hierarchy with local rest poses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRig {
    pub source: RigSource,
    pub bones: Vec<RigBone>,
}

impl ReferenceRig {
    /// The built-in standard humanoid rest pose
    pub fn standard() -> Self {
        let bones = STANDARD_SKELETON
            .iter()
            .map(|(bone, parent, position)| RigBone {
                bone: (*bone).to_string(),
                parent: parent.map(str::to_string),
                local_position: *position,
            })
            .collect();

        Self {
            source: RigSource::Standard,
            bones,
        }
    }

    /// Rig built from the humanoid bones assigned on a source avatar
    ///
    /// Parents follow the standard hierarchy, skipping bones the avatar does
    /// not assign. Local positions come from the assigned nodes.
    pub fn from_avatar(avatar: &AvatarDefinition) -> Result<Self> {
        avatar
            .validate_humanoid()
            .map_err(AppError::Configuration)?;

        let mut bones = Vec::new();
        for (bone, _, _) in STANDARD_SKELETON.iter() {
            let Some(node) = avatar.bone_node(bone) else {
                continue;
            };

            let mut parent = standard_parent(bone);
            while let Some(candidate) = parent {
                if avatar.bone_node(candidate).is_some() {
                    break;
                }
                parent = standard_parent(candidate);
            }

            bones.push(RigBone {
                bone: (*bone).to_string(),
                parent: parent.map(str::to_string),
                local_position: node.translation,
            });
        }

        Ok(Self {
            source: RigSource::Avatar,
            bones,
        })
    }

    /// Looks up a bone by name
    pub fn bone(&self, name: &str) -> Option<&RigBone> {
        self.bones.iter().find(|bone| bone.bone == name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

fn standard_parent(bone: &str) -> Option<&'static str> {
    STANDARD_SKELETON
        .iter()
        .find(|(name, _, _)| *name == bone)
        .and_then(|(_, parent, _)| *parent)
}
