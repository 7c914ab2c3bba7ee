//! Expression vocabulary, definitions and the blend-shape index
//!
//! Expressions follow the VRM 1.0 vocabulary: a fixed set of presets plus
//! custom expressions identified by the name of their defining clip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Standard expression presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionPreset {
    Happy,
    Angry,
    Sad,
    Relaxed,
    Surprised,
    Aa,
    Ih,
    Ou,
    Ee,
    Oh,
    Blink,
    BlinkLeft,
    BlinkRight,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    Neutral,
    /// Not a preset: the expression is identified by its clip name
    Custom,
}

impl ExpressionPreset {
    /// All presets, in VRM declaration order
    pub const ALL: [ExpressionPreset; 19] = [
        ExpressionPreset::Happy,
        ExpressionPreset::Angry,
        ExpressionPreset::Sad,
        ExpressionPreset::Relaxed,
        ExpressionPreset::Surprised,
        ExpressionPreset::Aa,
        ExpressionPreset::Ih,
        ExpressionPreset::Ou,
        ExpressionPreset::Ee,
        ExpressionPreset::Oh,
        ExpressionPreset::Blink,
        ExpressionPreset::BlinkLeft,
        ExpressionPreset::BlinkRight,
        ExpressionPreset::LookUp,
        ExpressionPreset::LookDown,
        ExpressionPreset::LookLeft,
        ExpressionPreset::LookRight,
        ExpressionPreset::Neutral,
        ExpressionPreset::Custom,
    ];

    /// Name used in VRM documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionPreset::Happy => "happy",
            ExpressionPreset::Angry => "angry",
            ExpressionPreset::Sad => "sad",
            ExpressionPreset::Relaxed => "relaxed",
            ExpressionPreset::Surprised => "surprised",
            ExpressionPreset::Aa => "aa",
            ExpressionPreset::Ih => "ih",
            ExpressionPreset::Ou => "ou",
            ExpressionPreset::Ee => "ee",
            ExpressionPreset::Oh => "oh",
            ExpressionPreset::Blink => "blink",
            ExpressionPreset::BlinkLeft => "blinkLeft",
            ExpressionPreset::BlinkRight => "blinkRight",
            ExpressionPreset::LookUp => "lookUp",
            ExpressionPreset::LookDown => "lookDown",
            ExpressionPreset::LookLeft => "lookLeft",
            ExpressionPreset::LookRight => "lookRight",
            ExpressionPreset::Neutral => "neutral",
            ExpressionPreset::Custom => "custom",
        }
    }
}

impl fmt::Display for ExpressionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpressionPreset::ALL
            .iter()
            .copied()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown expression preset: {s}"))
    }
}

/// Identifier of an expression: a preset, or a custom name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionKey {
    Preset(ExpressionPreset),
    Custom(String),
}

impl ExpressionKey {
    /// Key for a preset expression
    pub fn preset(preset: ExpressionPreset) -> Self {
        ExpressionKey::Preset(preset)
    }

    /// Key for a custom expression named after its clip
    pub fn custom(name: impl Into<String>) -> Self {
        ExpressionKey::Custom(name.into())
    }

    /// Whether this key refers to a standard preset
    pub fn is_preset(&self) -> bool {
        matches!(self, ExpressionKey::Preset(_))
    }

    pub fn name(&self) -> &str {
        match self {
            ExpressionKey::Preset(preset) => preset.as_str(),
            ExpressionKey::Custom(name) => name,
        }
    }
}

impl fmt::Display for ExpressionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionKey::Preset(preset) => write!(f, "{preset}"),
            ExpressionKey::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// Serialized as the preset's camelCase name or the custom name
impl Serialize for ExpressionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Binding from an expression to one blend shape of a skinned mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphTargetBinding {
    /// Path of the mesh node relative to the avatar root
    pub relative_path: String,

    /// Blend shape index on that mesh
    pub index: usize,

    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// Clip describing how an expression deforms the avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionClip {
    pub name: String,

    #[serde(default)]
    pub morph_target_bindings: Vec<MorphTargetBinding>,
}

/// One expression slot of the avatar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDefinition {
    pub preset: ExpressionPreset,

    #[serde(default)]
    pub clip: Option<ExpressionClip>,
}

impl ExpressionDefinition {
    /// Resolves the key: the preset itself, or the clip name for custom slots
    ///
    /// Returns `None` when the slot has no clip.
    pub fn key(&self) -> Option<ExpressionKey> {
        let clip = self.clip.as_ref()?;
        Some(match self.preset {
            ExpressionPreset::Custom => ExpressionKey::custom(clip.name.clone()),
            preset => ExpressionKey::preset(preset),
        })
    }

    /// First morph target binding, if any
    pub fn first_binding(&self) -> Option<&MorphTargetBinding> {
        self.clip.as_ref()?.morph_target_bindings.first()
    }
}

/// Mapping from blend-shape name to expression key
///
/// Keys are unique and keep insertion order; the first registered mapping
/// for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpressionIndex {
    entries: IndexMap<String, ExpressionKey>,
}

impl ExpressionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping unless the blend-shape name is already present
    ///
    /// Returns `true` if the mapping was inserted.
    pub fn insert(&mut self, blend_shape: impl Into<String>, key: ExpressionKey) -> bool {
        let blend_shape = blend_shape.into();
        if self.entries.contains_key(&blend_shape) {
            return false;
        }
        self.entries.insert(blend_shape, key);
        true
    }

    pub fn get(&self, blend_shape: &str) -> Option<&ExpressionKey> {
        self.entries.get(blend_shape)
    }

    pub fn contains(&self, blend_shape: &str) -> bool {
        self.entries.contains_key(blend_shape)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpressionKey)> {
        self.entries.iter().map(|(name, key)| (name.as_str(), key))
    }
}
