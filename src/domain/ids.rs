//! Domain path types with validation
//!
//! This module provides the [`AssetPath`] newtype: a project-relative path
//! that always uses `/` as separator, e.g. `Assets/Animations/Clip/walk.anim`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project-relative asset path newtype wrapper
///
/// Separators are normalized to `/`, empty and `.` segments are dropped and
/// trailing separators removed. Absolute paths and `..` segments are
/// rejected.
///
/// # Examples
///
/// ```
/// use vrma_batch::domain::ids::AssetPath;
/// use std::str::FromStr;
///
/// let path = AssetPath::from_str("Assets\\Animations\\walk.anim").unwrap();
/// assert_eq!(path.as_str(), "Assets/Animations/walk.anim");
/// assert_eq!(path.extension(), Some("anim"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPath(String);

impl AssetPath {
    /// Creates a new AssetPath from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(AssetPath)` if the path is a valid relative path, `Err` otherwise
    pub fn new(path: impl Into<String>) -> Result<Self, String> {
        let raw = path.into();
        let unified = raw.replace('\\', "/");

        if unified.trim().is_empty() {
            return Err("Asset path cannot be empty".to_string());
        }
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(format!("Asset path must be relative, got: {raw}"));
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(format!(
                        "Asset path cannot contain '..' segments, got: {raw}"
                    ))
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return Err(format!("Asset path has no segments: {raw}"));
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the asset path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Iterates over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Last segment of the path
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name without its extension
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }

    /// Extension of the last segment, without the dot
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&name[dot + 1..]),
        }
    }

    /// Parent folder, if the path has more than one segment
    pub fn parent(&self) -> Option<AssetPath> {
        self.0
            .rfind('/')
            .map(|slash| AssetPath(self.0[..slash].to_string()))
    }

    /// Returns a copy with the last segment's extension replaced
    ///
    /// `extension` may be given with or without a leading dot. An empty
    /// extension removes the existing one.
    pub fn with_extension(&self, extension: &str) -> AssetPath {
        let extension = extension.trim_start_matches('.');
        let stem_len = self.0.len() - self.file_name().len() + self.file_stem().len();
        let stem = &self.0[..stem_len];
        if extension.is_empty() {
            AssetPath(stem.to_string())
        } else {
            AssetPath(format!("{stem}.{extension}"))
        }
    }

    /// Appends a relative path below this one
    pub fn join(&self, relative: &str) -> Result<AssetPath, String> {
        AssetPath::new(format!("{}/{}", self.0, relative))
    }

    /// Whether `folder` is this path or one of its ancestors (segment-wise)
    pub fn starts_with(&self, folder: &AssetPath) -> bool {
        self.strip_folder(folder).is_some() || self == folder
    }

    /// Remainder of this path below `folder`, compared segment-wise
    ///
    /// Returns `None` when `folder` is not a strict ancestor, so
    /// `Assets/Clips2/a.anim` is not considered to be inside `Assets/Clips`.
    pub fn strip_folder(&self, folder: &AssetPath) -> Option<&str> {
        let rest = self.0.strip_prefix(folder.as_str())?;
        let rest = rest.strip_prefix('/')?;
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetPath> for String {
    fn from(path: AssetPath) -> Self {
        path.0
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
