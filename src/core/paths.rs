//! Mapping between filesystem paths and project asset paths
//!
//! Asset paths start with the asset root folder name (`Assets`) and use `/`
//! separators. The mapper converts between those and absolute filesystem
//! paths, and derives output paths for exported clips.

use crate::domain::{AssetPath, PathError};
use std::path::{Component, Path, PathBuf};

/// Converts between filesystem paths and project-relative asset paths
#[derive(Debug, Clone)]
pub struct PathMapper {
    asset_root: PathBuf,
    asset_root_name: String,
}

impl PathMapper {
    /// Creates a mapper for the asset root directory `asset_root`
    ///
    /// The asset root name is the last component of `asset_root`
    /// (`Assets` for `/project/Assets`).
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        let asset_root = asset_root.into();
        let asset_root_name = asset_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Assets".to_string());
        Self {
            asset_root,
            asset_root_name,
        }
    }

    /// Creates a mapper for `project_root/asset_root_name`
    pub fn for_project(project_root: impl AsRef<Path>, asset_root_name: &str) -> Self {
        Self {
            asset_root: project_root.as_ref().join(asset_root_name),
            asset_root_name: asset_root_name.to_string(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn asset_root_name(&self) -> &str {
        &self.asset_root_name
    }

    /// Maps an absolute path to an asset path
    ///
    /// Succeeds only if `absolute_path` is the asset root or lies below it
    /// (compared component-wise). Rejected paths are returned untouched in
    /// the error.
    pub fn to_project_relative(&self, absolute_path: &Path) -> Result<AssetPath, PathError> {
        let outside = || PathError::OutsideProjectRoot(absolute_path.display().to_string());

        if has_parent_components(absolute_path) {
            return Err(outside());
        }

        let rest = absolute_path
            .strip_prefix(&self.asset_root)
            .map_err(|_| outside())?;

        let mut relative = self.asset_root_name.clone();
        for component in rest.components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            let segment = segment.to_str().ok_or_else(|| {
                PathError::InvalidAssetPath(absolute_path.display().to_string())
            })?;
            relative.push('/');
            relative.push_str(segment);
        }

        AssetPath::new(relative).map_err(PathError::InvalidAssetPath)
    }

    /// Maps an asset path back to a filesystem path
    pub fn to_absolute(&self, asset_path: &AssetPath) -> Result<PathBuf, PathError> {
        let mut segments = asset_path.segments();
        if segments.next() != Some(self.asset_root_name.as_str()) {
            return Err(PathError::OutsideProjectRoot(asset_path.to_string()));
        }

        let mut absolute = self.asset_root.clone();
        for segment in segments {
            absolute.push(segment);
        }
        Ok(absolute)
    }

    /// Whether an asset path lies within the asset root
    pub fn is_within_asset_root(&self, asset_path: &AssetPath) -> bool {
        asset_path.segments().next() == Some(self.asset_root_name.as_str())
    }

    /// Resolves a folder chosen by the user to an asset path
    ///
    /// Absolute folders are mapped with [`PathMapper::to_project_relative`]
    /// and must lie within the asset root; anything else is read as an
    /// asset path.
    pub fn resolve_folder(&self, folder: &str) -> Result<AssetPath, PathError> {
        let path = Path::new(folder);
        if path.is_absolute() {
            return self.to_project_relative(path);
        }
        AssetPath::new(folder).map_err(PathError::InvalidAssetPath)
    }
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// Derives the output path of an exported clip
///
/// Replaces the `input_folder` prefix of `source` with `output_folder` and
/// the extension with `new_extension` (leading dot optional). Pure: the
/// result depends only on the arguments.
///
/// # Examples
///
/// ```
/// use vrma_batch::core::paths::map_output_path;
/// use vrma_batch::domain::AssetPath;
///
/// let source = AssetPath::new("Assets/Clip/Run/fast.anim").unwrap();
/// let input = AssetPath::new("Assets/Clip").unwrap();
/// let output = AssetPath::new("Assets/Vrma").unwrap();
///
/// let mapped = map_output_path(&source, &input, &output, "vrma").unwrap();
/// assert_eq!(mapped.as_str(), "Assets/Vrma/Run/fast.vrma");
/// ```
pub fn map_output_path(
    source: &AssetPath,
    input_folder: &AssetPath,
    output_folder: &AssetPath,
    new_extension: &str,
) -> Result<AssetPath, PathError> {
    let relative = source
        .strip_folder(input_folder)
        .ok_or_else(|| PathError::OutsideFolder {
            path: source.to_string(),
            folder: input_folder.to_string(),
        })?;

    let mapped = output_folder
        .join(relative)
        .map_err(PathError::InvalidAssetPath)?;

    Ok(mapped.with_extension(new_extension))
}
