//! Project asset store
//!
//! The exporter reads clips through the [`AssetDatabase`] trait.
//! [`FileSystemAssets`] implements it over a project directory on disk:
//! clip files are JSON clip documents carrying the humanoid flag.
//!
//! ```json
//! { "name": "Walk", "human_motion": true, "frame_rate": 30.0, "curves": [] }
//! ```
//!
//! Only `name` and `human_motion` are read here; the rest of the document
//! belongs to the converter.

use crate::core::paths::PathMapper;
use crate::domain::{AnimationClipRef, AppError, AssetPath, Result};
use serde::Deserialize;
use std::fs;
use walkdir::WalkDir;

/// Read access to the project's animation clip assets
pub trait AssetDatabase: Send + Sync {
    /// Whether `folder` exists and is a folder
    fn is_valid_folder(&self, folder: &AssetPath) -> bool;

    /// Lazily enumerates clip assets below `folder`, recursively
    ///
    /// Items are errors when part of the folder cannot be read.
    fn find_clip_assets<'a>(
        &'a self,
        folder: &AssetPath,
    ) -> Box<dyn Iterator<Item = Result<AssetPath>> + 'a>;

    /// Loads the clip stored at `path`
    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClipRef>;
}

#[derive(Debug, Deserialize)]
struct ClipDocument {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    human_motion: bool,
}

/// Asset store backed by the project directory
#[derive(Debug, Clone)]
pub struct FileSystemAssets {
    paths: PathMapper,
    clip_extensions: Vec<String>,
}

impl FileSystemAssets {
    /// Creates a store over the mapper's asset root
    ///
    /// `clip_extensions` are matched case-insensitively, with or without a
    /// leading dot.
    pub fn new(paths: PathMapper, clip_extensions: &[String]) -> Self {
        let clip_extensions = clip_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        Self {
            paths,
            clip_extensions,
        }
    }

    fn is_clip_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.clip_extensions.iter().any(|wanted| *wanted == ext)
            })
            .unwrap_or(false)
    }
}

impl AssetDatabase for FileSystemAssets {
    fn is_valid_folder(&self, folder: &AssetPath) -> bool {
        self.paths
            .to_absolute(folder)
            .map(|path| path.is_dir())
            .unwrap_or(false)
    }

    fn find_clip_assets<'a>(
        &'a self,
        folder: &AssetPath,
    ) -> Box<dyn Iterator<Item = Result<AssetPath>> + 'a> {
        let root = match self.paths.to_absolute(folder) {
            Ok(root) => root,
            Err(e) => return Box::new(std::iter::once(Err(e.into()))),
        };

        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_clip_file(entry.path()) {
                        Some(
                            self.paths
                                .to_project_relative(entry.path())
                                .map_err(AppError::from),
                        )
                    } else {
                        None
                    }
                }
                Err(e) => Some(Err(AppError::Asset(format!(
                    "Failed to read folder entry: {e}"
                )))),
            });

        Box::new(entries)
    }

    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClipRef> {
        let absolute = self.paths.to_absolute(path)?;
        let contents = fs::read_to_string(&absolute)
            .map_err(|e| AppError::Asset(format!("Failed to read clip {path}: {e}")))?;

        let document: ClipDocument = serde_json::from_str(&contents)
            .map_err(|e| AppError::Asset(format!("Failed to parse clip {path}: {e}")))?;

        let clip = AnimationClipRef::new(path.clone(), document.human_motion);
        Ok(match document.name {
            Some(name) if !name.trim().is_empty() => clip.with_name(name),
            _ => clip,
        })
    }
}
