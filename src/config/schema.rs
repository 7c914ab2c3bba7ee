//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::core::paths::PathMapper;
use crate::domain::{AssetPath, PathError, RigSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Project layout
    #[serde(default)]
    pub project: ProjectConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// External converter settings
    pub converter: ConverterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BatchConfig {
    /// Validates the configuration
    ///
    /// Only checks the configuration values themselves. Whether the folders
    /// exist is checked when a run starts.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.project.validate()?;
        self.export.validate(&self.project)?;
        self.converter.validate(&self.export)?;
        self.logging.validate()?;
        Ok(())
    }

    /// Absolute-or-relative filesystem path of the asset root
    pub fn asset_root(&self) -> PathBuf {
        self.project.root.join(&self.project.asset_root_name)
    }

    /// Path mapper over the configured asset root
    pub fn path_mapper(&self) -> PathMapper {
        self.project.path_mapper()
    }

    /// Input folder as an asset path
    ///
    /// An absolute folder is mapped into the asset root.
    pub fn input_folder(&self) -> Result<AssetPath, String> {
        self.export.resolve_folder(&self.project, "export.input_folder", &self.export.input_folder)
    }

    /// Output folder as an asset path
    ///
    /// An absolute folder is mapped into the asset root.
    pub fn output_folder(&self) -> Result<AssetPath, String> {
        self.export
            .resolve_folder(&self.project, "export.output_folder", &self.export.output_folder)
    }

    /// Filesystem path of the avatar description, resolved against the project root
    pub fn avatar_path(&self) -> Option<PathBuf> {
        self.export
            .avatar
            .as_ref()
            .map(|avatar| self.project.root.join(avatar))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (discover and map paths, never convert or write)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project directory
    #[serde(default = "default_project_root")]
    pub root: PathBuf,

    /// Name of the asset root folder below the project directory
    #[serde(default = "default_asset_root_name")]
    pub asset_root_name: String,
}

impl ProjectConfig {
    fn path_mapper(&self) -> PathMapper {
        PathMapper::for_project(&self.root, &self.asset_root_name)
    }

    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("project.root cannot be empty".to_string());
        }

        let name = self.asset_root_name.as_str();
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(format!(
                "project.asset_root_name must be a single folder name, got '{name}'"
            ));
        }
        Ok(())
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_project_root(),
            asset_root_name: default_asset_root_name(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Folder scanned for clips (asset path)
    #[serde(default = "default_input_folder")]
    pub input_folder: String,

    /// Folder receiving the VRMA files (asset path)
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// File extensions treated as clip assets
    #[serde(default = "default_clip_extensions")]
    pub clip_extensions: Vec<String>,

    /// Extension of exported files
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Build an expression index from the avatar and pass it to the converter
    #[serde(default)]
    pub expression_mapping: bool,

    /// Avatar description file, relative to the project root
    #[serde(default)]
    pub avatar: Option<String>,

    /// Re-read written files and compare checksums after the run
    #[serde(default)]
    pub verify_outputs: bool,
}

impl ExportConfig {
    fn validate(&self, project: &ProjectConfig) -> Result<(), String> {
        self.resolve_folder(project, "export.input_folder", &self.input_folder)?;
        self.resolve_folder(project, "export.output_folder", &self.output_folder)?;

        if self.clip_extensions.is_empty() {
            return Err("export.clip_extensions cannot be empty".to_string());
        }
        if self
            .clip_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err("export.clip_extensions cannot contain empty extensions".to_string());
        }

        let output_extension = self.output_extension.trim_start_matches('.');
        if output_extension.is_empty() || output_extension.contains('/') {
            return Err(format!(
                "Invalid export.output_extension '{}'",
                self.output_extension
            ));
        }

        if self.expression_mapping && self.avatar.is_none() {
            return Err(
                "export.avatar is required when export.expression_mapping = true".to_string(),
            );
        }

        Ok(())
    }

    fn resolve_folder(
        &self,
        project: &ProjectConfig,
        field: &str,
        value: &str,
    ) -> Result<AssetPath, String> {
        let inside = || {
            format!(
                "{field} must be inside the '{}' folder, got '{value}'",
                project.asset_root_name
            )
        };

        let path = project
            .path_mapper()
            .resolve_folder(value)
            .map_err(|e| match e {
                PathError::OutsideProjectRoot(_) => inside(),
                e => format!("{field}: {e}"),
            })?;
        if path.segments().next() != Some(project.asset_root_name.as_str()) {
            return Err(inside());
        }
        Ok(path)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_folder: default_input_folder(),
            output_folder: default_output_folder(),
            clip_extensions: default_clip_extensions(),
            output_extension: default_output_extension(),
            expression_mapping: false,
            avatar: None,
            verify_outputs: false,
        }
    }
}

/// External converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Converter program
    pub program: String,

    /// Arguments; `{avatar}`, `{clip}`, `{clip_name}` and `{expressions}`
    /// are substituted. Without placeholders the default flags are appended.
    #[serde(default)]
    pub args: Vec<String>,

    /// Where the reference avatar bone map comes from
    #[serde(default)]
    pub reference_rig: RigSource,

    /// Directory for reference avatar scratch workspaces (system temp if unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl ConverterConfig {
    fn validate(&self, export: &ExportConfig) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("converter.program cannot be empty".to_string());
        }

        if self.reference_rig == RigSource::Avatar && export.avatar.is_none() {
            return Err(
                "export.avatar is required when converter.reference_rig = 'avatar'".to_string(),
            );
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Console-only logging, used before a configuration file is available
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_asset_root_name() -> String {
    "Assets".to_string()
}

fn default_input_folder() -> String {
    "Assets/Animations/Clip".to_string()
}

fn default_output_folder() -> String {
    "Assets/Animations/Vrma".to_string()
}

fn default_clip_extensions() -> Vec<String> {
    vec!["anim".to_string()]
}

fn default_output_extension() -> String {
    "vrma".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
