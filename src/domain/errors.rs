//! Domain error types
//!
//! This module defines the error hierarchy for the VRMA batch exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main application error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors (invalid folders, missing avatar, bad TOML)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Path mapping errors
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Asset loading errors
    #[error("Asset error: {0}")]
    Asset(String),

    /// Conversion errors raised by the external converter
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors produced while mapping between absolute and project-relative paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path does not live under the project's asset root
    #[error("Path is outside the project asset root: {0}")]
    OutsideProjectRoot(String),

    /// The path is not under the folder it was expected to be in
    #[error("Path '{path}' is not inside folder '{folder}'")]
    OutsideFolder { path: String, folder: String },

    /// The string is not a usable asset path
    #[error("Invalid asset path: {0}")]
    InvalidAssetPath(String),
}

/// Errors reported by the external clip-to-VRMA converter
///
/// These errors don't expose process or I/O types of the converter
/// implementation.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The reference avatar could not be created
    #[error("Failed to create reference avatar: {0}")]
    AvatarCreationFailed(String),

    /// The clip is malformed or cannot be read by the converter
    #[error("Malformed clip: {0}")]
    MalformedClip(String),

    /// Bones in the clip could not be mapped onto the reference avatar
    #[error("Unresolvable bone mapping: {0}")]
    BoneMapping(String),

    /// The converter process could not be started
    #[error("Failed to launch converter: {0}")]
    LaunchFailed(String),

    /// The converter exited unsuccessfully
    #[error("Converter exited with status {status}: {message}")]
    ToolFailed { status: i32, message: String },

    /// The converter produced no bytes
    #[error("Converter produced empty output")]
    EmptyOutput,
}

/// Errors raised while resolving an expression binding against the avatar
///
/// Always recovered locally: the offending definition is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No node exists at the binding's relative path
    #[error("No node at relative path '{0}'")]
    NodeNotFound(String),

    /// The node exists but carries no skinned mesh
    #[error("Node '{0}' has no skinned mesh")]
    NoSkinnedMesh(String),

    /// The mesh has fewer blend shapes than the binding index requires
    #[error("Blend shape index {index} out of range for '{path}' ({count} blend shapes)")]
    BlendShapeIndexOutOfRange {
        path: String,
        index: usize,
        count: usize,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}
