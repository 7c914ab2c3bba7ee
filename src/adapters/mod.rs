//! External system integrations for the VRMA batch exporter.
//!
//! - [`assets`] - Project asset store (clip enumeration and loading)
//! - [`converter`] - Clip-to-VRMA conversion
//!
//! # Design Pattern
//!
//! Adapters isolate the filesystem and the converter program behind traits
//! so the batch orchestrator can be exercised with in-memory fakes.
//!
//! ```rust,no_run
//! use vrma_batch::adapters::assets::FileSystemAssets;
//! use vrma_batch::adapters::converter::ExternalToolConverter;
//! use vrma_batch::core::paths::PathMapper;
//!
//! let paths = PathMapper::for_project("/home/me/AvatarProject", "Assets");
//! let assets = FileSystemAssets::new(paths.clone(), &["anim".to_string()]);
//! let converter = ExternalToolConverter::new("vrma-convert", Vec::new(), paths);
//! ```

pub mod assets;
pub mod converter;
