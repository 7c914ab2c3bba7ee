//! Configuration management for the VRMA batch exporter.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VRMA_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vrma_batch::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vrma-batch.toml")?;
//!
//! println!("Input folder: {}", config.export.input_folder);
//! println!("Output folder: {}", config.export.output_folder);
//! println!("Converter: {}", config.converter.program);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry run
//! - [`ProjectConfig`] - Project directory and asset root name
//! - [`ExportConfig`] - Folders, extensions, expression mapping, avatar
//! - [`ConverterConfig`] - External converter program and reference rig
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! root = "/home/me/MyAvatarProject"
//!
//! [export]
//! input_folder = "Assets/Animations/Clip"
//! output_folder = "Assets/Animations/Vrma"
//! expression_mapping = true
//! avatar = "Assets/Avatars/Alicia.avatar.json"
//!
//! [converter]
//! program = "${VRMA_CONVERTER_BIN}"
//! args = ["--avatar", "{avatar}", "--clip", "{clip}", "--expressions", "{expressions}"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BatchConfig, ConverterConfig, ExportConfig, LoggingConfig, ProjectConfig,
};
