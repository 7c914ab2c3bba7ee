// VRMA Batch - humanoid animation clip to VRM Animation exporter
// Licensed under the MIT License

//! # VRMA Batch
//!
//! Batch exporter converting the humanoid animation clips of a project into
//! VRM Animation (VRMA) files.
//!
//! ## Overview
//!
//! This library provides the coordination layer around a clip-to-VRMA
//! converter:
//! - **Mapping** filesystem paths to project asset paths and deriving output paths
//! - **Discovering** humanoid clips below a folder
//! - **Indexing** the blend shapes driven by an avatar's expressions
//! - **Orchestrating** the batch with per-clip isolation and guaranteed
//!   release of the temporary reference avatar
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (paths, discovery, expressions, export, verification)
//! - [`adapters`] - Asset store and converter integrations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vrma_batch::config::load_config;
//! use vrma_batch::core::export::BatchExportOrchestrator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("vrma-batch.toml")?;
//!
//!     let orchestrator = BatchExportOrchestrator::from_config(&config)?;
//!     let summary = orchestrator.run()?;
//!
//!     println!("Exported {} of {} clips", summary.exported_count, summary.total_candidates);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Converters
//!
//! Any type implementing [`adapters::converter::VrmaConverter`] can drive the
//! batch. The reference avatar it creates is released after every clip:
//!
//! ```rust
//! use vrma_batch::adapters::converter::VrmaConverter;
//! use vrma_batch::domain::{AnimationClipRef, ConversionError, ExpressionIndex, ReferenceRig};
//!
//! struct Stub;
//!
//! impl VrmaConverter for Stub {
//!     type Avatar = ();
//!
//!     fn create_reference_avatar(&self, _rig: &ReferenceRig) -> Result<(), ConversionError> {
//!         Ok(())
//!     }
//!
//!     fn destroy_reference_avatar(&self, _avatar: ()) {}
//!
//!     fn convert(
//!         &self,
//!         _avatar: &(),
//!         clip: &AnimationClipRef,
//!         _expressions: Option<&ExpressionIndex>,
//!     ) -> Result<Vec<u8>, ConversionError> {
//!         Ok(clip.name.as_bytes().to_vec())
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::AppError`]. Configuration problems abort
//! a run before anything is written; clip failures are collected in the
//! export summary.
//!
//! ## Logging
//!
//! Structured logging uses the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(input = "Assets/Animations/Clip", "Starting batch export");
//! warn!(clip = "Assets/Animations/Clip/broken.anim", "Clip export failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
