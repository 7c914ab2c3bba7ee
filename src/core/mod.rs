//! Core business logic for the VRMA batch exporter.
//!
//! # Modules
//!
//! - [`paths`] - Asset path mapping and output path derivation
//! - [`discovery`] - Humanoid clip discovery
//! - [`expression`] - Expression index construction
//! - [`export`] - Batch orchestration, avatar scoping, and summaries
//! - [`verification`] - Output verification with checksums
//!
//! # Export Workflow
//!
//! 1. **Validate**: Input folder exists, folders lie within the asset root,
//!    the source avatar is humanoid (expression-aware flow)
//! 2. **Index**: Build the expression index once from the avatar
//! 3. **Discover**: Enumerate humanoid clips below the input folder
//! 4. **Export**: Per clip, acquire a reference avatar, convert, write, release
//! 5. **Verify** (optional): Re-read written files and compare checksums
//! 6. **Report**: Log and print the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use vrma_batch::config::load_config;
//! use vrma_batch::core::export::BatchExportOrchestrator;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vrma-batch.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let orchestrator =
//!     BatchExportOrchestrator::from_config(&config)?.with_shutdown_signal(shutdown_rx);
//!
//! let summary = orchestrator.run()?;
//! println!("Candidates: {}", summary.total_candidates);
//! println!("Exported: {}", summary.exported_count);
//! println!("Failed: {}", summary.failures.len());
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod export;
pub mod expression;
pub mod paths;
pub mod verification;
