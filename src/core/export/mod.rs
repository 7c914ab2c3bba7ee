//! Batch export orchestration
//!
//! This module provides:
//! - The batch orchestrator driving discovery, conversion and writing
//! - The scoped reference avatar guard
//! - Summary and reporting

pub mod coordinator;
pub mod scoped;
pub mod summary;

pub use coordinator::{BatchExportOrchestrator, ExportOptions};
pub use scoped::ScopedAvatar;
pub use summary::{ExportError, ExportErrorType, ExportSummary, ExportedFile, PlannedOutput};
