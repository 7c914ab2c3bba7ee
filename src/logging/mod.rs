//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use vrma_batch::logging::init_logging;
//! use vrma_batch::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a clip that was written successfully
///
/// # Example
///
/// ```no_run
/// use vrma_batch::log_clip_exported;
///
/// log_clip_exported!("Assets/Clip/walk.anim", "Assets/Vrma/walk.vrma", 2048);
/// ```
#[macro_export]
macro_rules! log_clip_exported {
    ($clip:expr, $output:expr, $bytes:expr) => {
        tracing::info!(
            clip = %$clip,
            output = %$output,
            bytes = $bytes,
            "VRM Animation saved"
        );
    };
}

/// Log a clip that could not be exported
///
/// # Example
///
/// ```no_run
/// use vrma_batch::log_clip_failed;
///
/// log_clip_failed!("Assets/Clip/broken.anim", "Malformed clip: no curves");
/// ```
#[macro_export]
macro_rules! log_clip_failed {
    ($clip:expr, $error:expr) => {
        tracing::warn!(
            clip = %$clip,
            error = %$error,
            "Clip export failed, continuing with next clip"
        );
    };
}

/// Log batch progress
///
/// # Example
///
/// ```no_run
/// use vrma_batch::log_batch_progress;
///
/// log_batch_progress!(3, "Assets/Clip/jump.anim");
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($index:expr, $clip:expr) => {
        tracing::debug!(
            index = $index,
            clip = %$clip,
            "Exporting clip"
        );
    };
}
