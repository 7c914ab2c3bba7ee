//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::verification::report::VerificationReport;
use crate::domain::{AppError, AssetPath, ConversionError};
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// A clip written to the output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Source clip
    pub source: AssetPath,

    /// Written VRMA file
    pub output: AssetPath,

    /// SHA-256 of the written bytes
    pub checksum: String,

    /// Size in bytes
    pub bytes: usize,
}

/// Output path computed for a clip during a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub source: AssetPath,
    pub output: AssetPath,
}

/// Summary of one batch export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Identifier of the run, attached to log records
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Number of humanoid clips found
    pub total_candidates: usize,

    /// Number of clips written
    pub exported_count: usize,

    /// Clips that failed, in processing order
    pub failures: Vec<ExportError>,

    /// Clips skipped because they are not humanoid motion
    pub skipped_non_humanoid: usize,

    /// Clip assets that could not be loaded
    pub skipped_unloadable: usize,

    /// Entries in the expression index, when one was built
    pub expression_count: Option<usize>,

    /// Written files (for verification)
    pub exported_files: Vec<ExportedFile>,

    /// Output paths computed during a dry run
    pub planned_outputs: Vec<PlannedOutput>,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Whether the run was stopped by a shutdown signal
    pub interrupted: bool,

    /// Duration of the export
    pub duration: Duration,

    /// Verification report (if verification was run)
    pub verification_report: Option<VerificationReport>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_candidates: 0,
            exported_count: 0,
            failures: Vec::new(),
            skipped_non_humanoid: 0,
            skipped_unloadable: 0,
            expression_count: None,
            exported_files: Vec::new(),
            planned_outputs: Vec::new(),
            dry_run: false,
            interrupted: false,
            duration: Duration::from_secs(0),
            verification_report: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a written clip
    pub fn record_export(&mut self, file: ExportedFile) {
        self.exported_count += 1;
        self.exported_files.push(file);
    }

    /// Record a failed clip
    pub fn add_error(&mut self, error: ExportError) {
        self.failures.push(error);
    }

    /// Set the verification report
    pub fn set_verification_report(&mut self, report: VerificationReport) {
        self.verification_report = Some(report);
    }

    /// Number of failed clips
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Clips that were neither exported nor failed (interrupted or dry run)
    pub fn unprocessed_count(&self) -> usize {
        self.total_candidates
            .saturating_sub(self.exported_count + self.failures.len())
    }

    /// Check if the export was successful (no failures, not interrupted)
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
            && !self.interrupted
            && self
                .verification_report
                .as_ref()
                .map_or(true, VerificationReport::is_success)
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_candidates == 0 {
            return 100.0;
        }
        (self.exported_count as f64 / self.total_candidates as f64) * 100.0
    }

    /// Start time of the run, formatted for display
    pub fn started_at_display(&self) -> String {
        self.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            started_at = %self.started_at.to_rfc3339(),
            total_candidates = self.total_candidates,
            exported = self.exported_count,
            failed = self.failures.len(),
            skipped_non_humanoid = self.skipped_non_humanoid,
            skipped_unloadable = self.skipped_unloadable,
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                error_count = self.failures.len(),
                "Export completed with errors"
            );
            for error in &self.failures {
                tracing::warn!(
                    clip = %error.clip_path,
                    error_type = ?error.error_type,
                    message = %error.message,
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Reference avatar could not be created
    Avatar,
    /// Converter rejected or failed on the clip
    Conversion,
    /// Output directory or file could not be written
    Storage,
    /// Output path could not be derived
    Path,
    /// Unknown error
    Unknown,
}

impl ExportErrorType {
    /// Classifies an error raised while exporting a clip
    pub fn classify(error: &AppError) -> Self {
        match error {
            AppError::Conversion(ConversionError::AvatarCreationFailed(_)) => Self::Avatar,
            AppError::Conversion(_) => Self::Conversion,
            AppError::Io(_) => Self::Storage,
            AppError::Path(_) => Self::Path,
            _ => Self::Unknown,
        }
    }
}

/// A clip that could not be exported
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Source clip
    pub clip_path: AssetPath,

    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,
}

impl ExportError {
    /// Create a new export error
    pub fn new(clip_path: AssetPath, error_type: ExportErrorType, message: String) -> Self {
        Self {
            clip_path,
            error_type,
            message,
        }
    }

    /// Create an export error from the error raised for `clip_path`
    pub fn from_error(clip_path: AssetPath, error: &AppError) -> Self {
        Self::new(clip_path, ExportErrorType::classify(error), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PathError;
    use chrono::TimeZone;

    fn clip(path: &str) -> AssetPath {
        AssetPath::new(path).unwrap()
    }

    fn exported(source: &str) -> ExportedFile {
        ExportedFile {
            source: clip(source),
            output: clip(source).with_extension("vrma"),
            checksum: "00".repeat(32),
            bytes: 4,
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();

        assert_eq!(summary.total_candidates, 0);
        assert_eq!(summary.exported_count, 0);
        assert!(summary.failures.is_empty());
        assert!(summary.exported_files.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(!summary.dry_run);
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_export_summary_counts() {
        let mut summary = ExportSummary::new();
        summary.total_candidates = 3;
        summary.record_export(exported("Assets/Clip/a.anim"));
        summary.add_error(ExportError::new(
            clip("Assets/Clip/b.anim"),
            ExportErrorType::Conversion,
            "Malformed clip".to_string(),
        ));

        assert_eq!(summary.exported_count, 1);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.unprocessed_count(), 1);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_export_summary_is_successful() {
        let mut summary = ExportSummary::new();
        summary.total_candidates = 1;
        summary.record_export(exported("Assets/Clip/a.anim"));
        assert!(summary.is_successful());

        summary.interrupted = true;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_export_summary_success_rate() {
        let mut summary = ExportSummary::new();
        summary.total_candidates = 4;
        summary.record_export(exported("Assets/Clip/a.anim"));
        summary.record_export(exported("Assets/Clip/b.anim"));
        summary.record_export(exported("Assets/Clip/c.anim"));

        assert_eq!(summary.success_rate(), 75.0);

        summary.total_candidates = 0;
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[test]
    fn test_classify_errors() {
        let avatar = AppError::Conversion(ConversionError::AvatarCreationFailed("x".into()));
        assert_eq!(ExportErrorType::classify(&avatar), ExportErrorType::Avatar);

        let conversion = AppError::Conversion(ConversionError::EmptyOutput);
        assert_eq!(ExportErrorType::classify(&conversion), ExportErrorType::Conversion);

        let io = AppError::Io("disk full".into());
        assert_eq!(ExportErrorType::classify(&io), ExportErrorType::Storage);

        let path = AppError::Path(PathError::InvalidAssetPath("..".into()));
        assert_eq!(ExportErrorType::classify(&path), ExportErrorType::Path);

        let other = AppError::Other("?".into());
        assert_eq!(ExportErrorType::classify(&other), ExportErrorType::Unknown);
    }

    #[test]
    fn test_export_error_from_error() {
        let error = ExportError::from_error(
            clip("Assets/Clip/b.anim"),
            &AppError::Conversion(ConversionError::MalformedClip("no curves".into())),
        );

        assert_eq!(error.error_type, ExportErrorType::Conversion);
        assert_eq!(error.clip_path.as_str(), "Assets/Clip/b.anim");
        assert!(error.message.contains("no curves"));
    }

    #[test]
    fn test_started_at_display() {
        let mut summary = ExportSummary::new();
        assert!(summary.started_at <= Utc::now());

        summary.started_at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(summary.started_at_display(), "2024-03-09 14:05:07 UTC");
    }
}
