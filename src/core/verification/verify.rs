//! Verification logic for post-export validation
//!
//! Recalculates the checksum of every written file and compares it with the
//! checksum recorded by the export.

use crate::core::export::ExportSummary;
use crate::core::paths::PathMapper;
use crate::core::verification::checksum::calculate_checksum_file;
use crate::core::verification::report::{VerificationFailure, VerificationReport};
use std::time::Instant;

/// Verifier for post-export validation
pub struct Verifier {
    paths: PathMapper,
}

impl Verifier {
    /// Create a verifier resolving output paths through `paths`
    pub fn new(paths: PathMapper) -> Self {
        Self { paths }
    }

    /// Verify the files recorded in an export summary
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vrma_batch::core::export::ExportSummary;
    /// use vrma_batch::core::paths::PathMapper;
    /// use vrma_batch::core::verification::Verifier;
    ///
    /// let verifier = Verifier::new(PathMapper::for_project(".", "Assets"));
    /// let report = verifier.verify_export(&ExportSummary::new());
    /// println!("{}", report.format_summary());
    /// ```
    pub fn verify_export(&self, summary: &ExportSummary) -> VerificationReport {
        let start = Instant::now();
        let mut report = VerificationReport::new();

        tracing::info!(
            run_id = %summary.run_id,
            files = summary.exported_files.len(),
            "Starting post-export verification"
        );

        for file in &summary.exported_files {
            let actual = self
                .paths
                .to_absolute(&file.output)
                .map_err(|e| e.to_string())
                .and_then(|path| calculate_checksum_file(&path).map_err(|e| e.to_string()));

            match actual {
                Ok(actual) if actual == file.checksum => report.record_pass(),
                Ok(actual) => {
                    tracing::warn!(output = %file.output, "Checksum mismatch");
                    report.record_failure(VerificationFailure {
                        output: file.output.clone(),
                        expected_checksum: file.checksum.clone(),
                        actual_checksum: Some(actual),
                        reason: "Checksum mismatch".to_string(),
                    });
                }
                Err(reason) => {
                    tracing::warn!(output = %file.output, error = %reason, "Output not readable");
                    report.record_failure(VerificationFailure {
                        output: file.output.clone(),
                        expected_checksum: file.checksum.clone(),
                        actual_checksum: None,
                        reason,
                    });
                }
            }
        }

        report.set_duration(start.elapsed().as_millis() as u64);

        tracing::info!(
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Verification completed"
        );

        report
    }
}
