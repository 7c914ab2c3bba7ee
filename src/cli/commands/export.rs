//! Export command implementation
//!
//! This module implements the `export` command, converting every humanoid
//! clip of the input folder to a VRMA file.

use crate::config::{load_config, BatchConfig};
use crate::core::export::{BatchExportOrchestrator, ExportSummary};
use crate::domain::AppError;
use clap::Args;
use tokio::sync::watch;

const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - discover clips and map output paths without converting
    #[arg(long)]
    pub dry_run: bool,

    /// Override the input folder (asset path such as Assets/Animations/Clip, or an absolute folder inside the asset root)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the output folder (asset path or absolute folder inside the asset root)
    #[arg(long)]
    pub output: Option<String>,

    /// Override the avatar description file (relative to the project root)
    #[arg(long)]
    pub avatar: Option<String>,

    /// Build an expression index from the avatar and pass it to the converter
    #[arg(long)]
    pub expressions: bool,
}

impl ExportArgs {
    /// Apply command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut BatchConfig) {
        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding input folder from CLI");
            config.export.input_folder = input.clone();
        }

        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output folder from CLI");
            config.export.output_folder = output.clone();
        }

        if let Some(avatar) = &self.avatar {
            tracing::info!(avatar = %avatar, "Overriding avatar from CLI");
            config.export.avatar = Some(avatar.clone());
        }

        if self.expressions {
            tracing::info!("Enabling expression mapping from CLI");
            config.export.expression_mapping = true;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Export Configuration:");
            println!("  Project: {}", config.project.root.display());
            println!("  Input folder: {}", config.export.input_folder);
            println!("  Output folder: {}", config.export.output_folder);
            println!(
                "  Expression mapping: {}",
                if config.export.expression_mapping {
                    config.export.avatar.as_deref().unwrap_or("enabled")
                } else {
                    "disabled"
                }
            );
            println!("  Converter: {}", config.converter.program);
            println!();
            println!("Existing files in the output folder with the same names will be overwritten.");
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let orchestrator = match BatchExportOrchestrator::from_config(&config) {
            Ok(orchestrator) => orchestrator.with_shutdown_signal(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        tracing::info!("Executing export");
        println!("🚀 Starting export...");
        println!();

        // The batch is synchronous; keep the runtime free for signal handling
        let summary = match tokio::task::spawn_blocking(move || orchestrator.run()).await {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
            Err(e) => {
                tracing::error!(error = %e, "Export task failed");
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);

        Ok(exit_code_for_summary(&summary))
    }
}

fn exit_code_for_error(error: &AppError) -> i32 {
    match error {
        AppError::Configuration(_) => 2,
        _ => 5,
    }
}

fn exit_code_for_summary(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Export interrupted before all clips were processed.");
        println!("   Run the same command again to export the remaining clips.");
        println!();
        tracing::info!("Export interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Export completed with failures");
        1 // Partial success
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    if summary.dry_run {
        println!("📋 Planned Outputs:");
        for planned in &summary.planned_outputs {
            println!("  {} -> {}", planned.source, planned.output);
        }
        println!();
    }

    println!("📊 Export Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Started: {}", summary.started_at_display());
    println!("  Humanoid clips: {}", summary.total_candidates);
    println!("  Exported: {}", summary.exported_count);
    println!("  Failed: {}", summary.failures.len());
    if summary.skipped_non_humanoid > 0 || summary.skipped_unloadable > 0 {
        println!(
            "  Skipped: {} non-humanoid, {} unloadable",
            summary.skipped_non_humanoid, summary.skipped_unloadable
        );
    }
    if let Some(count) = summary.expression_count {
        println!("  Expression mappings: {count}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if let Some(verification_report) = &summary.verification_report {
        println!("🔍 Verification Results:");
        println!("  Total Verified: {}", verification_report.total_verified);
        println!("  Passed: {}", verification_report.passed);
        println!("  Failed: {}", verification_report.failed);

        for failure in verification_report.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("    - {}: {}", failure.output, failure.reason);
        }
        if verification_report.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "    ... and {} more failures",
                verification_report.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }

    if !summary.failures.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.failures {
            println!("  - {} ({:?}): {}", error.clip_path, error.error_type, error.message);
        }
        println!();
    }
}
