//! Batch export orchestrator
//!
//! Drives one export run: validates the folders and avatar, builds the
//! expression index once, discovers the humanoid clips, and converts them one
//! at a time. A failing clip is recorded and the run moves on; the reference
//! avatar of every iteration is released whatever happens to the clip.

use crate::adapters::assets::{AssetDatabase, FileSystemAssets};
use crate::adapters::converter::{ExternalToolConverter, VrmaConverter};
use crate::config::BatchConfig;
use crate::core::discovery::ClipDiscovery;
use crate::core::export::scoped::ScopedAvatar;
use crate::core::export::summary::{ExportError, ExportSummary, ExportedFile, PlannedOutput};
use crate::core::expression::ExpressionIndexBuilder;
use crate::core::paths::{map_output_path, PathMapper};
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::core::verification::Verifier;
use crate::domain::{
    AnimationClipRef, AppError, AssetPath, AvatarDefinition, ConversionError, ExpressionIndex,
    ReferenceRig, Result, RigSource,
};
use crate::{log_batch_progress, log_clip_exported, log_clip_failed};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;
use tokio::sync::watch;

/// What one run exports and how
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Folder scanned for clips
    pub input_folder: AssetPath,

    /// Folder receiving the VRMA files
    pub output_folder: AssetPath,

    /// Extension of exported files
    pub output_extension: String,

    /// Build an expression index from `avatar` and pass it to the converter
    pub expression_mapping: bool,

    /// Source avatar for the expression-aware flow
    pub avatar: Option<AvatarDefinition>,

    /// Where the reference avatar's bone map comes from
    pub reference_rig: RigSource,

    /// Discover and map paths only
    pub dry_run: bool,

    /// Re-read written files and compare checksums after the run
    pub verify_outputs: bool,
}

impl ExportOptions {
    /// Plain export from `input_folder` to `output_folder`
    pub fn new(input_folder: AssetPath, output_folder: AssetPath) -> Self {
        Self {
            input_folder,
            output_folder,
            output_extension: "vrma".to_string(),
            expression_mapping: false,
            avatar: None,
            reference_rig: RigSource::Standard,
            dry_run: false,
            verify_outputs: false,
        }
    }

    /// Expression-aware export driven by `avatar`
    pub fn with_expressions(mut self, avatar: AvatarDefinition) -> Self {
        self.expression_mapping = true;
        self.avatar = Some(avatar);
        self
    }

    /// Builds the options from a loaded configuration
    ///
    /// Absolute folders are mapped into the asset root. Loads the avatar
    /// description when one is configured.
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        let avatar = match config.avatar_path() {
            Some(path) => Some(AvatarDefinition::from_file(path)?),
            None => None,
        };

        Ok(Self {
            input_folder: config.input_folder().map_err(AppError::Configuration)?,
            output_folder: config.output_folder().map_err(AppError::Configuration)?,
            output_extension: config.export.output_extension.clone(),
            expression_mapping: config.export.expression_mapping,
            avatar,
            reference_rig: config.converter.reference_rig,
            dry_run: config.application.dry_run,
            verify_outputs: config.export.verify_outputs,
        })
    }

    fn needs_avatar(&self) -> bool {
        self.expression_mapping || self.reference_rig == RigSource::Avatar
    }
}

/// Validated inputs shared by every clip of a run
#[derive(Debug)]
struct RunPlan {
    rig: ReferenceRig,
    expressions: Option<ExpressionIndex>,
}

/// Converts every humanoid clip of a folder to VRMA
pub struct BatchExportOrchestrator<C: VrmaConverter> {
    assets: Arc<dyn AssetDatabase>,
    converter: C,
    paths: PathMapper,
    options: ExportOptions,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl<C: VrmaConverter + std::fmt::Debug> std::fmt::Debug for BatchExportOrchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExportOrchestrator")
            .field("converter", &self.converter)
            .field("paths", &self.paths)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BatchExportOrchestrator<ExternalToolConverter> {
    /// Creates an orchestrator over the configured project and converter program
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        let paths = config.path_mapper();
        let assets = FileSystemAssets::new(paths.clone(), &config.export.clip_extensions);
        let converter = ExternalToolConverter::from_config(&config.converter, paths.clone());
        let options = ExportOptions::from_config(config)?;

        Ok(Self::new(Arc::new(assets), converter, paths, options))
    }
}

impl<C: VrmaConverter> BatchExportOrchestrator<C> {
    pub fn new(
        assets: Arc<dyn AssetDatabase>,
        converter: C,
        paths: PathMapper,
        options: ExportOptions,
    ) -> Self {
        Self {
            assets,
            converter,
            paths,
            options,
            shutdown_signal: None,
        }
    }

    /// Stops the run before the next clip once `signal` turns `true`
    pub fn with_shutdown_signal(mut self, signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(signal);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }

    /// Checks the run inputs without touching the output folder
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the input folder is missing or
    /// outside the asset root, the output folder is outside the asset root,
    /// or the avatar required by the options is missing or not humanoid.
    pub fn validate(&self) -> Result<()> {
        self.prepare().map(|_| ())
    }

    fn prepare(&self) -> Result<RunPlan> {
        let options = &self.options;

        if !self.paths.is_within_asset_root(&options.input_folder) {
            return Err(AppError::Configuration(format!(
                "Input folder {} is not inside the {} folder",
                options.input_folder,
                self.paths.asset_root_name()
            )));
        }
        if !self.assets.is_valid_folder(&options.input_folder) {
            return Err(AppError::Configuration(format!(
                "Input folder {} does not exist",
                options.input_folder
            )));
        }
        if !self.paths.is_within_asset_root(&options.output_folder) {
            return Err(AppError::Configuration(format!(
                "Output folder {} is not inside the {} folder",
                options.output_folder,
                self.paths.asset_root_name()
            )));
        }

        let avatar = if options.needs_avatar() {
            let avatar = options.avatar.as_ref().ok_or_else(|| {
                AppError::Configuration("A source avatar is required for this export".to_string())
            })?;
            avatar.validate_humanoid().map_err(AppError::Configuration)?;
            Some(avatar)
        } else {
            None
        };

        let rig = match (options.reference_rig, avatar) {
            (RigSource::Avatar, Some(avatar)) => ReferenceRig::from_avatar(avatar)?,
            _ => ReferenceRig::standard(),
        };

        let expressions = match avatar {
            Some(avatar) if options.expression_mapping => {
                Some(ExpressionIndexBuilder::new().build(avatar))
            }
            _ => None,
        };

        Ok(RunPlan { rig, expressions })
    }

    /// Runs the batch
    ///
    /// # Errors
    ///
    /// Only validation errors abort the run. Clip failures are recorded in
    /// the summary.
    pub fn run(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.options.dry_run;

        let span = tracing::info_span!("export", run_id = %summary.run_id);
        let _entered = span.enter();

        tracing::info!(
            input = %self.options.input_folder,
            output = %self.options.output_folder,
            expression_mapping = self.options.expression_mapping,
            dry_run = self.options.dry_run,
            "Starting batch export"
        );

        let plan = self.prepare()?;
        summary.expression_count = plan.expressions.as_ref().map(ExpressionIndex::len);

        let discovery = ClipDiscovery::new(self.assets.as_ref());
        let (clips, stats) = discovery.collect(&self.options.input_folder);
        summary.total_candidates = clips.len();
        summary.skipped_non_humanoid = stats.non_humanoid;
        summary.skipped_unloadable = stats.unloadable;

        tracing::info!(
            candidates = clips.len(),
            scanned = stats.scanned,
            "Humanoid clips discovered"
        );

        if self.options.dry_run {
            self.plan_outputs(&clips, &mut summary);
        } else {
            self.export_all(&clips, &plan, &mut summary);

            if self.options.verify_outputs && !summary.exported_files.is_empty() {
                let report = Verifier::new(self.paths.clone()).verify_export(&summary);
                summary.set_verification_report(report);
            }
        }

        summary.duration = start_time.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    fn plan_outputs(&self, clips: &[AnimationClipRef], summary: &mut ExportSummary) {
        for clip in clips {
            match self.output_path(clip) {
                Ok(output) => {
                    tracing::info!(clip = %clip.path, output = %output, "Would export clip");
                    summary.planned_outputs.push(PlannedOutput {
                        source: clip.path.clone(),
                        output,
                    });
                }
                Err(e) => {
                    log_clip_failed!(clip.path, e);
                    summary.add_error(ExportError::from_error(clip.path.clone(), &e));
                }
            }
        }
    }

    fn export_all(&self, clips: &[AnimationClipRef], plan: &RunPlan, summary: &mut ExportSummary) {
        for (index, clip) in clips.iter().enumerate() {
            if self.is_shutdown_requested() {
                tracing::warn!(
                    processed = index,
                    remaining = clips.len() - index,
                    "Shutdown requested, stopping before next clip"
                );
                summary.interrupted = true;
                break;
            }

            log_batch_progress!(index + 1, clip.path);

            match self.export_clip(clip, plan) {
                Ok(file) => {
                    log_clip_exported!(file.source, file.output, file.bytes);
                    summary.record_export(file);
                }
                Err(e) => {
                    log_clip_failed!(clip.path, e);
                    summary.add_error(ExportError::from_error(clip.path.clone(), &e));
                }
            }
        }
    }

    fn output_path(&self, clip: &AnimationClipRef) -> Result<AssetPath> {
        Ok(map_output_path(
            &clip.path,
            &self.options.input_folder,
            &self.options.output_folder,
            &self.options.output_extension,
        )?)
    }

    fn export_clip(&self, clip: &AnimationClipRef, plan: &RunPlan) -> Result<ExportedFile> {
        let output = self.output_path(clip)?;
        let target = self.paths.to_absolute(&output)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let avatar = ScopedAvatar::acquire(&self.converter, &plan.rig)?;
        let bytes = self
            .converter
            .convert(avatar.avatar(), clip, plan.expressions.as_ref())?;
        if bytes.is_empty() {
            return Err(ConversionError::EmptyOutput.into());
        }

        write_atomic(&target, &bytes)?;

        Ok(ExportedFile {
            source: clip.path.clone(),
            output,
            checksum: calculate_checksum_bytes(&bytes),
            bytes: bytes.len(),
        })
    }
}

/// Writes `bytes` to `target` through a sibling temporary file
///
/// An existing file is replaced. A failed write leaves no partial file.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| AppError::Io(format!("No parent directory for {}", target.display())))?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(target).map_err(|e| {
        AppError::Io(format!("Failed to write {}: {}", target.display(), e.error))
    })?;
    Ok(())
}
