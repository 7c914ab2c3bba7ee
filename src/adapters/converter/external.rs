//! Converter backed by an external program
//!
//! The reference avatar is a scratch directory holding the rig as
//! `rig.json`. For each clip the configured program is started with the
//! avatar directory, the clip file and (optionally) `expressions.json`; the
//! VRMA bytes are read from its standard output.
//!
//! Exit status conventions of the converter program:
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 0 | VRMA written to stdout |
//! | 3 | Malformed clip |
//! | 4 | Bones could not be mapped onto the reference avatar |
//! | other | Generic failure, stderr is reported |

use super::traits::VrmaConverter;
use crate::config::ConverterConfig;
use crate::core::paths::PathMapper;
use crate::domain::{AnimationClipRef, ConversionError, ExpressionIndex, ReferenceRig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Exit status reported for a malformed clip
pub const EXIT_MALFORMED_CLIP: i32 = 3;

/// Exit status reported for an unresolvable bone mapping
pub const EXIT_BONE_MAPPING: i32 = 4;

const RIG_FILE: &str = "rig.json";
const EXPRESSIONS_FILE: &str = "expressions.json";
const STDERR_LIMIT: usize = 2048;

/// Scratch workspace standing in for a reference avatar
///
/// Removed by [`ExternalToolConverter::destroy_reference_avatar`], or when
/// dropped.
#[derive(Debug)]
pub struct ScratchAvatar {
    dir: TempDir,
}

impl ScratchAvatar {
    /// Workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Serialized rig
    pub fn rig_path(&self) -> PathBuf {
        self.dir.path().join(RIG_FILE)
    }

    fn expressions_path(&self) -> PathBuf {
        self.dir.path().join(EXPRESSIONS_FILE)
    }
}

/// Runs a configured converter program for each clip
#[derive(Debug, Clone)]
pub struct ExternalToolConverter {
    program: String,
    args: Vec<String>,
    scratch_dir: Option<PathBuf>,
    paths: PathMapper,
}

impl ExternalToolConverter {
    /// Creates a converter running `program` with `args`
    ///
    /// `paths` resolves clip asset paths to files handed to the program.
    pub fn new(program: impl Into<String>, args: Vec<String>, paths: PathMapper) -> Self {
        Self {
            program: program.into(),
            args,
            scratch_dir: None,
            paths,
        }
    }

    pub fn from_config(config: &ConverterConfig, paths: PathMapper) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            scratch_dir: config.scratch_dir.clone(),
            paths,
        }
    }

    /// Places scratch workspaces under `dir` instead of the system temp directory
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_args(
        &self,
        avatar: &ScratchAvatar,
        clip: &AnimationClipRef,
        clip_file: &Path,
        expressions: Option<&Path>,
    ) -> Vec<String> {
        let avatar_dir = avatar.path().display().to_string();
        let clip_file = clip_file.display().to_string();
        let expressions = expressions.map(|path| path.display().to_string());

        if !self.args.iter().any(|arg| has_placeholder(arg)) {
            let mut args = self.args.clone();
            args.extend([
                "--avatar".to_string(),
                avatar_dir,
                "--clip".to_string(),
                clip_file,
                "--name".to_string(),
                clip.name.clone(),
            ]);
            if let Some(expressions) = expressions {
                args.extend(["--expressions".to_string(), expressions]);
            }
            return args;
        }

        let mut args: Vec<String> = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            if arg.contains("{expressions}") && expressions.is_none() {
                // Drop the flag introducing the missing value as well
                if args
                    .last()
                    .is_some_and(|previous| previous.starts_with('-') && !previous.contains('='))
                    && !arg.starts_with('-')
                {
                    args.pop();
                }
                continue;
            }

            let mut value = arg
                .replace("{avatar}", &avatar_dir)
                .replace("{clip}", &clip_file)
                .replace("{clip_name}", &clip.name);
            if let Some(expressions) = &expressions {
                value = value.replace("{expressions}", expressions);
            }
            args.push(value);
        }
        args
    }
}

fn has_placeholder(arg: &str) -> bool {
    ["{avatar}", "{clip}", "{clip_name}", "{expressions}"]
        .iter()
        .any(|placeholder| arg.contains(placeholder))
}

fn truncate_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_LIMIT {
        return text.to_string();
    }
    let mut end = STDERR_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

impl VrmaConverter for ExternalToolConverter {
    type Avatar = ScratchAvatar;

    fn create_reference_avatar(&self, rig: &ReferenceRig) -> Result<ScratchAvatar, ConversionError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("vrma-avatar-");

        let dir = match &self.scratch_dir {
            Some(scratch) => {
                fs::create_dir_all(scratch).map_err(|e| {
                    ConversionError::AvatarCreationFailed(format!(
                        "Failed to create scratch directory {}: {}",
                        scratch.display(),
                        e
                    ))
                })?;
                builder.tempdir_in(scratch)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| {
            ConversionError::AvatarCreationFailed(format!("Failed to create workspace: {e}"))
        })?;

        let avatar = ScratchAvatar { dir };
        let rig_json = serde_json::to_vec_pretty(rig).map_err(|e| {
            ConversionError::AvatarCreationFailed(format!("Failed to serialize rig: {e}"))
        })?;
        fs::write(avatar.rig_path(), rig_json).map_err(|e| {
            ConversionError::AvatarCreationFailed(format!("Failed to write rig: {e}"))
        })?;

        tracing::trace!(
            workspace = %avatar.path().display(),
            source = %rig.source,
            bones = rig.len(),
            "Reference avatar created"
        );
        Ok(avatar)
    }

    fn destroy_reference_avatar(&self, avatar: ScratchAvatar) {
        let workspace = avatar.path().display().to_string();
        match avatar.dir.close() {
            Ok(()) => tracing::trace!(workspace = %workspace, "Reference avatar destroyed"),
            Err(e) => tracing::warn!(
                workspace = %workspace,
                error = %e,
                "Failed to remove reference avatar workspace"
            ),
        }
    }

    fn convert(
        &self,
        avatar: &ScratchAvatar,
        clip: &AnimationClipRef,
        expressions: Option<&ExpressionIndex>,
    ) -> Result<Vec<u8>, ConversionError> {
        let clip_file = self
            .paths
            .to_absolute(&clip.path)
            .map_err(|e| ConversionError::MalformedClip(e.to_string()))?;

        let expressions_file = match expressions {
            Some(index) => {
                let path = avatar.expressions_path();
                let json = serde_json::to_vec_pretty(index).map_err(|e| {
                    ConversionError::LaunchFailed(format!("Failed to serialize expressions: {e}"))
                })?;
                fs::write(&path, json).map_err(|e| {
                    ConversionError::LaunchFailed(format!("Failed to write expressions: {e}"))
                })?;
                Some(path)
            }
            None => None,
        };

        let args = self.build_args(avatar, clip, &clip_file, expressions_file.as_deref());
        tracing::debug!(program = %self.program, args = ?args, "Running converter");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ConversionError::LaunchFailed(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let message = truncate_stderr(&output.stderr);
            return Err(match output.status.code() {
                Some(EXIT_MALFORMED_CLIP) => ConversionError::MalformedClip(message),
                Some(EXIT_BONE_MAPPING) => ConversionError::BoneMapping(message),
                code => ConversionError::ToolFailed {
                    status: code.unwrap_or(-1),
                    message,
                },
            });
        }

        if output.stdout.is_empty() {
            return Err(ConversionError::EmptyOutput);
        }

        Ok(output.stdout)
    }
}
