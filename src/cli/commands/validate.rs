//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the exporter configuration file.

use crate::config::{load_config, BatchConfig};
use crate::domain::AvatarDefinition;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also check that the project folders and avatar description exist
    #[arg(long)]
    pub check_paths: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_config_summary(&config);

        if self.check_paths {
            let problems = check_paths(&config);
            if !problems.is_empty() {
                println!("❌ Path check failed");
                for problem in &problems {
                    println!("   - {problem}");
                }
                println!();
                return Ok(2);
            }
            println!("✅ Project paths exist");
            println!();
        }

        Ok(0)
    }
}

fn print_config_summary(config: &BatchConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Project Root: {}", config.project.root.display());
    println!("  Asset Root: {}", config.project.asset_root_name);
    println!("  Input Folder: {}", config.export.input_folder);
    println!("  Output Folder: {}", config.export.output_folder);
    println!("  Clip Extensions: {:?}", config.export.clip_extensions);
    println!("  Output Extension: {}", config.export.output_extension);
    println!("  Expression Mapping: {}", config.export.expression_mapping);
    if let Some(avatar) = &config.export.avatar {
        println!("  Avatar: {avatar}");
    }
    println!("  Converter: {} {:?}", config.converter.program, config.converter.args);
    println!("  Reference Rig: {}", config.converter.reference_rig);
    println!("  Verify Outputs: {}", config.export.verify_outputs);
    println!();
}

/// Problems with the filesystem locations named by the configuration
fn check_paths(config: &BatchConfig) -> Vec<String> {
    let mut problems = Vec::new();

    let asset_root = config.asset_root();
    if !asset_root.is_dir() {
        problems.push(format!("Asset root {} does not exist", asset_root.display()));
    }

    let input = config.project.root.join(&config.export.input_folder);
    if !input.is_dir() {
        problems.push(format!("Input folder {} does not exist", input.display()));
    }

    if let Some(avatar_path) = config.avatar_path() {
        match AvatarDefinition::from_file(&avatar_path) {
            Ok(avatar) => {
                if let Err(e) = avatar.validate_humanoid() {
                    problems.push(e);
                }
            }
            Err(e) => problems.push(e.to_string()),
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config(root: &std::path::Path) -> BatchConfig {
        let mut config = BatchConfig {
            application: Default::default(),
            project: Default::default(),
            export: Default::default(),
            converter: ConverterConfig {
                program: "vrma-convert".to_string(),
                args: Vec::new(),
                reference_rig: Default::default(),
                scratch_dir: None,
            },
            logging: Default::default(),
        };
        config.project.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs { check_paths: false };
        let _ = format!("{args:?}");
    }

    #[test]
    fn test_check_paths_missing_folders() {
        let project = TempDir::new().unwrap();
        let problems = check_paths(&config(project.path()));
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_check_paths_ok() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("Assets/Animations/Clip")).unwrap();
        assert!(check_paths(&config(project.path())).is_empty());
    }

    #[test]
    fn test_check_paths_reports_bad_avatar() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("Assets/Animations/Clip")).unwrap();
        fs::write(
            project.path().join("Assets/avatar.json"),
            r#"{"name": "Cube", "humanoid_bones": {}}"#,
        )
        .unwrap();

        let mut config = config(project.path());
        config.export.avatar = Some("Assets/avatar.json".to_string());

        let problems = check_paths(&config);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("missing bones"));
    }
}
