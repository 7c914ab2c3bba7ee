//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vrma-batch.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing VRMA batch exporter configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your project root and folders", self.output);
                println!("  2. Point converter.program at your clip-to-VRMA converter");
                println!("     (or set VRMA_CONVERTER_BIN in a .env file)");
                println!("  3. Validate configuration: vrma-batch validate-config --check-paths");
                println!("  4. Preview the export: vrma-batch export --dry-run");
                println!("  5. Run export: vrma-batch export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# VRMA Batch Exporter Configuration

[application]
log_level = "info"
dry_run = false

[project]
root = "."
asset_root_name = "Assets"

[export]
input_folder = "Assets/Animations/Clip"
output_folder = "Assets/Animations/Vrma"
clip_extensions = ["anim"]
output_extension = "vrma"
expression_mapping = false
verify_outputs = false

[converter]
program = "${VRMA_CONVERTER_BIN}"
args = []
reference_rig = "standard"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# VRMA Batch Exporter Configuration
#
# Converts every humanoid animation clip below the input folder into a
# VRM Animation (.vrma) file below the output folder, keeping the relative
# folder layout.
#
# Values may reference environment variables with ${VAR_NAME}. Any value can
# also be overridden with VRMA_<SECTION>_<KEY>, e.g. VRMA_EXPORT_INPUT_FOLDER.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (discover clips and print output paths, convert nothing)
dry_run = false

# ============================================================================
# Project Layout
# ============================================================================
[project]
# Project directory
root = "/home/me/AvatarProject"

# Asset root folder below the project directory. Input and output folders
# must start with this name.
asset_root_name = "Assets"

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Folder scanned recursively for clips. Either an asset path or an absolute
# folder inside the project's asset root.
input_folder = "Assets/Animations/Clip"

# Folder receiving the .vrma files (created if missing, files overwritten)
output_folder = "Assets/Animations/Vrma"

# Extensions treated as clip files
clip_extensions = ["anim"]

# Extension of exported files
output_extension = "vrma"

# Map blend shapes of the avatar's expressions to VRM expression presets
# and hand the mapping to the converter (requires avatar)
expression_mapping = true

# Avatar description (JSON), relative to the project root
avatar = "Assets/Avatars/Alicia.avatar.json"

# Re-read written files and compare SHA-256 checksums after the run
verify_outputs = false

# ============================================================================
# Converter
# ============================================================================
[converter]
# Program converting one clip to VRMA on stdout
program = "${VRMA_CONVERTER_BIN}"

# Arguments. Placeholders: {avatar} {clip} {clip_name} {expressions}
# Without placeholders, --avatar/--clip/--name/--expressions are appended.
args = ["--avatar", "{avatar}", "--clip", "{clip}", "--expressions", "{expressions}"]

# Reference avatar bone map: "standard" T-pose or the source "avatar"
reference_rig = "standard"

# Where reference avatar workspaces are created (system temp if unset)
# scratch_dir = "/tmp/vrma-batch"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files
local_enabled = true
local_path = "logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
