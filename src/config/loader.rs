//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BatchConfig;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use crate::domain::RigSource;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BatchConfig
/// 4. Applies environment variable overrides (VRMA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use vrma_batch::config::loader::load_config;
///
/// let config = load_config("vrma-batch.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BatchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BatchConfig = toml::from_str(&contents)
        .map_err(|e| AppError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        AppError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VRMA_* prefix
///
/// Environment variables follow the pattern: VRMA_<SECTION>_<KEY>
/// For example: VRMA_EXPORT_INPUT_FOLDER, VRMA_CONVERTER_PROGRAM
fn apply_env_overrides(config: &mut BatchConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("VRMA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("VRMA_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Project overrides
    if let Ok(val) = std::env::var("VRMA_PROJECT_ROOT") {
        config.project.root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("VRMA_PROJECT_ASSET_ROOT_NAME") {
        config.project.asset_root_name = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("VRMA_EXPORT_INPUT_FOLDER") {
        config.export.input_folder = val;
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_OUTPUT_FOLDER") {
        config.export.output_folder = val;
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_CLIP_EXTENSIONS") {
        config.export.clip_extensions = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_OUTPUT_EXTENSION") {
        config.export.output_extension = val;
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_EXPRESSION_MAPPING") {
        config.export.expression_mapping = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_AVATAR") {
        config.export.avatar = Some(val);
    }
    if let Ok(val) = std::env::var("VRMA_EXPORT_VERIFY_OUTPUTS") {
        config.export.verify_outputs = val.parse().unwrap_or(false);
    }

    // Converter overrides
    if let Ok(val) = std::env::var("VRMA_CONVERTER_PROGRAM") {
        config.converter.program = val;
    }
    if let Ok(val) = std::env::var("VRMA_CONVERTER_REFERENCE_RIG") {
        config.converter.reference_rig = val
            .parse::<RigSource>()
            .map_err(AppError::Configuration)?;
    }
    if let Ok(val) = std::env::var("VRMA_CONVERTER_SCRATCH_DIR") {
        config.converter.scratch_dir = Some(PathBuf::from(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VRMA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("VRMA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("VRMA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VRMA_LOADER_TEST_VAR", "vrma-convert");
        let input = "program = \"${VRMA_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "program = \"vrma-convert\"\n");
        std::env::remove_var("VRMA_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("VRMA_LOADER_COMMENTED");
        let input = "# program = \"${VRMA_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("VRMA_LOADER_MISSING_A");
        std::env::remove_var("VRMA_LOADER_MISSING_B");
        let input = "a = \"${VRMA_LOADER_MISSING_A}\"\nb = \"${VRMA_LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("VRMA_LOADER_MISSING_A"));
        assert!(message.contains("VRMA_LOADER_MISSING_B"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[project]
root = "/projects/demo"

[export]
input_folder = "Assets/Motions"
output_folder = "Assets/Exported"
clip_extensions = ["anim", "clip"]

[converter]
program = "vrma-convert"
args = ["--avatar", "{avatar}", "--clip", "{clip}"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.project.root, PathBuf::from("/projects/demo"));
        assert_eq!(config.export.input_folder, "Assets/Motions");
        assert_eq!(config.export.clip_extensions, vec!["anim", "clip"]);
        assert_eq!(config.export.output_extension, "vrma");
        assert_eq!(config.converter.args.len(), 4);
        assert_eq!(config.converter.reference_rig, RigSource::Standard);
    }
}
