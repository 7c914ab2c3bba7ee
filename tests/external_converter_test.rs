//! End-to-end tests running the configured converter program
//!
//! Standard Unix tools stand in for the converter: `cat` echoes the clip
//! file, `sh` scripts report failures through exit statuses.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vrma_batch::config::{load_config, BatchConfig};
use vrma_batch::core::export::{BatchExportOrchestrator, ExportErrorType};
use vrma_batch::domain::rig::REQUIRED_HUMAN_BONES;
use vrma_batch::domain::AppError;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn avatar_json() -> String {
    let bones: serde_json::Map<String, serde_json::Value> = REQUIRED_HUMAN_BONES
        .iter()
        .map(|bone| (bone.to_string(), serde_json::json!(format!("Armature/{bone}"))))
        .collect();
    let mut nodes: Vec<serde_json::Value> = REQUIRED_HUMAN_BONES
        .iter()
        .map(|bone| serde_json::json!({ "path": format!("Armature/{bone}") }))
        .collect();
    nodes.push(serde_json::json!({
        "path": "Face",
        "skinned_mesh": { "blend_shapes": ["Fcl_ALL_Joy", "Fcl_MTH_A"] }
    }));

    serde_json::json!({
        "name": "Alicia",
        "humanoid_bones": bones,
        "nodes": nodes,
        "expressions": [
            { "preset": "happy", "clip": { "name": "Joy", "morph_target_bindings": [
                { "relative_path": "Face", "index": 0 } ] } },
            { "preset": "aa", "clip": { "name": "A", "morph_target_bindings": [
                { "relative_path": "Face", "index": 1 } ] } }
        ]
    })
    .to_string()
}

/// Writes a project with two humanoid clips and a config using `program`/`args`
fn project(program: &str, args: &[&str], extra_export: &str) -> (TempDir, BatchConfig) {
    let project = TempDir::new().unwrap();
    let root = project.path();
    write(
        root,
        "Assets/Animations/Clip/walk.anim",
        r#"{"name": "Walk", "human_motion": true, "frames": 30}"#,
    );
    write(
        root,
        "Assets/Animations/Clip/Emotes/wave.anim",
        r#"{"human_motion": true, "frames": 12}"#,
    );
    write(root, "Assets/Avatars/Alicia.avatar.json", &avatar_json());

    let args = args
        .iter()
        .map(|arg| format!("'{arg}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let config_path = root.join("vrma-batch.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[project]
root = "{root}"

[export]
input_folder = "Assets/Animations/Clip"
output_folder = "Assets/Animations/Vrma"
{extra_export}

[converter]
program = "{program}"
args = [{args}]
scratch_dir = "{scratch}"

[logging]
local_enabled = false
"#,
            root = root.display(),
            scratch = root.join("scratch").display(),
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    (project, config)
}

fn scratch_is_empty(project: &TempDir) -> bool {
    let scratch = project.path().join("scratch");
    !scratch.exists() || fs::read_dir(scratch).unwrap().next().is_none()
}

#[test]
fn test_cat_converter_exports_every_clip() {
    let (project, config) = project("cat", &["{clip}"], "verify_outputs = true");

    let summary = BatchExportOrchestrator::from_config(&config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(summary.total_candidates, 2);
    assert_eq!(summary.exported_count, 2);
    assert!(summary.is_successful());
    assert!(summary.verification_report.as_ref().unwrap().is_success());

    let walk = fs::read_to_string(project.path().join("Assets/Animations/Vrma/walk.vrma")).unwrap();
    assert!(walk.contains("\"frames\": 30"));
    let wave =
        fs::read_to_string(project.path().join("Assets/Animations/Vrma/Emotes/wave.vrma")).unwrap();
    assert!(wave.contains("\"frames\": 12"));

    assert!(scratch_is_empty(&project));
}

#[test]
fn test_malformed_exit_status_is_reported_per_clip() {
    let script = r#"case "$1" in *wave*) echo "no curves" >&2; exit 3;; *) cat "$1";; esac"#;
    let (project, config) = project("sh", &["-c", script, "sh", "{clip}"], "");

    let summary = BatchExportOrchestrator::from_config(&config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(summary.exported_count, 1);
    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(
        failure.clip_path.as_str(),
        "Assets/Animations/Clip/Emotes/wave.anim"
    );
    assert_eq!(failure.error_type, ExportErrorType::Conversion);
    assert!(failure.message.contains("Malformed clip"));

    assert!(project
        .path()
        .join("Assets/Animations/Vrma/walk.vrma")
        .exists());
    assert!(!project
        .path()
        .join("Assets/Animations/Vrma/Emotes/wave.vrma")
        .exists());
    assert!(scratch_is_empty(&project));
}

#[test]
fn test_expressions_file_handed_to_converter() {
    let (project, config) = project(
        "sh",
        &["-c", "cat \"$1\"", "sh", "{expressions}"],
        "expression_mapping = true\navatar = \"Assets/Avatars/Alicia.avatar.json\"",
    );

    let summary = BatchExportOrchestrator::from_config(&config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(summary.expression_count, Some(2));
    assert_eq!(summary.exported_count, 2);

    let written: serde_json::Value = serde_json::from_slice(
        &fs::read(project.path().join("Assets/Animations/Vrma/walk.vrma")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        written,
        serde_json::json!({ "Fcl_ALL_Joy": "happy", "Fcl_MTH_A": "aa" })
    );
}

#[test]
fn test_missing_program_fails_every_clip() {
    let (project, config) = project("/nonexistent/vrma-convert", &[], "");

    let summary = BatchExportOrchestrator::from_config(&config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(summary.exported_count, 0);
    assert_eq!(summary.failures.len(), 2);
    assert!(!summary.is_successful());
    assert!(scratch_is_empty(&project));
}

#[test]
fn test_missing_avatar_file_is_configuration_error() {
    let (project, config) = project(
        "cat",
        &["{clip}"],
        "expression_mapping = true\navatar = \"Assets/Avatars/Missing.json\"",
    );

    let result = BatchExportOrchestrator::from_config(&config);

    assert!(result.is_err());
    assert!(!project.path().join("Assets/Animations/Vrma").exists());
}

#[test]
fn test_absolute_input_folder_inside_project() {
    let (project, mut config) = project("cat", &["{clip}"], "");
    config.export.input_folder = project
        .path()
        .join("Assets/Animations/Clip/Emotes")
        .display()
        .to_string();

    let orchestrator = BatchExportOrchestrator::from_config(&config).unwrap();
    assert_eq!(
        orchestrator.options().input_folder.as_str(),
        "Assets/Animations/Clip/Emotes"
    );

    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.exported_count, 1);
    assert!(project
        .path()
        .join("Assets/Animations/Vrma/wave.vrma")
        .exists());
}

#[test]
fn test_absolute_input_folder_outside_project_is_rejected() {
    let (project, mut config) = project("cat", &["{clip}"], "");
    let elsewhere = TempDir::new().unwrap();
    config.export.input_folder = elsewhere.path().display().to_string();

    let err = BatchExportOrchestrator::from_config(&config).unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert!(!project.path().join("Assets/Animations/Vrma").exists());
}
