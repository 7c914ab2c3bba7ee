//! Integration tests for the batch export orchestrator
//!
//! These tests run the orchestrator over an on-disk project with a fake
//! converter that counts reference avatar creation and release.

use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vrma_batch::adapters::assets::FileSystemAssets;
use vrma_batch::adapters::converter::VrmaConverter;
use vrma_batch::core::export::{BatchExportOrchestrator, ExportErrorType, ExportOptions};
use vrma_batch::core::paths::PathMapper;
use vrma_batch::domain::rig::REQUIRED_HUMAN_BONES;
use vrma_batch::domain::{
    AnimationClipRef, AppError, AssetPath, AvatarDefinition, ConversionError, ExpressionClip,
    ExpressionDefinition, ExpressionIndex, ExpressionPreset, MorphTargetBinding, ReferenceRig,
    RigSource, SceneNode, SkinnedMesh,
};

#[derive(Clone, Default)]
struct Counters {
    created: Arc<AtomicUsize>,
    destroyed: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
    max_live: Arc<AtomicUsize>,
    expression_sizes: Arc<Mutex<Vec<usize>>>,
}

/// Converter emitting `VRMA:<clip path>`, failing for the configured clip names
struct CountingConverter {
    counters: Counters,
    fail_on: Vec<&'static str>,
}

impl CountingConverter {
    fn new(counters: &Counters) -> Self {
        Self {
            counters: counters.clone(),
            fail_on: Vec::new(),
        }
    }

    fn failing_on(mut self, name: &'static str) -> Self {
        self.fail_on.push(name);
        self
    }
}

impl VrmaConverter for CountingConverter {
    type Avatar = usize;

    fn create_reference_avatar(&self, _rig: &ReferenceRig) -> Result<usize, ConversionError> {
        let id = self.counters.created.fetch_add(1, Ordering::SeqCst);
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
        Ok(id)
    }

    fn destroy_reference_avatar(&self, _avatar: usize) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    fn convert(
        &self,
        _avatar: &usize,
        clip: &AnimationClipRef,
        expressions: Option<&ExpressionIndex>,
    ) -> Result<Vec<u8>, ConversionError> {
        if let Some(index) = expressions {
            self.counters
                .expression_sizes
                .lock()
                .unwrap()
                .push(index.len());
        }
        if self.fail_on.contains(&clip.name.as_str()) {
            return Err(ConversionError::MalformedClip(format!(
                "{} has no curves",
                clip.name
            )));
        }
        Ok(format!("VRMA:{}", clip.path).into_bytes())
    }
}

fn write_clip(project: &TempDir, relative: &str, human: bool) {
    let path = project.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!(r#"{{"human_motion": {human}, "curves": []}}"#)).unwrap();
}

fn asset(path: &str) -> AssetPath {
    AssetPath::new(path).unwrap()
}

fn options() -> ExportOptions {
    ExportOptions::new(asset("Assets/Clip"), asset("Assets/Vrma"))
}

fn orchestrator(
    project: &TempDir,
    converter: CountingConverter,
    options: ExportOptions,
) -> BatchExportOrchestrator<CountingConverter> {
    let paths = PathMapper::for_project(project.path(), "Assets");
    let assets = FileSystemAssets::new(paths.clone(), &["anim".to_string()]);
    BatchExportOrchestrator::new(Arc::new(assets), converter, paths, options)
}

fn humanoid_avatar() -> AvatarDefinition {
    let mut humanoid_bones = BTreeMap::new();
    let mut nodes = Vec::new();
    for bone in REQUIRED_HUMAN_BONES {
        let path = format!("Root/{bone}");
        humanoid_bones.insert(bone.to_string(), path.clone());
        nodes.push(SceneNode {
            path,
            translation: [0.0, 0.1, 0.0],
            skinned_mesh: None,
        });
    }
    nodes.push(SceneNode {
        path: "Body".to_string(),
        translation: [0.0; 3],
        skinned_mesh: Some(SkinnedMesh {
            blend_shapes: vec!["MTH_A".to_string(), "EYE_Blink".to_string()],
        }),
    });

    let slot = |preset, name: &str, index| ExpressionDefinition {
        preset,
        clip: Some(ExpressionClip {
            name: name.to_string(),
            morph_target_bindings: vec![MorphTargetBinding {
                relative_path: "Body".to_string(),
                index,
                weight: 1.0,
            }],
        }),
    };

    AvatarDefinition {
        name: "Tester".to_string(),
        humanoid_bones,
        nodes,
        expressions: vec![
            slot(ExpressionPreset::Aa, "A", 0),
            slot(ExpressionPreset::Blink, "Blink", 1),
            slot(ExpressionPreset::BlinkLeft, "BlinkL", 1),
        ],
    }
}

#[test]
fn test_three_humanoid_one_non_humanoid() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/walk.anim", true);
    write_clip(&project, "Assets/Clip/run.anim", true);
    write_clip(&project, "Assets/Clip/jump.anim", true);
    write_clip(&project, "Assets/Clip/door_open.anim", false);

    let counters = Counters::default();
    let summary = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();

    assert_eq!(summary.total_candidates, 3);
    assert_eq!(summary.exported_count, 3);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.skipped_non_humanoid, 1);

    for name in ["walk", "run", "jump"] {
        let written = fs::read(project.path().join(format!("Assets/Vrma/{name}.vrma"))).unwrap();
        assert_eq!(written, format!("VRMA:Assets/Clip/{name}.anim").into_bytes());
    }
    assert!(!project.path().join("Assets/Vrma/door_open.vrma").exists());
    assert_eq!(fs::read_dir(project.path().join("Assets/Vrma")).unwrap().count(), 3);
}

#[test]
fn test_malformed_clip_fails_alone() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/a.anim", true);
    write_clip(&project, "Assets/Clip/broken.anim", true);
    write_clip(&project, "Assets/Clip/c.anim", true);

    let counters = Counters::default();
    let converter = CountingConverter::new(&counters).failing_on("broken");
    let summary = orchestrator(&project, converter, options()).run().unwrap();

    assert_eq!(summary.exported_count, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].clip_path.as_str(), "Assets/Clip/broken.anim");
    assert_eq!(summary.failures[0].error_type, ExportErrorType::Conversion);
    assert!(summary.failures[0].message.contains("no curves"));

    assert!(project.path().join("Assets/Vrma/a.vrma").exists());
    assert!(!project.path().join("Assets/Vrma/broken.vrma").exists());
    assert!(project.path().join("Assets/Vrma/c.vrma").exists());
}

#[test]
fn test_every_avatar_is_released() {
    let project = TempDir::new().unwrap();
    for name in ["a", "b", "c", "d"] {
        write_clip(&project, &format!("Assets/Clip/{name}.anim"), true);
    }

    let counters = Counters::default();
    let converter = CountingConverter::new(&counters)
        .failing_on("b")
        .failing_on("d");
    let summary = orchestrator(&project, converter, options()).run().unwrap();

    assert_eq!(summary.total_candidates, 4);
    assert_eq!(counters.created.load(Ordering::SeqCst), 4);
    assert_eq!(counters.destroyed.load(Ordering::SeqCst), 4);
    assert_eq!(counters.live.load(Ordering::SeqCst), 0);
    assert_eq!(counters.max_live.load(Ordering::SeqCst), 1);
}

#[test]
fn test_exported_plus_failed_equals_candidates() {
    let project = TempDir::new().unwrap();
    for (name, human) in [("a", true), ("b", true), ("c", false), ("d", true), ("e", true)] {
        write_clip(&project, &format!("Assets/Clip/sub/{name}.anim"), human);
    }
    fs::write(project.path().join("Assets/Clip/sub/garbage.anim"), "not json").unwrap();

    let counters = Counters::default();
    let converter = CountingConverter::new(&counters).failing_on("d");
    let summary = orchestrator(&project, converter, options()).run().unwrap();

    assert_eq!(
        summary.exported_count + summary.failures.len(),
        summary.total_candidates
    );
    assert_eq!(summary.total_candidates, 4);
    assert_eq!(summary.skipped_non_humanoid, 1);
    assert_eq!(summary.skipped_unloadable, 1);
}

#[test]
fn test_output_directories_created_and_rerun_overwrites() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/Locomotion/Fast/sprint.anim", true);

    let counters = Counters::default();
    let first = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();
    let output = project
        .path()
        .join("Assets/Vrma/Locomotion/Fast/sprint.vrma");
    let first_bytes = fs::read(&output).unwrap();

    let second = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();
    let second_bytes = fs::read(&output).unwrap();

    assert_eq!(first.exported_files[0].output, second.exported_files[0].output);
    assert_eq!(first.exported_files[0].checksum, second.exported_files[0].checksum);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(
        fs::read_dir(output.parent().unwrap()).unwrap().count(),
        1
    );
}

#[test]
fn test_changing_output_folder_changes_only_prefix() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/Idle/breathe.anim", true);

    let counters = Counters::default();
    let mut other = options();
    other.output_folder = asset("Assets/Export/Vrma");

    let one = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();
    let two = orchestrator(&project, CountingConverter::new(&counters), other)
        .run()
        .unwrap();

    assert_eq!(one.exported_files[0].output.as_str(), "Assets/Vrma/Idle/breathe.vrma");
    assert_eq!(
        two.exported_files[0].output.as_str(),
        "Assets/Export/Vrma/Idle/breathe.vrma"
    );
}

#[test]
fn test_expression_index_passed_to_every_conversion() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/talk.anim", true);
    write_clip(&project, "Assets/Clip/wink.anim", true);

    let counters = Counters::default();
    let mut options = options().with_expressions(humanoid_avatar());
    options.reference_rig = RigSource::Avatar;
    let summary = orchestrator(&project, CountingConverter::new(&counters), options)
        .run()
        .unwrap();

    // BlinkLeft shares EYE_Blink with Blink; the first mapping wins
    assert_eq!(summary.expression_count, Some(2));
    assert_eq!(*counters.expression_sizes.lock().unwrap(), vec![2, 2]);
    assert_eq!(summary.exported_count, 2);
}

#[test]
fn test_plain_export_passes_no_expression_index() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/talk.anim", true);

    let counters = Counters::default();
    let summary = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();

    assert_eq!(summary.expression_count, None);
    assert!(counters.expression_sizes.lock().unwrap().is_empty());
}

#[test]
fn test_configuration_error_blocks_run() {
    let project = TempDir::new().unwrap();

    let counters = Counters::default();
    let err = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert_eq!(counters.created.load(Ordering::SeqCst), 0);
    assert!(!project.path().join("Assets/Vrma").exists());
}

#[test]
fn test_non_humanoid_avatar_blocks_expression_run() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/talk.anim", true);

    let mut avatar = humanoid_avatar();
    avatar.humanoid_bones.remove("hips");

    let counters = Counters::default();
    let err = orchestrator(
        &project,
        CountingConverter::new(&counters),
        options().with_expressions(avatar),
    )
    .run()
    .unwrap_err();

    assert!(matches!(err, AppError::Configuration(message) if message.contains("hips")));
    assert_eq!(counters.created.load(Ordering::SeqCst), 0);
    assert!(!project.path().join("Assets/Vrma").exists());
}

#[test]
fn test_verify_outputs_after_export() {
    let project = TempDir::new().unwrap();
    write_clip(&project, "Assets/Clip/a.anim", true);
    write_clip(&project, "Assets/Clip/b.anim", true);

    let counters = Counters::default();
    let mut options = options();
    options.verify_outputs = true;
    let summary = orchestrator(&project, CountingConverter::new(&counters), options)
        .run()
        .unwrap();

    let report = summary.verification_report.as_ref().unwrap();
    assert_eq!(report.total_verified, 2);
    assert!(report.is_success());
    assert!(summary.is_successful());
}

#[test]
fn test_empty_input_folder_succeeds() {
    let project = TempDir::new().unwrap();
    fs::create_dir_all(project.path().join("Assets/Clip")).unwrap();
    fs::write(project.path().join("Assets/Other.anim"), "{}").unwrap();

    let counters = Counters::default();
    let summary = orchestrator(&project, CountingConverter::new(&counters), options())
        .run()
        .unwrap();

    assert_eq!(summary.total_candidates, 0);
    assert!(summary.is_successful());
    assert!(!project.path().join("Assets/Vrma").exists());
}
