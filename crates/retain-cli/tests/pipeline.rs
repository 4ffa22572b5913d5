//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use retain_cli::pipeline::{
    OptionSources, classify_types, generate, load_snapshot, resolve_options, run_passes,
    write_plan_json,
};
use retain_model::{Artifact, ProcessorOptions, Severity, TypeCategory};
use serde_json::json;

fn write_snapshot(dir: &Path, value: &serde_json::Value) -> PathBuf {
    let path = dir.join("snapshot.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn app_snapshot() -> serde_json::Value {
    json!({
        "classes": [
            {
                "qualified_name": "com.example.MainActivity",
                "supertypes": ["dev.retain.StateSavingActivity"],
                "properties": [
                    {
                        "name": "count",
                        "type": "kotlin.Int",
                        "retain": { "across": ["CONFIGURATION_CHANGE", "PROCESS_DEATH"] }
                    },
                    { "name": "title", "type": "kotlin.String" }
                ]
            }
        ]
    })
}

#[test]
fn test_generate_writes_runtime_and_saver() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), &app_snapshot());
    let out_dir = dir.path().join("out");

    let result = generate(&snapshot, ProcessorOptions::default(), &out_dir, false).unwrap();

    assert!(!result.has_errors());
    assert_eq!(result.run.passes, 2);
    assert_eq!(result.written.len(), 6);
    for name in [
        "StateSaver.kt",
        "StateHolder.kt",
        "FragmentIdentificationStrategy.kt",
        "StateSavingActivity.kt",
        "StateSavingFragment.kt",
        "GeneratedStateSaver.kt",
    ] {
        assert!(out_dir.join("dev/retain").join(name).is_file(), "{name}");
    }
    let saver = fs::read_to_string(out_dir.join("dev/retain/GeneratedStateSaver.kt")).unwrap();
    assert!(saver.contains("com.example.MainActivity#count"));
    assert!(!saver.contains("title"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), &app_snapshot());
    let out_dir = dir.path().join("out");

    let result = generate(&snapshot, ProcessorOptions::default(), &out_dir, true).unwrap();

    assert_eq!(result.files.len(), 6);
    assert!(result.written.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn test_dependency_build_writes_marker() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), &app_snapshot());
    let out_dir = dir.path().join("out");
    let options = ProcessorOptions::default().with_dependency(true);

    let result = generate(&snapshot, options, &out_dir, false).unwrap();

    assert!(
        !result
            .run
            .artifacts
            .iter()
            .any(|artifact| matches!(artifact, Artifact::Saver(_)))
    );
    let marker = fs::read_to_string(out_dir.join("dev/retain/dependencies/retain_0be6aa1.kt")).unwrap();
    insta::assert_snapshot!(marker, @r"
    package dev.retain.dependencies

    const val retain_0be6aa1 = 0
    const val com_example = 0
    ");
}

#[test]
fn test_app_build_picks_up_library_components() {
    let snapshot = json!({
        "libraries": [
            {
                "qualified_name": "com.lib.ui.ProfileActivity",
                "supertypes": ["dev.retain.StateSavingActivity"],
                "properties": [
                    {
                        "name": "draft",
                        "type": "kotlin.String?",
                        "retain": { "across": ["PROCESS_DEATH"] }
                    }
                ]
            }
        ],
        "markers": [
            { "file_property": "retain_1234567", "packages": ["com_lib_ui"] }
        ]
    });
    let snapshot = serde_json::from_value(snapshot).unwrap();

    let run = run_passes(&snapshot, &ProcessorOptions::default());

    let saver = run
        .artifacts
        .iter()
        .find_map(|artifact| match artifact {
            Artifact::Saver(plan) => Some(plan),
            _ => None,
        })
        .unwrap();
    assert_eq!(saver.components.len(), 1);
    assert_eq!(saver.components[0].component, "com.lib.ui.ProfileActivity");
}

#[test]
fn test_unresolved_component_is_reported_after_last_pass() {
    let snapshot = json!({
        "classes": [
            {
                "qualified_name": "com.example.OrphanActivity",
                "supertypes": ["com.missing.BaseActivity"],
                "properties": [
                    {
                        "name": "count",
                        "type": "kotlin.Int",
                        "retain": { "across": ["CONFIGURATION_CHANGE"] }
                    }
                ]
            }
        ]
    });
    let snapshot = serde_json::from_value(snapshot).unwrap();
    let options = ProcessorOptions {
        max_passes: 3,
        ..ProcessorOptions::default()
    };

    let run = run_passes(&snapshot, &options);

    assert!(run.has_errors());
    assert_eq!(run.passes, 3);
    let error = run
        .diagnostics
        .iter()
        .find(|diagnostic| diagnostic.severity == Severity::Error)
        .unwrap();
    assert_eq!(error.code, "RT020");
    assert_eq!(error.symbol.as_deref(), Some("com.example.OrphanActivity#count"));
}

#[test]
fn test_options_layer_config_then_overrides_then_flags() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), &app_snapshot());
    fs::write(
        dir.path().join("retain.toml"),
        "package = \"com.example.gen\"\ndebug_logging = true\nmax_passes = 4\n",
    )
    .unwrap();

    let from_file = resolve_options(&snapshot, &OptionSources::default()).unwrap();
    assert_eq!(from_file.package, "com.example.gen");
    assert!(from_file.debug_logging);
    assert_eq!(from_file.max_passes, 4);

    let sources = OptionSources {
        overrides: vec![
            "retain.emitRuntime=false".to_string(),
            "retain.package=com.example.opt".to_string(),
        ],
        package: Some("com.example.flag".to_string()),
        dependency: true,
        ..OptionSources::default()
    };
    let layered = resolve_options(&snapshot, &sources).unwrap();
    assert_eq!(layered.package, "com.example.flag");
    assert!(!layered.emit_runtime);
    assert!(layered.is_dependency);
    assert_eq!(layered.max_passes, 4);
}

#[test]
fn test_bad_option_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), &app_snapshot());
    let sources = OptionSources {
        overrides: vec!["retain.isDependency=maybe".to_string()],
        ..OptionSources::default()
    };

    let error = resolve_options(&snapshot, &sources).unwrap_err();

    assert!(format!("{error:#}").contains("retain.isDependency"));
}

#[test]
fn test_missing_snapshot_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let error = load_snapshot(&path).unwrap_err();

    assert!(error.to_string().contains("absent.json"));
}

#[test]
fn test_plan_json_lists_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = serde_json::from_value(app_snapshot()).unwrap();
    let run = run_passes(&snapshot, &ProcessorOptions::default());
    let path = dir.path().join("reports/plan.json");

    write_plan_json(&path, &run).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let kinds: Vec<&str> = written["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|artifact| artifact["artifact"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["runtime", "saver"]);
    assert_eq!(written["passes"], 2);
}

#[test]
fn test_classify_uses_snapshot_classes() {
    let snapshot = serde_json::from_value(json!({
        "libraries": [
            { "qualified_name": "com.example.User", "supertypes": ["android.os.Parcelable"] }
        ]
    }))
    .unwrap();
    let types = vec![
        "kotlin.Int".to_string(),
        "com.example.User".to_string(),
        "com.example.Unknown".to_string(),
    ];

    let rows = classify_types(&types, Some(&snapshot)).unwrap();

    assert_eq!(rows[0].1.category, TypeCategory::NonNullPrimitive);
    assert_eq!(rows[0].1.suffix(), Some("Int"));
    assert_eq!(rows[1].1.category, TypeCategory::SerializableOrTransferable);
    assert_eq!(rows[2].1.category, TypeCategory::Unsupported);
}

#[test]
fn test_classify_rejects_malformed_types() {
    let error = classify_types(&["kotlin.collections.List<".to_string()], None).unwrap_err();

    assert!(error.to_string().contains("kotlin.collections.List<"));
}
