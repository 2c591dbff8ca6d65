use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use coursemap_cli::{Args, OutputFormat, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demo catalogs live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: &Path, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        format,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_json_files(demos_path());

    assert!(!demos.is_empty(), "No demo catalogs found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy().to_string();

        for (format, extension) in [
            (OutputFormat::Json, "json"),
            (OutputFormat::Positions, "positions.json"),
            (OutputFormat::Svg, "svg"),
        ] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));
            let args = args_for(demo, &output_path, format);

            match run(&args) {
                Ok(()) => {
                    let written = fs::read_to_string(&output_path).unwrap();
                    assert!(!written.is_empty(), "{} produced no output", demo.display());
                }
                Err(e) => failed.push((demo.clone(), format, e)),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, format, err) in &failed {
            eprintln!("  - {} ({format:?}): {err}", path.display());
        }
        panic!("{} demo run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo in &error_demos {
        let output_filename = format!("error_{}.json", demo.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        if run(&args_for(demo, &output_path, OutputFormat::Json)).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_platform_catalog_layout() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("platform.json");
    let args = args_for(
        &demos_path().join("platform.json"),
        &output_path,
        OutputFormat::Json,
    );

    run(&args).expect("platform demo should lay out");

    let layout: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let nodes = layout["nodes"].as_array().unwrap();
    let count = |kind: &str| nodes.iter().filter(|n| n["type"] == kind).count();

    assert_eq!(count("root"), 1);
    assert_eq!(count("course"), 4);
    // product-intro has four modules, only three branches
    assert_eq!(count("module"), 12);
    assert!(nodes.iter().all(|n| n["id"] != "module:product-launch"));
    // the unattached draft is left out
    assert!(nodes.iter().all(|n| n["id"] != "lesson:draft-onboarding"));
    assert_eq!(
        layout["edges"].as_array().unwrap().len(),
        nodes.len() - 1
    );
}

#[test]
fn e2e_missing_config_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = args_for(
        &demos_path().join("empty.json"),
        &temp_dir.path().join("out.json"),
        OutputFormat::Json,
    );
    args.config = Some(temp_dir.path().join("missing.toml").to_string_lossy().to_string());

    assert!(run(&args).is_err());
}
