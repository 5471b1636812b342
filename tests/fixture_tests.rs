use kinsoku_wrap::config::{load_config, CliArgs};
use kinsoku_wrap::inspect::report_lines;
use kinsoku_wrap::script::{extract_blocks, load_input, render_input, Input};
use kinsoku_wrap::{LineWrapper, Ruleset};
use std::fs;

mod common;
use common::*;

#[test]
fn test_load_all_fixtures() {
    let fixtures = [
        "scene01.json",
        "no_blocks.json",
        "not_export.json",
        "plain.txt",
        "commands.txt",
    ];

    for fixture in fixtures {
        let path = fixture_path(fixture);
        assert!(path.exists(), "Fixture {} should exist", fixture);

        let result = load_input(&path);
        assert!(result.is_ok(), "Failed to load fixture: {}", fixture);
    }
}

#[test]
fn test_fixture_input_kinds() {
    let expectations = [
        ("scene01.json", true),
        ("no_blocks.json", true),
        ("not_export.json", false),
        ("plain.txt", false),
        ("commands.txt", false),
    ];

    for (fixture, is_script) in expectations {
        let input = load_input(&fixture_path(fixture)).unwrap();
        assert_eq!(
            matches!(input, Input::Script(_)),
            is_script,
            "Unexpected input kind for {}",
            fixture
        );
    }
}

#[test]
fn test_scene_fixture_blocks() {
    let rules = Ruleset::default();
    let input = load_input(&fixture_path("scene01.json")).unwrap();

    let (_, report) = render_input(input, &LineWrapper::new(&rules)).unwrap();

    let summary: Vec<(usize, usize)> = report
        .blocks
        .iter()
        .map(|block| (block.line_count, block.visible_count))
        .collect();
    assert_eq!(summary, vec![(3, 148), (2, 13), (2, 82)]);
    assert_eq!(report.max_line_count(), 3);
    assert_eq!(report.visible_count(), 243);
}

#[test]
fn test_scene_fixture_keeps_script_commands() {
    let rules = Ruleset::default();
    let input = load_input(&fixture_path("scene01.json")).unwrap();

    let (rendered, _) = render_input(input, &LineWrapper::new(&rules)).unwrap();
    let export: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let original: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture_path("scene01.json")).unwrap()).unwrap();

    assert_eq!(export["Name"], original["Name"]);
    assert_eq!(export["Id"], original["Id"]);

    let text = export["Text"].as_str().unwrap();
    let source = original["Text"].as_str().unwrap();
    assert_eq!(
        extract_blocks(text).len(),
        extract_blocks(source).len()
    );
    // Only block bodies gain newlines.
    assert_eq!(
        text.len() - source.len(),
        text.matches('\n').count() - source.matches('\n').count()
    );
}

#[test]
fn test_scene_fixture_inspection_measures_dialogue() {
    let rules = Ruleset::default();
    let input = load_input(&fixture_path("scene01.json")).unwrap();

    let (_, report) = render_input(input, &LineWrapper::new(&rules)).unwrap();
    let lines = report_lines(&report);

    let headers = lines.iter().filter(|line| line.starts_with("-- block")).count();
    assert_eq!(headers, 3);
    assert_eq!(lines.len(), 3 + 3 + 2 + 2);
    // Lines come from the wrapped bodies, not from escaped JSON.
    assert!(lines.iter().all(|line| !line.contains("\\n")));
    assert!(lines[2].ends_with("立っ"));
    assert!(lines[3].contains("| ていた。"));
}

#[test]
fn test_no_blocks_fixture_is_unchanged() {
    let rules = Ruleset::default();
    let input = load_input(&fixture_path("no_blocks.json")).unwrap();
    let Input::Script(original) = input.clone() else {
        panic!("no_blocks.json should load as a script export");
    };

    let (rendered, report) = render_input(input, &LineWrapper::new(&rules)).unwrap();
    let export: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert!(report.blocks.is_empty());
    assert_eq!(export, original);
}

#[test]
fn test_commands_fixture_with_config_file() {
    let args = CliArgs {
        config: Some(fixture_path("commands.toml")),
        ..Default::default()
    };
    let config = load_config(&args).unwrap();
    assert_eq!(config.command_patterns.len(), 2);
    assert_eq!(config.lookahead_window, 6);

    let rules = config.ruleset().unwrap();
    let text = fs::read_to_string(fixture_path("commands.txt")).unwrap();
    let out = config.wrapper(&rules).wrap(Some(&text));

    assert!(!out.text.contains("[wait="));
    assert!(!out.text.contains("[shake]"));
    assert_eq!(out.visible_count, 72);
}
