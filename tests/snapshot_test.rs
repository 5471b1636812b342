use insta::{assert_debug_snapshot, assert_snapshot};
use kinsoku_wrap::inspect::line_stats;
use kinsoku_wrap::script::process_file;
use kinsoku_wrap::{LineWrapper, Ruleset};
use std::fs;
use tempfile::TempDir;

mod common;
use common::*;

fn render_stats(text: &str) -> String {
    line_stats(text)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_japanese_paragraph_inspection() {
    let text = fs::read_to_string(fixture_path("plain.txt")).unwrap();
    let out = wrap_default(&text);

    assert_snapshot!(render_stats(&out.text));
}

#[test]
fn test_english_markup_lines() {
    let text = "<color=#ffcc00>Lira</color> leaned against the window frame, <i>twirling a strand of hair</i> around one finger. \"Hey, weed. You're still here? <sprite=12> Don't tell me you were waiting for __me__.\" She laughed, but it sounded forced.";
    let out = wrap_default(text);

    assert_eq!(out.visible_count, 190);
    assert_debug_snapshot!(out.lines().collect::<Vec<_>>());
}

#[test]
fn test_script_export_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("scene01.json");
    let rules = Ruleset::default();

    let report = process_file(
        &fixture_path("scene01.json"),
        &output,
        &LineWrapper::new(&rules),
        true,
    )
    .unwrap();

    assert_eq!(report.blocks.len(), 3);
    assert_snapshot!(fs::read_to_string(&output).unwrap());
}
