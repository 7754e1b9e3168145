//! Integration tests that verify all demo .weft files can be translated.

use std::fs;
use std::path::{Path, PathBuf};
use weft_alloy::render_model;
use weft_syntax::parse;
use weft_translate::translate_program;

fn find_weft_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if path.is_dir() {
                files.extend(find_weft_files(&path));
            } else if path.extension().is_some_and(|e| e == "weft") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn demos_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

#[test]
fn all_demos_translate_and_render() {
    let files = find_weft_files(&demos_dir());
    assert!(!files.is_empty(), "no .weft files found under demos/");

    for file in &files {
        let source = fs::read_to_string(file).unwrap();
        let program =
            parse(&source).unwrap_or_else(|e| panic!("{}: parse failed: {e}", file.display()));
        let model = translate_program(&[program])
            .unwrap_or_else(|e| panic!("{}: translation failed: {e}", file.display()));
        let text = render_model(&model);

        for pred in ["init", "step", "allEnd", "completeRun"] {
            assert!(
                text.contains(&format!("pred {} {{", pred)),
                "{}: missing pred {}",
                file.display(),
                pred
            );
        }
        assert!(text.contains("assert runSatisfiesAssertions {"));
    }
}

#[test]
fn counter_demo_carries_global_state() {
    let source = fs::read_to_string(demos_dir().join("counter.weft")).unwrap();
    let model = translate_program(&[parse(&source).unwrap()]).unwrap();
    let text = render_model(&model);

    assert!(text.contains("one sig Globals {"));
    assert!(text.contains("pred globals_init[st: Globals] {"));
    assert!(text.contains("total' = total ++ Globals -> plus[Globals.total, 1]"));
}

#[test]
fn handshake_demo_composes_two_machines() {
    let source = fs::read_to_string(demos_dir().join("handshake.weft")).unwrap();
    let model = translate_program(&[parse(&source).unwrap()]).unwrap();
    let text = render_model(&model);

    assert!(text.contains("(some x: LeftOp | left_step[x] or some x: RightOp | right_step[x])"));
    assert!(text.contains("all x: LeftOp | left_assert[x]"));
}
