//! Conformance tests that run YAML fixtures against amroute
//!
//! Run with: cargo test -p amroute-test --test conformance --features amroute-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use amroute_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the conformance directory relative to the workspace root
fn fixtures_dir() -> PathBuf {
    // The manifest dir is ext/test, we need to go up to the workspace root
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let ext_test = Path::new(manifest_dir);

    let workspace_root = ext_test
        .parent() // ext
        .and_then(|p| p.parent()) // workspace
        .expect("Could not find workspace root");

    workspace_root.join("conformance")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    if !dir.exists() {
        panic!("Fixtures directory does not exist: {}", dir.display());
    }

    for entry in fs::read_dir(dir).expect("read dir") {
        let entry = entry.expect("dir entry");
        let path = entry.path();

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
            }
        }
    }
}

#[test]
fn test_matchers() {
    run_fixtures_in_dir(&fixtures_dir().join("01_matchers"));
}

#[test]
fn test_traversal() {
    run_fixtures_in_dir(&fixtures_dir().join("02_traversal"));
}

#[test]
fn test_inheritance() {
    run_fixtures_in_dir(&fixtures_dir().join("03_inheritance"));
}

#[test]
fn test_invalid_config() {
    run_fixtures_in_dir(&fixtures_dir().join("04_invalid"));
}
