//! Full-pipeline integration test for lsr.
//!
//! Exercises the whole stack:
//! 1. Creates a realistic project fixture
//! 2. Drives the lister library over the real filesystem provider
//! 3. Verifies traversal ordering, filtering, and count consistency
//! 4. Runs the binary for long-format and exit-status checks
//!
//! Run with tracing output:
//!   RUST_LOG=debug cargo test --test integration -- --nocapture

use assert_cmd::Command;
use lsr::format::FormatConfig;
use lsr::identity::SystemIdentityResolver;
use lsr::lister::{ListOptions, Lister};
use lsr::provider::OsMetadataProvider;
use lsr::status::Reporter;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info, span, Level};
use tracing_subscriber::EnvFilter;

// ───────────────────────────────────────────────────
// Helpers
// ───────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .try_init();
}

/// Create a realistic project fixture.
fn create_project_fixture(root: &Path) {
    info!("Creating project fixture at {}", root.display());

    let dirs = ["src", "src/components", "tests", "docs", ".git"];
    let files = [
        ("src/main.rs", "fn main() { }"),
        ("src/lib.rs", "pub mod components;"),
        ("src/components/button.rs", "pub struct Button;"),
        ("tests/integration.rs", "#[test] fn it_works() {}"),
        ("docs/README.md", "# My Project"),
        ("Cargo.toml", "[package]\nname = \"myproject\""),
        (".gitignore", "target/\n"),
        (".git/config", "[core]"),
    ];

    for dir in &dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
        debug!("  Created dir:  {}", dir);
    }
    for (file, content) in &files {
        fs::write(root.join(file), content).unwrap();
        debug!("  Created file: {}", file);
    }
}

/// Run the lister library over the real filesystem, capturing both streams.
fn run_library(root: &Path, options: ListOptions) -> (String, String, i32) {
    let format = FormatConfig {
        human_readable: false,
        now_unix: OffsetDateTime::now_utc().unix_timestamp(),
        utc_offset: UtcOffset::UTC,
    };
    let provider = OsMetadataProvider;
    let identity = SystemIdentityResolver;
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = {
        let mut lister = Lister::new(
            &provider,
            &identity,
            options,
            format,
            &mut out,
            Reporter::new("lsr", &mut err),
        );
        lister.run(&[root.to_path_buf()]).unwrap();
        lister.into_status().exit_code()
    };
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
        code,
    )
}

// ───────────────────────────────────────────────────
// Test 1: Full lifecycle
// ───────────────────────────────────────────────────

#[test]
fn test_full_lifecycle() {
    init_tracing();
    let _span = span!(Level::INFO, "full_lifecycle_test").entered();

    let tmp = TempDir::new().unwrap();
    create_project_fixture(tmp.path());
    let root = tmp.path();

    // --- Step 1: recursive short listing ---
    {
        let _span = span!(Level::INFO, "recursive_listing").entered();
        let options = ListOptions {
            recursive: true,
            ..ListOptions::default()
        };
        let (out, err, code) = run_library(root, options);
        info!("Recursive listing produced {} bytes", out.len());

        assert_eq!(code, 0, "clean fixture should list cleanly: {err}");
        assert!(err.is_empty(), "no diagnostics expected: {err}");

        // Hidden entries are filtered from both output and recursion.
        assert!(!out.contains(".git"), "FAIL: .git should be hidden:\n{out}");
        assert!(!out.contains(".gitignore"), "FAIL: .gitignore should be hidden");
        info!("  [PASS] hidden entries filtered");

        // Every top-level entry appears before any subdirectory section,
        // whatever order readdir delivered them in.
        let src_header = format!("{}:", root.join("src").display());
        let components_header = format!("{}:", root.join("src/components").display());
        let src_pos = out.find(&src_header).expect("src header missing");
        let comp_pos = out.find(&components_header).expect("components header missing");
        let first_section = out.find("\n\n").expect("sections expected");
        for entry in ["src/", "tests/", "docs/", "Cargo.toml"] {
            let pos = out.find(entry).unwrap_or_else(|| panic!("{entry} missing:\n{out}"));
            assert!(
                pos < first_section,
                "FAIL: top-level entry {entry} should precede subdirectory sections:\n{out}"
            );
        }
        assert!(
            src_pos < comp_pos,
            "FAIL: src section should precede src/components section:\n{out}"
        );
        let button_pos = out.find("button.rs").expect("button.rs missing");
        assert!(comp_pos < button_pos, "FAIL: nested entries follow their header");
        info!("  [PASS] parent listings precede subdirectory sections");
    }

    // --- Step 2: count consistency ---
    {
        let _span = span!(Level::INFO, "count_consistency").entered();
        let options = ListOptions {
            count_only: true,
            ..ListOptions::default()
        };
        let (out, _, code) = run_library(root, options);
        assert_eq!(out, "4\n", "top-level non-hidden entries");
        assert_eq!(code, 0);

        let options = ListOptions {
            count_only: true,
            recursive: true,
            ..ListOptions::default()
        };
        let (out, _, _) = run_library(root, options);
        assert_eq!(out, "10\n", "all non-hidden entries in the tree");
        info!("  [PASS] counts consistent with the fixture");
    }

    // --- Step 3: long format through the binary ---
    {
        let _span = span!(Level::INFO, "binary_long_format").entered();
        let output = Command::cargo_bin("lsr")
            .unwrap()
            .arg("-l")
            .arg(root)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8(output.stdout).unwrap();
        info!("Long listing:\n{stdout}");

        for line in stdout.lines() {
            assert!(
                line.starts_with('d') || line.starts_with('-'),
                "FAIL: unexpected type char in {line:?}"
            );
            // type char + nine permission chars, then a space.
            assert_eq!(line.as_bytes()[10], b' ', "FAIL: malformed line {line:?}");
        }
        assert!(stdout.contains("Cargo.toml"), "FAIL: Cargo.toml missing");
        assert!(stdout.contains("src/"), "FAIL: src/ missing");
        info!("  [PASS] long-format lines well formed");
    }

    info!("Full lifecycle test passed");
}
