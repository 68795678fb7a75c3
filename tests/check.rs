mod common;

use common::{gospec_fs, run};
use gocov::cli::Command;
use gocov::config::{Config, GocovConfig};
use gocov::sys::MemFs;

const README_CONFIG: &str =
    "{\n\t\"threshold\": 70.00,\n\t\"readme_threshold_regex\": \"Code coverage threshold: (.*)$\"\n}";

fn readme(threshold: &str) -> String {
    format!("# Some title\n\nSome text\n\n## Code coverage\nCode coverage threshold: {threshold}\n")
}

fn check(fs: &MemFs) -> (String, String, i32) {
    let out = run(fs, Config::default(), Command::Check);
    (out.stdout, out.stderr, out.code)
}

#[test]
fn below_threshold() {
    let fs = gospec_fs().with(".gocov", "{\n\t\"threshold\": 75.52\n}");
    let (stdout, stderr, code) = check(&fs);
    assert_eq!(stdout, "");
    assert_eq!(
        stderr,
        "Coverage check failed: expected to have 75.52 coverage, but got 73.37\n"
    );
    assert_eq!(code, 1);
}

#[test]
fn above_threshold() {
    let fs = gospec_fs().with(".gocov", "{\n\t\"threshold\": 23.88\n}");
    assert_eq!(check(&fs), (String::new(), String::new(), 0));
}

#[test]
fn missing_project_config() {
    let (_, stderr, code) = check(&gospec_fs());
    assert_eq!(
        stderr,
        "Coverage check failed: missing .gocov file with defined threshold\n"
    );
    assert_eq!(code, 1);
}

#[test]
fn missing_module_descriptor() {
    let fs = MemFs::new()
        .with("coverage.out", common::GOSPEC_PROFILE)
        .with(".gocov", "{\"threshold\": 10}");
    let (_, stderr, code) = check(&fs);
    assert_eq!(stderr, "failed to open go.mod: file does not exist\n");
    assert_eq!(code, 1);
}

#[test]
fn command_line_threshold_wins() {
    let fs = gospec_fs().with(".gocov", "{\"threshold\": 10}");
    let config = Config {
        threshold: 90.0,
        ..Default::default()
    };
    let out = run(&fs, config, Command::Check);
    assert_eq!(
        out.stderr,
        "Coverage check failed: expected to have 90.00 coverage, but got 73.37\n"
    );
}

#[test]
fn global_threshold_fills_in() {
    let fs = gospec_fs().with(".gocov", "{\"ignore\": []}");
    let config = Config {
        global: Some(GocovConfig {
            threshold: 80.0,
            ..Default::default()
        }),
        ..Default::default()
    };
    let out = run(&fs, config, Command::Check);
    assert_eq!(
        out.stderr,
        "Coverage check failed: expected to have 80.00 coverage, but got 73.37\n"
    );
    assert_eq!(out.code, 1);
}

#[test]
fn below_readme_threshold() {
    let fs = gospec_fs()
        .with(".gocov", README_CONFIG)
        .with("README.md", readme("80.00"));
    let (stdout, stderr, code) = check(&fs);
    assert_eq!(stdout, "");
    assert_eq!(
        stderr,
        "Coverage check failed in README.md: expected to have 80.00 coverage, but got 73.37\n"
    );
    assert_eq!(code, 1);
}

#[test]
fn above_readme_threshold() {
    let fs = gospec_fs()
        .with(".gocov", README_CONFIG)
        .with("README.md", readme("60.00"));
    assert_eq!(check(&fs), (String::new(), String::new(), 0));
}

#[test]
fn readme_missing() {
    let fs = gospec_fs().with(".gocov", README_CONFIG);
    let (_, stderr, code) = check(&fs);
    assert_eq!(stderr, "README.md not found\n");
    assert_eq!(code, 1);
}

#[test]
fn invalid_readme_regex() {
    let fs = gospec_fs()
        .with(
            ".gocov",
            "{\"readme_threshold_regex\": \"Code coverage threshold: (.*$\"}",
        )
        .with("README.md", readme("80.00"));
    let (_, stderr, code) = check(&fs);
    assert_eq!(stderr, "failed to parse README.md regex\n");
    assert_eq!(code, 1);
}

#[test]
fn invalid_readme_threshold() {
    let fs = gospec_fs()
        .with(".gocov", README_CONFIG)
        .with("README.md", readme("foo"));
    let (_, stderr, code) = check(&fs);
    assert_eq!(
        stderr,
        "failed to parse threshold in readme, threshold is not a valid float: \"foo\"\n"
    );
    assert_eq!(code, 1);
}
