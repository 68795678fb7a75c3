#![allow(dead_code)]

use gocov::cli::{Cmd, Command};
use gocov::config::Config;
use gocov::runner::GoTest;
use gocov::sys::{MemFileWriter, MemFs, RecordingExiter};

pub const GOSPEC_PROFILE: &str = include_str!("../fixtures/gospec.out");
pub const GOCOV_PROFILE: &str = include_str!("../fixtures/gocov.out");
pub const GOCOV_CMD_PROFILE: &str = include_str!("../fixtures/gocov_cmd.out");
pub const GOCOV_CMD_SOURCE: &str = include_str!("../fixtures/gocov.go");

pub const RED: &str = "\x1b[0;31m";
pub const NO_COLOR: &str = "\x1b[0m";

/// What one invocation printed, wrote and how it exited.
pub struct Outcome {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    pub written: MemFileWriter,
}

/// Run `command` against an in-memory module root.
pub fn run(fs: &MemFs, config: Config, command: Command) -> Outcome {
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let mut written = MemFileWriter::new();
    let mut exiter = RecordingExiter::default();
    let runner = GoTest::default();

    Cmd {
        stdout: &mut stdout,
        stderr: &mut stderr,
        fs,
        writer: &mut written,
        exiter: &mut exiter,
        runner: &runner,
        config,
    }
    .exec(&command);

    Outcome {
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
        code: exiter.code,
        written,
    }
}

pub fn report(paths: &[&str]) -> Command {
    Command::Report {
        paths: paths.iter().map(|p| p.to_string()).collect(),
    }
}

/// Module root of the gospec project with its profile.
pub fn gospec_fs() -> MemFs {
    MemFs::new()
        .with("go.mod", "module github.com/slavsan/gospec")
        .with("coverage.out", GOSPEC_PROFILE)
}

/// Module root of the gocov project with its profile.
pub fn gocov_fs() -> MemFs {
    MemFs::new()
        .with("go.mod", "module github.com/slavsan/gocov\n\ngo 1.20\n")
        .with("coverage.out", GOCOV_PROFILE)
}

/// Join lines into newline-terminated output.
pub fn lines(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}
