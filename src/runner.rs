//! Running the Go test suite to produce a coverage profile.

use std::io::Write;
use std::process::Command;

use crate::error::{GocovError, Result};

/// Something that can generate a fresh profile.
pub trait TestRunner {
    /// Human-readable command line, shown before running.
    fn describe(&self) -> String;

    /// Run to completion, forwarding the child's output.
    fn run(&self, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()>;
}

/// `go test` with coverage of every package in the module.
#[derive(Debug, Clone)]
pub struct GoTest {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for GoTest {
    fn default() -> Self {
        let args = ["test", "-coverprofile", "coverage.out", "-coverpkg", "./...", "./..."];
        Self {
            program: "go".to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl TestRunner for GoTest {
    fn describe(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }

    fn run(&self, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
        log::info!("running {}", self.describe());
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| GocovError::TestRunner {
                message: e.to_string(),
            })?;

        stdout.write_all(&output.stdout)?;
        stderr.write_all(&output.stderr)?;

        if !output.status.success() {
            return Err(GocovError::TestRunner {
                message: output.status.to_string(),
            });
        }
        Ok(())
    }
}
