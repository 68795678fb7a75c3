//! Command dispatch for the gocov CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout. [`Cmd::exec`] only writes that output
//! once the whole command succeeded; a failure prints one line to stderr and
//! exits with status 1 instead.

use std::fmt::Write as _;
use std::io::Write;

use crate::aggregate::{self, Files};
use crate::annotate::{self, TERMINAL_MARKERS};
use crate::check;
use crate::config::{self, Config, DEFAULT_TEMPLATE};
use crate::error::{GocovError, Result};
use crate::profile;
use crate::report::{HtmlFormatter, ReportFormatter, TableFormatter, HTML_REPORT_FILE};
use crate::runner::TestRunner;
use crate::sys::{Exiter, FileSystem, FileWriter};
use crate::tree::{Filter, PathTree, Stats};

pub const MODULE_FILE: &str = "go.mod";

/// What to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Coverage table, optionally narrowed to path prefixes.
    Report { paths: Vec<String> },
    Check,
    /// Annotated source of one file.
    Inspect { query: Option<String> },
    Test,
    Config,
}

/// Everything derived from the profile that the views share.
#[derive(Debug)]
pub struct Coverage {
    pub files: Files,
    pub tree: PathTree,
    pub stats: Stats,
}

/// Read the module descriptor and the profile, and build the accumulated
/// tree of the files that are not ignored.
pub fn load_coverage(fs: &dyn FileSystem, config: &Config) -> Result<Coverage> {
    let descriptor = read_required(fs, MODULE_FILE)?;
    let module = aggregate::parse_module(&descriptor)?;
    let module_dir = aggregate::module_dir(&module);
    log::debug!("module {module}, stripping {module_dir:?} from profile paths");

    let data = read_required(fs, &config.report_file)?;
    let profile = profile::parse(&data)?;
    let files = Files::from_profile(&profile, module_dir);
    log::debug!("{} files in {}", files.len(), config.report_file);

    let mut tree = PathTree::new();
    for file in files.iter() {
        if aggregate::is_ignored(&file.path, config.ignore()) {
            log::debug!("ignoring {}", file.path);
            continue;
        }
        tree.add(&file.path, file.clone());
    }
    let stats = tree.accumulate();

    Ok(Coverage { files, tree, stats })
}

fn read_required(fs: &dyn FileSystem, path: &str) -> Result<Vec<u8>> {
    fs.read(path)?.ok_or_else(|| GocovError::MissingFile {
        path: path.to_string(),
    })
}

pub fn cmd_report(
    coverage: &Coverage,
    config: &Config,
    paths: &[String],
    fs: &dyn FileSystem,
    writer: &mut dyn FileWriter,
) -> Result<String> {
    if config.html_output {
        let html = HtmlFormatter { fs }.format(&coverage.tree, &coverage.stats)?;
        writer.write_file(HTML_REPORT_FILE, html.as_bytes())?;
        log::info!("wrote {HTML_REPORT_FILE}");
        return Ok(String::new());
    }

    let formatter = TableFormatter {
        color: config.color,
        with_full_path: config.with_full_path,
        filter: Filter {
            depth: config.depth,
            paths,
        },
    };
    formatter.format(&coverage.tree, &coverage.stats)
}

pub fn cmd_check(coverage: &Coverage, config: &Config, fs: &dyn FileSystem) -> Result<String> {
    check::check(coverage.tree.root().percent(), config, fs)?;
    Ok(String::new())
}

pub fn cmd_inspect(
    coverage: &Coverage,
    config: &Config,
    query: &str,
    fs: &dyn FileSystem,
) -> Result<String> {
    let selection = if config.exact_path {
        annotate::find_exact(&coverage.files, query)?
    } else {
        annotate::find_fuzzy(&coverage.files, query)?
    };

    let data = read_required(fs, &selection.target)?;
    let source = String::from_utf8_lossy(&data);
    let lines = annotate::annotate(&source, selection.file, &TERMINAL_MARKERS)?;

    let mut out = String::new();
    if !config.exact_path {
        writeln!(out, "inspect for file: {}", selection.target).unwrap();
    }
    out.push_str(&annotate::number_lines(&lines));
    if selection.skipped > 0 {
        writeln!(out, "skipped {} other files which matched", selection.skipped).unwrap();
    }
    Ok(out)
}

pub fn cmd_config(config: &Config) -> String {
    match &config.file {
        Some(file) => format!("{}\n", String::from_utf8_lossy(&file.contents)),
        None => DEFAULT_TEMPLATE.to_string(),
    }
}

/// Run the test suite, streaming its output through.
pub fn cmd_test(
    runner: &dyn TestRunner,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    writeln!(stdout, "executing: {}", runner.describe())?;
    runner.run(stdout, stderr)
}

/// One invocation with its injected capabilities.
pub struct Cmd<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
    pub fs: &'a dyn FileSystem,
    pub writer: &'a mut dyn FileWriter,
    pub exiter: &'a mut dyn Exiter,
    pub runner: &'a dyn TestRunner,
    pub config: Config,
}

impl Cmd<'_> {
    pub fn exec(&mut self, command: &Command) {
        let result = match command {
            Command::Test => cmd_test(self.runner, &mut *self.stdout, &mut *self.stderr),
            _ => self.output(command).and_then(|out| {
                self.stdout.write_all(out.as_bytes())?;
                Ok(())
            }),
        };

        if let Err(e) = result {
            let _ = writeln!(self.stderr, "{e}");
            self.exiter.exit(1);
        }
    }

    fn output(&mut self, command: &Command) -> Result<String> {
        self.config.file = config::load_project(self.fs)?;
        self.config.update();

        if *command == Command::Config {
            return Ok(cmd_config(&self.config));
        }

        let query = match command {
            Command::Inspect { query: None } => return Err(GocovError::MissingInspectArgument),
            Command::Inspect { query: Some(query) } => Some(query.as_str()),
            _ => None,
        };

        let coverage = load_coverage(self.fs, &self.config)?;
        match command {
            Command::Report { paths } => {
                cmd_report(&coverage, &self.config, paths, self.fs, &mut *self.writer)
            }
            Command::Check => cmd_check(&coverage, &self.config, self.fs),
            _ => cmd_inspect(&coverage, &self.config, query.unwrap_or_default(), self.fs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::{MemFileWriter, MemFs, RecordingExiter};

    struct FakeRunner {
        fail: bool,
    }

    impl TestRunner for FakeRunner {
        fn describe(&self) -> String {
            "go test ./...".to_string()
        }

        fn run(&self, stdout: &mut dyn Write, _stderr: &mut dyn Write) -> Result<()> {
            stdout.write_all(b"ok  \texample.com/m\n")?;
            if self.fail {
                return Err(GocovError::TestRunner {
                    message: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    fn run(fs: &MemFs, command: Command, runner: &FakeRunner) -> (String, String, i32) {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let mut writer = MemFileWriter::new();
        let mut exiter = RecordingExiter::default();
        Cmd {
            stdout: &mut stdout,
            stderr: &mut stderr,
            fs,
            writer: &mut writer,
            exiter: &mut exiter,
            runner,
            config: Config::default(),
        }
        .exec(&command);
        (
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
            exiter.code,
        )
    }

    fn basic_fs() -> MemFs {
        MemFs::new()
            .with("go.mod", "module mod\n")
            .with("coverage.out", "mode: atomic\nmod/pkg/a.go:1.1,2.2 1 1\nmod/pkg/a.go:3.1,4.2 1 0\n")
    }

    #[test]
    fn test_load_coverage_missing_files() {
        let config = Config {
            report_file: "coverage.out".to_string(),
            ..Default::default()
        };
        match load_coverage(&MemFs::new(), &config) {
            Err(GocovError::MissingFile { path }) => assert_eq!(path, "go.mod"),
            other => panic!("unexpected result: {other:?}"),
        }
        match load_coverage(&MemFs::new().with("go.mod", "module m"), &config) {
            Err(GocovError::MissingFile { path }) => assert_eq!(path, "coverage.out"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_record_writes_nothing_to_stdout() {
        let fs = MemFs::new()
            .with("go.mod", "module mod")
            .with("coverage.out", "mode: atomic\nmod/a.go:9.13,16.22 x 0\n");
        let (stdout, stderr, code) = run(&fs, Command::Report { paths: vec![] }, &FakeRunner { fail: false });
        assert_eq!(stdout, "");
        assert_eq!(stderr, "failed to parse coverage file on line 2\n");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_check_thresholds() {
        let fs = basic_fs().with(".gocov", r#"{"threshold": 60}"#);
        let (stdout, stderr, code) = run(&fs, Command::Check, &FakeRunner { fail: false });
        assert_eq!(stdout, "");
        assert_eq!(
            stderr,
            "Coverage check failed: expected to have 60.00 coverage, but got 50.00\n"
        );
        assert_eq!(code, 1);

        let fs = basic_fs().with(".gocov", r#"{"threshold": 40}"#);
        let (stdout, stderr, code) = run(&fs, Command::Check, &FakeRunner { fail: false });
        assert_eq!((stdout.as_str(), stderr.as_str(), code), ("", "", 0));
    }

    #[test]
    fn test_inspect_requires_argument() {
        let (stdout, stderr, code) = run(&basic_fs(), Command::Inspect { query: None }, &FakeRunner { fail: false });
        assert_eq!(stdout, "");
        assert_eq!(stderr, "no arguments provided to inspect command\n");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_config_view() {
        let (stdout, _, code) = run(&MemFs::new(), Command::Config, &FakeRunner { fail: false });
        assert_eq!(stdout, DEFAULT_TEMPLATE);
        assert_eq!(code, 0);

        let fs = MemFs::new().with(".gocov", "{\"threshold\": 75}");
        let (stdout, _, _) = run(&fs, Command::Config, &FakeRunner { fail: false });
        assert_eq!(stdout, "{\"threshold\": 75}\n");
    }

    #[test]
    fn test_invalid_project_config() {
        let fs = basic_fs().with(".gocov", "{");
        let (stdout, stderr, code) = run(&fs, Command::Report { paths: vec![] }, &FakeRunner { fail: false });
        assert_eq!(stdout, "");
        assert!(stderr.starts_with("failed to parse .gocov config file: "));
        assert_eq!(code, 1);
    }

    #[test]
    fn test_test_passthrough() {
        let (stdout, stderr, code) = run(&MemFs::new(), Command::Test, &FakeRunner { fail: false });
        assert_eq!(stdout, "executing: go test ./...\nok  \texample.com/m\n");
        assert_eq!(stderr, "");
        assert_eq!(code, 0);

        let (_, stderr, code) = run(&MemFs::new(), Command::Test, &FakeRunner { fail: true });
        assert_eq!(stderr, "failed to run `go test` command: exit status: 1\n");
        assert_eq!(code, 1);
    }
}
