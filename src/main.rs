use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gocov::cli::{Cmd, Command};
use gocov::config::{self, Config};
use gocov::runner::GoTest;
use gocov::sys::{OsFileWriter, OsFs, ProcessExiter};

/// gocov: Go coverage reports, threshold checks and annotated sources.
#[derive(Parser)]
#[command(name = "gocov", version, about)]
struct Cli {
    /// Coverage profile to read (default: coverage.out).
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the coverage table (the default command).
    Report {
        /// Only show entries under these paths.
        paths: Vec<String>,

        /// Deepest level to show; 0 shows everything.
        #[arg(short, long, default_value_t = 0)]
        depth: usize,

        /// Disable colored output.
        #[arg(long)]
        no_color: bool,

        /// Add a column with every entry's full path.
        #[arg(long)]
        with_full_path: bool,

        /// Write coverage.html instead of printing the table.
        #[arg(long)]
        html: bool,
    },

    /// Fail unless coverage meets the configured threshold.
    Check {
        /// Override the threshold from .gocov.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show a source file with uncovered blocks highlighted.
    Inspect {
        /// Path, or part of a path, of the file.
        query: Option<String>,

        /// Require the exact module-relative path.
        #[arg(long)]
        exact: bool,
    },

    /// Run `go test` to produce coverage.out.
    Test,

    /// Print the project's .gocov, or a template when there is none.
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config {
        color: true,
        report_file: cli.profile.unwrap_or_default(),
        global: dirs::home_dir().and_then(|home| config::load_global(&home)),
        ..Default::default()
    };

    let command = match cli.command.unwrap_or(Commands::Report {
        paths: Vec::new(),
        depth: 0,
        no_color: false,
        with_full_path: false,
        html: false,
    }) {
        Commands::Report {
            paths,
            depth,
            no_color,
            with_full_path,
            html,
        } => {
            config.depth = depth;
            config.color = !no_color;
            config.with_full_path = with_full_path;
            config.html_output = html;
            Command::Report { paths }
        }
        Commands::Check { threshold } => {
            config.threshold = threshold.unwrap_or_default();
            Command::Check
        }
        Commands::Inspect { query, exact } => {
            config.exact_path = exact;
            Command::Inspect { query }
        }
        Commands::Test => Command::Test,
        Commands::Config => Command::Config,
    };

    let root = std::env::current_dir().context("Failed to determine the working directory")?;
    let fs = OsFs::new(&root);
    let mut writer = OsFileWriter::new(&root);
    let mut exiter = ProcessExiter;
    let runner = GoTest::default();
    let (mut stdout, mut stderr) = (io::stdout().lock(), io::stderr().lock());

    Cmd {
        stdout: &mut stdout,
        stderr: &mut stderr,
        fs: &fs,
        writer: &mut writer,
        exiter: &mut exiter,
        runner: &runner,
        config,
    }
    .exec(&command);
    Ok(())
}
