use thiserror::Error;

/// Where a coverage threshold was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdOrigin {
    Config,
    Readme,
}

impl std::fmt::Display for ThresholdOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdOrigin::Config => Ok(()),
            ThresholdOrigin::Readme => f.write_str(" in README.md"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GocovError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid coverage file")]
    InvalidProfileHeader,

    #[error("failed to parse coverage file on line {line}")]
    MalformedRecord { line: usize },

    #[error("invalid go.mod file")]
    InvalidModuleDescriptor,

    #[error("failed to open {path}: file does not exist")]
    MissingFile { path: String },

    #[error("failed to parse .gocov config file: {cause}")]
    InvalidConfig { cause: String },

    #[error("running inspect failed, please regenerate the coverage report again")]
    InconsistentCoverageData,

    #[error("no file found for the given search: {query}")]
    NoMatch { query: String },

    #[error("no coverage data for {path}")]
    NotFound { path: String },

    #[error("Coverage check failed{origin}: expected to have {expected:.2} coverage, but got {actual:.2}")]
    ThresholdNotMet {
        expected: f64,
        actual: f64,
        origin: ThresholdOrigin,
    },

    #[error("Coverage check failed: missing .gocov file with defined threshold")]
    ThresholdConfigMissing,

    #[error("README.md not found")]
    ReadmeMissing,

    #[error("failed to parse README.md regex")]
    InvalidReadmeRegex(#[source] regex::Error),

    #[error("no threshold matching the configured regex found in README.md")]
    ReadmeThresholdMissing,

    #[error("failed to parse threshold in readme, threshold is not a valid float: {value:?}")]
    InvalidReadmeThreshold { value: String },

    #[error("no arguments provided to inspect command")]
    MissingInspectArgument,

    #[error("failed to run `go test` command: {message}")]
    TestRunner { message: String },
}

pub type Result<T> = std::result::Result<T, GocovError>;
