//! Error types surfaced before a simulation starts.
//!
//! Once a run has been set up, dispatch cannot fail: shortage and dump absorb
//! every imbalance. All errors here therefore come from configuration or input
//! validation.

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"plants.coal.min_load"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Problem with the shape or contents of the input time series.
#[derive(Debug, Error)]
pub enum InputShapeError {
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("series lengths differ: demand has {demand} hours, pv has {pv}, wind has {wind}")]
    LengthMismatch { demand: usize, pv: usize, wind: usize },

    #[error("{series} value {value} at hour {hour} is outside {range}")]
    OutOfRange {
        series: &'static str,
        hour: usize,
        value: f64,
        range: &'static str,
    },

    #[error("no rows found for year {0}")]
    NoRowsForYear(i32),

    #[error("a year was requested but the input has no \"year\" column")]
    NoYearColumn,

    #[error("input time series is empty")]
    Empty,

    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure to set up a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration:{}", format_config_errors(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    InputShape(#[from] InputShapeError),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors.iter().map(|e| format!("\n  {e}")).collect()
}
