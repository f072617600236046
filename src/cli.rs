//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Hourly electricity grid simulator.
///
/// Dispatches demand over nuclear, PV, wind, flexible thermal units, storage
/// and a cross-border link in a fixed merit order, one hour at a time, and
/// prints year-end totals.
#[derive(Debug, Clone, Parser)]
#[command(name = "grid-sim", version)]
pub struct Cli {
    /// Load the grid from a TOML config file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (baseline, decarbonised)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Read hourly demand and capacity factors from a CSV world file
    #[arg(long, value_name = "PATH")]
    pub world: Option<PathBuf>,

    /// Only use world rows of this year (requires a `year` column)
    #[arg(long, requires = "world")]
    pub year: Option<i32>,

    /// Seed for the synthetic world used when no world file is given
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of synthetic hours to simulate
    #[arg(long, default_value_t = 8760, conflicts_with = "world")]
    pub hours: usize,

    /// Override the configured load multiplier
    #[arg(long, value_name = "FACTOR")]
    pub load_multiplier: Option<f64>,

    /// Write the hourly result table to this CSV file
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Log dispatch decisions (debug level) unless RUST_LOG is set
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Human-readable description of where the grid configuration comes from.
    pub fn config_source(&self) -> String {
        match (&self.config, &self.preset) {
            (Some(path), _) => format!("config {}", path.display()),
            (None, Some(name)) => format!("preset {name}"),
            (None, None) => "preset baseline".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("grid-sim").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_arguments() {
        let cli = parse(&[]).ok();
        let Some(cli) = cli else {
            panic!("no arguments should parse");
        };
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.hours, 8760);
        assert!(cli.config.is_none() && cli.preset.is_none() && cli.world.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.config_source(), "preset baseline");
    }

    #[test]
    fn config_and_preset_are_mutually_exclusive() {
        assert!(parse(&["--config", "grid.toml", "--preset", "baseline"]).is_err());
    }

    #[test]
    fn year_requires_world() {
        assert!(parse(&["--year", "2020"]).is_err());
        let cli = parse(&["--world", "w.csv", "--year", "2020"]).ok();
        assert_eq!(cli.and_then(|c| c.year), Some(2020));
    }

    #[test]
    fn hours_conflicts_with_world() {
        assert!(parse(&["--world", "w.csv", "--hours", "24"]).is_err());
    }

    #[test]
    fn full_argument_set() {
        let cli = parse(&[
            "--preset",
            "decarbonised",
            "--seed",
            "7",
            "--hours",
            "168",
            "--load-multiplier",
            "1.2",
            "-o",
            "out.csv",
            "-v",
        ])
        .ok();
        let Some(cli) = cli else {
            panic!("arguments should parse");
        };
        assert_eq!(cli.preset.as_deref(), Some("decarbonised"));
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.hours, 168);
        assert_eq!(cli.load_multiplier, Some(1.2));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert!(cli.verbose);
        assert_eq!(cli.config_source(), "preset decarbonised");
    }
}
