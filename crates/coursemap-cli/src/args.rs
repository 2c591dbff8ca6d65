//! Command-line argument definitions for the Coursemap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Output format written by the CLI
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Nodes and edges as JSON
    #[default]
    Json,
    /// Node positions as JSON
    Positions,
    /// SVG preview
    Svg,
}

/// Command-line arguments for the Coursemap layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input catalog JSON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["coursemap", "catalog.json"]).unwrap();
        assert_eq!(args.input, "catalog.json");
        assert_eq!(args.output, "out.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_format_flag() {
        let args =
            Args::try_parse_from(["coursemap", "in.json", "-f", "svg", "-o", "map.svg"]).unwrap();
        assert_eq!(args.format, OutputFormat::Svg);
        assert_eq!(args.output, "map.svg");

        assert!(Args::try_parse_from(["coursemap", "in.json", "-f", "png"]).is_err());
    }
}
