//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey-insights",
    version,
    about = "Developer survey insights - technology usage rankings over survey CSVs",
    long_about = "Unpack developer survey bundles, catalog their CSV files and rank\n\
                  technology usage (languages, databases, platforms, ...) per column.\n\n\
                  Serves the results over HTTP or prints them to the terminal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding survey bundles and extracted sources (overrides config).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML settings file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for log shippers).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Unpack bundles, build the catalog and serve the HTTP API.
    Serve(ServeArgs),

    /// List registered data sources and their analyzable columns.
    Sources,

    /// Rank technology usage for one source column.
    Analyze(AnalyzeArgs),

    /// Extract survey bundles in the data directory and exit.
    Unpack,
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Interface to bind (overrides config).
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides config).
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Dashboard HTML page served at `/` (overrides config).
    #[arg(long = "template", value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Data source name (default: the configured default source).
    #[arg(long = "source", value_name = "NAME")]
    pub source: Option<String>,

    /// Column holding `;`-separated tags (default: the configured default column).
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: Option<String>,

    /// Number of entries to show.
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "survey-insights",
            "analyze",
            "--source",
            "so",
            "--top-n",
            "5",
            "--data-dir",
            "/srv/data",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/data")));
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.source.as_deref(), Some("so"));
                assert_eq!(args.top_n, Some(5));
                assert!(args.column.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["survey-insights", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }
}
