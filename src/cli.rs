use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "epsrip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract embedded preview images from binary EPS files")]
#[command(
    long_about = "epsrip scans a directory for EPS files carrying the binary native header \
                       and rips their embedded TIFF and WMF previews into an output directory."
)]
#[command(after_help = "EXAMPLES:\n  \
    epsrip\n  \
    epsrip ./artwork\n  \
    epsrip ./artwork --output previews --verbose\n  \
    epsrip \"C:\\scans\" --formats eps,epsf --max-depth 3\n  \
    epsrip ./artwork --config my-config.toml")]
pub struct Cli {
    /// Directory containing EPS files to rip previews from
    #[arg(default_value = ".")]
    pub source_dir: PathBuf,

    /// Output directory for extracted previews
    #[arg(short, long, help = "Output directory (default: out)")]
    pub output: Option<PathBuf>,

    /// File extensions to treat as EPS (comma-separated)
    #[arg(short, long, help = "File extensions to scan (e.g., eps,epsf)")]
    pub formats: Option<String>,

    /// Maximum file size in MB
    #[arg(long, help = "Maximum file size to process (in MB)")]
    pub max_size: Option<u64>,

    /// Maximum directory depth to scan
    #[arg(long, help = "How deep to descend into the source directory")]
    pub max_depth: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be extracted without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let max_file_size = self.max_size.map(|size| size * 1024 * 1024); // Convert MB to bytes

        CliOverrides::new()
            .with_formats(self.formats.clone())
            .with_max_file_size(max_file_size)
            .with_max_depth(self.max_depth)
            .with_output_dir(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            source_dir: PathBuf::from("."),
            output: None,
            formats: None,
            max_size: None,
            max_depth: None,
            config: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_default_config_from_cli() {
        let cli = base_cli();
        let config = cli.load_config().unwrap();

        assert_eq!(config.output.base_directory, PathBuf::from("out"));
        assert!(config.filters.extensions.contains(&"eps".to_string()));
    }

    #[test]
    fn test_cli_overrides_plumbing() {
        let cli = Cli {
            formats: Some("eps".to_string()),
            max_size: Some(5),
            max_depth: Some(2),
            output: Some(PathBuf::from("previews")),
            ..base_cli()
        };

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.formats.as_deref(), Some("eps"));
        assert_eq!(overrides.max_file_size, Some(5 * 1024 * 1024));
        assert_eq!(overrides.max_depth, Some(2));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("previews")));

        let config = cli.load_config().unwrap();
        assert_eq!(config.filters.extensions, vec!["eps"]);
        assert_eq!(config.filters.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.output.base_directory, PathBuf::from("previews"));
    }

    #[test]
    fn test_argument_parsing() {
        let cli = Cli::parse_from(["epsrip", "./artwork", "--output", "previews", "-v"]);
        assert_eq!(cli.source_dir, PathBuf::from("./artwork"));
        assert_eq!(cli.output, Some(PathBuf::from("previews")));
        assert_eq!(cli.verbose, 1);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_source_dir_defaults_to_current() {
        let cli = Cli::parse_from(["epsrip"]);
        assert_eq!(cli.source_dir, PathBuf::from("."));
    }
}
