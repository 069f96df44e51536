pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod header;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, OutputConfig};
pub use error::{EpsRipError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ConfigSnapshot, ExtractionProgress, ExtractionReport, OutputManager, PreviewExtractor,
    SkipNotice,
};
pub use header::{
    extract_region, has_native_header, CorruptHeader, PreviewKind, PreviewRegion, RegionOutcome,
    NATIVE_SIGNATURE,
};
pub use scanner::{EpsFile, EpsScanner, FileFilter};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use tokio::task;

/// Main library interface for epsrip functionality
pub struct EpsRip {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl EpsRip {
    /// Create a new EpsRip instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new EpsRip instance for testing (no signal handler conflicts)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create EpsRip instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Rip embedded previews from every EPS file found under `source_dir`
    pub async fn extract_previews(&self, source_dir: &Path) -> Result<ExtractionReport> {
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation("Starting preview extraction");

        // Step 1: Scan for EPS candidates
        let files = self.scan_source(source_dir)?;
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .info(&format!("Found {} EPS files", files.len()));

        // Step 2: Setup output directory
        let output_manager = self.setup_output_directory()?;
        self.shutdown.check_shutdown()?;

        // Step 3: Extract previews
        let progress = self
            .extract_files(&files, output_manager.output_directory())
            .await?;
        self.shutdown.check_shutdown()?;

        // Step 4: Surface per-file skip notices
        for skip in &progress.skips {
            self.output_formatter
                .warning(&format!("Skipping {}: {}", skip.file, skip.reason));
        }

        // Step 5: Generate report
        let config_snapshot = self.create_config_snapshot();
        let report =
            output_manager.create_extraction_report(source_dir, &progress, &config_snapshot)?;

        // Display summary
        self.output_formatter.print_extraction_summary(&progress);

        Ok(report)
    }

    /// Scan the source directory for EPS candidates
    fn scan_source(&self, source_dir: &Path) -> Result<Vec<EpsFile>> {
        self.output_formatter
            .start_operation("Scanning for EPS files");

        let scanner = EpsScanner::new(&self.config.filters);
        let files = scanner.scan_directory(source_dir)?;

        let total_bytes: u64 = files.iter().map(|f| f.size).sum();
        self.output_formatter.debug(&format!(
            "Scan found {} candidates ({} bytes)",
            files.len(),
            total_bytes
        ));

        Ok(files)
    }

    /// Setup output directory management
    fn setup_output_directory(&self) -> Result<OutputManager> {
        let output_manager = OutputManager::new(self.config.output.base_directory.clone())
            .with_report(self.config.output.generate_report);

        output_manager.initialize()?;

        self.output_formatter.success(&format!(
            "Initialized output directory: {}",
            output_manager.output_directory().display()
        ));

        Ok(output_manager)
    }

    /// Extract previews with progress tracking. The per-file pipeline is
    /// blocking file IO, so it runs on the blocking thread pool.
    async fn extract_files(
        &self,
        files: &[EpsFile],
        output_dir: &Path,
    ) -> Result<ExtractionProgress> {
        self.output_formatter.start_operation("Extracting previews");

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let extractor = PreviewExtractor::new(output_dir.to_path_buf());
        let files_owned = files.to_vec();

        let progress = task::spawn_blocking(move || {
            extractor.extract_files(&files_owned, Some(&progress_callback))
        })
        .await
        .map_err(|e| EpsRipError::Config {
            message: format!("Extraction task failed: {}", e),
        })??;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} previews", progress.previews_written),
            progress.elapsed(),
        );

        Ok(progress)
    }

    /// Create configuration snapshot for reporting
    fn create_config_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            extensions: self.config.filters.extensions.clone(),
            max_file_size: self.config.filters.max_file_size,
            max_depth: self.config.filters.max_depth,
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(EpsRipError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &EpsRipError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to rip previews with minimal setup
pub async fn rip_previews_simple(
    source_dir: &Path,
    output_dir: Option<&Path>,
    verbose: bool,
) -> Result<ExtractionReport> {
    let mut config = Config::default();

    if let Some(output_path) = output_dir {
        config.output.base_directory = output_path.to_path_buf();
    }

    let epsrip = EpsRip::new(
        config,
        OutputMode::Human,
        if verbose { 1 } else { 0 },
        false,
    )?;

    epsrip.extract_previews(source_dir).await
}
