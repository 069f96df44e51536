use clap::Parser;
use epsrip::{Cli, EpsRip, EpsRipError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create EpsRip instance
    let epsrip = match EpsRip::from_cli(&cli) {
        Ok(epsrip) => epsrip,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&cli, &epsrip);
    }

    // Execute main extraction workflow
    match epsrip.extract_previews(&cli.source_dir).await {
        Ok(report) => {
            // Display final report based on output format
            epsrip.output_formatter().print_extraction_report(&report);

            // Return appropriate exit code
            if report.errors.is_empty() {
                0 // Success
            } else {
                2 // Success with errors on individual files
            }
        }
        Err(e) => {
            epsrip.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                EpsRipError::Cancelled => 130, // Interrupted (SIGINT)
                EpsRipError::InvalidPath { .. } => 3,
                EpsRipError::NoEpsFiles { .. } => 4,
                EpsRipError::Permission { .. } => 5,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "epsrip.toml".to_string());

    match EpsRip::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  epsrip <source-dir> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, epsrip: &EpsRip) -> i32 {
    let formatter = epsrip.output_formatter();

    formatter.info("DRY RUN MODE - No previews will be extracted");
    formatter.print_separator();

    formatter.info("Configuration that would be used:");
    let config = epsrip.config();

    println!("  Extensions: {}", config.filters.extensions.join(", "));
    println!("  Max file size: {} bytes", config.filters.max_file_size);
    println!("  Max depth: {}", config.filters.max_depth);
    println!(
        "  Output directory: {}",
        config.output.base_directory.display()
    );
    println!("  Generate report: {}", config.output.generate_report);

    formatter.print_separator();

    formatter.info("Extraction plan:");
    println!("  Source directory: {}", cli.source_dir.display());
    println!("  Preview kinds: tiff, wmf");

    if !cli.source_dir.is_dir() {
        formatter.error(&format!(
            "Source directory does not exist: {}",
            cli.source_dir.display()
        ));
        return 3;
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform actual extraction");

    0
}

fn print_startup_error(error: &EpsRipError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
