use crate::error::{EpsRipError, Result};
use crate::extractor::preview_extractor::{ExtractionProgress, SkipNotice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub source_directory: String,
    pub output_directory: String,
    pub extraction_time: DateTime<Utc>,
    pub summary: ExtractionSummary,
    pub skips: Vec<SkipNotice>,
    pub errors: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub files_scanned: usize,
    pub files_processed: usize,
    pub previews_written: usize,
    pub bytes_written: u64,
    pub previews_by_kind: HashMap<String, usize>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub extensions: Vec<String>,
    pub max_file_size: u64,
    pub max_depth: usize,
}

/// Owns the output directory lifecycle. Creation is mkdir-p style: an
/// existing directory is reused, never replaced.
pub struct OutputManager {
    output_directory: PathBuf,
    write_report: bool,
}

impl OutputManager {
    pub fn new(output_directory: PathBuf) -> Self {
        Self {
            output_directory,
            write_report: true,
        }
    }

    pub fn with_report(mut self, write_report: bool) -> Self {
        self.write_report = write_report;
        self
    }

    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_directory).map_err(|e| EpsRipError::Permission {
            path: format!(
                "Cannot create output directory {}: {}",
                self.output_directory.display(),
                e
            ),
        })?;

        // Probe write permissions before doing any real work.
        let test_file = self.output_directory.join(".epsrip_write_test");
        match fs::File::create(&test_file) {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                return Err(EpsRipError::Permission {
                    path: format!(
                        "No write permission for directory {}: {}",
                        self.output_directory.display(),
                        e
                    ),
                });
            }
        }

        if self.write_report {
            fs::create_dir_all(self.metadata_dir()).map_err(EpsRipError::Io)?;
        }

        Ok(())
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.output_directory.join(".epsrip")
    }

    pub fn create_extraction_report(
        &self,
        source_directory: &Path,
        progress: &ExtractionProgress,
        config: &ConfigSnapshot,
    ) -> Result<ExtractionReport> {
        let summary = ExtractionSummary {
            files_scanned: progress.total_files,
            files_processed: progress.files_processed,
            previews_written: progress.previews_written,
            bytes_written: progress.bytes_written,
            previews_by_kind: progress.written_by_kind.clone(),
            duration: progress.elapsed(),
        };

        let report = ExtractionReport {
            source_directory: source_directory.display().to_string(),
            output_directory: self.output_directory.display().to_string(),
            extraction_time: Utc::now(),
            summary,
            skips: progress.skips.clone(),
            errors: progress.errors.clone(),
            config_used: config.clone(),
        };

        if self.write_report {
            self.save_report_json(&report)?;
        }

        Ok(report)
    }

    fn save_report_json(&self, report: &ExtractionReport) -> Result<()> {
        let report_path = self.metadata_dir().join("extraction_report.json");
        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| EpsRipError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content).map_err(EpsRipError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_snapshot() -> ConfigSnapshot {
        ConfigSnapshot {
            extensions: vec!["eps".to_string()],
            max_file_size: 1024 * 1024,
            max_depth: 1,
        }
    }

    #[test]
    fn test_initialize_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");

        let manager = OutputManager::new(out.clone());
        manager.initialize().unwrap();

        assert!(out.exists());
        assert!(manager.metadata_dir().exists());
    }

    #[test]
    fn test_initialize_reuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.txt"), b"keep me").unwrap();

        let manager = OutputManager::new(temp_dir.path().to_path_buf());
        manager.initialize().unwrap();

        assert!(temp_dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_no_metadata_dir_without_report() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");

        let manager = OutputManager::new(out).with_report(false);
        manager.initialize().unwrap();

        assert!(!manager.metadata_dir().exists());
    }

    #[test]
    fn test_report_is_written_as_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = OutputManager::new(temp_dir.path().to_path_buf());
        manager.initialize().unwrap();

        let mut progress = ExtractionProgress::new(3);
        progress.files_processed = 3;
        progress.previews_written = 2;
        progress.bytes_written = 70;
        progress.skips.push(SkipNotice {
            file: "plain.eps".to_string(),
            reason: "no native header".to_string(),
        });

        let report = manager
            .create_extraction_report(Path::new("./art"), &progress, &test_snapshot())
            .unwrap();

        assert_eq!(report.summary.files_scanned, 3);
        assert_eq!(report.summary.previews_written, 2);
        assert_eq!(report.skips.len(), 1);

        let report_path = manager.metadata_dir().join("extraction_report.json");
        assert!(report_path.exists());

        let content = fs::read_to_string(&report_path).unwrap();
        let parsed: ExtractionReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.summary.bytes_written, 70);
        assert_eq!(parsed.skips[0].file, "plain.eps");
    }
}
