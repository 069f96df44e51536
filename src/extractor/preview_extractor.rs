use crate::error::Result;
use crate::header::{extract_region, has_native_header, PreviewKind, RegionOutcome};
use crate::scanner::EpsFile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A preview that was skipped, with a reason worth telling the user about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipNotice {
    pub file: String,
    pub reason: String,
}

/// Outcome of processing a single EPS file. Files are processed
/// independently, so one report never depends on another.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    /// Previews written, as (kind, bytes written) pairs.
    pub written: Vec<(PreviewKind, u64)>,
    pub skips: Vec<SkipNotice>,
    pub errors: Vec<String>,
}

impl FileReport {
    fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            written: Vec::new(),
            skips: Vec::new(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub previews_written: usize,
    pub bytes_written: u64,
    pub written_by_kind: HashMap<String, usize>,
    pub current_file: Option<String>,
    pub skips: Vec<SkipNotice>,
    pub errors: Vec<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            previews_written: 0,
            bytes_written: 0,
            written_by_kind: HashMap::new(),
            current_file: None,
            skips: Vec::new(),
            errors: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn merge(&mut self, report: FileReport) {
        self.files_processed += 1;
        self.current_file = Some(report.file_name);

        for (kind, bytes) in report.written {
            self.previews_written += 1;
            self.bytes_written += bytes;
            *self
                .written_by_kind
                .entry(kind.extension().to_string())
                .or_insert(0) += 1;
        }

        self.skips.extend(report.skips);
        self.errors.extend(report.errors);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Runs the per-file pipeline: read the file, check the native-header
/// signature, and write every embedded preview into the output directory
/// as `<base name>.<kind>`.
pub struct PreviewExtractor {
    output_dir: PathBuf,
}

impl PreviewExtractor {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn extract_files(
        &self,
        files: &[EpsFile],
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionProgress> {
        fs::create_dir_all(&self.output_dir)?;

        let mut progress = ExtractionProgress::new(files.len());

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let reports: Vec<FileReport> =
                files.par_iter().map(|file| self.process_file(file)).collect();
            for report in reports {
                progress.merge(report);
                if let Some(callback) = progress_callback {
                    callback(&progress);
                }
            }
        }

        #[cfg(not(feature = "parallel"))]
        for file in files {
            let report = self.process_file(file);
            progress.merge(report);
            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        Ok(progress)
    }

    /// Process one file in isolation. IO failures are recorded in the
    /// report rather than propagated, so one broken file never halts the
    /// batch.
    pub fn process_file(&self, file: &EpsFile) -> FileReport {
        let mut report = FileReport::new(&file.file_name);

        let data = match fs::read(&file.source_path) {
            Ok(data) => data,
            Err(e) => {
                report.errors.push(format!(
                    "Failed to read {}: {}",
                    file.source_path.display(),
                    e
                ));
                return report;
            }
        };

        if !has_native_header(&data) {
            report.skips.push(SkipNotice {
                file: file.file_name.clone(),
                reason: "no native header".to_string(),
            });
            return report;
        }

        for kind in PreviewKind::ALL {
            match extract_region(&data, kind) {
                RegionOutcome::Present(region) => {
                    match self.write_preview(&file.base_name, kind, region.slice(&data)) {
                        Ok(bytes) => report.written.push((kind, bytes)),
                        Err(e) => report.errors.push(format!(
                            "Failed to write {} preview for {}: {}",
                            kind, file.file_name, e
                        )),
                    }
                }
                RegionOutcome::Absent => {}
                RegionOutcome::Corrupt(detail) => {
                    report.skips.push(SkipNotice {
                        file: file.file_name.clone(),
                        reason: format!("{} preview: {}", kind, detail),
                    });
                }
            }
        }

        report
    }

    fn write_preview(
        &self,
        base_name: &str,
        kind: PreviewKind,
        bytes: &[u8],
    ) -> std::io::Result<u64> {
        let dest = self
            .output_dir
            .join(format!("{}.{}", base_name, kind.extension()));
        fs::write(&dest, bytes)?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::NATIVE_SIGNATURE;
    use tempfile::TempDir;

    fn eps_bytes(len: usize, wmf: (u32, u32), tiff: (u32, u32)) -> Vec<u8> {
        let mut data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        data[0..4].copy_from_slice(&NATIVE_SIGNATURE.to_be_bytes());
        data[12..16].copy_from_slice(&wmf.0.to_le_bytes());
        data[16..20].copy_from_slice(&wmf.1.to_le_bytes());
        data[20..24].copy_from_slice(&tiff.0.to_le_bytes());
        data[24..28].copy_from_slice(&tiff.1.to_le_bytes());
        data
    }

    fn write_source(dir: &TempDir, name: &str, bytes: &[u8]) -> EpsFile {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        EpsFile::new(path, bytes.len() as u64)
    }

    #[test]
    fn test_wmf_only_end_to_end() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        // Signature, WMF at [40, 60), TIFF absent, filler elsewhere.
        let data = eps_bytes(200, (40, 20), (0, 0));
        let file = write_source(&source_dir, "drawing.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[file], None).unwrap();

        assert_eq!(progress.files_processed, 1);
        assert_eq!(progress.previews_written, 1);
        assert!(progress.skips.is_empty());
        assert!(progress.errors.is_empty());

        let wmf_path = out_dir.path().join("drawing.wmf");
        assert!(wmf_path.exists());
        assert_eq!(fs::read(&wmf_path).unwrap(), &data[40..60]);

        assert!(!out_dir.path().join("drawing.tiff").exists());
    }

    #[test]
    fn test_both_previews_extracted() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let data = eps_bytes(300, (40, 20), (100, 50));
        let file = write_source(&source_dir, "logo.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[file], None).unwrap();

        assert_eq!(progress.previews_written, 2);
        assert_eq!(progress.bytes_written, 70);
        assert_eq!(progress.written_by_kind.get("tiff"), Some(&1));
        assert_eq!(progress.written_by_kind.get("wmf"), Some(&1));

        assert_eq!(
            fs::read(out_dir.path().join("logo.tiff")).unwrap(),
            &data[100..150]
        );
        assert_eq!(
            fs::read(out_dir.path().join("logo.wmf")).unwrap(),
            &data[40..60]
        );
    }

    #[test]
    fn test_missing_signature_is_skipped() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let file = write_source(&source_dir, "plain.eps", b"%!PS-Adobe-3.0 EPSF-3.0\n");

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[file], None).unwrap();

        assert_eq!(progress.files_processed, 1);
        assert_eq!(progress.previews_written, 0);
        assert_eq!(progress.skips.len(), 1);
        assert_eq!(progress.skips[0].file, "plain.eps");
        assert!(progress.skips[0].reason.contains("no native header"));
        assert!(progress.errors.is_empty());
    }

    #[test]
    fn test_out_of_bounds_region_is_reported_not_written() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        // WMF region runs past the end of the 200-byte file.
        let data = eps_bytes(200, (190, 50), (0, 0));
        let file = write_source(&source_dir, "broken.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[file], None).unwrap();

        assert_eq!(progress.previews_written, 0);
        assert_eq!(progress.skips.len(), 1);
        assert!(progress.skips[0].reason.contains("wmf preview"));
        assert!(!out_dir.path().join("broken.wmf").exists());
    }

    #[test]
    fn test_corrupt_kind_does_not_affect_the_other() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        // TIFF is valid, WMF points outside the file.
        let data = eps_bytes(200, (190, 50), (100, 50));
        let file = write_source(&source_dir, "half.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[file], None).unwrap();

        assert_eq!(progress.previews_written, 1);
        assert_eq!(progress.skips.len(), 1);
        assert_eq!(
            fs::read(out_dir.path().join("half.tiff")).unwrap(),
            &data[100..150]
        );
        assert!(!out_dir.path().join("half.wmf").exists());
    }

    #[test]
    fn test_unreadable_file_is_recorded_and_batch_continues() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let missing = EpsFile::new(source_dir.path().join("ghost.eps"), 0);
        let data = eps_bytes(200, (40, 20), (0, 0));
        let good = write_source(&source_dir, "good.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&[missing, good], None).unwrap();

        assert_eq!(progress.files_processed, 2);
        assert_eq!(progress.errors.len(), 1);
        assert!(progress.errors[0].contains("ghost.eps"));
        assert!(out_dir.path().join("good.wmf").exists());
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        fs::write(out_dir.path().join("logo.wmf"), b"stale").unwrap();

        let data = eps_bytes(200, (40, 20), (0, 0));
        let file = write_source(&source_dir, "logo.eps", &data);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        extractor.extract_files(&[file], None).unwrap();

        assert_eq!(
            fs::read(out_dir.path().join("logo.wmf")).unwrap(),
            &data[40..60]
        );
    }

    #[test]
    fn test_progress_callback_sees_each_file() {
        use std::cell::RefCell;

        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let data = eps_bytes(200, (40, 20), (0, 0));
        let files = vec![
            write_source(&source_dir, "a.eps", &data),
            write_source(&source_dir, "b.eps", &data),
        ];

        let seen = RefCell::new(Vec::new());
        let callback = |p: &ExtractionProgress| seen.borrow_mut().push(p.files_processed);

        let extractor = PreviewExtractor::new(out_dir.path().to_path_buf());
        let progress = extractor.extract_files(&files, Some(&callback)).unwrap();

        assert_eq!(progress.files_processed, 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(progress.percentage(), 100.0);
    }
}
