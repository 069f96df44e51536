use crate::config::FilterConfig;
use crate::error::{EpsRipError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// One EPS candidate discovered in the source directory.
#[derive(Debug, Clone)]
pub struct EpsFile {
    pub source_path: PathBuf,
    pub file_name: String,
    /// File name without its extension, used to derive output names.
    pub base_name: String,
    pub size: u64,
}

impl EpsFile {
    pub fn new(source_path: PathBuf, size: u64) -> Self {
        let file_name = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let base_name = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            source_path,
            file_name,
            base_name,
            size,
        }
    }
}

pub struct EpsScanner {
    filter: FileFilter,
    max_depth: usize,
}

impl EpsScanner {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
        }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<EpsFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(EpsRipError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(EpsRipError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut files = Vec::new();
        let mut scan_errors = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        scan_errors.push(format!("Permission denied: {}", err));
                    } else {
                        scan_errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if entry.file_type().is_file() {
                match self.process_entry(&entry) {
                    Ok(Some(eps_file)) => files.push(eps_file),
                    Ok(None) => {} // Filtered out
                    Err(err) => {
                        scan_errors.push(format!(
                            "Error processing {}: {}",
                            entry.path().display(),
                            err
                        ));
                    }
                }
            }
        }

        if !scan_errors.is_empty() && files.is_empty() {
            return Err(EpsRipError::Permission {
                path: format!("Multiple scan errors: {}", scan_errors.join(", ")),
            });
        }

        if files.is_empty() {
            return Err(EpsRipError::NoEpsFiles {
                directory: root_path.display().to_string(),
                searched_extensions: self.filter.extensions().clone(),
            });
        }

        // Sort by path for consistent output
        files.sort_by(|a, b| a.source_path.cmp(&b.source_path));

        Ok(files)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() > self.max_depth {
            return false;
        }

        if entry.file_type().is_file() || entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.filter.should_traverse_directory(entry.path());
        }

        true
    }

    fn process_entry(&self, entry: &DirEntry) -> Result<Option<EpsFile>> {
        let path = entry.path();

        if !self.filter.is_candidate_file(path) {
            return Ok(None);
        }

        let metadata = entry.metadata().map_err(|e| EpsRipError::Io(e.into()))?;

        if !self.filter.is_size_allowed(metadata.len()) {
            return Ok(None);
        }

        Ok(Some(EpsFile::new(path.to_path_buf(), metadata.len())))
    }
}
