use crate::config::FilterConfig;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    extensions: Vec<String>,
    max_file_size: u64,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            extensions: config.extensions.clone(),
            max_file_size: config.max_file_size,
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    /// Whether the path looks like an EPS candidate by extension.
    pub fn is_candidate_file(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension().and_then(|s| s.to_str()) {
            let ext_lower = extension.to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return true;
            }
        }

        false
    }

    pub fn is_size_allowed(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            let dir_name_lower = dir_name.to_lowercase();

            if self
                .exclude_dirs
                .iter()
                .any(|exclude| exclude.to_lowercase() == dir_name_lower)
            {
                return false;
            }

            let path_str = path.to_string_lossy();
            for pattern in &self.exclude_patterns {
                if pattern.is_match(&path_str) {
                    return false;
                }
            }

            // Skip hidden directories (starting with .)
            if dir_name.starts_with('.') && dir_name != "." && dir_name != ".." {
                return false;
            }
        }

        true
    }

    pub fn extensions(&self) -> &Vec<String> {
        &self.extensions
    }
}
