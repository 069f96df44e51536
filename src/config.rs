use crate::error::{EpsRipError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub filters: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub max_file_size: u64,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
    pub generate_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["eps".to_string(), "epsf".to_string()],
            max_file_size: 100 * 1024 * 1024, // 100MB
            exclude_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ],
            exclude_patterns: vec![],
            // The classic workflow points the tool at a flat folder of EPS
            // files; deeper sweeps are opt-in.
            max_depth: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("out"),
            generate_report: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(EpsRipError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| EpsRipError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| EpsRipError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["epsrip.toml", ".epsrip.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref formats) = cli_args.formats {
            self.filters.extensions = formats
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(max_size) = cli_args.max_file_size {
            self.filters.max_file_size = max_size;
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.filters.max_depth = max_depth;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| EpsRipError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| EpsRipError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.extensions.is_empty() {
            return Err(EpsRipError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if self.filters.max_file_size == 0 {
            return Err(EpsRipError::Config {
                message: "Maximum file size must be greater than 0".to_string(),
            });
        }

        if self.filters.max_depth == 0 {
            return Err(EpsRipError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub formats: Option<String>,
    pub max_file_size: Option<u64>,
    pub max_depth: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: Option<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_max_file_size(mut self, max_size: Option<u64>) -> Self {
        self.max_file_size = max_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.filters.extensions.contains(&"eps".to_string()));
        assert!(config.filters.extensions.contains(&"epsf".to_string()));
        assert_eq!(config.filters.max_depth, 1);
        assert_eq!(config.output.base_directory, PathBuf::from("out"));
        assert!(config.output.generate_report);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.filters.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filters.max_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.filters.max_file_size,
            loaded_config.filters.max_file_size
        );
        assert_eq!(
            config.output.base_directory,
            loaded_config.output.base_directory
        );
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("does-not-exist.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_formats(Some("eps".to_string()))
            .with_max_depth(Some(5))
            .with_output_dir(Some(PathBuf::from("previews")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.filters.extensions, vec!["eps"]);
        assert_eq!(config.filters.max_depth, 5);
        assert_eq!(config.output.base_directory, PathBuf::from("previews"));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[filters]"));
        assert!(sample.contains("[output]"));
    }
}
