pub mod eps_scanner;
pub mod file_filter;

pub use eps_scanner::{EpsFile, EpsScanner};
pub use file_filter::FileFilter;
