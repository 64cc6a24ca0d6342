//! Batch comparison settings

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use nicheoverlap_core::io::RowLayout;
use nicheoverlap_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::normalize::NORMALIZED_DIR;

/// Species folders compared when none are configured
pub const DEFAULT_SPECIES: [&str; 2] = ["aust_30", "tel_30"];

/// Name of the baseline tree, a sibling of the run root
pub const DEFAULT_BASELINE_DIR: &str = "default";

/// Label of the baseline model in report rows
pub const DEFAULT_BASELINE_LABEL: &str = "L/1.0";

/// Settings for comparing a tree of tuned runs against a baseline tree.
///
/// Expected layout:
/// ```text
/// <root>/<run>/<species>/*.asc
/// <baseline>/<species>/*.asc
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory holding one subdirectory per tuned run
    pub root_dir: PathBuf,
    /// Baseline tree; `<parent of root>/default` when unset
    pub baseline_dir: Option<PathBuf>,
    /// Species subdirectories to compare, in order
    pub species: Vec<String>,
    /// Entry names ignored in species directories
    pub exclude_dir_names: BTreeSet<String>,
    /// Report path; `<root>_I_values.csv` when unset
    pub output: Option<PathBuf>,
    /// How the baseline is named in report rows
    pub baseline_label: String,
    /// Row layout of cached normalized grids
    pub row_layout: RowLayout,
    /// Abort on the first failed pair instead of skipping it
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::new(),
            baseline_dir: None,
            species: DEFAULT_SPECIES.iter().map(|s| s.to_string()).collect(),
            exclude_dir_names: BTreeSet::from([NORMALIZED_DIR.to_string()]),
            output: None,
            baseline_label: DEFAULT_BASELINE_LABEL.to_string(),
            row_layout: RowLayout::default(),
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::from(e).in_file(path))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(e.to_string()).in_file(path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(Error::Config("root directory not set".into()));
        }
        if self.species.is_empty() {
            return Err(Error::Config("no species to compare".into()));
        }
        Ok(())
    }

    /// Baseline tree, resolved
    pub fn baseline_dir(&self) -> PathBuf {
        match &self.baseline_dir {
            Some(dir) => dir.clone(),
            None => self
                .root_dir
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_BASELINE_DIR),
        }
    }

    /// Report path, resolved
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        match self.root_dir.file_name() {
            Some(name) => {
                let file = format!("{}_I_values.csv", name.to_string_lossy());
                self.root_dir.with_file_name(file)
            }
            None => PathBuf::from(format!("{}_I_values.csv", self.root_dir.display())),
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dir_names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_next_to_root() {
        let config = BatchConfig::new("runs/lq");
        assert_eq!(config.baseline_dir(), PathBuf::from("runs/default"));
        assert_eq!(config.output_path(), PathBuf::from("runs/lq_I_values.csv"));
        assert!(config.is_excluded("normalized_grids"));
        assert_eq!(config.species, vec!["aust_30", "tel_30"]);
    }

    #[test]
    fn test_relative_root() {
        let config = BatchConfig::new("lq");
        assert_eq!(config.baseline_dir(), PathBuf::from("default"));
        assert_eq!(config.output_path(), PathBuf::from("lq_I_values.csv"));
    }

    #[test]
    fn test_partial_json() {
        let config: BatchConfig =
            serde_json::from_str(r#"{"root_dir": "lqp", "species": ["sp1"], "row_layout": "full"}"#)
                .unwrap();
        assert_eq!(config.species, vec!["sp1"]);
        assert_eq!(config.row_layout, RowLayout::Full);
        assert_eq!(config.baseline_label, "L/1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(BatchConfig::default().validate().is_err());
        let mut config = BatchConfig::new("lq");
        config.species.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
