use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use roimeth_core::utils::remove_all_extensions;

use crate::consts::{DEFAULT_MIN_FILE_COUNT, DEFAULT_MIN_READ_COUNT};
use crate::errors::{Result, RoiError};

/// One input sample: where its per-chromosome files live and what its
/// output columns are called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Files are found at `{prefix}{chrom}.bed`.
    pub prefix: String,
    pub name: String,
}

impl Sample {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Sample {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Sample named after its prefix, e.g. `data/S1_` -> `S1`.
    pub fn from_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let stem = remove_all_extensions(Path::new(&prefix));
        let name = stem.trim_end_matches(['.', '_', '-']);
        let name = match name.is_empty() {
            true => prefix.clone(),
            false => name.to_string(),
        };
        Sample { prefix, name }
    }
}

fn default_min_read_count() -> u64 {
    DEFAULT_MIN_READ_COUNT
}

fn default_min_file_count() -> usize {
    DEFAULT_MIN_FILE_COUNT
}

fn default_progress() -> bool {
    true
}

///
/// Everything one aggregation run needs.
///
/// Can be read from a toml file:
///
/// ```toml
/// roi = "genes.bed"
/// mask = "blacklist.bed"
/// sample_prefixes = ["data/S1_", "data/S2_"]
/// sample_names = ["tumor", "normal"]
/// output = "roi_meth.tsv"
/// raw_output = "roi_counts.tsv"
/// min_read_count = 5
/// min_file_count = 2
/// threads = 4
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RoiConfig {
    pub roi: PathBuf,
    #[serde(default)]
    pub mask: Option<PathBuf>,
    pub sample_prefixes: Vec<String>,
    #[serde(default)]
    pub sample_names: Option<Vec<String>>,
    pub output: PathBuf,
    #[serde(default)]
    pub raw_output: Option<PathBuf>,
    #[serde(default = "default_min_read_count")]
    pub min_read_count: u64,
    #[serde(default = "default_min_file_count")]
    pub min_file_count: usize,
    /// Worker threads per chromosome; all available cores when unset.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl RoiConfig {
    pub fn new(roi: impl Into<PathBuf>, sample_prefixes: Vec<String>, output: impl Into<PathBuf>) -> Self {
        RoiConfig {
            roi: roi.into(),
            mask: None,
            sample_prefixes,
            sample_names: None,
            output: output.into(),
            raw_output: None,
            min_read_count: DEFAULT_MIN_READ_COUNT,
            min_file_count: DEFAULT_MIN_FILE_COUNT,
            threads: None,
            progress: true,
        }
    }

    ///
    /// The samples of this run, in output column order.
    ///
    /// # Errors
    /// [`RoiError::InvalidConfig`] if there are no samples or the name list
    /// does not match the prefix list in length.
    ///
    pub fn samples(&self) -> Result<Vec<Sample>> {
        if self.sample_prefixes.is_empty() {
            return Err(RoiError::InvalidConfig(
                "at least one sample prefix is required".to_string(),
            ));
        }

        match &self.sample_names {
            None => Ok(self
                .sample_prefixes
                .iter()
                .map(|p| Sample::from_prefix(p.clone()))
                .collect()),
            Some(names) if names.len() != self.sample_prefixes.len() => {
                Err(RoiError::InvalidConfig(format!(
                    "{} sample prefixes but {} sample names",
                    self.sample_prefixes.len(),
                    names.len()
                )))
            }
            Some(names) => Ok(self
                .sample_prefixes
                .iter()
                .zip(names)
                .map(|(prefix, name)| Sample::new(prefix.clone(), name.clone()))
                .collect()),
        }
    }

    /// Resolved worker count, at least one.
    pub fn worker_count(&self) -> Result<usize> {
        match self.threads {
            Some(0) => Err(RoiError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
        }
    }
}

impl TryFrom<&Path> for RoiConfig {
    type Error = RoiError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
