use std::path::PathBuf;

use roimeth_core::RegionSetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiError {
    /// Unreadable region-of-interest or mask source.
    #[error("Can't load {what} from {}: {source}", path.display())]
    Config {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: RegionSetError,
    },

    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    ConfigFile(#[from] toml::de::Error),

    /// A sample file vanished for a chromosome the catalog had accepted.
    #[error("Missing methylation file for chromosome {chrom}: {}", path.display())]
    MissingSampleFile { chrom: String, path: PathBuf },

    #[error("Can't read methylation file {}: {source}", path.display())]
    SampleFile {
        path: PathBuf,
        #[source]
        source: RegionSetError,
    },

    /// Malformed `<fraction>-<totalReads>` field.
    #[error("Can't decode coverage record {record:?}: {reason}")]
    Decode { record: String, reason: String },

    #[error("Can't open output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: RegionSetError,
    },

    #[error("Can't start {0} aggregation workers: {1}")]
    WorkerPool(usize, String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;
