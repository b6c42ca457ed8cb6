//! The set of regions of interest, grouped by chromosome, and the
//! chromosomes every sample has methylation data for.

use std::path::{Path, PathBuf};

use log::warn;

use roimeth_core::models::{Region, RegionSet};

use crate::config::Sample;
use crate::consts::{SAMPLE_FILE_EXT, SAMPLE_FILE_GZ_EXT};
use crate::errors::{Result, RoiError};

/// Where a sample's methylation file for `chrom` is expected: `{prefix}{chrom}.bed`.
pub fn expected_sample_file(prefix: &str, chrom: &str) -> PathBuf {
    PathBuf::from(format!("{}{}{}", prefix, chrom, SAMPLE_FILE_EXT))
}

///
/// Resolve a sample's methylation file for `chrom`, accepting a gzipped
/// `{prefix}{chrom}.bed.gz` when the plain file is absent.
///
pub fn find_sample_file(prefix: &str, chrom: &str) -> Option<PathBuf> {
    let plain = expected_sample_file(prefix, chrom);
    if plain.is_file() {
        return Some(plain);
    }

    let gzipped = PathBuf::from(format!("{}{}{}", prefix, chrom, SAMPLE_FILE_GZ_EXT));
    gzipped.is_file().then_some(gzipped)
}

///
/// Load the regions of interest.
///
/// # Errors
/// [`RoiError::Config`] if the file can't be opened or parsed.
///
pub fn load_roi(path: &Path) -> Result<RegionSet> {
    RegionSet::try_from(path).map_err(|source| RoiError::Config {
        what: "regions of interest",
        path: path.to_owned(),
        source,
    })
}

///
/// Load the mask; no mask means nothing is excluded.
///
pub fn load_mask(path: Option<&Path>) -> Result<RegionSet> {
    match path {
        None => Ok(RegionSet::default()),
        Some(path) => RegionSet::try_from(path).map_err(|source| RoiError::Config {
            what: "mask",
            path: path.to_owned(),
            source,
        }),
    }
}

/// Regions of interest plus the chromosomes that can be aggregated.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    roi: RegionSet,
    chroms: Vec<String>,
    skipped: Vec<String>,
}

impl RegionCatalog {
    ///
    /// Build the catalog, keeping a chromosome only if every sample has a
    /// methylation file for it. Dropped chromosomes are logged once each.
    ///
    /// Chromosome order is the order chromosomes first appear in `roi`.
    ///
    pub fn new(roi: RegionSet, samples: &[Sample]) -> Self {
        let mut chroms: Vec<String> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();

        for chrom in roi.iter_chroms() {
            let missing = samples
                .iter()
                .find(|s| find_sample_file(&s.prefix, chrom).is_none());

            match missing {
                Some(sample) => {
                    warn!(
                        "Skipping {}: no methylation file for sample {} ({})",
                        chrom,
                        sample.name,
                        expected_sample_file(&sample.prefix, chrom).display()
                    );
                    skipped.push(chrom.clone());
                }
                None => chroms.push(chrom.clone()),
            }
        }

        RegionCatalog {
            roi,
            chroms,
            skipped,
        }
    }

    /// Chromosomes every sample has data for, in first-seen order.
    pub fn chroms(&self) -> &[String] {
        &self.chroms
    }

    /// Chromosomes dropped because at least one sample file is missing.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Regions of interest on `chrom`, in file order.
    pub fn chrom_regions(&self, chrom: &str) -> RegionSet {
        let regions: Vec<Region> = self.roi.iter_chr_regions(chrom).cloned().collect();
        RegionSet::from(regions)
    }
}
