//! # Methylation over regions of interest
//!
//! Aggregates per-CpG methylation files, one file per sample and
//! chromosome, into methylation ratios over a set of regions of interest.
//!
//! Each record of a sample file carries its coverage as
//! `<fraction>-<totalReads>` in the name column. For every region and
//! sample the methylated and total reads of all overlapping records are
//! summed; the ratio table reports `methylated / total` per sample and an
//! optional raw table reports both counts.
//!
//! ```no_run
//! use roimeth_aggregate::{RoiConfig, roi_methylation};
//!
//! let mut config = RoiConfig::new(
//!     "genes.bed",
//!     vec!["data/S1_".to_string(), "data/S2_".to_string()],
//!     "genes_meth.tsv",
//! );
//! config.min_read_count = 5;
//!
//! let summary = roi_methylation(&config).unwrap();
//! println!("{} rows written", summary.rows_written);
//! ```
pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod coverage;
pub mod emitter;
pub mod errors;
pub mod scheduler;
pub mod table;

use std::io::{BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use roimeth_core::utils::get_dynamic_writer;

// re-exports
pub use aggregator::aggregate_sample;
pub use catalog::RegionCatalog;
pub use config::{RoiConfig, Sample};
pub use coverage::{MethCounts, decode_coverage};
pub use emitter::{EmitStats, TableEmitter};
pub use errors::{Result, RoiError};
pub use scheduler::AggregationScheduler;
pub use table::{AggregationTable, RegionRow};

use crate::catalog::{load_mask, load_roi};

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoiSummary {
    pub chromosomes_processed: usize,
    /// Chromosomes dropped because some sample had no file for them.
    pub chromosomes_skipped: Vec<String>,
    pub rows_written: usize,
    pub rows_filtered: usize,
}

type OutputWriter = BufWriter<Box<dyn Write + Send>>;

fn open_output(path: &Path) -> Result<OutputWriter> {
    get_dynamic_writer(path).map_err(|source| RoiError::Output {
        path: path.to_owned(),
        source,
    })
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} chromosomes {msg}") {
        bar.set_style(style);
    }
    bar
}

///
/// Compute methylation ratios over the regions of interest for every
/// sample of `config`, writing the ratio table (and the raw count table,
/// if configured).
///
/// Chromosomes are processed one at a time, in the order they first appear
/// in the regions of interest; within a chromosome samples are aggregated
/// in parallel.
///
/// # Errors
/// Any [`RoiError`]. Output files written before the error are incomplete.
///
pub fn roi_methylation(config: &RoiConfig) -> Result<RoiSummary> {
    let samples = config.samples()?;
    let scheduler = AggregationScheduler::new(config.worker_count()?)?;

    let roi = load_roi(&config.roi)?;
    let mask = load_mask(config.mask.as_deref())?;
    info!(
        "Loaded {} regions of interest and {} mask regions",
        roi.len(),
        mask.len()
    );

    let catalog = RegionCatalog::new(roi, &samples);

    let raw: Option<OutputWriter> = match &config.raw_output {
        Some(path) => Some(open_output(path)?),
        None => None,
    };
    let mut emitter = TableEmitter::new(
        open_output(&config.output)?,
        raw,
        config.min_read_count,
        config.min_file_count,
    );
    emitter.write_headers(&samples)?;

    let bar = progress_bar(catalog.chroms().len(), config.progress);
    let mut stats = EmitStats::default();

    for chrom in catalog.chroms() {
        bar.set_message(chrom.clone());

        let roi_chr = catalog.chrom_regions(chrom);
        info!(
            "Aggregating {}: {} regions over {} samples with {} workers",
            chrom,
            roi_chr.len(),
            samples.len(),
            scheduler.workers()
        );

        let table = scheduler.run(&samples, chrom, &roi_chr, &mask)?;
        let chrom_stats = emitter.write_table(&table)?;
        info!(
            "{}: {} rows written, {} below the sample threshold",
            chrom, chrom_stats.rows_written, chrom_stats.rows_filtered
        );

        stats += chrom_stats;
        bar.inc(1);
    }

    emitter.finish()?;
    bar.finish_and_clear();

    Ok(RoiSummary {
        chromosomes_processed: catalog.chroms().len(),
        chromosomes_skipped: catalog.skipped().to_vec(),
        rows_written: stats.rows_written,
        rows_filtered: stats.rows_filtered,
    })
}
