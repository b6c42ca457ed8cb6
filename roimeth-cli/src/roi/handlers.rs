use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{LevelFilter, info, warn};

use roimeth_aggregate::{RoiConfig, roi_methylation};

fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

fn strings(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
}

///
/// Build the run configuration from `--config` (if given) with every flag
/// on the command line taking precedence.
///
pub fn config_from_matches(matches: &ArgMatches) -> Result<RoiConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RoiConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read run configuration: {}", path))?,
        None => {
            let roi = matches
                .get_one::<String>("roi")
                .context("--roi is required without --config")?;
            let output = matches
                .get_one::<String>("output")
                .context("--output is required without --config")?;
            let samples =
                strings(matches, "samples").context("--samples is required without --config")?;
            RoiConfig::new(roi, samples, output)
        }
    };

    if let Some(roi) = matches.get_one::<String>("roi") {
        config.roi = PathBuf::from(roi);
    }
    if let Some(mask) = matches.get_one::<String>("mask") {
        config.mask = Some(PathBuf::from(mask));
    }
    if let Some(samples) = strings(matches, "samples") {
        config.sample_prefixes = samples;
    }
    if let Some(names) = strings(matches, "names") {
        config.sample_names = Some(names);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output = PathBuf::from(output);
    }
    if let Some(raw_output) = matches.get_one::<String>("raw-output") {
        config.raw_output = Some(PathBuf::from(raw_output));
    }
    if let Some(min_read_count) = matches.get_one::<u64>("min-read-count") {
        config.min_read_count = *min_read_count;
    }
    if let Some(min_file_count) = matches.get_one::<usize>("min-file-count") {
        config.min_file_count = *min_file_count;
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = Some(*threads);
    }
    if matches.get_flag("no-progress") {
        config.progress = false;
    }

    Ok(config)
}

pub fn run_roi(matches: &ArgMatches) -> Result<()> {
    init_logging(matches.get_count("verbose"));

    let config = config_from_matches(matches)?;
    let summary = roi_methylation(&config)
        .with_context(|| format!("Failed to aggregate over {}", config.roi.display()))?;

    if !summary.chromosomes_skipped.is_empty() {
        warn!(
            "{} chromosome(s) skipped for missing sample files: {}",
            summary.chromosomes_skipped.len(),
            summary.chromosomes_skipped.join(", ")
        );
    }
    info!(
        "Done: {} chromosome(s), {} rows written to {}, {} rows below --min-file-count",
        summary.chromosomes_processed,
        summary.rows_written,
        config.output.display(),
        summary.rows_filtered
    );

    Ok(())
}
