pub const DEFAULT_MIN_READ_COUNT: u64 = 1;
pub const DEFAULT_MIN_FILE_COUNT: usize = 1;

/// Per-chromosome sample files live at `{prefix}{chrom}{SAMPLE_FILE_EXT}`.
pub const SAMPLE_FILE_EXT: &str = ".bed";
pub const SAMPLE_FILE_GZ_EXT: &str = ".bed.gz";

/// Cell written when a sample does not reach the read threshold.
pub const NA: &str = "NA";
pub const RATIO_PRECISION: usize = 3;

pub const METHYLATED_SUFFIX: &str = "_methylated";
pub const TOTAL_SUFFIX: &str = "_total";

pub const REGION_COLUMNS: [&str; 4] = ["chrom", "start", "end", "name"];
