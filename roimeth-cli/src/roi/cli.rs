use clap::{Arg, ArgAction, Command, value_parser};

pub const ROI_CMD: &str = "roi";

pub fn create_roi_cli() -> Command {
    Command::new(ROI_CMD)
        .author("Databio")
        .about("Aggregate per-CpG methylation files into methylation ratios over regions of interest.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML run configuration; flags given here override it"),
        )
        .arg(
            Arg::new("roi")
                .long("roi")
                .short('r')
                .help("Regions of interest (BED or GTF, optionally gzipped)"),
        )
        .arg(
            Arg::new("mask")
                .long("mask")
                .short('m')
                .help("Regions to exclude from every sample before aggregation"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .short('s')
                .num_args(1..)
                .help("Sample prefixes; files are read from <prefix><chrom>.bed"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .short('n')
                .num_args(1..)
                .help("Sample names for the output header, one per prefix"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Ratio table; written gzipped if it ends in .gz"),
        )
        .arg(
            Arg::new("raw-output")
                .long("raw-output")
                .help("Also write methylated and total read counts per sample"),
        )
        .arg(
            Arg::new("min-read-count")
                .long("min-read-count")
                .value_parser(value_parser!(u64))
                .help("Reads a sample needs over a region for its ratio to be reported [default: 1]"),
        )
        .arg(
            Arg::new("min-file-count")
                .long("min-file-count")
                .value_parser(value_parser!(usize))
                .help("Samples that must pass --min-read-count for a region to be written [default: 1]"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(value_parser!(usize))
                .help("Worker threads [default: all cores]"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .help("Don't draw a progress bar"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("More logging; repeat for trace output"),
        )
}
