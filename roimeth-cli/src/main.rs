mod roi;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "roimeth";
    pub const BIN_NAME: &str = "roimeth";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Methylation ratios over regions of interest from per-chromosome methylation files.")
        .subcommand_required(true)
        .subcommand(roi::cli::create_roi_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // REGIONS OF INTEREST
        //
        Some((roi::cli::ROI_CMD, matches)) => {
            roi::handlers::run_roi(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_roi_parses_without_samples() {
        let result = build_parser().try_get_matches_from([
            consts::BIN_NAME,
            roi::cli::ROI_CMD,
            "--roi",
            "genes.bed",
            "--output",
            "out.tsv",
        ]);
        // --samples may come from --config, so parsing alone succeeds
        assert!(result.is_ok());
    }
}
