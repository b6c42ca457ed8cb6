use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

use roimeth_aggregate::{RoiConfig, RoiError, roi_methylation};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn prefix(&self, sample: &str) -> String {
        format!("{}/{}_", self.dir.path().display(), sample)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn write_gz(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::fast());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    fn config(&self, samples: &[&str]) -> RoiConfig {
        let mut config = RoiConfig::new(
            self.path("roi.bed"),
            samples.iter().map(|s| self.prefix(s)).collect(),
            self.path("out.tsv"),
        );
        config.progress = false;
        config
    }
}

fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[fixture]
fn single_region() -> Workspace {
    let ws = Workspace {
        dir: tempfile::tempdir().unwrap(),
    };
    ws.write("roi.bed", "chrom\tstart\tend\tname\nchr1\t100\t200\tgeneA\n");
    ws.write("S1_chr1.bed", "chr1\t150\t151\t0.80-10\n");
    ws
}

/// Three samples over two chromosomes plus one chromosome only some samples cover.
#[fixture]
fn cohort() -> Workspace {
    let ws = Workspace {
        dir: tempfile::tempdir().unwrap(),
    };
    ws.write(
        "roi.bed",
        "chrom\tstart\tend\tname\n\
         chr2\t0\t1000\tgeneZ\n\
         chr1\t500\t900\tgeneB\n\
         chr1\t100\t200\tgeneA\n\
         chr3\t0\t100\tgeneQ\n\
         chr1\t150\t600\tgeneD\n",
    );
    ws.write("mask.bed", "chr1\t180\t190\tblacklist\n");

    ws.write(
        "S1_chr1.bed",
        "track name=S1\n\
         chr1\t120\t121\t0.50-10\n\
         chr1\t185\t186\t1.00-100\n\
         chr1\t550\t551\t0.25-8\n\
         chr1\t5000\t5001\t0.10-10\n",
    );
    ws.write("S1_chr2.bed", "chr2\t10\t11\t0.75-4\n");
    ws.write("S1_chr3.bed", "chr3\t10\t11\t0.75-4\n");

    ws.write(
        "S2_chr1.bed",
        "chr1\t130\t131\t0.40-5\nchr1\t599\t600\t0.60-10\n",
    );
    ws.write_gz("S2_chr2.bed.gz", "chr2\t20\t21\t0.00-3\n");

    ws.write("S3_chr1.bed", "chr1\t700\t701\t0.90-20\n");
    ws.write("S3_chr2.bed", "");
    ws.write("S3_chr3.bed", "chr3\t50\t51\t1-1\n");
    ws
}

#[rstest]
fn test_single_covered_region(single_region: Workspace) {
    let mut config = single_region.config(&["S1"]);
    config.min_read_count = 5;

    let summary = roi_methylation(&config).unwrap();

    assert_eq!(
        read_to_string(&config.output),
        "chrom\tstart\tend\tname\tS1\nchr1\t100\t200\tgeneA\t0.800\n"
    );
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.chromosomes_processed, 1);
}

#[rstest]
fn test_under_covered_region(single_region: Workspace) {
    let mut config = single_region.config(&["S1"]);
    config.min_read_count = 20;
    config.min_file_count = 0;
    roi_methylation(&config).unwrap();
    assert_eq!(
        read_to_string(&config.output).lines().nth(1),
        Some("chr1\t100\t200\tgeneA\tNA")
    );

    config.min_file_count = 1;
    let summary = roi_methylation(&config).unwrap();
    assert_eq!(read_to_string(&config.output).lines().count(), 1);
    assert_eq!(summary.rows_filtered, 1);
}

#[rstest]
fn test_cohort_tables(cohort: Workspace) {
    let mut config = cohort.config(&["S1", "S2", "S3"]);
    config.sample_names = Some(vec!["tumor".into(), "normal".into(), "cfDNA".into()]);
    config.mask = Some(cohort.path("mask.bed"));
    config.raw_output = Some(cohort.path("raw.tsv"));
    config.min_read_count = 1;
    config.min_file_count = 1;
    config.threads = Some(2);

    let summary = roi_methylation(&config).unwrap();

    // chr3 is missing for S2
    assert_eq!(summary.chromosomes_skipped, vec!["chr3".to_string()]);
    assert_eq!(summary.chromosomes_processed, 2);

    assert_eq!(
        read_to_string(&config.output),
        "chrom\tstart\tend\tname\ttumor\tnormal\tcfDNA\n\
         chr2\t0\t1000\tgeneZ\t0.750\t0.000\tNA\n\
         chr1\t100\t200\tgeneA\t0.500\t0.400\tNA\n\
         chr1\t150\t600\tgeneD\t0.250\t0.600\tNA\n\
         chr1\t500\t900\tgeneB\t0.250\t0.600\t0.900\n"
    );
    assert_eq!(
        read_to_string(config.raw_output.as_ref().unwrap()),
        "chrom\tstart\tend\tname\ttumor_methylated\ttumor_total\tnormal_methylated\tnormal_total\tcfDNA_methylated\tcfDNA_total\n\
         chr2\t0\t1000\tgeneZ\t3\t4\t0\t3\t0\t0\n\
         chr1\t100\t200\tgeneA\t5\t10\t2\t5\t0\t0\n\
         chr1\t150\t600\tgeneD\t2\t8\t6\t10\t0\t0\n\
         chr1\t500\t900\tgeneB\t2\t8\t6\t10\t18\t20\n"
    );
}

#[rstest]
fn test_worker_count_does_not_change_output(cohort: Workspace) {
    let outputs: Vec<(String, String)> = [1, 4]
        .into_iter()
        .map(|threads| {
            let mut config = cohort.config(&["S1", "S2", "S3"]);
            config.mask = Some(cohort.path("mask.bed"));
            config.output = cohort.path(&format!("out_{}.tsv", threads));
            config.raw_output = Some(cohort.path(&format!("raw_{}.tsv", threads)));
            config.min_file_count = 2;
            config.threads = Some(threads);

            roi_methylation(&config).unwrap();
            (
                read_to_string(&config.output),
                read_to_string(config.raw_output.as_ref().unwrap()),
            )
        })
        .collect();

    assert_eq!(outputs[0], outputs[1]);
}

#[rstest]
fn test_gzipped_output(single_region: Workspace) {
    let mut config = single_region.config(&["S1"]);
    config.output = single_region.path("nested/out.tsv.gz");

    roi_methylation(&config).unwrap();

    let mut text = String::new();
    MultiGzDecoder::new(fs::File::open(&config.output).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text.lines().nth(1), Some("chr1\t100\t200\tgeneA\t0.800"));
}

#[rstest]
fn test_malformed_record_aborts_run(single_region: Workspace) {
    single_region.write("S1_chr1.bed", "chr1\t150\t151\t0.80\n");
    let config = single_region.config(&["S1"]);

    assert!(matches!(
        roi_methylation(&config),
        Err(RoiError::Decode { .. })
    ));
}

#[rstest]
fn test_missing_roi_is_config_error(single_region: Workspace) {
    let mut config = single_region.config(&["S1"]);
    config.roi = single_region.path("nope.bed");

    assert!(matches!(
        roi_methylation(&config),
        Err(RoiError::Config { .. })
    ));
}

#[rstest]
fn test_mismatched_names_fail_before_reading(single_region: Workspace) {
    let mut config = single_region.config(&["S1"]);
    config.sample_names = Some(vec!["a".into(), "b".into()]);

    assert!(matches!(
        roi_methylation(&config),
        Err(RoiError::InvalidConfig(_))
    ));
    assert!(!config.output.exists());
}
