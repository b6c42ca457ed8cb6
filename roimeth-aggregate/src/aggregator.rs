//! Aggregation of one sample's methylation records over one chromosome's
//! regions of interest.

use log::debug;

use roimeth_core::models::{Region, RegionSet};
use roimeth_overlaprs::{IntervalSetOps, RegionIndex};

use crate::catalog::{expected_sample_file, find_sample_file};
use crate::config::Sample;
use crate::coverage::{MethCounts, decode_record};
use crate::errors::{Result, RoiError};
use crate::table::{AggregationTable, SampleColumn};

///
/// Sum one sample's methylated and total reads over every row of `table`.
///
/// The sample's records for the table's chromosome are masked, reduced to
/// those touching some region of interest, then every region collects the
/// records overlapping it. A record overlapping several regions counts
/// toward each of them.
///
/// # Arguments
/// - sample: the sample to read
/// - table: the chromosome's table; only its row layout is read
/// - roi: the chromosome's regions of interest
/// - mask: loci to exclude, may be empty
///
/// # Errors
/// - [`RoiError::MissingSampleFile`] if the sample has no file for the
///   chromosome; the catalog should have dropped the chromosome already.
/// - [`RoiError::Decode`] on the first malformed coverage field, or when a
///   region's summed read counts overflow.
///
pub fn aggregate_sample(
    sample: &Sample,
    table: &AggregationTable,
    roi: &RegionSet,
    mask: &RegionSet,
) -> Result<SampleColumn> {
    let chrom = table.chrom();
    let path = find_sample_file(&sample.prefix, chrom).ok_or_else(|| RoiError::MissingSampleFile {
        chrom: chrom.to_string(),
        path: expected_sample_file(&sample.prefix, chrom),
    })?;

    let records = RegionSet::try_from(path.as_path()).map_err(|source| RoiError::SampleFile {
        path: path.clone(),
        source,
    })?;
    let n_records = records.len();

    let records = match mask.is_empty() {
        true => records,
        false => records.subtract(mask),
    };
    let records = records.intersect_any(roi);
    let index = RegionIndex::new(&records);

    debug!(
        "{} {}: {} of {} records fall in regions of interest",
        sample.name,
        chrom,
        index.len(),
        n_records
    );

    let mut column = table.empty_column();
    for (row, cell) in table.rows().iter().zip(column.iter_mut()) {
        let query = Region {
            chr: chrom.to_string(),
            start: row.start,
            end: row.end,
            rest: None,
        };

        let mut counts = MethCounts::default();
        for record in index.all_hits(&query) {
            counts = counts
                .checked_add(decode_record(record)?)
                .ok_or_else(|| RoiError::Decode {
                    record: record.as_string(),
                    reason: "read count overflows".to_string(),
                })?;
        }
        *cell = counts;
    }

    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(start: u32, end: u32, rest: &str) -> Region {
        Region {
            chr: "chr1".to_string(),
            start,
            end,
            rest: Some(rest.to_string()),
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        sample: Sample,
        roi: RegionSet,
        table: AggregationTable,
    }

    #[fixture]
    fn sample_files() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/S1_", dir.path().display());
        fs::write(
            expected_sample_file(&prefix, "chr1"),
            "chr1\t110\t111\t0.80-10\n\
             chr1\t150\t151\t0.50-4\n\
             chr1\t160\t161\t0.25-8\n\
             chr1\t900\t901\t1.00-50\n",
        )
        .unwrap();

        let roi = RegionSet::from(vec![region(100, 200, "geneA"), region(140, 155, "geneB")]);
        let table = AggregationTable::new("chr1", &roi.regions, 1);

        Fixture {
            _dir: dir,
            sample: Sample::new(prefix, "S1"),
            roi,
            table,
        }
    }

    #[rstest]
    fn test_sums_every_overlapping_record(sample_files: Fixture) {
        let column =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &RegionSet::default())
                .unwrap();

        // rows are (100, 200) then (140, 155)
        assert_eq!(column, vec![MethCounts::new(8 + 2 + 2, 22), MethCounts::new(2, 4)]);
    }

    #[rstest]
    fn test_mask_removes_records(sample_files: Fixture) {
        let mask = RegionSet::from(vec![region(150, 151, "blacklisted")]);
        let column =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &mask).unwrap();

        assert_eq!(column, vec![MethCounts::new(8 + 2, 18), MethCounts::default()]);
    }

    #[rstest]
    fn test_missing_file_is_fatal(sample_files: Fixture) {
        let table = AggregationTable::new("chr2", &sample_files.roi.regions, 1);
        let result = aggregate_sample(&sample_files.sample, &table, &sample_files.roi, &RegionSet::default());

        assert!(matches!(result, Err(RoiError::MissingSampleFile { .. })));
    }

    #[rstest]
    fn test_malformed_record_aborts(sample_files: Fixture) {
        fs::write(
            expected_sample_file(&sample_files.sample.prefix, "chr1"),
            "chr1\t110\t111\t0.80-10\nchr1\t120\t121\tnot-a-number\n",
        )
        .unwrap();

        let result =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &RegionSet::default());
        assert!(matches!(result, Err(RoiError::Decode { .. })));
    }

    #[rstest]
    fn test_read_count_overflow_aborts(sample_files: Fixture) {
        fs::write(
            expected_sample_file(&sample_files.sample.prefix, "chr1"),
            "chr1\t110\t111\t1-18446744073709551615\nchr1\t120\t121\t1-18446744073709551615\n",
        )
        .unwrap();

        let result =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &RegionSet::default());
        match result {
            Err(RoiError::Decode { reason, .. }) => assert_eq!(reason, "read count overflows"),
            other => panic!("expected an overflow error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_masked_fragments_keep_their_counts(sample_files: Fixture) {
        // one record spanning the mask is cut in two; both halves fall in geneA
        fs::write(
            expected_sample_file(&sample_files.sample.prefix, "chr1"),
            "chr1\t100\t130\t0.5-10\n",
        )
        .unwrap();
        let mask = RegionSet::from(vec![region(110, 120, "blacklisted")]);

        let column =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &mask).unwrap();
        assert_eq!(column, vec![MethCounts::new(10, 20), MethCounts::default()]);
    }

    #[rstest]
    fn test_malformed_record_outside_roi_is_ignored(sample_files: Fixture) {
        fs::write(
            expected_sample_file(&sample_files.sample.prefix, "chr1"),
            "chr1\t110\t111\t0.80-10\nchr1\t5000\t5001\tgarbage\n",
        )
        .unwrap();

        let column =
            aggregate_sample(&sample_files.sample, &sample_files.table, &sample_files.roi, &RegionSet::default())
                .unwrap();
        assert_eq!(column[0], MethCounts::new(8, 10));
    }
}
