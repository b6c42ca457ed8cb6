//! Writing of finished aggregation tables as tab-separated ratio and raw
//! count tables.

use std::io::Write;

use crate::config::Sample;
use crate::consts::{METHYLATED_SUFFIX, NA, RATIO_PRECISION, REGION_COLUMNS, TOTAL_SUFFIX};
use crate::coverage::MethCounts;
use crate::errors::Result;
use crate::table::{AggregationTable, RegionRow};

/// Row counts for one or more emitted tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub rows_written: usize,
    /// Rows with fewer covered samples than `min_file_count`.
    pub rows_filtered: usize,
}

impl std::ops::AddAssign for EmitStats {
    fn add_assign(&mut self, other: EmitStats) {
        self.rows_written += other.rows_written;
        self.rows_filtered += other.rows_filtered;
    }
}

///
/// Writes the ratio table and, optionally, the raw count table.
///
/// A cell is covered when its sample saw at least `min_read_count` reads
/// (and at least one). Covered cells print the ratio to three decimals,
/// the rest print `NA`. A row goes to both tables only if at least
/// `min_file_count` of its cells are covered.
///
pub struct TableEmitter<W: Write> {
    ratios: W,
    raw: Option<W>,
    min_read_count: u64,
    min_file_count: usize,
}

impl<W: Write> TableEmitter<W> {
    pub fn new(ratios: W, raw: Option<W>, min_read_count: u64, min_file_count: usize) -> Self {
        TableEmitter {
            ratios,
            raw,
            min_read_count,
            min_file_count,
        }
    }

    pub fn is_covered(&self, counts: &MethCounts) -> bool {
        counts.total > 0 && counts.total >= self.min_read_count
    }

    /// Header lines: one column per sample in the ratio table, two in the
    /// raw table.
    pub fn write_headers(&mut self, samples: &[Sample]) -> Result<()> {
        let mut header = REGION_COLUMNS.join("\t");
        for sample in samples {
            header.push('\t');
            header.push_str(&sample.name);
        }
        writeln!(self.ratios, "{}", header)?;

        if let Some(raw) = self.raw.as_mut() {
            let mut header = REGION_COLUMNS.join("\t");
            for sample in samples {
                header.push_str(&format!(
                    "\t{name}{}\t{name}{}",
                    METHYLATED_SUFFIX,
                    TOTAL_SUFFIX,
                    name = sample.name
                ));
            }
            writeln!(raw, "{}", header)?;
        }

        Ok(())
    }

    fn format_ratio(&self, counts: &MethCounts) -> String {
        match counts.ratio() {
            Some(ratio) if self.is_covered(counts) => {
                format!("{:.*}", RATIO_PRECISION, ratio)
            }
            _ => NA.to_string(),
        }
    }

    fn write_row(&mut self, chrom: &str, row: &RegionRow) -> Result<()> {
        let prefix = format!("{}\t{}\t{}\t{}", chrom, row.start, row.end, row.name);

        let mut line = prefix.clone();
        for cell in &row.cells {
            line.push('\t');
            line.push_str(&self.format_ratio(cell));
        }
        writeln!(self.ratios, "{}", line)?;

        if let Some(raw) = self.raw.as_mut() {
            let mut line = prefix;
            for cell in &row.cells {
                line.push_str(&format!("\t{}\t{}", cell.meth, cell.total));
            }
            writeln!(raw, "{}", line)?;
        }

        Ok(())
    }

    ///
    /// Write every sufficiently covered row of `table`, in ascending
    /// `(start, end)` order.
    ///
    pub fn write_table(&mut self, table: &AggregationTable) -> Result<EmitStats> {
        let mut stats = EmitStats::default();

        for row in table.rows() {
            let covered = row.cells.iter().filter(|c| self.is_covered(c)).count();
            if covered < self.min_file_count {
                stats.rows_filtered += 1;
                continue;
            }

            self.write_row(table.chrom(), row)?;
            stats.rows_written += 1;
        }

        Ok(stats)
    }

    /// Flush both tables and hand the writers back.
    pub fn finish(mut self) -> Result<(W, Option<W>)> {
        self.ratios.flush()?;
        if let Some(raw) = self.raw.as_mut() {
            raw.flush()?;
        }
        Ok((self.ratios, self.raw))
    }
}
