use std::collections::HashMap;

use roimeth_core::models::Region;

use crate::coverage::MethCounts;

/// Per-region counts for one sample, aligned with [`AggregationTable::rows`].
pub type SampleColumn = Vec<MethCounts>;

/// One region of interest and its counts across all samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub start: u32,
    pub end: u32,
    pub name: String,
    /// One cell per sample, in sample order.
    pub cells: Vec<MethCounts>,
}

///
/// Methylation counts for one chromosome, keyed by region coordinates and
/// sample index.
///
/// Every row and every cell is allocated up front from the chromosome's
/// regions of interest, so filling in a sample never adds rows. Rows are
/// kept in ascending `(start, end)` order.
///
#[derive(Debug, Clone)]
pub struct AggregationTable {
    chrom: String,
    rows: Vec<RegionRow>,
    index: HashMap<(u32, u32), usize>,
    n_samples: usize,
}

impl AggregationTable {
    ///
    /// Allocate a row per distinct `(start, end)` of `regions`.
    /// Duplicate coordinates share a row, named after the last one seen.
    ///
    pub fn new<'a>(
        chrom: &str,
        regions: impl IntoIterator<Item = &'a Region>,
        n_samples: usize,
    ) -> Self {
        let mut names: HashMap<(u32, u32), &str> = HashMap::new();
        for region in regions {
            names.insert(region.coords(), region.name());
        }

        let mut rows: Vec<RegionRow> = names
            .into_iter()
            .map(|((start, end), name)| RegionRow {
                start,
                end,
                name: name.to_string(),
                cells: vec![MethCounts::default(); n_samples],
            })
            .collect();
        rows.sort_by_key(|row| (row.start, row.end));

        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| ((row.start, row.end), i))
            .collect();

        AggregationTable {
            chrom: chrom.to_string(),
            rows,
            index,
            n_samples,
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Rows in ascending `(start, end)` order.
    pub fn rows(&self) -> &[RegionRow] {
        &self.rows
    }

    /// A zeroed column shaped like this table.
    pub fn empty_column(&self) -> SampleColumn {
        vec![MethCounts::default(); self.rows.len()]
    }

    pub fn get(&self, start: u32, end: u32, sample: usize) -> Option<&MethCounts> {
        let row = self.index.get(&(start, end))?;
        self.rows[*row].cells.get(sample)
    }

    ///
    /// Store a finished sample column.
    ///
    /// # Panics
    /// If `sample` is out of range or `column` is not shaped like the table;
    /// both mean the scheduler handed back a column for another table.
    ///
    pub fn set_column(&mut self, sample: usize, column: SampleColumn) {
        assert!(sample < self.n_samples, "sample index {} out of range", sample);
        assert_eq!(column.len(), self.rows.len(), "column does not match table");

        for (row, counts) in self.rows.iter_mut().zip(column) {
            row.cells[sample] = counts;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(start: u32, end: u32, name: &str) -> Region {
        Region {
            chr: "chr1".to_string(),
            start,
            end,
            rest: Some(name.to_string()),
        }
    }

    #[rstest]
    fn test_rows_sorted_and_prefilled() {
        let regions = vec![
            region(500, 600, "c"),
            region(100, 300, "b"),
            region(100, 200, "a"),
        ];
        let table = AggregationTable::new("chr1", &regions, 2);

        let keys: Vec<(u32, u32, &str)> = table
            .rows()
            .iter()
            .map(|r| (r.start, r.end, r.name.as_str()))
            .collect();
        assert_eq!(keys, vec![(100, 200, "a"), (100, 300, "b"), (500, 600, "c")]);
        assert!(table.rows().iter().all(|r| r.cells == vec![MethCounts::default(); 2]));
    }

    #[rstest]
    fn test_duplicate_coordinates_collapse() {
        let regions = vec![region(100, 200, "first"), region(100, 200, "second")];
        let table = AggregationTable::new("chr1", &regions, 1);

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].name, "second");
    }

    #[rstest]
    fn test_set_column() {
        let regions = vec![region(500, 600, "c"), region(100, 200, "a")];
        let mut table = AggregationTable::new("chr1", &regions, 2);

        let mut column = table.empty_column();
        column[1] = MethCounts::new(3, 4);
        table.set_column(1, column);

        assert_eq!(table.get(500, 600, 1), Some(&MethCounts::new(3, 4)));
        assert_eq!(table.get(500, 600, 0), Some(&MethCounts::default()));
        assert_eq!(table.get(100, 200, 1), Some(&MethCounts::default()));
        assert_eq!(table.get(1, 2, 0), None);
    }

    #[rstest]
    #[should_panic]
    fn test_set_column_wrong_shape() {
        let regions = vec![region(100, 200, "a")];
        let mut table = AggregationTable::new("chr1", &regions, 1);
        table.set_column(0, vec![]);
    }
}
