//! Interval-set algebra over [`RegionSet`]s.
//!
//! All operations use 0-based half-open coordinates and are strand-unaware.
//! Unlike a plain set difference, every operation here keeps the `rest`
//! columns of the regions it returns: a methylation record cut by a mask
//! still carries its encoded coverage.

use std::collections::HashMap;

use roimeth_core::models::{Region, RegionSet};

use crate::{AIList, Interval, Overlapper};

/// Merge overlapping and adjacent `[start, end)` pairs; input need not be sorted.
fn merge_spans(mut spans: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    spans.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Set operations that return a new [`RegionSet`] and leave `self` untouched.
pub trait IntervalSetOps {
    /// Remove the parts of every region that overlap `mask`.
    ///
    /// A region untouched by the mask is returned unchanged, a region fully
    /// covered by it is dropped, and a region partially covered is cut into
    /// the uncovered fragments, each keeping the original `rest`.
    ///
    /// # Example
    /// ```text
    /// self: chr1 100–200 "0.5-10"
    /// mask: chr1 120–140, chr1 160–180
    /// result: chr1 100–120 "0.5-10", chr1 140–160 "0.5-10", chr1 180–200 "0.5-10"
    /// ```
    fn subtract(&self, mask: &RegionSet) -> RegionSet;

    /// Keep each region of `self` once if it overlaps at least one region of
    /// `other`, in the original order of `self`.
    fn intersect_any(&self, other: &RegionSet) -> RegionSet;
}

impl IntervalSetOps for RegionSet {
    fn subtract(&self, mask: &RegionSet) -> RegionSet {
        let mut mask_by_chr: HashMap<&str, Vec<(u32, u32)>> = HashMap::new();
        for r in &mask.regions {
            mask_by_chr
                .entry(r.chr.as_str())
                .or_default()
                .push((r.start, r.end));
        }
        let mask_by_chr: HashMap<&str, Vec<(u32, u32)>> = mask_by_chr
            .into_iter()
            .map(|(chr, spans)| (chr, merge_spans(spans)))
            .collect();

        let mut result: Vec<Region> = Vec::with_capacity(self.len());

        for region in &self.regions {
            let spans = match mask_by_chr.get(region.chr.as_str()) {
                Some(spans) => spans,
                None => {
                    result.push(region.clone());
                    continue;
                }
            };

            // first mask span that ends after the region starts
            let mut j = spans.partition_point(|&(_, end)| end <= region.start);
            if j == spans.len() || spans[j].0 >= region.end {
                result.push(region.clone());
                continue;
            }

            let mut pos = region.start;
            while j < spans.len() && spans[j].0 < region.end {
                if spans[j].0 > pos {
                    result.push(Region {
                        chr: region.chr.clone(),
                        start: pos,
                        end: spans[j].0,
                        rest: region.rest.clone(),
                    });
                }
                pos = pos.max(spans[j].1);
                j += 1;
            }

            if pos < region.end {
                result.push(Region {
                    chr: region.chr.clone(),
                    start: pos,
                    end: region.end,
                    rest: region.rest.clone(),
                });
            }
        }

        RegionSet::from(result)
    }

    fn intersect_any(&self, other: &RegionSet) -> RegionSet {
        let index = RegionIndex::new(other);
        let regions: Vec<Region> = self
            .regions
            .iter()
            .filter(|r| index.any_hit(r))
            .cloned()
            .collect();
        RegionSet::from(regions)
    }
}

/// A per-chromosome overlap index over the regions of one [`RegionSet`].
///
/// The index borrows the set; hits are returned as references into it.
pub struct RegionIndex<'a> {
    regions: &'a [Region],
    lists: HashMap<&'a str, AIList<usize>>,
}

impl<'a> RegionIndex<'a> {
    pub fn new(rs: &'a RegionSet) -> Self {
        let mut by_chr: HashMap<&'a str, Vec<Interval<usize>>> = HashMap::new();
        for (idx, r) in rs.regions.iter().enumerate() {
            by_chr.entry(r.chr.as_str()).or_default().push(Interval {
                start: r.start,
                end: r.end,
                val: idx,
            });
        }

        RegionIndex {
            regions: &rs.regions,
            lists: by_chr
                .into_iter()
                .map(|(chr, ivs)| (chr, AIList::build(ivs)))
                .collect(),
        }
    }

    /// Every indexed region overlapping `query`, in file order.
    pub fn all_hits(&self, query: &Region) -> Vec<&'a Region> {
        let Some(list) = self.lists.get(query.chr.as_str()) else {
            return Vec::new();
        };

        let mut hits: Vec<usize> = list
            .find_iter(query.start, query.end)
            .map(|iv| iv.val)
            .collect();
        hits.sort_unstable();

        hits.into_iter().map(|idx| &self.regions[idx]).collect()
    }

    /// Does any indexed region overlap `query`?
    pub fn any_hit(&self, query: &Region) -> bool {
        self.lists
            .get(query.chr.as_str())
            .is_some_and(|list| list.any_overlap(query.start, query.end))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
