use std::ops::Range;

use crate::traits::{Interval, Overlapper};

/// Intervals covering more than this many of their successors get pushed
/// into the next sublist.
const MIN_COVERAGE: usize = 10;

/// An Augmented Interval List for overlap queries on one chromosome.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// Intervals are decomposed into sublists so that long intervals spanning
/// many short ones do not force a query to scan the whole list. Each
/// sublist is sorted by start and carries a running maximum of ends.
///
/// # Examples
///
/// ```
/// use roimeth_overlaprs::{AIList, Overlapper, Interval};
///
/// let cpgs = vec![
///     Interval { start: 100, end: 101, val: "0.80-10" },
///     Interval { start: 150, end: 151, val: "0.25-4" },
///     Interval { start: 500, end: 501, val: "1.00-7" },
/// ];
///
/// let ailist = AIList::build(cpgs);
/// assert_eq!(ailist.find_iter(100, 200).count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<T> {
    starts: Vec<u32>,
    ends: Vec<u32>,
    max_ends: Vec<u32>,
    sublists: Vec<Range<usize>>,
    stored_intervals: Vec<Interval<T>>,
}

impl<T> AIList<T>
where
    T: Clone + Send + Sync,
{
    /// Split `intervals` (sorted by start) into the ones kept at this level
    /// and the ones deferred to the next sublist.
    fn decompose(intervals: Vec<Interval<T>>) -> (Vec<Interval<T>>, Vec<Interval<T>>) {
        let mut kept = Vec::with_capacity(intervals.len());
        let mut deferred = Vec::new();

        for (index, interval) in intervals.iter().enumerate() {
            let covered = intervals[index + 1..]
                .iter()
                .take(MIN_COVERAGE * 2 - 1)
                .filter(|next| interval.end > next.end)
                .count();

            if covered >= MIN_COVERAGE {
                deferred.push(interval.clone());
            } else {
                kept.push(interval.clone());
            }
        }

        (kept, deferred)
    }

    /// Returns the number of intervals in the AIList.
    pub fn len(&self) -> usize {
        self.stored_intervals.len()
    }

    /// Returns `true` if the AIList contains no intervals.
    pub fn is_empty(&self) -> bool {
        self.stored_intervals.is_empty()
    }
}

impl<T> Overlapper<T> for AIList<T>
where
    T: Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<T>>) -> Self {
        let mut remaining = intervals;
        remaining.sort_by_key(|iv| iv.start);

        let mut list = AIList {
            starts: Vec::with_capacity(remaining.len()),
            ends: Vec::with_capacity(remaining.len()),
            max_ends: Vec::with_capacity(remaining.len()),
            sublists: Vec::new(),
            stored_intervals: Vec::with_capacity(remaining.len()),
        };

        while !remaining.is_empty() {
            let (kept, deferred) = Self::decompose(remaining);
            let offset = list.stored_intervals.len();

            let mut max_end = 0;
            for interval in kept {
                max_end = max_end.max(interval.end);
                list.starts.push(interval.start);
                list.ends.push(interval.end);
                list.max_ends.push(max_end);
                list.stored_intervals.push(interval);
            }
            list.sublists.push(offset..list.stored_intervals.len());

            remaining = deferred;
        }

        list
    }

    fn find_iter<'a>(&'a self, start: u32, end: u32) -> Box<dyn Iterator<Item = &'a Interval<T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            sublist_idx: 0,
            cursor: None,
            start,
            end,
        })
    }
}

/// Lazily yields the intervals of an [`AIList`] overlapping a query range.
///
/// Created by [`find_iter`](Overlapper::find_iter).
#[derive(Debug)]
pub struct IterFind<'a, T> {
    inner: &'a AIList<T>,
    sublist_idx: usize,
    cursor: Option<usize>,
    start: u32,
    end: u32,
}

impl<'a, T> Iterator for IterFind<'a, T> {
    type Item = &'a Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(range) = self.inner.sublists.get(self.sublist_idx) {
            let starts = &self.inner.starts[range.clone()];
            let end = self.end;
            // walk backwards from the last interval starting before the query end
            let i = self
                .cursor
                .get_or_insert_with(|| starts.partition_point(|&s| s < end));

            while *i > 0 {
                *i -= 1;
                let idx = range.start + *i;
                if self.start < self.inner.ends[idx] {
                    return Some(&self.inner.stored_intervals[idx]);
                }
                if self.start >= self.inner.max_ends[idx] {
                    // nothing further left in this sublist can reach the query
                    break;
                }
            }

            self.cursor = None;
            self.sublist_idx += 1;
        }
        None
    }
}
