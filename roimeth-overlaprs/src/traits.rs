use std::cmp::Ordering;

/// Represent a range from [start, end)
/// Inclusive start, exclusive of end
#[derive(Eq, Debug, Clone)]
pub struct Interval<T> {
    pub start: u32,
    pub end: u32,
    pub val: T,
}

impl<T> Interval<T> {
    /// Check if the interval overlaps `[start, end)`
    #[inline]
    pub fn overlap(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }
}

impl<T: Eq> Ord for Interval<T> {
    #[inline]
    fn cmp(&self, other: &Interval<T>) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<T: Eq> PartialOrd for Interval<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Interval<T> {
    #[inline]
    fn eq(&self, other: &Interval<T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// A static index answering "which stored intervals overlap `[start, end)`".
pub trait Overlapper<T>: Send + Sync
where
    T: Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<T>>) -> Self
    where
        Self: Sized;

    fn find_iter<'a>(&'a self, start: u32, end: u32) -> Box<dyn Iterator<Item = &'a Interval<T>> + 'a>;

    /// Does anything stored overlap `[start, end)`?
    fn any_overlap(&self, start: u32, end: u32) -> bool {
        self.find_iter(start, end).next().is_some()
    }
}
