//! Incrementally grown cache of consecutive calendar days.
//!
//! Chart and query code repeatedly asks for "every day between A and B" while
//! the user scrolls. [`DateSequenceCache`] keeps a single contiguous,
//! ascending run of [`IntegerDate`]s and answers those requests by slicing
//! it, extending the run to the left or right only when a request falls
//! outside. The run never splits: a request beyond a gap extends the run
//! through the gap.

use std::sync::Mutex;

use tracing::{debug, trace};

use crate::date::{DateRange, IntegerDate};
use crate::period::{covering_years, subtract_range};

/// One contiguous run of days, grown on demand.
///
/// Use one instance per logical owner (a screen, a query session). For
/// sharing across threads, wrap it in [`SharedDateSequenceCache`].
#[derive(Debug, Default, Clone)]
pub struct DateSequenceCache {
    days: Vec<IntegerDate>,
}

impl DateSequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every day from `start` through `end`, or an empty vector when
    /// `start > end`.
    pub fn make_sequence(start: IntegerDate, end: IntegerDate) -> Vec<IntegerDate> {
        match DateRange::new(start, end) {
            Ok(range) => range.days().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// The bounds of the cached run, if anything has been cached.
    pub fn bounds(&self) -> Option<DateRange> {
        Some(DateRange {
            start: *self.days.first()?,
            end: *self.days.last()?,
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The whole cached run.
    pub fn as_slice(&self) -> &[IntegerDate] {
        &self.days
    }

    /// Whether `[start, end]` is already inside the cached run.
    pub fn covers(&self, start: IntegerDate, end: IntegerDate) -> bool {
        self.bounds()
            .is_some_and(|bounds| bounds.start <= start && end <= bounds.end)
    }

    /// Extend the cached run so that it contains `[start, end]`.
    ///
    /// Remainders of the request outside the cached bounds are materialised
    /// and attached on their side. A request that does not even touch the
    /// cached run is bridged from the nearest cached edge, so the cache
    /// always stays one gap-free run.
    pub fn prepare(&mut self, start: IntegerDate, end: IntegerDate) {
        let Ok(request) = DateRange::new(start, end) else {
            trace!(%start, %end, "ignoring inverted range");
            return;
        };

        let Some(bounds) = self.bounds() else {
            debug!(range = %request, "materialising initial day sequence");
            self.days = request.days().collect();
            return;
        };

        let subtracted = subtract_range(&request, &bounds);
        if subtracted.overlap {
            for piece in subtracted.rest {
                self.attach(piece, &bounds);
            }
            return;
        }

        let bridge = if request.end < bounds.start {
            bounds.start.pred().map(|edge| DateRange {
                start: request.start,
                end: edge,
            })
        } else {
            bounds.end.succ().map(|edge| DateRange {
                start: edge,
                end: request.end,
            })
        };
        if let Some(bridge) = bridge {
            debug!(gap_fill = %bridge, cached = %bounds, "bridging disjoint request");
            self.attach(bridge, &bounds);
        }
    }

    fn attach(&mut self, piece: DateRange, bounds: &DateRange) {
        let addition: Vec<IntegerDate> = piece.days().collect();
        if piece.end < bounds.start {
            trace!(%piece, "prepending");
            self.days.splice(0..0, addition);
        } else {
            trace!(%piece, "appending");
            self.days.extend(addition);
        }
    }

    /// Every day from `start` through `end`, in order, without duplicates.
    ///
    /// When the cached run does not already cover the request, the cache is
    /// first grown to the whole calendar years spanning it, so that nearby
    /// follow-up requests are answered without further growth.
    ///
    /// Returns an empty slice when `start > end`.
    ///
    /// # Panics
    ///
    /// Panics if, after preparation, either endpoint is missing from the
    /// cached run. That indicates a bug in [`prepare`](Self::prepare), not
    /// bad input.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::{DateSequenceCache, IntegerDate};
    ///
    /// let d = |v| IntegerDate::new(v).unwrap();
    /// let mut cache = DateSequenceCache::new();
    ///
    /// let days = cache.get_sequence(d(20200227), d(20200302));
    /// assert_eq!(days.len(), 5);
    /// // The whole of 2020 is now cached.
    /// assert_eq!(cache.len(), 366);
    /// ```
    pub fn get_sequence(&mut self, start: IntegerDate, end: IntegerDate) -> &[IntegerDate] {
        if start > end {
            return &[];
        }

        if !self.covers(start, end) {
            let years = covering_years(start, end);
            debug!(%start, %end, prepare = %years, "day sequence cache miss");
            self.prepare(years.start, years.end);
        }

        match (self.days.binary_search(&start), self.days.binary_search(&end)) {
            (Ok(from), Ok(to)) => &self.days[from..=to],
            _ => panic!(
                "date sequence cache preparation left {start}..{end} uncovered (cached {:?})",
                self.bounds()
            ),
        }
    }
}

/// A [`DateSequenceCache`] behind a mutex.
///
/// The check-then-extend step of [`DateSequenceCache::get_sequence`] must not
/// interleave between callers, so every request holds the lock for its whole
/// duration and returns an owned copy of the slice.
#[derive(Debug, Default)]
pub struct SharedDateSequenceCache {
    inner: Mutex<DateSequenceCache>,
}

impl SharedDateSequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sequence(&self, start: IntegerDate, end: IntegerDate) -> Vec<IntegerDate> {
        let mut cache = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get_sequence(start, end).to_vec()
    }

    pub fn bounds(&self) -> Option<DateRange> {
        let cache = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn d(value: u32) -> IntegerDate {
        IntegerDate::new(value).unwrap()
    }

    fn values(days: &[IntegerDate]) -> Vec<u32> {
        days.iter().map(|day| day.value()).collect()
    }

    fn assert_contiguous(cache: &DateSequenceCache) {
        for pair in cache.as_slice().windows(2) {
            assert_eq!(pair[0].succ(), Some(pair[1]), "gap or duplicate at {}", pair[0]);
        }
    }

    #[test]
    fn test_make_sequence_inclusive() {
        assert_eq!(
            values(&DateSequenceCache::make_sequence(d(20191230), d(20200102))),
            vec![20191230, 20191231, 20200101, 20200102]
        );
        assert!(DateSequenceCache::make_sequence(d(20200102), d(20200101)).is_empty());
    }

    #[test]
    fn test_prepare_initial_materialises_exact_range() {
        let mut cache = DateSequenceCache::new();
        cache.prepare(d(20200301), d(20200310));
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.bounds().unwrap().start, d(20200301));
    }

    #[test]
    fn test_prepare_extends_both_sides_of_overlap() {
        let mut cache = DateSequenceCache::new();
        cache.prepare(d(20200301), d(20200310));
        cache.prepare(d(20200225), d(20200315));
        assert_eq!(cache.bounds().unwrap(), DateRange::new(d(20200225), d(20200315)).unwrap());
        assert_contiguous(&cache);
    }

    #[test]
    fn test_prepare_bridges_gap_to_the_right() {
        let mut cache = DateSequenceCache::new();
        cache.prepare(d(20200301), d(20200305));
        cache.prepare(d(20200320), d(20200325));
        assert_eq!(cache.bounds().unwrap(), DateRange::new(d(20200301), d(20200325)).unwrap());
        assert_eq!(cache.len(), 25);
        assert_contiguous(&cache);
    }

    #[test]
    fn test_prepare_bridges_gap_to_the_left() {
        let mut cache = DateSequenceCache::new();
        cache.prepare(d(20200320), d(20200325));
        cache.prepare(d(20200301), d(20200305));
        assert_eq!(cache.bounds().unwrap(), DateRange::new(d(20200301), d(20200325)).unwrap());
        assert_contiguous(&cache);
    }

    #[test]
    fn test_prepare_touching_range_appends() {
        let mut cache = DateSequenceCache::new();
        cache.prepare(d(20200301), d(20200305));
        cache.prepare(d(20200306), d(20200307));
        assert_eq!(cache.len(), 7);
        assert_contiguous(&cache);
    }

    #[test]
    fn test_get_sequence_over_fetches_whole_years() {
        let mut cache = DateSequenceCache::new();
        let days = values(cache.get_sequence(d(20191230), d(20200102)));
        assert_eq!(days, vec![20191230, 20191231, 20200101, 20200102]);
        assert_eq!(cache.bounds().unwrap(), DateRange::new(d(20190101), d(20201231)).unwrap());
    }

    #[test]
    fn test_get_sequence_served_from_cache_without_growth() {
        let mut cache = DateSequenceCache::new();
        cache.get_sequence(d(20200301), d(20200331));
        let before = cache.len();
        let first = values(cache.get_sequence(d(20200110), d(20200112)));
        let again = values(cache.get_sequence(d(20200110), d(20200112)));
        assert_eq!(first, again);
        assert_eq!(cache.len(), before);
    }

    #[test]
    fn test_get_sequence_disjoint_earlier_year() {
        let mut cache = DateSequenceCache::new();
        cache.get_sequence(d(20200301), d(20200331));
        let days = cache.get_sequence(d(20170704), d(20170706)).to_vec();
        assert_eq!(values(&days), vec![20170704, 20170705, 20170706]);
        assert_eq!(cache.bounds().unwrap().start, d(20170101));
        assert_eq!(cache.bounds().unwrap().end, d(20201231));
        assert_contiguous(&cache);
    }

    #[test]
    fn test_get_sequence_inverted_is_empty() {
        let mut cache = DateSequenceCache::new();
        assert!(cache.get_sequence(d(20200302), d(20200301)).is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_cache_across_threads() {
        let cache = Arc::new(SharedDateSequenceCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let year = 2017 + i;
                    let start = IntegerDate::from_ymd(year, 6, 1).unwrap();
                    let end = IntegerDate::from_ymd(year, 6, 30).unwrap();
                    cache.get_sequence(start, end).len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 30);
        }
        let bounds = cache.bounds().unwrap();
        assert_eq!(bounds.start, d(20170101));
        assert_eq!(bounds.end, d(20201231));
    }
}
