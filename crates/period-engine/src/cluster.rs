//! One-dimensional density clustering of sorted values.
//!
//! Charts draw runs of nearby data points as connected groups and leave
//! visual breaks where data is sparse. [`cluster_sorted`] splits an ascending
//! sequence wherever two neighbours are more than `max_gap` apart.

/// Values [`cluster_sorted`] can measure the distance between.
pub trait Gap: Copy + PartialOrd {
    /// `later - self`, or `None` when the difference does not fit in `Self`.
    fn gap_to(self, later: Self) -> Option<Self>;
}

macro_rules! integer_gap {
    ($($t:ty),*) => {
        $(
            impl Gap for $t {
                fn gap_to(self, later: Self) -> Option<Self> {
                    later.checked_sub(self)
                }
            }
        )*
    };
}

integer_gap!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Gap for f32 {
    fn gap_to(self, later: Self) -> Option<Self> {
        Some(later - self)
    }
}

impl Gap for f64 {
    fn gap_to(self, later: Self) -> Option<Self> {
        Some(later - self)
    }
}

/// Partition ascending `values` into maximal runs whose neighbours differ by
/// at most `max_gap`.
///
/// Inputs with two or fewer elements are returned whole as a single cluster,
/// even when two elements are further apart than `max_gap`.
///
/// The input must already be sorted ascending; this is checked only in debug
/// builds. A difference too large for `T` (`i32::MIN` next to `0`) counts
/// as wider than any gap.
///
/// # Examples
///
/// ```
/// use period_engine::cluster_sorted;
///
/// let clusters = cluster_sorted(&[0, 1, 2, 10, 11, 12, 18, 25, 30, 31, 32, 38, 51, 52], 5);
/// assert_eq!(
///     clusters,
///     vec![
///         vec![0, 1, 2],
///         vec![10, 11, 12],
///         vec![18],
///         vec![25, 30, 31, 32],
///         vec![38],
///         vec![51, 52],
///     ]
/// );
/// ```
pub fn cluster_sorted<T>(values: &[T], max_gap: T) -> Vec<Vec<T>>
where
    T: Gap,
{
    cluster_sorted_by_key(values, max_gap, |value| *value)
        .into_iter()
        .map(<[T]>::to_vec)
        .collect()
}

/// Like [`cluster_sorted`], but groups arbitrary items by a numeric key and
/// returns sub-slices of `items` instead of copies.
///
/// `items` must be sorted ascending by `key`. Used to bin chart points by
/// their position on a date axis while keeping the points themselves.
pub fn cluster_sorted_by_key<'a, T, K, F>(items: &'a [T], max_gap: K, key: F) -> Vec<&'a [T]>
where
    K: Gap,
    F: Fn(&T) -> K,
{
    debug_assert!(
        items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1])),
        "cluster input must be sorted ascending"
    );

    if items.len() <= 2 {
        return vec![items];
    }

    let mut clusters = Vec::new();
    let mut cluster_start = 0;
    for i in 1..items.len() {
        let gap = key(&items[i - 1]).gap_to(key(&items[i]));
        if gap.map_or(true, |gap| gap > max_gap) {
            clusters.push(&items[cluster_start..i]);
            cluster_start = i;
        }
    }
    clusters.push(&items[cluster_start..]);
    clusters
}
