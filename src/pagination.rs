//! This modules defines the common functionality for paging data.
//!
//! Pages are 1-based. Requests for a page past the end of the data produce an
//! empty page rather than an error.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of expenses to display per page.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 5,
        }
    }
}

/// The index of the first item on `page_index`, or `None` on overflow.
///
/// A page index of zero is treated as the first page.
fn page_start(page_index: u64, page_size: u64) -> Option<usize> {
    let start = page_index.max(1).checked_sub(1)?.checked_mul(page_size)?;
    usize::try_from(start).ok()
}

/// Get the items on page `page_index` when `items` is split into pages of `page_size`.
///
/// Returns an empty slice if the page starts past the end of `items` or if
/// `page_size` is zero.
pub fn page<T>(items: &[T], page_index: u64, page_size: u64) -> &[T] {
    let Some(start) = page_start(page_index, page_size) else {
        return &[];
    };

    if start >= items.len() {
        return &[];
    }

    let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
    let end = start.saturating_add(page_size).min(items.len());

    &items[start..end]
}

/// Whether there are items after page `page_index`.
pub fn has_next<T>(items: &[T], page_index: u64, page_size: u64) -> bool {
    if page_size == 0 {
        return false;
    }

    page_start(page_index, page_size)
        .and_then(|start| start.checked_add(usize::try_from(page_size).ok()?))
        .is_some_and(|end| end < items.len())
}

/// Whether there is a page before `page_index`.
pub fn has_previous(page_index: u64) -> bool {
    page_index > 1
}

/// The number of pages needed to show `item_count` items, at least one.
pub fn page_count(item_count: usize, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }

    (item_count as u64).div_ceil(page_size).max(1)
}

/// The page after `page_index`.
///
/// Callers should check [has_next] first, the index is not clamped upward.
pub fn next_page(page_index: u64) -> u64 {
    page_index.max(1).saturating_add(1)
}

/// The page before `page_index`, never less than one.
pub fn previous_page(page_index: u64) -> u64 {
    page_index.saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{has_next, has_previous, next_page, page, page_count, previous_page};

    #[test]
    fn third_page_of_twelve_has_last_two_items() {
        let items = (0..12).collect::<Vec<_>>();

        let got = page(&items, 3, 5);

        assert_eq!(got, &[10, 11]);
        assert!(!has_next(&items, 3, 5));
    }

    #[test]
    fn page_never_exceeds_page_size() {
        let items = (0..23).collect::<Vec<_>>();

        for page_size in 1..=10 {
            for page_index in 1..=30 {
                let got = page(&items, page_index, page_size);
                assert!(
                    got.len() as u64 <= page_size,
                    "page {page_index} of size {page_size} had {} items",
                    got.len()
                );
            }
        }
    }

    #[test]
    fn has_next_is_false_only_on_last_page() {
        for len in 1..=17 {
            let items = (0..len).collect::<Vec<_>>();
            let last_page = page_count(items.len(), 5);

            for page_index in 1..last_page {
                assert!(
                    has_next(&items, page_index, 5),
                    "want next after page {page_index} of {last_page} (len {len})"
                );
            }

            assert!(
                !has_next(&items, last_page, 5),
                "want no next after last page {last_page} (len {len})"
            );
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items = (0..12).collect::<Vec<_>>();

        assert!(page(&items, 4, 5).is_empty());
        assert!(page(&items, 1_000, 5).is_empty());
        assert!(page::<i32>(&[], 1, 5).is_empty());
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let items = (0..12).collect::<Vec<_>>();

        assert_eq!(page(&items, 0, 5), page(&items, 1, 5));
        assert!(has_next(&items, 0, 5));
    }

    #[test]
    fn zero_page_size_gives_empty_page() {
        let items = (0..12).collect::<Vec<_>>();

        assert!(page(&items, 1, 0).is_empty());
        assert!(!has_next(&items, 1, 0));
    }

    #[test]
    fn huge_page_index_does_not_overflow() {
        let items = (0..12).collect::<Vec<_>>();

        assert!(page(&items, u64::MAX, u64::MAX).is_empty());
        assert!(!has_next(&items, u64::MAX, u64::MAX));
    }

    #[test]
    fn has_previous_only_after_first_page() {
        assert!(!has_previous(0));
        assert!(!has_previous(1));
        assert!(has_previous(2));
    }

    #[test]
    fn navigation_never_goes_below_one() {
        assert_eq!(previous_page(1), 1);
        assert_eq!(previous_page(0), 1);
        assert_eq!(previous_page(3), 2);
        assert_eq!(next_page(0), 2);
        assert_eq!(next_page(2), 3);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(12, 5), 3);
    }
}
