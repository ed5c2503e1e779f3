//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when a screen is first shown.
    pub default_page: u64,
    /// The number of items to display per page.
    pub page_size: u64,
    /// The maximum number of page numbers to show in the pagination window.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            page_size: 20,
            max_pages: 5,
        }
    }
}

/// A single entry in the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A page number the user can navigate to.
    Page(u64),
    /// The page currently being displayed.
    CurrPage(u64),
    /// A gap between the boundary pages and the centered window.
    Ellipsis,
}

/// The pagination controls for a single render.
///
/// `back` and `next` carry the target page number when the control is
/// enabled and are `None` when it is disabled. Clicking a disabled control
/// is a no-op for the caller since there is no page to navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// The ordered page indicators to render.
    pub indicators: Vec<PaginationIndicator>,
    /// The page the "previous" control navigates to, if enabled.
    pub back: Option<u64>,
    /// The page the "next" control navigates to, if enabled.
    pub next: Option<u64>,
}

/// Compute the pagination window for `curr_page` of `page_count` pages.
///
/// When everything fits within `max_pages` the window is simply every page
/// in order. Otherwise the first and last page are always shown, with a
/// window centered on `curr_page` in between and an ellipsis on either side
/// where pages were skipped. The centered window itself keeps a constant
/// width: it is shifted rather than shrunk when `curr_page` sits near either
/// boundary.
///
/// This function only computes; applying the navigation is up to the caller.
pub fn page_window(curr_page: u64, page_count: u64, max_pages: u64) -> PageWindow {
    if page_count == 0 {
        return PageWindow {
            indicators: Vec::new(),
            back: None,
            next: None,
        };
    }

    let half_window = max_pages / 2;

    let (window_start, window_end) = if page_count <= max_pages {
        (1, page_count)
    } else if curr_page <= half_window {
        (1, max_pages)
    } else if curr_page > page_count - half_window {
        (page_count - max_pages + 1, page_count)
    } else {
        (curr_page - half_window, curr_page + half_window)
    };

    let mut indicators = Vec::new();

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));

        if window_start > 2 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
    }

    for page in window_start..=window_end {
        if page == curr_page {
            indicators.push(PaginationIndicator::CurrPage(page));
        } else {
            indicators.push(PaginationIndicator::Page(page));
        }
    }

    if window_end < page_count {
        if window_end < page_count - 1 {
            indicators.push(PaginationIndicator::Ellipsis);
        }

        indicators.push(PaginationIndicator::Page(page_count));
    }

    PageWindow {
        indicators,
        back: (curr_page > 1).then(|| curr_page - 1),
        next: (curr_page < page_count).then(|| curr_page + 1),
    }
}

/// The number of pages needed to show `visible_count` items.
pub fn page_count(visible_count: usize, page_size: u64) -> u64 {
    (visible_count as u64).div_ceil(page_size)
}

/// Clamp `page` into `[1, max(page_count, 1)]`.
///
/// Deleting items or narrowing a filter can shrink the page count below the
/// page the user was on; callers apply this after every such mutation.
pub fn clamp_page(page: u64, page_count: u64) -> u64 {
    page.min(page_count).max(1)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{
        PaginationIndicator::{CurrPage, Ellipsis, Page},
        clamp_page, page_count, page_window,
    };

    #[test]
    fn shows_all_pages_when_they_fit() {
        for count in 1..=5 {
            let window = page_window(1, count, 5);

            let want: Vec<_> = (1..=count)
                .map(|page| if page == 1 { CurrPage(1) } else { Page(page) })
                .collect();

            assert_eq!(want, window.indicators, "page_count = {count}");
        }
    }

    #[test]
    fn empty_list_has_no_pages_and_disabled_controls() {
        let window = page_window(1, 0, 5);

        assert!(window.indicators.is_empty());
        assert_eq!(window.back, None);
        assert_eq!(window.next, None);
    }

    #[test]
    fn single_page_disables_both_directions() {
        let window = page_window(1, 1, 5);

        assert_eq!(window.indicators, vec![CurrPage(1)]);
        assert_eq!(window.back, None);
        assert_eq!(window.next, None);
    }

    #[test]
    fn shows_page_subset_on_left() {
        let window = page_window(1, 10, 5);

        let want = [
            CurrPage(1),
            Page(2),
            Page(3),
            Page(4),
            Page(5),
            Ellipsis,
            Page(10),
        ];

        assert_eq!(want, window.indicators.as_slice());
        assert_eq!(window.back, None);
        assert_eq!(window.next, Some(2));
    }

    #[test]
    fn shows_page_subset_on_right() {
        let window = page_window(10, 10, 5);

        let want = [
            Page(1),
            Ellipsis,
            Page(6),
            Page(7),
            Page(8),
            Page(9),
            CurrPage(10),
        ];

        assert_eq!(want, window.indicators.as_slice());
        assert_eq!(window.back, Some(9));
        assert_eq!(window.next, None);
    }

    #[test]
    fn shows_page_subset_in_center() {
        let window = page_window(5, 10, 5);

        let want = [
            Page(1),
            Ellipsis,
            Page(3),
            Page(4),
            CurrPage(5),
            Page(6),
            Page(7),
            Ellipsis,
            Page(10),
        ];

        assert_eq!(want, window.indicators.as_slice());
        assert_eq!(window.back, Some(4));
        assert_eq!(window.next, Some(6));
    }

    #[test]
    fn omits_ellipsis_when_window_touches_boundary() {
        // The window is 2..=6, directly adjacent to page 1, so there is no
        // gap to mark on the left.
        let window = page_window(4, 10, 5);

        let want = [
            Page(1),
            Page(2),
            Page(3),
            CurrPage(4),
            Page(5),
            Page(6),
            Ellipsis,
            Page(10),
        ];

        assert_eq!(want, window.indicators.as_slice());
    }

    #[test]
    fn window_always_bounded_by_first_and_last_page() {
        for page_count in 6..=30 {
            for curr_page in 1..=page_count {
                let window = page_window(curr_page, page_count, 5);

                let want_first = if curr_page == 1 { CurrPage(1) } else { Page(1) };
                let want_last = if curr_page == page_count {
                    CurrPage(page_count)
                } else {
                    Page(page_count)
                };

                assert_eq!(
                    window.indicators.first(),
                    Some(&want_first),
                    "curr_page = {curr_page}, page_count = {page_count}"
                );
                assert_eq!(
                    window.indicators.last(),
                    Some(&want_last),
                    "curr_page = {curr_page}, page_count = {page_count}"
                );
            }
        }
    }

    #[test]
    fn window_never_repeats_a_page_number() {
        for page_count in 1..=30u64 {
            for curr_page in 1..=page_count {
                let window = page_window(curr_page, page_count, 5);

                let mut pages: Vec<u64> = window
                    .indicators
                    .iter()
                    .filter_map(|indicator| match indicator {
                        Page(page) | CurrPage(page) => Some(*page),
                        Ellipsis => None,
                    })
                    .collect();
                let total = pages.len();
                pages.dedup();

                assert_eq!(
                    total,
                    pages.len(),
                    "curr_page = {curr_page}, page_count = {page_count}"
                );
            }
        }
    }

    #[test]
    fn at_most_one_ellipsis_per_side() {
        for page_count in 6..=30u64 {
            for curr_page in 1..=page_count {
                let window = page_window(curr_page, page_count, 5);

                let curr_position = window
                    .indicators
                    .iter()
                    .position(|indicator| matches!(indicator, CurrPage(_)))
                    .expect("current page missing from window");
                let before = window.indicators[..curr_position]
                    .iter()
                    .filter(|indicator| matches!(indicator, Ellipsis))
                    .count();
                let after = window.indicators[curr_position..]
                    .iter()
                    .filter(|indicator| matches!(indicator, Ellipsis))
                    .count();

                assert!(before <= 1, "curr_page = {curr_page}, page_count = {page_count}");
                assert!(after <= 1, "curr_page = {curr_page}, page_count = {page_count}");
            }
        }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(1, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(12, 5), 3);
    }

    #[test]
    fn clamp_page_stays_within_bounds() {
        assert_eq!(clamp_page(3, 2), 2);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(1, 0), 1);
        assert_eq!(clamp_page(7, 0), 1);
    }
}
