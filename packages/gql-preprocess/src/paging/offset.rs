use super::OffsetPagingArgs;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total_count: Option<usize>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// 1-based bounds of the requested window, regardless of how many items it
    /// actually holds. Both zero for an empty source.
    pub start_index: usize,
    pub end_index: usize,
}

impl<T> OffsetPage<T> {
    fn empty(include_total_count: bool) -> Self {
        Self {
            items: Vec::new(),
            total_count: include_total_count.then_some(0),
            has_next_page: false,
            has_previous_page: false,
            start_index: 0,
            end_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl OffsetPagingArgs {
    /// Cut an offset page out of `items`, which must already be in their final
    /// order.
    ///
    /// `skip` and `take` are clamped to be non-negative and `take` to at most
    /// `max_page_size`. One item past the window is read to find out whether a
    /// next page exists; the source is only read to the end when a total count is
    /// asked for.
    pub fn slice<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        max_page_size: usize,
        include_total_count: bool,
    ) -> OffsetPage<T> {
        let mut source = items.into_iter().peekable();
        if source.peek().is_none() {
            return OffsetPage::empty(include_total_count);
        }

        let skip_past = self.skip.map_or(0, |n| usize::try_from(n).unwrap_or(0));
        let take_some = self
            .take
            .map_or(max_page_size, |n| usize::try_from(n).unwrap_or(0))
            .min(max_page_size);

        let (mut page, total_count): (Vec<T>, Option<usize>) = if include_total_count {
            let all: Vec<T> = source.collect();
            let total = all.len();
            let page = all
                .into_iter()
                .skip(skip_past)
                .take(take_some.saturating_add(1))
                .collect();
            (page, Some(total))
        } else {
            let page = source
                .skip(skip_past)
                .take(take_some.saturating_add(1))
                .collect();
            (page, None)
        };

        let has_next_page = page.len() > take_some;
        if has_next_page {
            page.truncate(take_some);
        }
        let has_previous_page = !page.is_empty() && skip_past > 0;

        debug!(
            "Offset page of {} items at skip {skip_past} (previous: {has_previous_page}, next: {has_next_page})",
            page.len()
        );

        OffsetPage {
            items: page,
            total_count,
            has_next_page,
            has_previous_page,
            start_index: skip_past.saturating_add(1),
            end_index: skip_past.saturating_add(take_some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: [u8; 5] = [10, 20, 30, 40, 50];
    const MAX: usize = 50;

    fn args(skip: Option<i32>, take: Option<i32>) -> OffsetPagingArgs {
        OffsetPagingArgs { skip, take }
    }

    #[test]
    fn test_first_page() {
        let page = args(Some(0), Some(2)).slice(SOURCE, MAX, false);

        assert_eq!(
            page,
            OffsetPage {
                items: vec![10, 20],
                total_count: None,
                has_next_page: true,
                has_previous_page: false,
                start_index: 1,
                end_index: 2,
            }
        );
    }

    #[test]
    fn test_last_partial_page() {
        let page = args(Some(4), Some(2)).slice(SOURCE, MAX, true);

        assert_eq!(page.items, vec![50]);
        assert!(!page.has_next_page);
        assert!(page.has_previous_page);
        assert_eq!(page.total_count, Some(5));
        assert_eq!((page.start_index, page.end_index), (5, 6));
    }

    #[test]
    fn test_exact_fit_has_no_next_page() {
        let page = args(Some(3), Some(2)).slice(SOURCE, MAX, false);

        assert_eq!(page.items, vec![40, 50]);
        assert!(!page.has_next_page);
        assert!(page.has_previous_page);
    }

    #[test]
    fn test_skip_past_end() {
        let page = args(Some(9), Some(2)).slice(SOURCE, MAX, true);

        assert!(page.is_empty());
        assert!(!page.has_next_page);
        assert!(!page.has_previous_page);
        assert_eq!(page.total_count, Some(5));
    }

    #[test]
    fn test_take_defaults_and_clamps_to_max() {
        let page = args(None, None).slice(SOURCE, 3, false);
        assert_eq!(page.items, vec![10, 20, 30]);
        assert!(page.has_next_page);
        assert_eq!((page.start_index, page.end_index), (1, 3));

        let page = args(None, Some(100)).slice(SOURCE, 4, false);
        assert_eq!(page.len(), 4);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_negative_window_is_clamped() {
        let page = args(Some(-3), Some(-1)).slice(SOURCE, MAX, false);

        assert!(page.is_empty());
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
        assert_eq!((page.start_index, page.end_index), (1, 0));
    }

    #[test]
    fn test_empty_source() {
        let page = args(Some(2), Some(2)).slice(Vec::<u8>::new(), MAX, true);

        assert_eq!(page, OffsetPage::empty(true));
        assert_eq!(page.total_count, Some(0));
        assert_eq!((page.start_index, page.end_index), (0, 0));
    }

    #[test]
    fn test_source_is_read_lazily_without_total_count() {
        let mut read = 0;
        let source = (1..=1_000).inspect(|_| read += 1);

        let page = args(Some(1), Some(2)).slice(source, MAX, false);

        assert_eq!(page.items, vec![2, 3]);
        assert!(page.has_next_page);
        assert_eq!(read, 4);
    }
}
