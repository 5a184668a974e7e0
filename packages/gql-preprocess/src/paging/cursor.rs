use super::CursorPagingArgs;
use crate::{cursor, PreprocessResult};
use tracing::debug;

/// An item of a cursor page together with its position in the full result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorResult<T> {
    pub entity: T,
    /// 1-based position in the source sequence.
    pub ordinal: u32,
    pub cursor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    pub items: Vec<CursorResult<T>>,
    pub total_count: Option<usize>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| &item.entity)
    }

    pub fn into_entities(self) -> Vec<T> {
        self.items.into_iter().map(|item| item.entity).collect()
    }
}

fn window_len(n: i32) -> usize {
    usize::try_from(n).unwrap_or(0)
}

impl CursorPagingArgs {
    /// Cut a cursor page out of `items`, which must already be in their final
    /// order.
    ///
    /// `after` and `before` trim the sequence first, then `first` keeps the head
    /// of what remains and `last` keeps the tail of that. An empty page reports
    /// no neighbouring pages and no cursors.
    pub fn slice<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        include_total_count: bool,
    ) -> PreprocessResult<CursorPage<T>> {
        self.validate()?;

        let after = self.after.as_deref().map(cursor::decode).transpose()?;
        let before = self.before.as_deref().map(cursor::decode).transpose()?;

        let mut window: Vec<(u32, T)> = (1u32..).zip(items).collect();
        let source_len = window.len();

        if let Some(after) = after {
            window.retain(|(ordinal, _)| *ordinal > after);
        }

        if let Some(before) = before {
            window.retain(|(ordinal, _)| *ordinal < before);
        }

        if let Some(first) = self.first {
            window.truncate(window_len(first));
        }

        if let Some(last) = self.last {
            let last = window_len(last);
            if window.len() > last {
                window.drain(..window.len() - last);
            }
        }

        let (has_previous_page, has_next_page) = match (window.first(), window.last()) {
            (Some((first, _)), Some((last, _))) => {
                (*first > 1, (*last as usize) < source_len)
            }
            _ => (false, false),
        };

        let items: Vec<CursorResult<T>> = window
            .into_iter()
            .map(|(ordinal, entity)| CursorResult {
                entity,
                ordinal,
                cursor: cursor::encode(ordinal),
            })
            .collect();

        debug!(
            "Cursor page of {} out of {source_len} items (previous: {has_previous_page}, next: {has_next_page})",
            items.len()
        );

        Ok(CursorPage {
            start_cursor: items.first().map(|item| item.cursor.clone()),
            end_cursor: items.last().map(|item| item.cursor.clone()),
            total_count: include_total_count.then_some(source_len),
            has_next_page,
            has_previous_page,
            items,
        })
    }
}
