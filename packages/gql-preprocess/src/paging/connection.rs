//! Host-facing shapes of paginated results.

use super::{CursorPage, OffsetPage};
use serde::Serialize;

/// `{Node}Edge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// `PageInfo` of a cursor-paginated connection.
/// See: https://relay.dev/graphql/connections.htm#sec-undefined.PageInfo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// `{Node}Connection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

/// `CollectionSegmentInfo` of an offset-paginated segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSegmentInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// `{Node}CollectionSegment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSegment<T> {
    pub items: Vec<T>,
    pub page_info: CollectionSegmentInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

impl<T> CursorPage<T> {
    pub fn into_connection(self) -> Connection<T> {
        let page_info = PageInfo {
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
            start_cursor: self.start_cursor,
            end_cursor: self.end_cursor,
        };

        Connection {
            edges: self
                .items
                .into_iter()
                .map(|item| Edge {
                    cursor: item.cursor,
                    node: item.entity,
                })
                .collect(),
            page_info,
            total_count: self.total_count,
        }
    }
}

impl<T> OffsetPage<T> {
    pub fn into_collection_segment(self) -> CollectionSegment<T> {
        CollectionSegment {
            items: self.items,
            page_info: CollectionSegmentInfo {
                has_next_page: self.has_next_page,
                has_previous_page: self.has_previous_page,
            },
            total_count: self.total_count,
        }
    }
}
