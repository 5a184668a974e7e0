//! Fixed names shared with the host GraphQL engine.

/// Local-state key under which a field's params context is published.
pub const PARAMS_CONTEXT_KEY: &str = "ParamsContext";

/// Cursor paging arguments.
/// See: https://relay.dev/graphql/connections.htm#sec-Arguments
pub const FIRST: &str = "first";
pub const AFTER: &str = "after";
pub const LAST: &str = "last";
pub const BEFORE: &str = "before";

/// Offset paging arguments.
pub const SKIP: &str = "skip";
pub const TAKE: &str = "take";

/// Sorting argument.
pub const ORDER: &str = "order";

/// Reserved selection names of paginated containers.
pub const TOTAL_COUNT: &str = "totalCount";
pub const NODES: &str = "nodes";
pub const EDGES: &str = "edges";
pub const NODE: &str = "node";
pub const ITEMS: &str = "items";
pub const CURSOR: &str = "cursor";
pub const PAGE_INFO: &str = "pageInfo";

/// Fields of `PageInfo` and `CollectionSegmentInfo`.
pub const HAS_NEXT_PAGE: &str = "hasNextPage";
pub const HAS_PREVIOUS_PAGE: &str = "hasPreviousPage";
pub const START_CURSOR: &str = "startCursor";
pub const END_CURSOR: &str = "endCursor";

/// Direction token prefixes recognized in sort arguments.
pub const ASCENDING_PREFIX: &str = "ASC";
pub const DESCENDING_PREFIX: &str = "DESC";

/// Prefix of introspection fields, which never count as selections.
pub const INTROSPECTION_PREFIX: &str = "__";
