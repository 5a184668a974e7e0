pub const LOG_LEVEL: &str = "info";
pub const VERBOSE_LOGGING: bool = false;

/// Upper bound on the number of items a single page may hold, applied when a
/// caller omits `take` or asks for more than this.
pub const MAX_PAGE_SIZE: usize = 50;

/// Compute total counts only when `totalCount` is actually selected.
pub const INCLUDE_TOTAL_COUNT: bool = false;

pub const SORT_DIRECTION_POLICY: &str = "lenient";
