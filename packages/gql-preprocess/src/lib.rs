//! # gql-preprocess
//!
//! Request-time selection introspection and pagination for GraphQL field resolvers.
//!
//! Before a resolver runs, a [`ParamsContext`] answers what the caller selected, how
//! the result should be sorted and which paging window was requested. After it runs,
//! the cursor and offset slicers cut an in-memory result set into a page, and the
//! [`FieldMiddleware`] tells the host to skip its own post-processing when the
//! resolver already did the work.

pub mod context;
pub mod cursor;
pub mod graph;
pub mod middleware;
pub mod paging;
pub mod params;
pub mod query;
pub mod registry;
pub mod selection;
pub mod sorting;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::{FieldContext, FieldResolution, LocalState};
pub use middleware::{FieldMiddleware, Resolver, ResolverDescriptor, ResolverOutput, ResolverParam};
pub use paging::{CursorPage, CursorPagingArgs, OffsetPage, OffsetPagingArgs};
pub use params::{ParamsContext, ParamsOptions, SelectionNameFlags};
pub use registry::SchemaRegistry;
pub use selection::{DependencyLink, SelectionNode};
pub use sorting::{SortDirection, SortOrderField};

use thiserror::Error;
pub type PreprocessResult<T> = Result<T, PreprocessError>;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Malformed cursor: {0:?}")]
    MalformedCursor(String),
    #[error("Invalid paging window: {0}")]
    InvalidWindow(String),
    #[error("GraphQL parser error: {0:?}")]
    ParseError(#[from] async_graphql_parser::Error),
    #[error("Error building dynamic schema: {0:?}")]
    DynamicSchemaBuildError(#[from] async_graphql::dynamic::SchemaError),
    #[error("Unrecognized Type: {0:?}")]
    UnrecognizedType(String),
    #[error("Operation not supported: {0:?}")]
    OperationNotSupported(String),
    #[error("Unknown operation: {0:?}")]
    UnknownOperation(String),
    #[error("Failed to resolve query fragments.")]
    FragmentResolverFailed,
    #[error("Undefined variable: {0:?}")]
    UndefinedVariable(String),
}
