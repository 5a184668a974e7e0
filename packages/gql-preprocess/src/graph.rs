//! `async_graphql::dynamic` helpers shared by every schema exported from a
//! registry: names of paginated containers, the page info and sort types they
//! reference, and the paging and ordering arguments of list fields.
//! See: https://relay.dev/graphql/connections.htm

use async_graphql::dynamic::{
    Enum, Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext,
    SchemaBuilder, TypeRef,
};
use extension_trait::extension_trait;
use gql_preprocess_lib::constants;

/// `(name, type, description)` of a paging argument.
type PagingArgument = (&'static str, &'static str, &'static str);

const CURSOR_PAGING_ARGUMENTS: [PagingArgument; 4] = [
    (
        constants::FIRST,
        TypeRef::INT,
        "Paginate forward, returning at most the given amount of edges.",
    ),
    (
        constants::AFTER,
        TypeRef::STRING,
        "Return edges after the given cursor.",
    ),
    (
        constants::LAST,
        TypeRef::INT,
        "Paginate backward, returning at most the given amount of edges.",
    ),
    (
        constants::BEFORE,
        TypeRef::STRING,
        "Return edges before the given cursor.",
    ),
];

const OFFSET_PAGING_ARGUMENTS: [PagingArgument; 2] = [
    (
        constants::SKIP,
        TypeRef::INT,
        "Skip the given amount of items.",
    ),
    (
        constants::TAKE,
        TypeRef::INT,
        "Return at most the given amount of items.",
    ),
];

/// Resolver for introspection-only schemas. Values always come from the host.
pub(crate) fn unresolved(_ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move { Ok(None::<FieldValue>) })
}

fn suffixed(node: impl Into<String>, suffix: &str) -> String {
    let mut name = node.into();
    name.push_str(suffix);
    name
}

#[extension_trait]
pub impl TypeRefGraphExt for TypeRef {
    const PAGE_INFO: &'static str = "PageInfo";
    const COLLECTION_SEGMENT_INFO: &'static str = "CollectionSegmentInfo";
    const SORT_ENUM: &'static str = "SortEnumType";

    fn connection(node: impl Into<String>) -> String {
        suffixed(node, "Connection")
    }

    fn edge(node: impl Into<String>) -> String {
        suffixed(node, "Edge")
    }

    fn collection_segment(node: impl Into<String>) -> String {
        suffixed(node, "CollectionSegment")
    }

    fn sort_input(node: impl Into<String>) -> String {
        suffixed(node, "SortInput")
    }
}

/// `PageInfo` carries cursors, `CollectionSegmentInfo` only the neighbour flags.
fn page_info_object(name: &str, with_cursors: bool) -> Object {
    let object = [constants::HAS_NEXT_PAGE, constants::HAS_PREVIOUS_PAGE]
        .into_iter()
        .fold(Object::new(name), |object, flag| {
            object.field(Field::new(
                flag,
                TypeRef::named_nn(TypeRef::BOOLEAN),
                unresolved,
            ))
        });

    if !with_cursors {
        return object;
    }

    [constants::START_CURSOR, constants::END_CURSOR]
        .into_iter()
        .fold(object, |object, cursor| {
            object.field(Field::new(
                cursor,
                TypeRef::named(TypeRef::STRING),
                unresolved,
            ))
        })
}

#[extension_trait]
pub impl SchemaBuilderGraphExt for SchemaBuilder {
    /// Register the types referenced by every paginated or sortable field.
    fn register_graph_types(self) -> Self {
        let sort_enum = Enum::new(TypeRef::SORT_ENUM)
            .item(constants::ASCENDING_PREFIX)
            .item(constants::DESCENDING_PREFIX);

        self.register(page_info_object(TypeRef::PAGE_INFO, true))
            .register(page_info_object(TypeRef::COLLECTION_SEGMENT_INFO, false))
            .register(sort_enum)
    }
}

fn with_arguments(field: Field, arguments: &[PagingArgument]) -> Field {
    arguments
        .iter()
        .fold(field, |field, (name, ty, description)| {
            field.argument(
                InputValue::new(*name, TypeRef::named(*ty)).description(*description),
            )
        })
}

#[extension_trait]
pub impl FieldGraphExt for Field {
    /// `order: {Node}SortInput`.
    fn ordering_argument(self, node: impl Into<String>) -> Self {
        self.argument(InputValue::new(
            constants::ORDER,
            TypeRef::named(TypeRef::sort_input(node)),
        ))
    }

    /// `first`/`after` for forward and `last`/`before` for backward paging.
    /// See: https://relay.dev/graphql/connections.htm#sec-Arguments
    fn cursor_paging_arguments(self) -> Self {
        with_arguments(self, &CURSOR_PAGING_ARGUMENTS)
    }

    fn offset_paging_arguments(self) -> Self {
        with_arguments(self, &OFFSET_PAGING_ARGUMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::dynamic::{InputObject, Schema};

    #[test]
    fn test_container_names() {
        assert_eq!(TypeRef::connection("Droid"), "DroidConnection");
        assert_eq!(TypeRef::edge("Droid"), "DroidEdge");
        assert_eq!(TypeRef::collection_segment("Droid"), "DroidCollectionSegment");
        assert_eq!(TypeRef::sort_input("Droid"), "DroidSortInput");
    }

    #[test]
    fn test_graph_types_sdl() {
        let droid = Object::new("Droid").field(Field::new(
            "name",
            TypeRef::named_nn(TypeRef::STRING),
            unresolved,
        ));
        let droid_sort = InputObject::new(TypeRef::sort_input("Droid"))
            .field(InputValue::new("name", TypeRef::named(TypeRef::SORT_ENUM)));
        let query = Object::new("Query")
            .field(
                Field::new("droids", TypeRef::named_nn_list_nn("Droid"), unresolved)
                    .ordering_argument("Droid")
                    .cursor_paging_arguments(),
            )
            .field(
                Field::new("droidPage", TypeRef::named_nn_list_nn("Droid"), unresolved)
                    .offset_paging_arguments(),
            )
            .field(Field::new(
                "pageInfo",
                TypeRef::named_nn(TypeRef::PAGE_INFO),
                unresolved,
            ))
            .field(Field::new(
                "segmentInfo",
                TypeRef::named_nn(TypeRef::COLLECTION_SEGMENT_INFO),
                unresolved,
            ));

        let sdl = Schema::build("Query", None, None)
            .register_graph_types()
            .register(droid)
            .register(droid_sort)
            .register(query)
            .finish()
            .unwrap()
            .sdl();

        for expected in [
            "type PageInfo",
            "type CollectionSegmentInfo",
            "enum SortEnumType",
            "ASC",
            "DESC",
            "input DroidSortInput",
            "order: DroidSortInput",
            "hasPreviousPage: Boolean!",
            "endCursor: String",
            "first: Int",
            "before: String",
            "take: Int",
        ] {
            assert!(sdl.contains(expected), "missing `{expected}` in:\n{sdl}");
        }
    }
}
