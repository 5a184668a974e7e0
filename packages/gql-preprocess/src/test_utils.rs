use crate::{
    context::FieldResolution,
    params::{ParamsContext, ParamsOptions},
    query::Operation,
    registry::{
        FieldDef, FieldType, InterfaceType, ObjectType, SchemaRegistry, SortFieldDef,
        UnionType,
    },
};
use async_graphql_value::Variables;
use std::sync::Arc;

/// A small Star Wars schema exercising interfaces, unions and both paging styles.
pub fn fixture_registry() -> SchemaRegistry {
    let query = ObjectType::new("Query")
        .field(
            FieldDef::new("characters", FieldType::named_nn("CharacterConnection"))
                .cursor_paging()
                .sort_field(SortFieldDef::new("name").member("Name"))
                .sort_field(SortFieldDef::new("id").member("Id")),
        )
        .field(
            FieldDef::new("droids", FieldType::named_nn("DroidCollectionSegment"))
                .offset_paging(),
        )
        .field(FieldDef::new("hero", FieldType::named("Character")))
        .field(FieldDef::new("starship", FieldType::named("Starship")))
        .field(FieldDef::new("search", FieldType::named_list("SearchResult")));

    let character = InterfaceType::new("Character")
        .field(FieldDef::new("id", FieldType::named_nn("ID")).member("Id"))
        .field(FieldDef::new("name", FieldType::named("String")).member("Name"))
        .field(FieldDef::new("friends", FieldType::named_list("Character")));

    let human = ObjectType::new("Human")
        .implement("Character")
        .field(FieldDef::new("homePlanet", FieldType::named("String")).member("HomePlanet"))
        .field(FieldDef::new("birthDate", FieldType::named("Date")).member("BirthDate"))
        .field(FieldDef::new("friends", FieldType::named_list("Character")).depends_on("Id"));

    let droid = ObjectType::new("Droid")
        .implement("Character")
        .field(
            FieldDef::new("primaryFunction", FieldType::named("String"))
                .member("PrimaryFunction"),
        )
        .field(FieldDef::new("friends", FieldType::named_list("Character")).depends_on("Id"));

    let starship = ObjectType::new("Starship")
        .field(FieldDef::new("id", FieldType::named_nn("ID")).member("Id"))
        .field(FieldDef::new("name", FieldType::named("String")).member("Name"))
        .field(FieldDef::new("length", FieldType::named("Float")).member("Length"));

    let search_result = UnionType::new("SearchResult")
        .possible_type("Human")
        .possible_type("Droid")
        .possible_type("Starship");

    SchemaRegistry::new("Query")
        .register(query)
        .register(character)
        .register(human)
        .register(droid)
        .register(starship)
        .register(search_result)
        .connection("Character")
        .collection_segment("Droid")
}

/// Parse `q` against the fixture schema and bind a resolution to its root field
/// `field`.
pub fn query(q: &str, field: &str) -> FieldResolution {
    query_with(q, field, serde_json::json!({}))
}

pub fn query_with(q: &str, field: &str, variables: serde_json::Value) -> FieldResolution {
    let operation = Operation::parse(q, None, &Variables::from_json(variables)).unwrap();
    FieldResolution::root(Arc::new(fixture_registry()), &operation, field).unwrap()
}

pub fn params(q: &str, field: &str) -> ParamsContext {
    params_with(q, field, serde_json::json!({}), ParamsOptions::default())
}

pub fn params_with(
    q: &str,
    field: &str,
    variables: serde_json::Value,
    options: ParamsOptions,
) -> ParamsContext {
    ParamsContext::new(Arc::new(query_with(q, field, variables)), options)
}
