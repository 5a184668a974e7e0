//! The per-field resolution context handed to resolvers and middleware.

use crate::{
    params::ParamsContext,
    query::{FieldSelection, Operation, SelectionEntry},
    registry::{FieldDef, SchemaRegistry},
};
use async_graphql_value::ConstValue;
use gql_preprocess_lib::constants::PARAMS_CONTEXT_KEY;
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};

/// A key/value bag scoped to one field resolution.
#[derive(Default)]
pub struct LocalState {
    values: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl LocalState {
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    /// Read back a value, if present under `key` and of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;

        value.downcast::<T>().ok()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl fmt::Debug for LocalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(values.keys()).finish()
    }
}

/// What the host engine exposes about the field currently being resolved.
pub trait FieldContext: Send + Sync {
    fn schema(&self) -> &SchemaRegistry;

    /// The type declaring the active field.
    fn parent_type(&self) -> &str;

    fn selection(&self) -> &FieldSelection;

    fn local_state(&self) -> &LocalState;

    /// Tell the host to skip its own sorting and paging of this field's result.
    fn set_sorting_handled(&self, handled: bool);

    fn is_sorting_handled(&self) -> bool;

    fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.selection().argument(name)
    }

    fn field_def(&self) -> Option<&FieldDef> {
        self.schema()
            .field(self.parent_type(), &self.selection().name)
    }

    /// The params context published by the field middleware, if any.
    fn params_context(&self) -> Option<Arc<ParamsContext>> {
        self.local_state().get::<ParamsContext>(PARAMS_CONTEXT_KEY)
    }
}

/// A [`FieldContext`] bound to one field of a normalized [`Operation`].
#[derive(Debug)]
pub struct FieldResolution {
    schema: Arc<SchemaRegistry>,
    parent_type: String,
    selection: FieldSelection,
    local_state: LocalState,
    sorting_handled: AtomicBool,
}

impl FieldResolution {
    pub fn new(
        schema: Arc<SchemaRegistry>,
        parent_type: impl Into<String>,
        selection: FieldSelection,
    ) -> Self {
        Self {
            schema,
            parent_type: parent_type.into(),
            selection,
            local_state: LocalState::default(),
            sorting_handled: AtomicBool::new(false),
        }
    }

    /// Resolution of the root field of `operation` under `response_key`.
    pub fn root(
        schema: Arc<SchemaRegistry>,
        operation: &Operation,
        response_key: &str,
    ) -> Option<Self> {
        let selection = operation.root_field(response_key)?.clone();
        let parent_type = schema.query_type().to_string();
        Some(Self::new(schema, parent_type, selection))
    }

    /// Resolution of a field nested directly beneath this one. The child gets its
    /// own local state, so it never sees this field's params context.
    pub fn child(&self, response_key: &str) -> Option<Self> {
        fn find<'a>(entries: &'a [SelectionEntry], key: &str) -> Option<&'a FieldSelection> {
            entries.iter().find_map(|entry| match entry {
                SelectionEntry::Field(f) if f.response_key() == key => Some(f),
                SelectionEntry::Field(_) => None,
                SelectionEntry::Fragment { selection_set, .. } => find(selection_set, key),
            })
        }

        let parent_type = self.field_def()?.ty.name.clone();
        let selection = find(&self.selection.selection_set, response_key)?.clone();
        Some(Self::new(self.schema.clone(), parent_type, selection))
    }
}

impl FieldContext for FieldResolution {
    fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    fn parent_type(&self) -> &str {
        &self.parent_type
    }

    fn selection(&self) -> &FieldSelection {
        &self.selection
    }

    fn local_state(&self) -> &LocalState {
        &self.local_state
    }

    fn set_sorting_handled(&self, handled: bool) {
        self.sorting_handled.store(handled, Ordering::SeqCst);
    }

    fn is_sorting_handled(&self) -> bool {
        self.sorting_handled.load(Ordering::SeqCst)
    }
}
