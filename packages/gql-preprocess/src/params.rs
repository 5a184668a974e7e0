//! The params context: a per-field facade over what the caller selected, how the
//! result should be sorted and which page was asked for.
//!
//! Every derived value is computed on first use and cached for the lifetime of
//! the context. A context is bound to a single field resolution and must not be
//! kept around once that field has resolved.

use crate::{
    context::FieldContext,
    paging::{CursorPage, CursorPagingArgs, OffsetPage, OffsetPagingArgs},
    selection::{gather, resolve_dependencies, DependencyLink, GatheredSelections, SelectionNode},
    sorting::{extract_sort, SortOrderField},
    PreprocessResult,
};
use async_graphql_value::ConstValue;
use bitflags::bitflags;
use gql_preprocess_lib::{
    config::{PreprocessConfig, SortDirectionPolicy},
    constants, defaults,
};
use std::{fmt, sync::Arc, sync::OnceLock};

bitflags! {
    /// Which names [`ParamsContext::selection_mapped_names`] reports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SelectionNameFlags: u8 {
        /// Members backing the selected fields.
        const SELECTED_NAMES = 0b01;
        /// Parent members the selected fields depend on.
        const DEPENDENCY_NAMES = 0b10;
        const ALL = Self::SELECTED_NAMES.bits() | Self::DEPENDENCY_NAMES.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamsOptions {
    /// Upper bound on offset page sizes.
    pub max_page_size: usize,
    /// Compute total counts even when `totalCount` is not selected.
    pub include_total_count: bool,
    pub sort_direction_policy: SortDirectionPolicy,
}

impl Default for ParamsOptions {
    fn default() -> Self {
        Self {
            max_page_size: defaults::MAX_PAGE_SIZE,
            include_total_count: defaults::INCLUDE_TOTAL_COUNT,
            sort_direction_policy: SortDirectionPolicy::default(),
        }
    }
}

impl From<&PreprocessConfig> for ParamsOptions {
    fn from(config: &PreprocessConfig) -> Self {
        Self {
            max_page_size: config.paging.max_page_size,
            include_total_count: config.paging.include_total_count,
            sort_direction_policy: config.sorting.direction_policy,
        }
    }
}

/// Keep the first spelling of every name, comparing without regard to case.
fn distinct_ignore_case<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for name in names {
        if !distinct.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            distinct.push(name.to_string());
        }
    }
    distinct
}

pub struct ParamsContext {
    ctx: Option<Arc<dyn FieldContext>>,
    options: ParamsOptions,
    gathered: OnceLock<GatheredSelections>,
    all_selection_names: OnceLock<Vec<String>>,
    /// Indexed by `SelectionNameFlags::bits()`.
    mapped_names: [OnceLock<Vec<String>>; 4],
    dependencies: OnceLock<Option<Vec<DependencyLink>>>,
    sort_args: OnceLock<Vec<SortOrderField>>,
    cursor_paging_args: OnceLock<CursorPagingArgs>,
    offset_paging_args: OnceLock<OffsetPagingArgs>,
}

impl fmt::Debug for ParamsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamsContext")
            .field(
                "field",
                &self.ctx.as_ref().map(|ctx| ctx.selection().response_key()),
            )
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ParamsContext {
    pub fn new(ctx: Arc<dyn FieldContext>, options: ParamsOptions) -> Self {
        Self::with_context(Some(ctx), options)
    }

    /// A context with no field behind it. Every lookup yields an empty value.
    pub fn detached(options: ParamsOptions) -> Self {
        Self::with_context(None, options)
    }

    fn with_context(ctx: Option<Arc<dyn FieldContext>>, options: ParamsOptions) -> Self {
        Self {
            ctx,
            options,
            gathered: OnceLock::new(),
            all_selection_names: OnceLock::new(),
            mapped_names: Default::default(),
            dependencies: OnceLock::new(),
            sort_args: OnceLock::new(),
            cursor_paging_args: OnceLock::new(),
            offset_paging_args: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &ParamsOptions {
        &self.options
    }

    /// Every argument of the active field, variables already substituted.
    pub fn arguments(&self) -> &[(String, ConstValue)] {
        match &self.ctx {
            Some(ctx) => &ctx.selection().arguments,
            None => &[],
        }
    }

    fn gathered(&self) -> &GatheredSelections {
        self.gathered.get_or_init(|| match &self.ctx {
            Some(ctx) => gather(ctx.schema(), ctx.parent_type(), ctx.selection()),
            None => GatheredSelections::default(),
        })
    }

    /// Fields selected on the entity type, across all of its concrete types and
    /// through `nodes`, `edges { node }` or `items` for paginated fields.
    pub fn all_selection_fields(&self) -> &[SelectionNode] {
        &self.gathered().fields
    }

    /// Distinct schema names of [`Self::all_selection_fields`], ignoring case.
    pub fn all_selection_names(&self) -> &[String] {
        self.all_selection_names.get_or_init(|| {
            distinct_ignore_case(self.all_selection_fields().iter().map(|n| n.schema_name()))
        })
    }

    /// Selected fields that apply to values of `type_name`.
    pub fn selection_fields_for(&self, type_name: &str) -> Vec<&SelectionNode> {
        let Some(ctx) = &self.ctx else {
            return Vec::new();
        };

        self.all_selection_fields()
            .iter()
            .filter(|n| ctx.schema().is_assignable(n.declaring_type(), type_name))
            .collect()
    }

    /// Backing member names of the selection, falling back to schema names, and
    /// optionally the members selected fields depend on. Distinct, ignoring case.
    pub fn selection_mapped_names(&self, flags: SelectionNameFlags) -> &[String] {
        let flags = flags & SelectionNameFlags::ALL;
        self.mapped_names[usize::from(flags.bits())].get_or_init(|| {
            let mut names: Vec<&str> = Vec::new();

            if flags.contains(SelectionNameFlags::SELECTED_NAMES) {
                names.extend(
                    self.all_selection_fields()
                        .iter()
                        .map(|n| n.member_or_schema_name()),
                );
            }

            if flags.contains(SelectionNameFlags::DEPENDENCY_NAMES) {
                names.extend(
                    self.selection_dependencies()
                        .unwrap_or_default()
                        .iter()
                        .map(|link| link.dependency_member_name()),
                );
            }

            distinct_ignore_case(names)
        })
    }

    /// Dependencies declared on any selected field. `None` when there are none.
    pub fn selection_dependencies(&self) -> Option<&[DependencyLink]> {
        self.dependencies
            .get_or_init(|| match &self.ctx {
                Some(ctx) => resolve_dependencies(ctx.schema(), self.all_selection_fields()),
                None => None,
            })
            .as_deref()
    }

    /// Sort instructions from the `order` argument.
    pub fn sort_args(&self) -> &[SortOrderField] {
        self.sort_args.get_or_init(|| {
            let Some(ctx) = &self.ctx else {
                return Vec::new();
            };

            match (ctx.field_def(), ctx.argument(constants::ORDER)) {
                (Some(def), Some(value)) => extract_sort(
                    &def.sort_fields,
                    value,
                    self.options.sort_direction_policy,
                ),
                _ => Vec::new(),
            }
        })
    }

    pub fn cursor_paging_args(&self) -> &CursorPagingArgs {
        self.cursor_paging_args.get_or_init(|| match &self.ctx {
            Some(ctx) => CursorPagingArgs::from_selection(ctx.selection()),
            None => CursorPagingArgs::default(),
        })
    }

    pub fn offset_paging_args(&self) -> &OffsetPagingArgs {
        self.offset_paging_args.get_or_init(|| match &self.ctx {
            Some(ctx) => OffsetPagingArgs::from_selection(ctx.selection()),
            None => OffsetPagingArgs::default(),
        })
    }

    /// The `totalCount` selection of a paginated field, if present.
    pub fn total_count_selection(&self) -> Option<&SelectionNode> {
        let gathered = self.gathered();
        if !gathered.is_paginated {
            return None;
        }

        gathered
            .container
            .iter()
            .find(|n| n.schema_name() == constants::TOTAL_COUNT)
    }

    pub fn is_total_count_requested(&self) -> bool {
        self.total_count_selection().is_some()
    }

    /// Tell the host that the resolver already sorted and paged its result.
    pub fn set_sorting_is_handled(&self, handled: bool) {
        if let Some(ctx) = &self.ctx {
            ctx.set_sorting_handled(handled);
        }
    }

    fn include_total_count(&self) -> bool {
        self.options.include_total_count || self.is_total_count_requested()
    }

    /// Cut a cursor page out of `items` using this field's paging arguments.
    pub fn slice_cursor_page<T>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> PreprocessResult<CursorPage<T>> {
        self.cursor_paging_args()
            .slice(items, self.include_total_count())
    }

    /// Cut an offset page out of `items` using this field's paging arguments.
    pub fn slice_offset_page<T>(&self, items: impl IntoIterator<Item = T>) -> OffsetPage<T> {
        self.offset_paging_args().slice(
            items,
            self.options.max_page_size,
            self.include_total_count(),
        )
    }
}
