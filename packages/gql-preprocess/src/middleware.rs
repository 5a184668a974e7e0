//! Field middleware that publishes a [`ParamsContext`] to resolvers which ask for
//! one, and tells the host when a resolver already sorted and paged its result.

use crate::{
    context::FieldContext,
    paging::{CollectionSegment, Connection, CursorPage, OffsetPage},
    params::{ParamsContext, ParamsOptions},
};
use async_trait::async_trait;
use gql_preprocess_lib::constants::PARAMS_CONTEXT_KEY;
use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::debug;

lazy_static! {
    /// Whether a resolver needs a params context, by resolver id. Filled once per
    /// resolver for the life of the process.
    static ref NEEDS_PARAMS_CONTEXT: RwLock<HashMap<String, bool>> =
        RwLock::new(HashMap::new());
}

/// A parameter a resolver declares it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverParam {
    ParamsContext,
    FieldContext,
    Parent,
    Argument(String),
}

/// The declared signature of a resolver. Identity comes from [`Resolver::id`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverDescriptor {
    params: Vec<ResolverParam>,
}

impl ResolverDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: ResolverParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[ResolverParam] {
        &self.params
    }

    pub fn needs_params_context(&self) -> bool {
        self.params.contains(&ResolverParam::ParamsContext)
    }
}

/// Implemented by resolver results. A result is preprocessed when the resolver
/// already sorted and paged it, so the host must not do so again.
pub trait ResolverOutput {
    fn is_preprocessed(&self) -> bool {
        false
    }
}

/// Marks any value as already sorted and paged by its resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed<T>(pub T);

impl<T> ResolverOutput for Preprocessed<T> {
    fn is_preprocessed(&self) -> bool {
        true
    }
}

impl<T> ResolverOutput for CursorPage<T> {
    fn is_preprocessed(&self) -> bool {
        true
    }
}

impl<T> ResolverOutput for OffsetPage<T> {
    fn is_preprocessed(&self) -> bool {
        true
    }
}

impl<T> ResolverOutput for Connection<T> {
    fn is_preprocessed(&self) -> bool {
        true
    }
}

impl<T> ResolverOutput for CollectionSegment<T> {
    fn is_preprocessed(&self) -> bool {
        true
    }
}

impl<T: ResolverOutput> ResolverOutput for Option<T> {
    fn is_preprocessed(&self) -> bool {
        self.as_ref().map_or(false, ResolverOutput::is_preprocessed)
    }
}

impl<T> ResolverOutput for Vec<T> {}
impl ResolverOutput for serde_json::Value {}
impl ResolverOutput for () {}

#[async_trait]
pub trait Resolver: Send + Sync {
    type Output: ResolverOutput + Send;
    type Error: Send;

    /// Identity of the resolver, stable for the life of the process.
    fn id(&self) -> &str;

    fn descriptor(&self) -> ResolverDescriptor;

    async fn resolve(&self, ctx: &dyn FieldContext) -> Result<Self::Output, Self::Error>;
}

fn needs_params_context<R: Resolver + ?Sized>(resolver: &R) -> bool {
    if let Some(needs) = NEEDS_PARAMS_CONTEXT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(resolver.id())
    {
        return *needs;
    }

    let needs = resolver.descriptor().needs_params_context();
    debug!(
        "Resolver {} needs a params context: {needs}",
        resolver.id()
    );

    *NEEDS_PARAMS_CONTEXT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(resolver.id().to_string())
        .or_insert(needs)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMiddleware {
    options: ParamsOptions,
}

impl FieldMiddleware {
    pub fn new(options: ParamsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParamsOptions {
        &self.options
    }

    /// Resolve a field with `resolver`.
    ///
    /// When the resolver takes a params context, one is bound to `ctx` and
    /// published in its local state for the duration of the call. A preprocessed
    /// result then marks sorting as handled on the field. Resolver errors are
    /// returned as they are.
    pub async fn invoke<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
        ctx: Arc<dyn FieldContext>,
    ) -> Result<R::Output, R::Error> {
        let params = if needs_params_context(resolver) {
            let params = Arc::new(ParamsContext::new(ctx.clone(), self.options));
            ctx.local_state().insert(PARAMS_CONTEXT_KEY, params.clone());
            debug!(
                "Attached params context to {}.{}",
                ctx.parent_type(),
                ctx.selection().response_key()
            );
            Some(params)
        } else {
            None
        };

        let result = resolver.resolve(ctx.as_ref()).await;

        if let Some(params) = params {
            if matches!(&result, Ok(output) if output.is_preprocessed()) {
                debug!(
                    "Resolver {} returned a preprocessed result, sorting is handled",
                    resolver.id()
                );
                params.set_sorting_is_handled(true);
            }

            // The context holds the field context, which holds the context.
            ctx.local_state().remove(PARAMS_CONTEXT_KEY);
        }

        result
    }
}
