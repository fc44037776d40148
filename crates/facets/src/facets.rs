//! Facet application.
//!
//! Applies the facet configuration of an index to a search query:
//!
//! 1. Aggregations selected by the `facets` parameter (all when absent)
//! 2. Query filters, which narrow hits and aggregation counts
//! 3. Post filters, which narrow only the hits
//!
//! and returns the canonical parameters of the filters that were applied.
//!
//! Every request value is validated before the query is touched, so a
//! rejected filter leaves no partial state behind.

use std::sync::Arc;

use crate::aggregations::select_aggregations;
use crate::collector::collect_filters;
use crate::config::FacetsConfig;
use crate::error::FacetResult;
use crate::params::{CanonicalParams, RequestValues};
use crate::search::SearchQuery;

/// Request parameter selecting a subset of aggregations.
///
/// Values are comma lists with empty segments dropped. `facets=` therefore
/// selects nothing in particular and every configured aggregation is applied.
pub const FACETS_PARAM: &str = "facets";

/// Applies the facets configured for `index` to `query`.
///
/// Returns the query together with the canonical parameters of the applied
/// filters. Indices without facet configuration are returned unchanged with
/// an empty echo.
///
/// # Errors
///
/// Returns [`FacetError::FilterValidation`](crate::FacetError::FilterValidation)
/// if a filter rejects its request values. The query is dropped unmodified.
pub fn apply_facets<Q: SearchQuery>(
    config: &FacetsConfig,
    mut query: Q,
    index: &str,
    values: &RequestValues,
) -> FacetResult<(Q, CanonicalParams)> {
    let Some(facets) = config.get(index) else {
        tracing::trace!(index = %index, "No facet configuration for index");
        return Ok((query, CanonicalParams::new()));
    };

    let requested = values.get_comma_list(FACETS_PARAM);
    let aggregations = select_aggregations(facets.aggregations(), &requested);

    let mut echo = CanonicalParams::new();
    let filters = collect_filters(facets.query_filters(), values, &mut echo)?;
    let post_filters = collect_filters(facets.post_filters(), values, &mut echo)?;

    tracing::debug!(
        index = %index,
        aggregations = aggregations.len(),
        filters = filters.len(),
        post_filters = post_filters.len(),
        "Applying facets"
    );

    for (name, aggregation) in aggregations {
        query.set_aggregation(&name, aggregation);
    }
    for filter in filters {
        query.filter(filter);
    }
    for filter in post_filters {
        query.post_filter(filter);
    }

    Ok((query, echo))
}

/// Strategy for applying facets to a search query.
///
/// Search endpoints hold a factory rather than calling [`apply_facets`]
/// directly, so an application can substitute its own faceting.
pub trait FacetsFactory: Send + Sync {
    /// Applies facets for `index` to `query` from the request `values`.
    fn apply<Q: SearchQuery>(
        &self,
        query: Q,
        index: &str,
        values: &RequestValues,
    ) -> FacetResult<(Q, CanonicalParams)>;
}

/// Facets factory backed by a shared [`FacetsConfig`].
#[derive(Debug, Clone, Default)]
pub struct DefaultFacetsFactory {
    config: Arc<FacetsConfig>,
}

impl DefaultFacetsFactory {
    /// Creates a factory over `config`.
    pub fn new(config: Arc<FacetsConfig>) -> Self {
        Self { config }
    }

    /// The facet configuration in use.
    pub fn config(&self) -> &FacetsConfig {
        &self.config
    }
}

impl FacetsFactory for DefaultFacetsFactory {
    fn apply<Q: SearchQuery>(
        &self,
        query: Q,
        index: &str,
        values: &RequestValues,
    ) -> FacetResult<(Q, CanonicalParams)> {
        apply_facets(&self.config, query, index, values)
    }
}
