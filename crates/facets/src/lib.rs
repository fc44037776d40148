//! # helios-facets - Facet filters and aggregations for search endpoints
//!
//! This crate turns the query-string parameters of a search request into
//! Elasticsearch filters and aggregations, driven by a per-index facet
//! configuration. It also reconstructs the canonical parameters of the
//! filters that were applied, so responses can link to the next page or to
//! a neighbouring facet without losing the active filter state.
//!
//! ## Architecture
//!
//! - [`filters`] - Filter factories: [`TermsFilter`] and [`RangeFilter`]
//! - [`aggregations`] - Concrete and lazy aggregation definitions and selection
//! - [`collector`] - Builds filter expressions and the canonical echo
//! - [`config`] - Per-index facet configuration, in code or from JSON
//! - [`facets`] - Applies a facet configuration to a search query
//! - [`search`] - The [`SearchQuery`] seam and the [`EsSearch`] body builder
//! - [`params`] - Ordered request parameter multimaps
//! - [`error`] - Error types and the HTTP 400 validation envelope
//!
//! ## Quick Start
//!
//! ```
//! use helios_facets::{
//!     EsSearch, FacetConfig, FacetsConfig, RequestValues, apply_facets, range_filter,
//!     terms_filter,
//! };
//! use serde_json::json;
//!
//! let config = FacetsConfig::new().with_index(
//!     "records",
//!     FacetConfig::new()
//!         .with_aggregation("type", json!({ "terms": { "field": "type" } }))
//!         .with_query_filter("type", terms_filter("type"))
//!         .with_post_filter("year", range_filter("year")),
//! );
//!
//! let values = RequestValues::parse("type=book&year=%3E2000--%3C2020");
//! let (search, echo) =
//!     apply_facets(&config, EsSearch::new("records"), "records", &values).unwrap();
//!
//! assert_eq!(search.filters().len(), 1);
//! assert_eq!(search.post_filters().len(), 1);
//! assert_eq!(echo.to_query_string(), "type=book&year=%3E2000--%3C2020");
//! ```
//!
//! ## Range syntax
//!
//! Range filters accept a single `start--end` value. Either side may be
//! empty; `>` before the start and `<` before the end make that bound
//! exclusive. See [`filters::range`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aggregations;
pub mod collector;
pub mod config;
pub mod error;
pub mod facets;
pub mod filters;
pub mod params;
pub mod search;

pub use aggregations::{AggregationDef, select_aggregations};
pub use collector::collect_filters;
pub use config::{FacetConfig, FacetsConfig};
pub use error::{FacetError, FacetResult};
pub use facets::{DefaultFacetsFactory, FACETS_PARAM, FacetsFactory, apply_facets};
pub use filters::{
    FilterDefinition, FilterFactory, RangeFilter, TermsFilter, range_filter, terms_filter,
};
pub use params::{CanonicalParams, RequestValues};
pub use search::{EsSearch, SearchQuery};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the tracing subscriber for binaries built on this crate.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helios_facets={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
