//! Filter factories.
//!
//! A filter factory turns the raw request values of one parameter into a
//! single Elasticsearch Query DSL expression. Two factories are built in:
//!
//! - [`TermsFilter`] - exact-match membership (`terms` query)
//! - [`RangeFilter`] - bounded range parsed from `start--end` (`range` query)
//!
//! Any `Fn(&[String]) -> FacetResult<Value>` closure is also a factory, so a
//! facet configuration can carry custom filters.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FacetResult;

pub mod range;
pub mod terms;

pub use range::{RangeBound, RangeFilter, RangeValue, range_filter};
pub use terms::{TermsFilter, terms_filter};

/// Builds a filter expression from the request values of one parameter.
///
/// The caller only invokes a factory when at least one value is present.
pub trait FilterFactory: Send + Sync {
    /// Builds the filter expression for `values`.
    fn build(&self, values: &[String]) -> FacetResult<Value>;
}

impl<F> FilterFactory for F
where
    F: Fn(&[String]) -> FacetResult<Value> + Send + Sync,
{
    fn build(&self, values: &[String]) -> FacetResult<Value> {
        self(values)
    }
}

/// Shared handle to a filter factory, as stored in a facet configuration.
#[derive(Clone)]
pub struct FilterDefinition(Arc<dyn FilterFactory>);

impl FilterDefinition {
    /// Wraps a factory.
    pub fn new(factory: impl FilterFactory + 'static) -> Self {
        Self(Arc::new(factory))
    }

    /// Builds the filter expression for `values`.
    pub fn build(&self, values: &[String]) -> FacetResult<Value> {
        self.0.build(values)
    }
}

impl fmt::Debug for FilterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilterDefinition(..)")
    }
}

impl From<TermsFilter> for FilterDefinition {
    fn from(filter: TermsFilter) -> Self {
        Self::new(filter)
    }
}

impl From<RangeFilter> for FilterDefinition {
    fn from(filter: RangeFilter) -> Self {
        Self::new(filter)
    }
}
