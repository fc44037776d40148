//! Terms filter factory.

use serde_json::{Value, json};

use super::FilterFactory;
use crate::error::FacetResult;

/// Matches documents whose `field` equals any of the request values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsFilter {
    field: String,
}

impl TermsFilter {
    /// Creates a terms filter on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// The indexed field this filter targets.
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Creates a terms filter on `field`.
pub fn terms_filter(field: impl Into<String>) -> TermsFilter {
    TermsFilter::new(field)
}

impl FilterFactory for TermsFilter {
    fn build(&self, values: &[String]) -> FacetResult<Value> {
        Ok(json!({ "terms": { self.field.as_str(): values } }))
    }
}
