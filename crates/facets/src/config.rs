//! Facet configuration.
//!
//! Each search index may carry a [`FacetConfig`] describing the aggregations
//! it offers and the filters clients can apply. A [`FacetsConfig`] maps index
//! names to their configuration; indices without an entry get no faceting.
//!
//! Configuration is built in code with the builder methods, or loaded from a
//! JSON document keyed by index name:
//!
//! ```json
//! {
//!   "records": {
//!     "aggregations": {
//!       "type": { "terms": { "field": "type" } }
//!     },
//!     "filters": {
//!       "type": { "terms": { "field": "type" } }
//!     },
//!     "post_filters": {
//!       "year": {
//!         "range": {
//!           "field": "year",
//!           "start_date_math": "/y",
//!           "end_date_math": "/y",
//!           "options": { "format": "yyyy" }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Aggregation bodies are passed to Elasticsearch verbatim. `query_filters`
//! is accepted in place of `filters`. Object order is kept, so aggregations
//! appear in the response in the order they are configured.
//!
//! # Example
//!
//! ```
//! use helios_facets::{FacetConfig, FacetsConfig, range_filter, terms_filter};
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
//! assert!(config.get("records").is_some());
//! assert!(config.get("authors").is_none());
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::aggregations::AggregationDef;
use crate::error::{FacetError, FacetResult};
use crate::filters::{FilterDefinition, RangeFilter, TermsFilter};

/// Facet configuration of a single index.
#[derive(Debug, Clone, Default)]
pub struct FacetConfig {
    aggregations: Vec<(String, AggregationDef)>,
    query_filters: Vec<(String, FilterDefinition)>,
    post_filters: Vec<(String, FilterDefinition)>,
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}

impl FacetConfig {
    /// Creates an empty facet configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregation. Re-using a name replaces the earlier definition.
    pub fn with_aggregation(
        mut self,
        name: impl Into<String>,
        aggregation: impl Into<AggregationDef>,
    ) -> Self {
        upsert(&mut self.aggregations, name.into(), aggregation.into());
        self
    }

    /// Adds an aggregation built on demand for every request that selects it.
    pub fn with_lazy_aggregation(
        self,
        name: impl Into<String>,
        producer: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.with_aggregation(name, AggregationDef::lazy(producer))
    }

    /// Adds a filter that narrows both hits and aggregation counts.
    pub fn with_query_filter(
        mut self,
        name: impl Into<String>,
        filter: impl Into<FilterDefinition>,
    ) -> Self {
        upsert(&mut self.query_filters, name.into(), filter.into());
        self
    }

    /// Adds a filter that narrows only the returned hits.
    pub fn with_post_filter(
        mut self,
        name: impl Into<String>,
        filter: impl Into<FilterDefinition>,
    ) -> Self {
        upsert(&mut self.post_filters, name.into(), filter.into());
        self
    }

    /// Configured aggregations, in configuration order.
    pub fn aggregations(&self) -> &[(String, AggregationDef)] {
        &self.aggregations
    }

    /// Configured query filters, in configuration order.
    pub fn query_filters(&self) -> &[(String, FilterDefinition)] {
        &self.query_filters
    }

    /// Configured post filters, in configuration order.
    pub fn post_filters(&self) -> &[(String, FilterDefinition)] {
        &self.post_filters
    }
}

/// Facet configuration for every index, keyed by index name.
#[derive(Debug, Clone, Default)]
pub struct FacetsConfig {
    indices: HashMap<String, FacetConfig>,
}

impl FacetsConfig {
    /// Creates a configuration with no faceted indices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the facet configuration of `index`.
    pub fn with_index(mut self, index: impl Into<String>, config: FacetConfig) -> Self {
        self.indices.insert(index.into(), config);
        self
    }

    /// Returns the facet configuration of `index`, if it has one.
    pub fn get(&self, index: &str) -> Option<&FacetConfig> {
        self.indices.get(index)
    }

    /// Names of all faceted indices.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> FacetResult<Self> {
        let documents: HashMap<String, FacetDocument> = serde_json::from_str(json)?;

        let mut config = Self::new();
        for (index, document) in documents {
            let facets = document.into_config(&index)?;
            config.indices.insert(index, facets);
        }
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> FacetResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            indices = config.indices.len(),
            "Loaded facet configuration"
        );
        Ok(config)
    }
}

/// Facet configuration of one index as written in a configuration document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FacetDocument {
    #[serde(default, alias = "aggs")]
    aggregations: Map<String, Value>,
    #[serde(default, alias = "filters")]
    query_filters: Map<String, Value>,
    #[serde(default)]
    post_filters: Map<String, Value>,
}

/// A built-in filter as written in a configuration document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
enum FilterSpec {
    Terms {
        field: String,
    },
    Range {
        field: String,
        #[serde(default)]
        start_date_math: Option<String>,
        #[serde(default)]
        end_date_math: Option<String>,
        #[serde(default)]
        options: Map<String, Value>,
    },
}

impl FilterSpec {
    fn into_definition(self) -> FilterDefinition {
        match self {
            FilterSpec::Terms { field } => TermsFilter::new(field).into(),
            FilterSpec::Range {
                field,
                start_date_math,
                end_date_math,
                options,
            } => {
                let mut filter = RangeFilter::new(field).with_options(options);
                if let Some(math) = start_date_math {
                    filter = filter.with_start_date_math(math);
                }
                if let Some(math) = end_date_math {
                    filter = filter.with_end_date_math(math);
                }
                filter.into()
            }
        }
    }
}

fn parse_filters(
    index: &str,
    specs: Map<String, Value>,
) -> FacetResult<Vec<(String, FilterDefinition)>> {
    specs
        .into_iter()
        .map(|(name, spec)| {
            let spec: FilterSpec = serde_json::from_value(spec).map_err(|e| {
                FacetError::config(format!("index '{}', filter '{}': {}", index, name, e))
            })?;
            Ok((name, spec.into_definition()))
        })
        .collect()
}

impl FacetDocument {
    fn into_config(self, index: &str) -> FacetResult<FacetConfig> {
        Ok(FacetConfig {
            aggregations: self
                .aggregations
                .into_iter()
                .map(|(name, body)| (name, AggregationDef::Concrete(body)))
                .collect(),
            query_filters: parse_filters(index, self.query_filters)?,
            post_filters: parse_filters(index, self.post_filters)?,
        })
    }
}
