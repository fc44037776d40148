//! Search query seam and an Elasticsearch request body builder.
//!
//! Facet processing only needs three composition primitives from the search
//! engine, captured by [`SearchQuery`]. [`EsSearch`] implements them by
//! accumulating Query DSL and rendering a complete request body.

use serde_json::{Map, Value, json};

/// Composition primitives a search query must expose.
pub trait SearchQuery {
    /// Narrows the result set and every aggregation computed on it.
    fn filter(&mut self, expr: Value);

    /// Narrows only the returned hits; aggregation counts are unaffected.
    fn post_filter(&mut self, expr: Value);

    /// Registers an aggregation under `name`, replacing any previous one.
    fn set_aggregation(&mut self, name: &str, aggregation: Value);
}

/// Elasticsearch search request under construction.
///
/// # Example
///
/// ```
/// use helios_facets::{EsSearch, SearchQuery};
/// use serde_json::json;
///
/// let mut search = EsSearch::new("records");
/// search.filter(json!({ "terms": { "type": ["book"] } }));
/// let body = search.to_body();
/// assert_eq!(body["query"]["bool"]["filter"][0]["terms"]["type"][0], "book");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EsSearch {
    index: String,
    query: Value,
    filters: Vec<Value>,
    post_filters: Vec<Value>,
    aggregations: Map<String, Value>,
}

impl EsSearch {
    /// Creates a `match_all` search on `index`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query: json!({ "match_all": {} }),
            filters: Vec::new(),
            post_filters: Vec::new(),
            aggregations: Map::new(),
        }
    }

    /// Replaces the scoring query that filters are combined with.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    /// The index to search.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Query filters applied so far.
    pub fn filters(&self) -> &[Value] {
        &self.filters
    }

    /// Post filters applied so far.
    pub fn post_filters(&self) -> &[Value] {
        &self.post_filters
    }

    /// Registered aggregations, in registration order.
    pub fn aggregations(&self) -> &Map<String, Value> {
        &self.aggregations
    }

    /// Renders the request body.
    ///
    /// Query filters go into `query.bool.filter`, post filters are ANDed
    /// under `post_filter.bool.filter`, and aggregations under `aggs`.
    /// Empty sections are omitted.
    pub fn to_body(&self) -> Value {
        let query = if self.filters.is_empty() {
            self.query.clone()
        } else {
            json!({
                "bool": {
                    "must": [self.query.clone()],
                    "filter": self.filters,
                }
            })
        };

        let mut body = json!({ "query": query });

        if !self.post_filters.is_empty() {
            body["post_filter"] = json!({ "bool": { "filter": self.post_filters } });
        }

        if !self.aggregations.is_empty() {
            body["aggs"] = Value::Object(self.aggregations.clone());
        }

        body
    }
}

impl SearchQuery for EsSearch {
    fn filter(&mut self, expr: Value) {
        self.filters.push(expr);
    }

    fn post_filter(&mut self, expr: Value) {
        self.post_filters.push(expr);
    }

    fn set_aggregation(&mut self, name: &str, aggregation: Value) {
        self.aggregations.insert(name.to_string(), aggregation);
    }
}
