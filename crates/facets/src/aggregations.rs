//! Aggregation definitions and selection.
//!
//! An aggregation is either a concrete Elasticsearch aggregation body or a
//! lazy producer that builds one on demand. Lazy producers run once per
//! selection and are never memoized, so each request gets a fresh body.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A configured aggregation.
#[derive(Clone)]
pub enum AggregationDef {
    /// A ready-made aggregation body.
    Concrete(Value),
    /// A producer invoked each time the aggregation is selected.
    Lazy(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl AggregationDef {
    /// Wraps a producer as a lazy definition.
    pub fn lazy(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        AggregationDef::Lazy(Arc::new(producer))
    }

    /// Returns the concrete aggregation body, invoking the producer if lazy.
    pub fn resolve(&self) -> Value {
        match self {
            AggregationDef::Concrete(body) => body.clone(),
            AggregationDef::Lazy(producer) => producer(),
        }
    }
}

impl From<Value> for AggregationDef {
    fn from(body: Value) -> Self {
        AggregationDef::Concrete(body)
    }
}

impl fmt::Debug for AggregationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationDef::Concrete(body) => f.debug_tuple("Concrete").field(body).finish(),
            AggregationDef::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Resolves the aggregations to attach to a query.
///
/// With no requested names every configured aggregation is returned. Otherwise
/// only configured aggregations whose name was requested are returned; unknown
/// names are ignored. Output follows configuration order either way.
pub fn select_aggregations<S: AsRef<str>>(
    all: &[(String, AggregationDef)],
    requested: &[S],
) -> Vec<(String, Value)> {
    all.iter()
        .filter(|(name, _)| {
            requested.is_empty() || requested.iter().any(|r| r.as_ref() == name.as_str())
        })
        .map(|(name, def)| (name.clone(), def.resolve()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn configured() -> Vec<(String, AggregationDef)> {
        ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                (
                    name.to_string(),
                    AggregationDef::from(json!({ "terms": { "field": name } })),
                )
            })
            .collect()
    }

    fn names(selected: &[(String, Value)]) -> Vec<&str> {
        selected.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn test_empty_request_selects_all_in_order() {
        let selected = select_aggregations::<&str>(&configured(), &[]);
        assert_eq!(names(&selected), vec!["a", "b", "c"]);
        assert_eq!(selected[1].1, json!({ "terms": { "field": "b" } }));
    }

    #[test]
    fn test_requested_subset() {
        let selected = select_aggregations(&configured(), &["b"]);
        assert_eq!(names(&selected), vec!["b"]);
    }

    #[test]
    fn test_subset_keeps_configuration_order() {
        let selected = select_aggregations(&configured(), &["c", "a"]);
        assert_eq!(names(&selected), vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_name_yields_nothing() {
        let selected = select_aggregations(&configured(), &["z"]);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_lazy_resolved_once_per_selection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let all = vec![(
            "lazy".to_string(),
            AggregationDef::lazy(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                json!({ "max": { "field": "year" } })
            }),
        )];

        let first = select_aggregations::<&str>(&all, &[]);
        assert_eq!(first[0].1, json!({ "max": { "field": "year" } }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        select_aggregations::<&str>(&all, &[]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unselected_lazy_not_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut all = configured();
        all.push((
            "lazy".to_string(),
            AggregationDef::lazy(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Value::Null
            }),
        ));

        select_aggregations(&all, &["a"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
