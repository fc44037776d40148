//! End-to-end tests for facet application.
//!
//! These tests drive the public API the way a search endpoint does: build a
//! facet configuration, parse the request query string, apply facets to an
//! Elasticsearch search, and inspect the rendered body and canonical echo.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use helios_facets::{
    DefaultFacetsFactory, EsSearch, FacetConfig, FacetError, FacetResult, FacetsConfig,
    FacetsFactory, FilterDefinition, RequestValues, apply_facets, range_filter, terms_filter,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn records_config() -> FacetsConfig {
    FacetsConfig::new().with_index(
        "records",
        FacetConfig::new()
            .with_aggregation("type", json!({ "terms": { "field": "type" } }))
            .with_aggregation(
                "year",
                json!({ "date_histogram": { "field": "year", "calendar_interval": "year" } }),
            )
            .with_query_filter("type", terms_filter("type"))
            .with_post_filter("year", range_filter("year")),
    )
}

fn apply(config: &FacetsConfig, query: &str) -> FacetResult<(Value, Vec<(String, String)>)> {
    let values = RequestValues::parse(query);
    let (search, echo) = apply_facets(config, EsSearch::new("records"), "records", &values)?;
    let echo = echo
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Ok((search.to_body(), echo))
}

fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

// ============================================================================
// Query and Post Filters
// ============================================================================

#[test]
fn test_query_and_post_filters_end_to_end() {
    let (body, echo) = apply(
        &records_config(),
        "type=book&type=article&year=%3E2000--%3C2020",
    )
    .unwrap();

    assert_eq!(
        body["query"]["bool"]["filter"],
        json!([{ "terms": { "type": ["book", "article"] } }])
    );
    assert_eq!(
        body["post_filter"]["bool"]["filter"],
        json!([{ "range": { "year": { "gt": "2000", "lt": "2020" } } }])
    );
    assert_eq!(
        echo,
        vec![
            pair("type", "book"),
            pair("type", "article"),
            pair("year", ">2000--<2020"),
        ]
    );
}

#[test]
fn test_no_filter_values_means_no_filters() {
    let (body, echo) = apply(&records_config(), "q=rust&page=2").unwrap();

    assert_eq!(body["query"], json!({ "match_all": {} }));
    assert!(body.get("post_filter").is_none());
    assert!(echo.is_empty());
}

#[test]
fn test_post_filter_does_not_touch_query() {
    let (body, _) = apply(&records_config(), "year=2000--").unwrap();

    assert_eq!(body["query"], json!({ "match_all": {} }));
    assert_eq!(
        body["post_filter"]["bool"]["filter"][0]["range"]["year"]["gte"],
        "2000"
    );
}

#[test]
fn test_invalid_range_is_validation_error() {
    for raw in ["year=a--b--c", "year=a", "year=", "year=--", "year=1--&year=2--"] {
        let err = apply(&records_config(), raw).unwrap_err();
        match err {
            FacetError::FilterValidation { field, message } => {
                assert_eq!(field, "year", "input {}", raw);
                assert_eq!(message, "Invalid range format.");
            }
            other => panic!("unexpected error for {}: {:?}", raw, other),
        }
    }
}

#[test]
fn test_unconfigured_index() {
    let values = RequestValues::parse("type=book&facets=type");
    let (search, echo) = apply_facets(
        &records_config(),
        EsSearch::new("authors"),
        "authors",
        &values,
    )
    .unwrap();

    assert_eq!(search.to_body(), json!({ "query": { "match_all": {} } }));
    assert!(echo.is_empty());
}

// ============================================================================
// Aggregation Selection
// ============================================================================

#[test]
fn test_all_aggregations_by_default() {
    let (body, _) = apply(&records_config(), "").unwrap();
    let aggs = body["aggs"].as_object().unwrap();
    let names: Vec<&String> = aggs.keys().collect();
    assert_eq!(names, vec!["type", "year"]);
}

#[test]
fn test_comma_and_repeated_facets_are_equivalent() {
    let config = records_config();
    let (joined, _) = apply(&config, "facets=year,type").unwrap();
    let (repeated, _) = apply(&config, "facets=year&facets=type").unwrap();

    assert_eq!(joined["aggs"], repeated["aggs"]);
    let names: Vec<&String> = joined["aggs"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["type", "year"]);
}

#[test]
fn test_unknown_facet_selects_nothing() {
    let (body, _) = apply(&records_config(), "facets=subject").unwrap();
    assert!(body.get("aggs").is_none());
}

#[test]
fn test_lazy_aggregation_built_per_request() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let config = FacetsConfig::new().with_index(
        "records",
        FacetConfig::new().with_lazy_aggregation("size", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            json!({ "range": { "field": "size", "ranges": [{ "to": 10 }, { "from": 10 }] } })
        }),
    );

    let (first, _) = apply(&config, "").unwrap();
    let (second, _) = apply(&config, "").unwrap();

    assert_eq!(first["aggs"]["size"]["range"]["field"], "size");
    assert_eq!(first, second);
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Custom Filters and Configuration Documents
// ============================================================================

#[test]
fn test_custom_filter_factory() {
    let config = FacetsConfig::new().with_index(
        "records",
        FacetConfig::new().with_query_filter(
            "title",
            FilterDefinition::new(|values: &[String]| -> FacetResult<Value> {
                Ok(json!({ "prefix": { "title": values[0].to_lowercase() } }))
            }),
        ),
    );

    let (body, echo) = apply(&config, "title=Rust").unwrap();
    assert_eq!(
        body["query"]["bool"]["filter"][0],
        json!({ "prefix": { "title": "rust" } })
    );
    assert_eq!(echo, vec![pair("title", "Rust")]);
}

#[test]
fn test_configuration_document() {
    let config = FacetsConfig::from_json_str(
        r#"{
            "records": {
                "aggregations": {
                    "type": { "terms": { "field": "type" } }
                },
                "filters": {
                    "type": { "terms": { "field": "type" } }
                },
                "post_filters": {
                    "created": {
                        "range": {
                            "field": "created",
                            "start_date_math": "/d",
                            "end_date_math": "/d"
                        }
                    }
                }
            }
        }"#,
    )
    .unwrap();

    let (body, echo) = apply(&config, "type=book&created=2020-01-01--%3Cnow").unwrap();
    assert_eq!(
        body["post_filter"]["bool"]["filter"][0],
        json!({ "range": { "created": { "gte": "2020-01-01||/d", "lt": "now||/d" } } })
    );
    assert_eq!(echo.len(), 2);
}

#[test]
fn test_default_factory_shares_config() {
    let factory = DefaultFacetsFactory::new(Arc::new(records_config()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let factory = factory.clone();
            std::thread::spawn(move || {
                let values = RequestValues::parse(&format!("type=t{}", i));
                let (search, echo) = factory
                    .apply(EsSearch::new("records"), "records", &values)
                    .unwrap();
                (search.filters().len(), echo.to_query_string())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (filters, params) = handle.join().unwrap();
        assert_eq!(filters, 1);
        assert_eq!(params, format!("type=t{}", i));
    }
}
