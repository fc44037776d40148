//! Filter expression collection.
//!
//! Walks a set of named filter definitions, builds an expression for every
//! filter the request supplies values for, and records the consumed values
//! in the canonical echo.

use serde_json::Value;

use crate::error::FacetResult;
use crate::filters::FilterDefinition;
use crate::params::{CanonicalParams, RequestValues};

/// Builds the filter expressions for `definitions` from `values`.
///
/// Definitions are visited in order. A definition without request values is
/// skipped entirely. The first factory failure is returned as is and nothing
/// from the failing filter reaches `echo`.
pub fn collect_filters(
    definitions: &[(String, FilterDefinition)],
    values: &RequestValues,
    echo: &mut CanonicalParams,
) -> FacetResult<Vec<Value>> {
    let mut filters = Vec::new();

    for (name, definition) in definitions {
        let supplied: Vec<String> = values
            .get_all(name)
            .into_iter()
            .map(str::to_string)
            .collect();
        if supplied.is_empty() {
            continue;
        }

        let expr = definition.build(&supplied).inspect_err(|e| {
            tracing::debug!(filter = %name, error = %e, "Rejected filter value");
        })?;
        filters.push(expr);

        for value in supplied {
            echo.add(name.as_str(), value);
        }
    }

    Ok(filters)
}
