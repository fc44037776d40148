//! Request parameter multimaps.
//!
//! [`RequestValues`] holds the incoming query-string parameters in the order
//! the client sent them, keeping repeated keys. [`CanonicalParams`] is the
//! echo of the filters that were actually applied, used to rebuild
//! pagination and facet navigation links.

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};

/// Ordered multimap of incoming request parameters.
///
/// # Example
///
/// ```
/// use helios_facets::RequestValues;
///
/// let values = RequestValues::parse("type=book&type=article&facets=type,year");
/// assert_eq!(values.get_all("type"), vec!["book", "article"]);
/// assert_eq!(values.get_comma_list("facets"), vec!["type", "year"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestValues {
    pairs: Vec<(String, String)>,
}

impl RequestValues {
    /// Creates request values from ordered `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a raw `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    /// Returns every value supplied for `name`, in request order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns every value for `name`, splitting each on commas.
    ///
    /// `facets=a,b` and `facets=a&facets=b` yield the same list. Empty
    /// segments are dropped, so `facets=` yields an empty list.
    pub fn get_comma_list(&self, name: &str) -> Vec<&str> {
        self.get_all(name)
            .into_iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns an iterator over all pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<S> FromRequestParts<S> for RequestValues
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid query parameters"))?;

        Ok(RequestValues { pairs })
    }
}

/// Ordered multimap of the filter parameters that were applied.
///
/// Only values that were consumed by a successful filter end up here, so
/// links built from it reproduce exactly the active filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalParams {
    pairs: Vec<(String, String)>,
}

impl CanonicalParams {
    /// Creates an empty echo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value for `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Appends all entries of `other`, keeping their order.
    pub fn extend(&mut self, other: CanonicalParams) {
        self.pairs.extend(other.pairs);
    }

    /// Returns every echoed value for `name`.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns an iterator over all pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of echoed values.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if nothing was echoed.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the echo as a query string, e.g. `type=book&year=%3E2000--`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.pairs {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}
