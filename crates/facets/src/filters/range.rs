//! Range filter factory.
//!
//! Range values use the compact `start--end` syntax:
//!
//! | Value | Range |
//! |-------|-------|
//! | `2000--2020` | `gte 2000`, `lte 2020` |
//! | `>2000--<2020` | `gt 2000`, `lt 2020` |
//! | `2000--` | `gte 2000` |
//! | `--<2020` | `lt 2020` |
//!
//! Exactly one `--` is required and the bare value `--` is rejected. When a
//! date-math anchor is configured for a side, it is appended to that bound
//! with `||` (e.g. `2020-01-01||/d`) so Elasticsearch resolves it.

use serde_json::{Map, Value, json};

use super::FilterFactory;
use crate::error::{FacetError, FacetResult, INVALID_RANGE_FORMAT};

const SEPARATOR: &str = "--";
const STRICT_LOWER: char = '>';
const STRICT_UPPER: char = '<';

/// One end of a parsed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeBound {
    /// Exclusive bound (`gt` / `lt`).
    Strict(String),
    /// Inclusive bound (`gte` / `lte`).
    NonStrict(String),
}

impl RangeBound {
    fn parse(token: &str, marker: char) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        Some(match token.strip_prefix(marker) {
            Some(value) => RangeBound::Strict(value.to_string()),
            None => RangeBound::NonStrict(token.to_string()),
        })
    }

    /// The bound value without its strictness marker.
    pub fn value(&self) -> &str {
        match self {
            RangeBound::Strict(v) | RangeBound::NonStrict(v) => v,
        }
    }

    /// Returns true for an exclusive bound.
    pub fn is_strict(&self) -> bool {
        matches!(self, RangeBound::Strict(_))
    }
}

/// A `start--end` value parsed into its two optional bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeValue {
    /// Lower bound, if the start side was not empty.
    pub lower: Option<RangeBound>,
    /// Upper bound, if the end side was not empty.
    pub upper: Option<RangeBound>,
}

impl RangeValue {
    /// Parses the wire syntax. Returns `None` for malformed input.
    pub fn parse(value: &str) -> Option<Self> {
        if value == SEPARATOR || value.matches(SEPARATOR).count() != 1 {
            return None;
        }
        let (start, end) = value.split_once(SEPARATOR)?;
        Some(Self {
            lower: RangeBound::parse(start, STRICT_LOWER),
            upper: RangeBound::parse(end, STRICT_UPPER),
        })
    }
}

/// Builds a `range` query on one field from a `start--end` request value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeFilter {
    field: String,
    start_date_math: Option<String>,
    end_date_math: Option<String>,
    options: Map<String, Value>,
}

impl RangeFilter {
    /// Creates a range filter on `field` with no date math and no options.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    /// Sets the date-math suffix appended to the lower bound.
    ///
    /// An empty suffix clears the anchor.
    pub fn with_start_date_math(mut self, date_math: impl Into<String>) -> Self {
        self.start_date_math = Self::anchor(date_math.into());
        self
    }

    /// Sets the date-math suffix appended to the upper bound.
    ///
    /// An empty suffix clears the anchor.
    pub fn with_end_date_math(mut self, date_math: impl Into<String>) -> Self {
        self.end_date_math = Self::anchor(date_math.into());
        self
    }

    fn anchor(date_math: String) -> Option<String> {
        Some(date_math).filter(|math| !math.is_empty())
    }

    /// Adds an extra `range` query option, such as `format` or `time_zone`.
    ///
    /// Bound keys computed from the request value take precedence.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Replaces all extra options.
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    /// The indexed field this filter targets.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn invalid(&self) -> FacetError {
        FacetError::validation(&self.field, INVALID_RANGE_FORMAT)
    }

    fn bound_value(value: &str, date_math: Option<&str>) -> String {
        match date_math {
            Some(math) if !math.is_empty() => format!("{}||{}", value, math),
            _ => value.to_string(),
        }
    }

    /// Renders a parsed range as a `range` query.
    pub fn to_query(&self, range: &RangeValue) -> Value {
        let mut args = self.options.clone();

        if let Some(lower) = &range.lower {
            let key = if lower.is_strict() { "gt" } else { "gte" };
            let value = Self::bound_value(lower.value(), self.start_date_math.as_deref());
            args.insert(key.to_string(), json!(value));
        }
        if let Some(upper) = &range.upper {
            let key = if upper.is_strict() { "lt" } else { "lte" };
            let value = Self::bound_value(upper.value(), self.end_date_math.as_deref());
            args.insert(key.to_string(), json!(value));
        }

        json!({ "range": { self.field.as_str(): Value::Object(args) } })
    }
}

/// Creates a range filter on `field`.
pub fn range_filter(field: impl Into<String>) -> RangeFilter {
    RangeFilter::new(field)
}

impl FilterFactory for RangeFilter {
    fn build(&self, values: &[String]) -> FacetResult<Value> {
        let [value] = values else {
            return Err(self.invalid());
        };
        let range = RangeValue::parse(value).ok_or_else(|| self.invalid())?;
        Ok(self.to_query(&range))
    }
}
