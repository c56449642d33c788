//! Query parameters for list endpoints.
//!
//! The v2 API filters listings with repeated `q` parameters of the form
//! `<field><operator><value>`, e.g. `q=name:dev`. [`ListQuery`] collects
//! those filters together with paging and ordering options and renders them
//! as query pairs for the HTTP client.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Default number of results requested per page.
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 50;

/// Filter operators understood by the v2 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equal,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
}

impl FilterOperator {
    fn as_str(self) -> &'static str {
        match self {
            Self::Equal => ":",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::In => " IN ",
        }
    }
}

/// A single server-side filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl Filter {
    /// `field:value`
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Equal,
            values: vec![value.into()],
        }
    }

    /// `field IN a,b,c`
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            operator: FilterOperator::In,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.field,
            self.operator.as_str(),
            self.values.join(",")
        )
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters, paging and ordering for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Server-side filters, combined with AND.
    pub filters: Vec<Filter>,
    /// Page size; the server default applies when unset.
    pub results_per_page: Option<u32>,
    /// Sort direction.
    pub order_direction: Option<OrderDirection>,
}

impl ListQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Shorthand for an equality filter on `name`.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.filter(Filter::eq("name", name))
    }

    /// Set the page size.
    #[must_use]
    pub fn results_per_page(mut self, count: u32) -> Self {
        self.results_per_page = Some(count);
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub fn order_direction(mut self, direction: OrderDirection) -> Self {
        self.order_direction = Some(direction);
        self
    }

    /// Render the query for a specific page as `(key, value)` pairs.
    ///
    /// Filters become repeated `q` pairs, which a map-shaped serializer
    /// cannot express.
    #[must_use]
    pub fn pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> =
            self.filters.iter().map(|f| ("q", f.to_string())).collect();
        pairs.push(("page", page.to_string()));
        pairs.push((
            "results-per-page",
            self.results_per_page
                .unwrap_or(DEFAULT_RESULTS_PER_PAGE)
                .to_string(),
        ));
        if let Some(direction) = self.order_direction {
            pairs.push(("order-direction", direction.as_str().to_string()));
        }
        pairs
    }
}

/// Serializes as the sequence of rendered filters.
impl Serialize for ListQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.filters.len()))?;
        for filter in &self.filters {
            seq.serialize_element(filter)?;
        }
        seq.end()
    }
}
