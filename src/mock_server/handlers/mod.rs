//! HTTP request handlers for the mock server.

pub mod jobs;
pub mod organizations;
pub mod service_instances;
pub mod spaces;

pub use jobs::*;
pub use organizations::*;
pub use service_instances::*;
pub use spaces::*;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::mock_server::state::MockState;
use crate::query::DEFAULT_RESULTS_PER_PAGE;
use crate::PaginatedResponse;

/// Paging and filter parameters of a v2 list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub results_per_page: u32,
    /// Value of a `q=name:<value>` filter.
    pub name: Option<String>,
}

impl ListParams {
    /// Parse raw query pairs; `q` may repeat.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self {
            page: 1,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            name: None,
        };
        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = value.parse().unwrap_or(1).max(1),
                "results-per-page" => {
                    params.results_per_page =
                        value.parse().unwrap_or(DEFAULT_RESULTS_PER_PAGE).max(1)
                }
                "q" => {
                    if let Some(name) = value.strip_prefix("name:") {
                        params.name = Some(name.to_string());
                    }
                }
                _ => {}
            }
        }
        params
    }
}

/// Cut one page out of `items` and wrap it in the v2 list envelope.
pub fn paginate<T, R, F>(
    items: &[&T],
    params: &ListParams,
    path: &str,
    to_resource: F,
) -> PaginatedResponse<R>
where
    F: Fn(&T) -> R,
{
    let per_page = params.results_per_page as usize;
    let total = items.len();
    let total_pages = total.div_ceil(per_page) as u32;

    let start = (params.page as usize - 1) * per_page;
    let resources = items
        .iter()
        .skip(start)
        .take(per_page)
        .map(|item| to_resource(item))
        .collect();

    let link = |page: u32| {
        format!(
            "{path}?order-direction=asc&page={page}&results-per-page={}",
            params.results_per_page
        )
    };

    PaginatedResponse {
        total_results: Some(total as u64),
        total_pages: Some(total_pages),
        prev_url: (params.page > 1).then(|| link(params.page - 1)),
        next_url: (params.page < total_pages).then(|| link(params.page + 1)),
        resources,
    }
}

/// A v2 error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u32,
    pub description: String,
    pub error_code: String,
}

/// Build a v2 error response.
pub fn error_response(status: StatusCode, code: u32, error_code: &str, description: String) -> Response {
    (
        status,
        Json(ErrorBody {
            code,
            description,
            error_code: error_code.to_string(),
        }),
    )
        .into_response()
}

/// Reject the request if the state requires a token the request lacks.
pub fn check_auth(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(ref token) = state.required_token else {
        return Ok(());
    };
    let expected = format!("Bearer {token}");
    let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            1000,
            "CF-InvalidAuthToken",
            "Invalid Auth Token".to_string(),
        ))
    }
}
