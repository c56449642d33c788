//! Response envelopes shared by every resource type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::pagination::Page;

/// Resource metadata returned by the v2 API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// The resource GUID.
    pub guid: String,

    /// The resource URL path (e.g., "/v2/spaces/<guid>").
    #[serde(default)]
    pub url: Option<String>,

    /// When the resource was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the resource was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A v2 resource: metadata plus a type-specific entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<E> {
    pub metadata: Metadata,
    pub entity: E,
}

impl<E> Resource<E> {
    /// The resource GUID.
    pub fn id(&self) -> &str {
        &self.metadata.guid
    }
}

/// A resource that can be looked up by name.
pub trait Named {
    /// The resource GUID.
    fn id(&self) -> &str;

    /// The resource name.
    fn name(&self) -> &str;
}

/// A page of v2 resources as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<R> {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<R>,
}

impl<R> PaginatedResponse<R> {
    /// Convert into a [`Page`], given the page number that was requested.
    ///
    /// The reported page count decides whether another page follows; when
    /// the server omits it, `next_url` is used instead.
    pub fn into_page(self, page: u32) -> Page<R> {
        let result = match self.total_pages {
            Some(total_pages) => Page::new(self.resources, page, Some(total_pages)),
            None => {
                let next = self.next_url.as_deref().and_then(page_from_href);
                Page::with_next(self.resources, page, next)
            }
        };
        result.total_results(self.total_results)
    }
}

/// A link object in v3 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Pagination block of a v3 list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub next: Option<Link>,
    #[serde(default)]
    pub previous: Option<Link>,
}

/// A page of v3 resources as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponseV3<R> {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default = "Vec::new")]
    pub resources: Vec<R>,
}

impl<R> PaginatedResponseV3<R> {
    /// Convert into a [`Page`]. The next cursor comes from `pagination.next`.
    pub fn into_page(self, page: u32) -> Page<R> {
        let next = self
            .pagination
            .next
            .as_ref()
            .and_then(|link| page_from_href(&link.href));
        let mut result = Page::with_next(self.resources, page, next);
        result.total_pages = self.pagination.total_pages;
        result.total_results(self.pagination.total_results)
    }
}

/// Extract the `page` query parameter from an absolute or relative link.
pub(crate) fn page_from_href(href: &str) -> Option<u32> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(href).ok()?
        }
        Err(_) => return None,
    };
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_page_from_href() {
        assert_eq!(
            page_from_href("/v2/organizations?order-direction=asc&page=2&results-per-page=50"),
            Some(2)
        );
        assert_eq!(
            page_from_href("https://api.example.com/v3/spaces?page=7&per_page=10"),
            Some(7)
        );
        assert_eq!(page_from_href("/v2/organizations"), None);
    }

    #[test]
    fn test_v2_response_into_page() {
        let response: PaginatedResponse<Resource<Named>> = serde_json::from_value(serde_json::json!({
            "total_results": 5,
            "total_pages": 3,
            "prev_url": null,
            "next_url": "/v2/spaces?page=2&results-per-page=2",
            "resources": [
                { "metadata": { "guid": "s1", "url": "/v2/spaces/s1", "created_at": "2016-06-08T16:41:33Z" }, "entity": { "name": "dev" } },
                { "metadata": { "guid": "s2" }, "entity": { "name": "prod" } }
            ]
        }))
        .unwrap();

        let page = response.into_page(1);
        assert_eq!(page.len(), 2);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.total_results, Some(5));
        assert_eq!(page.items[0].id(), "s1");
        assert_eq!(page.items[1].entity.name, "prod");
    }

    #[test]
    fn test_v2_response_without_total_pages_uses_next_url() {
        let response: PaginatedResponse<Resource<Named>> = serde_json::from_value(serde_json::json!({
            "next_url": "/v2/spaces?page=4",
            "resources": []
        }))
        .unwrap();

        assert_eq!(response.into_page(3).next, Some(4));
    }

    #[test]
    fn test_v3_response_into_page() {
        let response: PaginatedResponseV3<Named> = serde_json::from_value(serde_json::json!({
            "pagination": {
                "total_results": 3,
                "total_pages": 2,
                "first": { "href": "https://api.example.com/v3/organizations?page=1&per_page=2" },
                "next": { "href": "https://api.example.com/v3/organizations?page=2&per_page=2" },
                "previous": null
            },
            "resources": [ { "name": "a" }, { "name": "b" } ]
        }))
        .unwrap();

        let page = response.into_page(1);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.total_pages, Some(2));

        let last: PaginatedResponseV3<Named> = serde_json::from_value(serde_json::json!({
            "pagination": { "total_results": 3, "total_pages": 2, "next": null },
            "resources": [ { "name": "c" } ]
        }))
        .unwrap();
        assert!(!last.into_page(2).has_more());
    }
}
