//! List execution tests.
//!
//! Uses wiremock to stand in for the cloud controller.

use cfops::{CfClient, CfError, ErrorKind, List, ListQuery, Organization, ServiceInstance, Space};
use futures::TryStreamExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn org_resource(guid: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "metadata": {
            "guid": guid,
            "url": format!("/v2/organizations/{guid}"),
            "created_at": "2024-01-15T10:30:00Z"
        },
        "entity": { "name": name, "status": "active" }
    })
}

fn org_page(
    total_results: u64,
    total_pages: u32,
    next_url: Option<&str>,
    resources: Vec<serde_json::Value>,
) -> serde_json::Value {
    serde_json::json!({
        "total_results": total_results,
        "total_pages": total_pages,
        "prev_url": null,
        "next_url": next_url,
        "resources": resources
    })
}

#[tokio::test]
async fn test_list_organizations_returns_page() {
    let mock_server = MockServer::start().await;

    let response = org_page(
        2,
        1,
        None,
        vec![org_resource("org-1", "alpha"), org_resource("org-2", "beta")],
    );

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("page", "1"))
        .and(query_param("results-per-page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let page = Organization::list_page(&client, &(), &ListQuery::new(), 1)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "alpha");
    assert_eq!(page.items[1].id, "org-2");
    assert_eq!(page.total_results, Some(2));
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_list_sends_name_filter_and_page_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("q", "name:alpha"))
        .and(query_param("results-per-page", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(org_page(1, 1, None, vec![org_resource("org-1", "alpha")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let query = ListQuery::new().name("alpha").results_per_page(10);
    let page = Organization::list_page(&client, &(), &query, 1)
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_list_all_follows_every_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(org_page(
            3,
            2,
            Some("/v2/organizations?page=2&results-per-page=2"),
            vec![org_resource("org-1", "a"), org_resource("org-2", "b")],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(org_page(
            3,
            2,
            None,
            vec![org_resource("org-3", "c")],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let all = Organization::list_all(&client, &(), &ListQuery::new().results_per_page(2))
        .await
        .unwrap();

    let names: Vec<_> = all.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_stream_stops_at_first_failing_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(org_page(
            4,
            2,
            Some("/v2/organizations?page=2"),
            vec![org_resource("org-1", "a"), org_resource("org-2", "b")],
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let mut stream = Organization::stream(client, (), ListQuery::new());

    assert_eq!(stream.try_next().await.unwrap().unwrap().name, "a");
    assert_eq!(stream.try_next().await.unwrap().unwrap().name, "b");
    let err = stream.try_next().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(stream.try_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_spaces_is_scoped_to_organization() {
    let mock_server = MockServer::start().await;

    let response = serde_json::json!({
        "total_results": 1,
        "total_pages": 1,
        "resources": [{
            "metadata": { "guid": "space-1" },
            "entity": {
                "name": "dev",
                "organization_guid": "org-1",
                "allow_ssh": true
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/v2/organizations/org-1/spaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let spaces: Vec<Space> = Space::stream(client, "org-1".to_string(), ListQuery::new())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].organization_id.as_deref(), Some("org-1"));
    assert!(spaces[0].allow_ssh);
}

#[tokio::test]
async fn test_list_service_instances_includes_user_provided() {
    let mock_server = MockServer::start().await;

    let response = serde_json::json!({
        "total_results": 2,
        "total_pages": 1,
        "resources": [
            {
                "metadata": { "guid": "si-1" },
                "entity": { "name": "db", "type": "managed_service_instance" }
            },
            {
                "metadata": { "guid": "si-2" },
                "entity": { "name": "creds", "type": "user_provided_service_instance" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/spaces/space-1/service_instances"))
        .and(query_param("return_user_provided_service_instances", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let page = ServiceInstance::list_page(&client, &"space-1".to_string(), &ListQuery::new(), 1)
        .await
        .unwrap();

    assert!(!page.items[0].is_user_provided());
    assert!(page.items[1].is_user_provided());
}

#[tokio::test]
async fn test_api_error_body_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": 10003,
            "description": "You are not authorized to perform the requested action",
            "error_code": "CF-NotAuthorized"
        })))
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Organization::list_page(&client, &(), &ListQuery::new(), 1)
        .await
        .unwrap_err();

    match err {
        CfError::ApiError {
            message,
            status_code,
            error_code,
        } => {
            assert_eq!(status_code, Some(403));
            assert_eq!(error_code.as_deref(), Some("CF-NotAuthorized"));
            assert!(message.contains("not authorized"));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_v3_error_body_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "errors": [{
                "code": 10010,
                "title": "CF-ResourceNotFound",
                "detail": "Organization not found"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Organization::list_page(&client, &(), &ListQuery::new(), 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CfError::ApiError { ref error_code, .. } if error_code.as_deref() == Some("CF-ResourceNotFound")
    ));
    assert_eq!(
        err.to_string(),
        "Cloud Foundry API error: Organization not found"
    );
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = CfClient::new("test-token", &mock_server.uri()).unwrap();
    let err = Organization::list_page(&client, &(), &ListQuery::new(), 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CfError::RateLimited {
            retry_after_secs: Some(7)
        }
    ));
}
