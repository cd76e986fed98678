//! Concurrent listing tests.
//!
//! Uses wiremock to serve a paginated work package collection and checks
//! how pages are fanned out and merged back together.

use std::time::Duration;

use openproject::{
    auto_page_turn, auto_page_turn_with, Auth, Collection, FailurePolicy, FilterOptions, List,
    OpenProjectClient, OpenProjectError, PageTurnOptions, SearchOperator, WorkPackage,
    WorkPackageQuery,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOTAL: u64 = 25;

/// Collection document for one page of `TOTAL` work packages.
fn page_json(offset: u32, page_size: u32) -> serde_json::Value {
    let first = u64::from(offset - 1) * u64::from(page_size) + 1;
    let last = (first + u64::from(page_size) - 1).min(TOTAL);
    let elements: Vec<serde_json::Value> = (first..=last)
        .map(|id| {
            serde_json::json!({
                "_type": "WorkPackage",
                "id": id,
                "subject": format!("Task {id}"),
                "lockVersion": 0
            })
        })
        .collect();

    serde_json::json!({
        "_type": "WorkPackageCollection",
        "total": TOTAL,
        "count": elements.len(),
        "pageSize": page_size,
        "offset": offset,
        "_embedded": { "elements": elements }
    })
}

async fn mount_page(server: &MockServer, offset: u32, page_size: u32, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("pageSize", page_size.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(offset, page_size))
                .set_delay(delay),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> OpenProjectClient {
    OpenProjectClient::new(&server.uri(), Auth::api_key("test-key")).unwrap()
}

fn ids(collection: &Collection<WorkPackage>) -> Vec<u64> {
    collection.iter().map(|wp| wp.id).collect()
}

async fn turn_pages(
    client: &OpenProjectClient,
    options: PageTurnOptions,
) -> openproject::Result<openproject::PageTurn<Collection<WorkPackage>>> {
    let client = client.clone();
    auto_page_turn_with(WorkPackageQuery::default(), options, move |query, offset, page_size| {
        let client = client.clone();
        async move { WorkPackage::list_page(&client, &query, offset, page_size).await }
    })
    .await
}

#[tokio::test]
async fn test_all_pages_are_merged_in_order() {
    let server = MockServer::start().await;
    // Later pages answer first.
    mount_page(&server, 1, 10, Duration::ZERO).await;
    mount_page(&server, 2, 10, Duration::from_millis(300)).await;
    mount_page(&server, 3, 10, Duration::ZERO).await;

    let turn = turn_pages(&client(&server), PageTurnOptions::new(10)).await.unwrap();

    assert!(turn.is_complete());
    let merged = turn.into_result();
    assert_eq!(ids(&merged), (1..=TOTAL).collect::<Vec<_>>());
    assert_eq!(merged.total, TOTAL);
    assert_eq!(merged.count as u64, TOTAL);
}

#[tokio::test]
async fn test_single_page_listing_makes_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 50, Duration::ZERO).await;

    let merged = turn_pages(&client(&server), PageTurnOptions::new(50))
        .await
        .unwrap()
        .into_result();

    assert_eq!(merged.len() as u64, TOTAL);
    // wiremock verifies that no second page was requested
}

#[tokio::test]
async fn test_list_all_uses_large_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, openproject::LIST_ALL_PAGE_SIZE, Duration::ZERO).await;

    let all = WorkPackage::list_all(&client(&server), &WorkPackageQuery::default())
        .await
        .unwrap();

    assert_eq!(all.len() as u64, TOTAL);
}

#[tokio::test]
async fn test_first_page_failure_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "_type": "Error",
            "errorIdentifier": "urn:openproject-org:api:v3:errors:MissingPermission",
            "message": "You are not authorized to access this resource."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(2, 10)))
        .expect(0)
        .mount(&server)
        .await;

    let err = turn_pages(&client(&server), PageTurnOptions::new(10))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(err.to_string().contains("not authorized"));
}

#[tokio::test]
async fn test_failed_page_is_left_out() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 10, Duration::ZERO).await;
    mount_page(&server, 3, 10, Duration::ZERO).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let turn = turn_pages(&client(&server), PageTurnOptions::new(10)).await.unwrap();

    assert_eq!(turn.failures.len(), 1);
    assert_eq!(turn.failures[0].page, 2);
    assert_eq!(turn.failures[0].error.status_code(), Some(500));

    let merged = turn.into_result();
    let expected: Vec<u64> = (1..=10).chain(21..=TOTAL).collect();
    assert_eq!(ids(&merged), expected);
    assert_eq!(merged.total, TOTAL);
    assert_eq!(merged.count, 15);
}

#[tokio::test]
async fn test_fail_fast_reports_the_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 10, Duration::ZERO).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/work_packages"))
        .and(query_param("offset", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(3, 10)))
        .mount(&server)
        .await;

    let options = PageTurnOptions::new(10).with_policy(FailurePolicy::FailFast);
    let err = turn_pages(&client(&server), options).await.unwrap_err();

    match err {
        OpenProjectError::PageFailed { page, source } => {
            assert_eq!(page, 2);
            assert!(matches!(
                *source,
                OpenProjectError::RateLimited {
                    retry_after_secs: Some(30)
                }
            ));
        }
        other => panic!("Expected PageFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_filters_reach_every_page() {
    let server = MockServer::start().await;
    let filters = FilterOptions::new().with("status", SearchOperator::Equal, "1");
    let encoded = filters.to_query_value().unwrap();

    for offset in 1..=3 {
        Mock::given(method("GET"))
            .and(path("/api/v3/projects/demo/work_packages"))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("filters", encoded.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(offset, 10)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    let query = WorkPackageQuery::from(filters).in_project("demo");
    let merged = auto_page_turn(query, 10, move |query: WorkPackageQuery, offset, page_size| {
        let client = client.clone();
        async move { WorkPackage::list_page(&client, &query, offset, page_size).await }
    })
    .await
    .unwrap();

    assert_eq!(merged.len() as u64, TOTAL);
}

#[tokio::test]
async fn test_zero_page_size_uses_default() {
    let server = MockServer::start().await;
    mount_page(&server, 1, openproject::DEFAULT_PAGE_SIZE, Duration::ZERO).await;
    mount_page(&server, 2, openproject::DEFAULT_PAGE_SIZE, Duration::ZERO).await;
    mount_page(&server, 3, openproject::DEFAULT_PAGE_SIZE, Duration::ZERO).await;

    let merged = turn_pages(&client(&server), PageTurnOptions::new(0))
        .await
        .unwrap()
        .into_result();

    assert_eq!(merged.len() as u64, TOTAL);
}

#[tokio::test]
async fn test_cancelled_listing_stops() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 10, Duration::ZERO).await;

    for offset in 2..=3 {
        Mock::given(method("GET"))
            .and(path("/api/v3/work_packages"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(offset, 10))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
    }

    let token = tokio_util::sync::CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let options = PageTurnOptions::new(10).with_cancellation(token);
    let started = std::time::Instant::now();
    let err = turn_pages(&client(&server), options).await.unwrap_err();

    assert!(matches!(err, OpenProjectError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(4));
}
