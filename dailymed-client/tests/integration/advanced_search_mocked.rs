//! End-to-end advanced search against a mocked DailyMed server
//!
//! The query stage hits `/spls.json`, then each candidate's `/spls/{id}.xml`
//! is fetched and filtered.

use std::time::Duration;

use dailymed_client::{
    AdvancedSearch, ClientConfig, DailyMedClient, DailyMedError, FilterAxis, FilterCriteria,
    Outcome, SearchCriteria, SplQuery,
};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLET_XML: &str = include_str!("../fixtures/ibuprofen_tablet.xml");
const GEL_XML: &str = include_str!("../fixtures/ibuprofen_gel.xml");
const COMBINATION_XML: &str = include_str!("../fixtures/combination_multi_route.xml");

const TABLET_ID: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";
const GEL_ID: &str = "b2c3d4e5-f6a7-8901-bcde-f12345678901";
const COMBINATION_ID: &str = "c3d4e5f6-a7b8-9012-cdef-123456789012";
const MISSING_ID: &str = "e5f6a7b8-c9d0-1234-ef01-345678901234";

fn create_mock_client(mock_server: &MockServer) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0);

    DailyMedClient::with_config(config)
}

fn search_body(rows: &[(&str, &str)]) -> String {
    let data: Vec<String> = rows
        .iter()
        .map(|(id, title)| format!(r#"{{"setid": "{id}", "title": "{title}", "spl_version": 1}}"#))
        .collect();
    format!(
        r#"{{"metadata": {{"total_elements": {}, "current_page": 1, "total_pages": 1}}, "data": [{}]}}"#,
        rows.len(),
        data.join(",")
    )
}

async fn setup_search_mock(mock_server: &MockServer, rows: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .and(query_param("drug_name", "ibuprofen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(search_body(rows))
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn setup_document_mock(mock_server: &MockServer, set_id: &str, xml: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/spls/{set_id}.xml")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(xml.to_string())
                .insert_header("content-type", "application/xml"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_oral_tablet_search() {
    let mock_server = MockServer::start().await;

    setup_search_mock(
        &mock_server,
        &[
            (TABLET_ID, "IBUPROFEN TABLETS"),
            (GEL_ID, "IBUPROFEN GEL"),
            (MISSING_ID, "IBUPROFEN WITHDRAWN"),
        ],
    )
    .await;
    setup_document_mock(&mock_server, TABLET_ID, TABLET_XML).await;
    setup_document_mock(&mock_server, GEL_ID, GEL_XML).await;
    // MISSING_ID has no mock, so the server answers 404

    let filters = FilterCriteria::builder()
        .route("ORAL")
        .forms(["TABLET", "CAPSULE"])
        .build();
    let report = AdvancedSearch::new(create_mock_client(&mock_server))
        .run(&SearchCriteria::by_drug_name("ibuprofen", filters))
        .await
        .expect("advanced search should succeed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.total_remote_results, Some(3));
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.filtered_count(), 1);
    assert_eq!(report.fetch_failed_count(), 1);
    assert_eq!(report.unprocessed, 0);

    assert_eq!(report.records[0].candidate_id.as_str(), TABLET_ID);
    assert_eq!(report.records[0].display_name, "IBUPROFEN TABLETS");
    match &report.records[0].outcome {
        Outcome::Passed {
            active_ingredients, ..
        } => assert_eq!(active_ingredients, &vec!["ibuprofen".to_string()]),
        other => panic!("expected PASSED, got {other:?}"),
    }

    match &report.records[1].outcome {
        Outcome::Filtered {
            reason,
            failed_axes,
        } => {
            assert_eq!(*reason, FilterAxis::Route);
            assert_eq!(failed_axes, &vec![FilterAxis::Route, FilterAxis::Form]);
        }
        other => panic!("expected FILTERED, got {other:?}"),
    }

    assert!(report.records[2].is_fetch_failed());
}

#[tokio::test]
#[traced_test]
async fn test_ingredient_filters() {
    let mock_server = MockServer::start().await;

    setup_search_mock(
        &mock_server,
        &[
            (TABLET_ID, "IBUPROFEN TABLETS"),
            (COMBINATION_ID, "HYDROCODONE AND ACETAMINOPHEN"),
        ],
    )
    .await;
    setup_document_mock(&mock_server, TABLET_ID, TABLET_XML).await;
    setup_document_mock(&mock_server, COMBINATION_ID, COMBINATION_XML).await;

    let client = create_mock_client(&mock_server);

    // Only-active demands the exact active set, so the combination is filtered
    let filters = FilterCriteria::builder()
        .only_active(["Ibuprofen"])
        .exclude_inactive(["benzene"])
        .build();
    let report = AdvancedSearch::new(client)
        .with_concurrency(1)
        .run(&SearchCriteria::by_drug_name("ibuprofen", filters))
        .await
        .expect("advanced search should succeed");

    assert_eq!(report.passed_count(), 1);
    assert!(report.records[0].is_passed());
    match &report.records[1].outcome {
        Outcome::Filtered { reason, .. } => assert_eq!(*reason, FilterAxis::OnlyActive),
        other => panic!("expected FILTERED, got {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_report_serialization() {
    let mock_server = MockServer::start().await;

    setup_search_mock(&mock_server, &[(GEL_ID, "IBUPROFEN GEL")]).await;
    setup_document_mock(&mock_server, GEL_ID, GEL_XML).await;

    let report = AdvancedSearch::new(create_mock_client(&mock_server))
        .run(&SearchCriteria::by_drug_name(
            "ibuprofen",
            FilterCriteria::builder().exclude_inactive(["Carbomer 940"]).build(),
        ))
        .await
        .expect("advanced search should succeed");

    let json = serde_json::to_value(&report).expect("report should serialize");
    let record = &json["records"][0];
    assert_eq!(record["candidate_id"], GEL_ID);
    assert_eq!(record["outcome"], "FILTERED");
    assert_eq!(record["detail"]["reason"], "exclude-inactive");
}

#[tokio::test]
#[traced_test]
async fn test_query_failure_aborts_without_detail_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .mount(&mock_server)
        .await;

    let err = AdvancedSearch::new(create_mock_client(&mock_server))
        .run(&SearchCriteria::by_drug_name("ibuprofen", FilterCriteria::none()))
        .await
        .unwrap_err();

    assert!(matches!(err, DailyMedError::RemoteRejected { status: 400, .. }));
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_deadline_reports_unprocessed_candidates() {
    let mock_server = MockServer::start().await;

    setup_search_mock(
        &mock_server,
        &[(TABLET_ID, "IBUPROFEN TABLETS"), (GEL_ID, "IBUPROFEN GEL")],
    )
    .await;
    setup_document_mock(&mock_server, TABLET_ID, TABLET_XML).await;
    Mock::given(method("GET"))
        .and(path(format!("/spls/{GEL_ID}.xml")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(GEL_XML)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let report = AdvancedSearch::new(create_mock_client(&mock_server))
        .with_concurrency(1)
        .with_timeout(Duration::from_secs(1))
        .run(&SearchCriteria::new(
            SplQuery::new().drug_name("ibuprofen"),
            FilterCriteria::none(),
        ))
        .await
        .expect("partial results are not an error");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].candidate_id.as_str(), TABLET_ID);
    assert_eq!(report.unprocessed, 1);
}
