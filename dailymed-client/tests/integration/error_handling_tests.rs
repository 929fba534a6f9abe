//! Error mapping and retry behavior over real HTTP

use std::time::Duration;

use dailymed_client::retry::RetryableError;
use dailymed_client::{
    ClientConfig, DailyMedClient, DailyMedError, DrugNameQuery, RetryConfig, SetId, SplQuery,
};
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_client(mock_server: &MockServer, retries: usize) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
        .with_retry_config(
            RetryConfig::new()
                .with_max_retries(retries)
                .with_initial_delay(Duration::from_millis(10))
                .with_max_delay(Duration::from_millis(50))
                .without_jitter(),
        );

    DailyMedClient::with_config(config)
}

#[tokio::test]
#[traced_test]
async fn test_server_error_maps_to_remote_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 0);
    let err = client
        .search_spls(&SplQuery::new().drug_name("ibuprofen"))
        .await
        .unwrap_err();

    match err {
        DailyMedError::RemoteRejected { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_rate_limit_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 0);
    let err = client.get_drug_names(&DrugNameQuery::new()).await.unwrap_err();
    assert!(matches!(err, DailyMedError::RateLimitExceeded));
}

#[tokio::test]
#[traced_test]
async fn test_transient_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"metadata": {}, "data": [{"drug_name": "IBUPROFEN", "name_type": "G"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 3);
    let page = client
        .get_drug_names(&DrugNameQuery::new())
        .await
        .expect("third attempt should succeed");

    assert_eq!(page.len(), 1);
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 3);
}

#[tokio::test]
#[traced_test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 3);
    let err = client.get_drug_names(&DrugNameQuery::new()).await.unwrap_err();

    assert!(matches!(err, DailyMedError::RemoteRejected { status: 404, .. }));
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_in_band_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"metadata": {"error_message": "Invalid parameter: published_date"}, "data": []}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 0);
    let err = client.search_spls(&SplQuery::new()).await.unwrap_err();

    match err {
        DailyMedError::RemoteRejected { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("published_date"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_malformed_payloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Scheduled maintenance in progress"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server, 0);

    let err = client.search_spls(&SplQuery::new()).await.unwrap_err();
    assert!(matches!(err, DailyMedError::MalformedResponse(_)));

    let err = client.get_drug_names(&DrugNameQuery::new()).await.unwrap_err();
    assert!(matches!(err, DailyMedError::MalformedResponse(_)));
}

#[tokio::test]
#[traced_test]
async fn test_unreachable_host() {
    let config = ClientConfig::new()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2))
        .with_rate_limit(100.0);
    let client = DailyMedClient::with_config(config);

    let set_id = SetId::parse("a1b2c3d4-e5f6-7890-abcd-ef1234567890").unwrap();
    let err = client.get_spl_xml(&set_id).await.unwrap_err();

    assert!(matches!(err, DailyMedError::RemoteUnavailable { .. }));
    assert!(err.is_retryable());
}
