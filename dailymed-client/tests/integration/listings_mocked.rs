//! Paged listing endpoints against a mocked DailyMed server

use dailymed_client::dailymed::query::NameType;
use dailymed_client::{
    ClientConfig, DailyMedClient, DrugClassQuery, DrugNameQuery, NdcQuery, RxcuiQuery, UniiQuery,
};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_client(mock_server: &MockServer) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0);

    DailyMedClient::with_config(config)
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "application/json")
}

#[tokio::test]
#[traced_test]
async fn test_get_drug_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drugnames.json"))
        .and(query_param("manufacturer", "Acme Pharma"))
        .and(query_param("name_type", "g"))
        .respond_with(json(
            r#"{
                "metadata": {"total_elements": 2, "total_pages": 1, "current_page": 1},
                "data": [
                    {"drug_name": "IBUPROFEN", "name_type": "G"},
                    {"drug_name": "NAPROXEN SODIUM", "name_type": "G"}
                ]
            }"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let page = client
        .get_drug_names(
            &DrugNameQuery::new()
                .manufacturer("Acme Pharma")
                .name_type(NameType::Generic),
        )
        .await
        .expect("listing should decode");

    assert_eq!(page.len(), 2);
    assert_eq!(page.items[1].drug_name.as_deref(), Some("NAPROXEN SODIUM"));
    assert_eq!(page.pagination.total_pages, Some(1));
}

#[tokio::test]
#[traced_test]
async fn test_get_ndcs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ndcs.json"))
        .and(query_param("labeler", "Acme Pharma"))
        .and(query_param("pagesize", "2"))
        .respond_with(json(
            r#"{"metadata": {"total_elements": "40", "next_page_url": "https://example.org/ndcs.json?page=2"},
                "data": [{"ndc": "0573-0164-40"}, {"ndc": "0573-0164-30"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let page = client
        .get_ndcs(&NdcQuery::new().labeler("Acme Pharma").pagesize(2))
        .await
        .expect("listing should decode");

    assert_eq!(page.len(), 2);
    assert_eq!(page.pagination.total_elements, Some(40));
    assert!(page.pagination.has_next_page());
}

#[tokio::test]
#[traced_test]
async fn test_get_drug_classes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drugclasses.json"))
        .and(query_param("class_code_type", "epc"))
        .respond_with(json(
            r#"{"metadata": {}, "data": [
                {"code": "N0000175722", "codingSystem": "2.16.840.1.113883.3.26.1.5", "type": "EPC", "name": "Nonsteroidal Anti-inflammatory Drug"}
            ]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let page = client
        .get_drug_classes(&DrugClassQuery::new().class_code_type("epc"))
        .await
        .expect("listing should decode");

    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].class_type.as_deref(), Some("EPC"));
    assert_eq!(
        page.items[0].name.as_deref(),
        Some("Nonsteroidal Anti-inflammatory Drug")
    );
}

#[tokio::test]
#[traced_test]
async fn test_get_uniis_and_rxcuis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/uniis.json"))
        .and(query_param("rxcui", "5640"))
        .respond_with(json(
            r#"{"metadata": {}, "data": [{"unii": "WK2XYI10QM", "active_moiety": "IBUPROFEN"}]}"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rxcuis.json"))
        .and(query_param("rxstring", "ibuprofen"))
        .and(query_param("rxtty", "IN"))
        .respond_with(json(
            r#"{"metadata": {"total_elements": 1}, "data": [{"rxcui": "5640", "rxstring": "ibuprofen", "rxtty": "IN"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let uniis = client
        .get_uniis(&UniiQuery::new().rxcui("5640"))
        .await
        .expect("uniis should decode");
    assert_eq!(uniis.items[0].active_moiety.as_deref(), Some("IBUPROFEN"));

    let concepts = client
        .lookup_rxcuis(&RxcuiQuery::new().rxstring("ibuprofen").rxtty("IN"))
        .await
        .expect("rxcuis should decode");
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts.items[0].rxcui.as_deref(), Some("5640"));
}
