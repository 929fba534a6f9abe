//! SPL search tests against a mocked DailyMed server

use dailymed_client::dailymed::query::{DateComparison, NameType};
use dailymed_client::{ClientConfig, DailyMedClient, DailyMedError, ResponseFormat, SplQuery};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPLS_JSON: &str = r#"{
  "metadata": {
    "db_published_date": "May 20, 2024 11:03:18PM EST",
    "elements_per_page": 3,
    "error_message": "null",
    "next_page_url": "https://dailymed.nlm.nih.gov/dailymed/services/v2/spls.json?drug_name=ibuprofen&page=2&pagesize=3",
    "current_url": "https://dailymed.nlm.nih.gov/dailymed/services/v2/spls.json?drug_name=ibuprofen&page=1&pagesize=3",
    "next_page": 2,
    "total_elements": 1432,
    "total_pages": 478,
    "current_page": 1,
    "previous_page": "null",
    "previous_page_url": "null"
  },
  "data": [
    {
      "spl_version": 3,
      "published_date": "May 15, 2024",
      "title": "IBUPROFEN TABLETS, USP 200 MG [ACME PHARMA INC.]",
      "setid": "a1b2c3d4-e5f6-7890-abcd-ef1234567890"
    },
    {
      "spl_version": 1,
      "published_date": "Nov 02, 2023",
      "title": "IBUPROFEN GEL [TOPICAL LABS]",
      "setid": "b2c3d4e5-f6a7-8901-bcde-f12345678901"
    },
    {
      "spl_version": 2,
      "published_date": "Jan 09, 2022",
      "title": "IBUPROFEN CAPSULE, LIQUID FILLED [NO SETID LLC]"
    }
  ]
}"#;

const SPLS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<spls>
  <metadata>
    <total_elements>2</total_elements>
    <elements_per_page>2</elements_per_page>
    <total_pages>1</total_pages>
    <current_page>1</current_page>
    <next_page_url>null</next_page_url>
    <previous_page_url>null</previous_page_url>
  </metadata>
  <spl>
    <setid>c3d4e5f6-a7b8-9012-cdef-123456789012</setid>
    <spl_version>7</spl_version>
    <title>HYDROCODONE BITARTRATE AND ACETAMINOPHEN SOLUTION</title>
    <published_date>Feb 11, 2024</published_date>
  </spl>
  <spl>
    <setid>d4e5f6a7-b8c9-0123-def0-234567890123</setid>
    <spl_version>4</spl_version>
    <title>ASPIRIN TABLET</title>
    <published_date>Aug 30, 2023</published_date>
  </spl>
</spls>"#;

fn create_mock_client(mock_server: &MockServer) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0);

    DailyMedClient::with_config(config)
}

#[tokio::test]
#[traced_test]
async fn test_search_spls_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .and(query_param("drug_name", "ibuprofen"))
        .and(query_param("page", "1"))
        .and(query_param("pagesize", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SPLS_JSON)
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let page = client
        .search_spls(&SplQuery::new().drug_name("ibuprofen").pagesize(3))
        .await
        .expect("search should succeed");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.malformed_rows, 1);
    assert_eq!(
        page.items[0].title.as_deref(),
        Some("IBUPROFEN TABLETS, USP 200 MG [ACME PHARMA INC.]")
    );
    assert_eq!(page.items[1].spl_version, Some(1));
    assert_eq!(page.pagination.total_elements, Some(1432));
    assert_eq!(page.pagination.total_pages, Some(478));
    assert_eq!(page.pagination.previous_page_url, None);
    assert!(page.pagination.has_next_page());
}

#[tokio::test]
#[traced_test]
async fn test_search_spls_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SPLS_XML)
                .insert_header("content-type", "application/xml"),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
        .with_search_format(ResponseFormat::Xml);
    let client = DailyMedClient::with_config(config);

    let page = client
        .search_spls(&SplQuery::new().pagesize(2))
        .await
        .expect("XML search should succeed");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.malformed_rows, 0);
    assert_eq!(
        page.set_ids().collect::<Vec<_>>(),
        vec![
            "c3d4e5f6-a7b8-9012-cdef-123456789012",
            "d4e5f6a7-b8c9-0123-def0-234567890123"
        ]
    );
    assert_eq!(page.items[0].spl_version, Some(7));
    assert!(!page.pagination.has_next_page());
}

#[tokio::test]
#[traced_test]
async fn test_search_spls_forwards_every_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spls.json"))
        .and(query_param("labeler", "Acme Pharma"))
        .and(query_param("name_type", "b"))
        .and(query_param("boxed_warning", "false"))
        .and(query_param("published_date", "2023-01-01"))
        .and(query_param("published_date_comparison", "gte"))
        .and(query_param("ndc", "0573-0164"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"metadata": {}, "data": []}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let query = SplQuery::new()
        .labeler("Acme Pharma")
        .name_type(NameType::Brand)
        .boxed_warning(false)
        .published_date("2023-01-01")
        .published_date_comparison(DateComparison::Gte)
        .ndc("0573-0164")
        .page(2);

    let page = client.search_spls(&query).await.expect("search should succeed");
    assert!(page.items.is_empty());
    assert_eq!(page.malformed_rows, 0);
}

#[tokio::test]
#[traced_test]
async fn test_search_spls_rejects_bad_pagination_without_request() {
    let mock_server = MockServer::start().await;
    let client = create_mock_client(&mock_server);

    for query in [
        SplQuery::new().page(0),
        SplQuery::new().pagesize(0),
        SplQuery::new().pagesize(101),
        SplQuery::new().ndc("not-an-ndc"),
    ] {
        let result = client.search_spls(&query).await;
        assert!(matches!(result, Err(DailyMedError::InvalidQuery(_))));
    }

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 0);
}
