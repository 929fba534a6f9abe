//! SPL detail endpoints against a mocked DailyMed server

use dailymed_client::{ClientConfig, DailyMedClient, DailyMedError, IngredientRole, SetId};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SET_ID: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";
const TABLET_XML: &str = include_str!("../fixtures/ibuprofen_tablet.xml");

fn create_mock_client(mock_server: &MockServer) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0);

    DailyMedClient::with_config(config)
}

fn set_id() -> SetId {
    SetId::parse(SET_ID).unwrap()
}

async fn mount_json(mock_server: &MockServer, endpoint: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/json"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_fetch_spl_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spls/{SET_ID}.xml")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(TABLET_XML)
                .insert_header("content-type", "application/xml"),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let doc = client
        .fetch_spl_document(&set_id())
        .await
        .expect("document should parse");

    assert_eq!(doc.set_id, SET_ID);
    assert_eq!(doc.version.as_deref(), Some("3"));
    assert_eq!(doc.products.len(), 1);

    let active: Vec<_> = doc
        .ingredients()
        .filter(|i| i.role == IngredientRole::Active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "ibuprofen");
    assert_eq!(active[0].strength.as_deref(), Some("200 mg"));
    assert_eq!(doc.inactive_ingredient_names().len(), 2);
    assert!(doc.routes().contains("oral"));
    assert!(doc.forms().contains("tablet"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_spl_document_not_an_spl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spls/{SET_ID}.xml")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html><html><body>Temporarily unavailable</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_spl_document(&set_id()).await.unwrap_err();

    match err {
        DailyMedError::DocumentUnparseable { set_id, reason } => {
            assert_eq!(set_id, SET_ID);
            assert!(reason.contains("html"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[traced_test]
async fn test_get_spl_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/spls/{SET_ID}/history.json")))
        .and(query_param("page", "1"))
        .and(query_param("pagesize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{
                "metadata": {{"total_elements": 3, "total_pages": 1, "current_page": 1, "elements_per_page": 5}},
                "data": {{
                    "spl": {{"setid": "{SET_ID}", "title": "IBUPROFEN TABLETS, USP"}},
                    "history": [
                        {{"spl_version": 3, "published_date": "May 15, 2024"}},
                        {{"spl_version": 2, "published_date": "Mar 01, 2022"}},
                        {{"spl_version": 1, "published_date": "Jul 19, 2019"}}
                    ]
                }}
            }}"#
        )))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let history = client
        .get_spl_history(&set_id(), 1, 5)
        .await
        .expect("history should decode");

    assert_eq!(history.spl.title.as_deref(), Some("IBUPROFEN TABLETS, USP"));
    assert_eq!(history.versions.len(), 3);
    assert_eq!(history.versions[0].spl_version, Some(3));
    assert_eq!(history.pagination.total_elements, Some(3));
}

#[tokio::test]
#[traced_test]
async fn test_get_spl_ndcs_and_packaging() {
    let mock_server = MockServer::start().await;

    mount_json(
        &mock_server,
        &format!("/spls/{SET_ID}/ndcs.json"),
        &format!(
            r#"{{"metadata": {{}}, "data": {{"spl": {{"setid": "{SET_ID}", "spl_version": "3"}}, "ndcs": [{{"ndc": "0573-0164-40"}}, {{"ndc": "0573-0164-30"}}]}}}}"#
        ),
    )
    .await;
    mount_json(
        &mock_server,
        &format!("/spls/{SET_ID}/packaging.json"),
        &format!(
            r#"{{
                "metadata": {{}},
                "data": {{
                    "spl": {{"setid": "{SET_ID}", "title": "IBUPROFEN TABLETS, USP"}},
                    "products": [{{
                        "product_name": "Ibuprofen",
                        "product_name_generic": "IBUPROFEN",
                        "product_code": "0573-0164",
                        "active_ingredients": [{{"name": "IBUPROFEN", "strength": "200 mg/1"}}],
                        "packaging": [
                            {{"ndc": "0573-0164-40", "description": "100 TABLET in 1 BOTTLE"}},
                            {{"ndc": "0573-0164-30", "description": "50 TABLET in 1 BOTTLE"}}
                        ]
                    }}]
                }}
            }}"#
        ),
    )
    .await;

    let client = create_mock_client(&mock_server);

    let ndcs = client.get_spl_ndcs(&set_id()).await.expect("ndcs should decode");
    assert_eq!(ndcs.ndcs, vec!["0573-0164-40", "0573-0164-30"]);
    assert_eq!(ndcs.spl.spl_version, Some(3));

    let packaging = client
        .get_spl_packaging(&set_id())
        .await
        .expect("packaging should decode");
    assert_eq!(packaging.products.len(), 1);
    let product = &packaging.products[0];
    assert_eq!(product.product_code.as_deref(), Some("0573-0164"));
    assert_eq!(product.active_ingredients[0].strength.as_deref(), Some("200 mg/1"));
    assert_eq!(product.packaging.len(), 2);
    assert_eq!(
        product.packaging[1].description.as_deref(),
        Some("50 TABLET in 1 BOTTLE")
    );
}
