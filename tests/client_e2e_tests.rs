//! End-to-end read tests against a mock HTTP backend
//!
//! These run the full stack: URL assembly, the reqwest transport, envelope
//! splitting, schema validation and typed decoding.

use serde_json::{Value, json};
use supplyline::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Fixtures
// =============================================================================

fn bank(id: i64, beneficiary: &str) -> Value {
    json!({
        "id": id,
        "beneficiary_name": beneficiary,
        "bank_name": "Harbor Trust",
        "account_no": "440012765",
        "iban": "FI2112345600000785",
        "swift_code": null,
        "currency": { "id": 2, "code": "EUR" },
        "customer": { "id": 7, "name": "Nordship Marine" },
    })
}

fn bank_list(items: Vec<Value>, current_page: u64, total: u64, total_pages: u64) -> Value {
    json!({
        "status": true,
        "data": items,
        "current_page": current_page,
        "total": total,
        "total_pages": total_pages,
    })
}

fn bank_detail(item: Value) -> Value {
    json!({ "status": true, "data": item })
}

async fn backend() -> (MockServer, ApiClient) {
    // RUST_LOG=supplyline=debug surfaces the client's own tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let server = MockServer::start().await;
    let client = ApiClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .retry_backoff_ms(5)
        .build()
        .expect("client should build");
    (server, client)
}

// =============================================================================
// List Read Tests
// =============================================================================

mod list_read_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_fetch_decodes_envelope() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bank_list(
                vec![bank(12, "Nordship Marine Oy"), bank(13, "Baltic Chandlery AB")],
                1,
                2,
                1,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>().params(QueryParams::new().page(1));
        let snapshot = banks.fetch().await;

        assert!(snapshot.is_ready());
        let page = snapshot.data().expect("page should be present");
        assert_eq!(page.len(), 2);
        assert_eq!(page.items[0].beneficiary_name, "Nordship Marine Oy");
        assert_eq!(page.current_page, 1);
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn test_search_and_array_params_reach_the_wire() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .and(query_param("page", "1"))
            .and(query_param("search[beneficiary_name]", "Nordship"))
            .and(query_param("currency_ids", "1,2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(bank_list(vec![bank(12, "Nordship Marine Oy")], 1, 1, 1)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>().params(
            QueryParams::new()
                .page(1)
                .search("beneficiary_name", "Nordship")
                .array("currency_ids", [1, 2]),
        );
        let snapshot = banks.fetch().await;
        assert!(snapshot.is_ready());
        assert_eq!(snapshot.data().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_schema_violation_reports_every_bad_field() {
        let (server, client) = backend().await;
        let mut broken = bank(13, "Baltic Chandlery AB");
        broken["beneficiary_name"] = json!(7);
        broken.as_object_mut().unwrap().remove("account_no");
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(bank_list(vec![bank(12, "Nordship Marine Oy"), broken], 1, 2, 1)),
            )
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>();
        let snapshot = banks.fetch().await;

        assert!(snapshot.is_failed());
        match snapshot.error().expect("error should be present") {
            ApiError::Schema(violation) => {
                assert_eq!(violation.resource, "bank");
                let paths: Vec<&str> =
                    violation.issues.iter().map(|i| i.path.as_str()).collect();
                assert!(paths.contains(&"data[1].beneficiary_name"));
                assert!(paths.contains(&"data[1].account_no"));
                assert!(!paths.iter().any(|p| p.starts_with("data[0]")));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disabled_query_never_fetches() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bank_list(vec![], 1, 0, 0)))
            .expect(0)
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>().enabled(false);
        let snapshot = banks.fetch().await;
        assert!(snapshot.is_idle());
        assert!(snapshot.data().is_none());
    }

    #[tokio::test]
    async fn test_keep_previous_data_bridges_page_change() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/spare"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": [{
                    "id": 501,
                    "part_no": "KX-180-SEAL",
                    "description": "Crankshaft seal",
                    "maker": null,
                    "model": null,
                    "unit": "pcs",
                    "stock_quantity": 14,
                    "unit_price": 86.5,
                }],
                "current_page": 1,
                "total": 30,
                "total_pages": 2,
            })))
            .mount(&server)
            .await;

        let mut spares = client
            .list::<Spare>()
            .params(QueryParams::new().page(1))
            .keep_previous_data(true);
        assert!(spares.fetch().await.is_ready());

        // Page flips: the old rows stay visible while page 2 loads
        spares.set_params(QueryParams::new().page(2));
        let bridging = spares.snapshot();
        assert!(bridging.is_loading());
        assert_eq!(bridging.data().unwrap().items[0].part_no, "KX-180-SEAL");
    }
}

// =============================================================================
// Detail Read Tests
// =============================================================================

mod detail_read_tests {
    use super::*;

    #[tokio::test]
    async fn test_detail_fetch_fills_path() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(bank_detail(bank(42, "Nordship Marine Oy"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut handle = client.detail::<Bank>(42);
        let snapshot = handle.fetch().await;
        assert!(snapshot.is_ready());
        assert_eq!(snapshot.data().unwrap().id, 42);
    }

    #[tokio::test]
    async fn test_detail_schema_violation_cites_dotted_path() {
        let (server, client) = backend().await;
        let mut broken = bank(42, "Nordship Marine Oy");
        broken["beneficiary_name"] = json!(7);
        Mock::given(method("GET"))
            .and(path("/api/bank/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bank_detail(broken)))
            .mount(&server)
            .await;

        let mut handle = client.detail::<Bank>(42);
        let snapshot = handle.fetch().await;

        assert!(snapshot.is_failed());
        match snapshot.error().expect("error should be present") {
            ApiError::Schema(violation) => {
                assert_eq!(violation.resource, "bank");
                assert_eq!(violation.issues.len(), 1);
                assert_eq!(violation.issues[0].path, "data.beneficiary_name");
                assert_eq!(violation.issues[0].expected, "string");
                assert_eq!(violation.issues[0].received, "number");
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detail_gates_on_nonpositive_id() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank/0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let mut handle = client.detail::<Bank>(0);
        assert!(handle.fetch().await.is_idle());

        // Selecting a real row arms the handle
        handle.set_id(42);
        assert!(handle.is_enabled());
    }

    #[tokio::test]
    async fn test_rejection_envelope_is_business_failure() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": false, "message": "Record not found" })),
            )
            .mount(&server)
            .await;

        let mut handle = client.detail::<Bank>(42);
        let snapshot = handle.fetch().await;
        assert!(snapshot.is_failed());
        match snapshot.error().unwrap() {
            ApiError::Business(failure) => {
                assert_eq!(failure.message, "Record not found");
                assert_eq!(failure.http_status, Some(200));
            }
            other => panic!("expected business failure, got {:?}", other),
        }
    }
}

// =============================================================================
// Failure Mode Tests
// =============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_errors_retry_then_surface() {
        let (server, client) = backend().await;
        // Default budget is two retries, so exactly three attempts land
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(3)
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>();
        let snapshot = banks.fetch().await;
        assert!(snapshot.is_failed());
        match snapshot.error().unwrap() {
            ApiError::Network(NetworkError::Status { status, .. }) => assert_eq!(*status, 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_404_with_message_fails_fast() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank/42"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "message": "Record not found" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut handle = client.detail::<Bank>(42);
        let snapshot = handle.fetch().await;
        match snapshot.error().unwrap() {
            ApiError::Business(failure) => {
                assert_eq!(failure.message, "Record not found");
                assert_eq!(failure.http_status, Some(404));
            }
            other => panic!("expected business failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_schema_violation() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>maintenance page</html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>();
        let snapshot = banks.fetch().await;
        match snapshot.error().unwrap() {
            ApiError::Schema(violation) => {
                assert_eq!(violation.issues.len(), 1);
                assert!(violation.issues[0].received.contains("unparseable body"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_last_good_data() {
        let (server, client) = backend().await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(bank_list(vec![bank(12, "Nordship Marine Oy")], 1, 1, 1)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bank"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let mut banks = client.list::<Bank>();
        assert!(banks.fetch().await.is_ready());

        let failed = banks.refetch().await;
        assert!(failed.is_failed());
        // Last known good rows ride along with the error
        assert_eq!(failed.data().unwrap().items[0].id, 12);
    }
}
