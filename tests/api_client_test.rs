mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use dairy_ledger::errors::ServiceError;
use dairy_ledger::models::{CompanyDetails, InwardTransaction, OutwardTransaction, Product};
use dairy_ledger::services::api_client::{ApiClient, Session};
use dairy_ledger::services::transactions::TransactionService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bearer() -> String {
    format!("Bearer {}", common::TEST_TOKEN)
}

#[tokio::test]
async fn lists_bare_collections_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inward"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "in-1",
                "invoiceNo": "INW-001",
                "supplierDetails": {"supplierName": "Krishna Dairy Farm"},
                "productDetails": [
                    {"productId": "p1", "quantity": "10", "productRate": 100, "gstPercentage": 18}
                ],
                "amount": "1000.00"
            },
            {"_id": "in-2", "invoiceNo": "INW-002"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = common::api_client(&server)
        .list::<InwardTransaction>()
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id.as_deref(), Some("in-1"));
    assert_eq!(entries[0].product_details[0].quantity, dec!(10));
    assert_eq!(entries[0].amount, dec!(1000));
    assert!(entries[1].product_details.is_empty());
}

#[tokio::test]
async fn unwraps_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "p1", "productCode": "TM-1", "productName": "Toned Milk", "productPrice": "52.5"}]
        })))
        .mount(&server)
        .await;

    let products = common::api_client(&server).list::<Product>().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_price, dec!(52.5));
}

#[tokio::test]
async fn gets_single_record_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/outward/out-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"_id": "out-7", "invoiceNo": "OUT-7", "paymentType": "Bank Transfer", "total": 1180}
        })))
        .mount(&server)
        .await;

    let entry = common::api_client(&server)
        .get::<OutwardTransaction>("out-7")
        .await
        .unwrap();
    assert_eq!(entry.invoice_no, "OUT-7");
    assert_eq!(entry.total, dec!(1180));
    assert_eq!(entry.payment_type.to_string(), "Bank Transfer");
}

#[tokio::test]
async fn maps_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inward/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Inward entry not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/customer"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Suppliers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = common::api_client(&server);

    assert_matches!(
        api.get::<InwardTransaction>("missing").await,
        Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Inward entry not found")
    );
    assert_matches!(
        api.list::<dairy_ledger::models::Customer>().await,
        Err(ServiceError::Unauthorized(msg)) => assert_eq!(msg, "token expired")
    );
    let err = api.list::<dairy_ledger::models::Supplier>().await.unwrap_err();
    assert_matches!(&err, ServiceError::ExternalApiError(msg) => assert!(msg.starts_with("500")));
    assert!(!err.is_user_facing());
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/warehouse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
    assert_matches!(
        api.list::<dairy_ledger::models::Warehouse>().await,
        Err(ServiceError::Timeout(_))
    );
}

#[tokio::test]
async fn company_details_takes_first_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Company-Details"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"companyName": "Gokul Dairy Distributors", "gstNumber": "27AAPFU0939F1ZV"}
        ])))
        .mount(&server)
        .await;

    let company: CompanyDetails = common::api_client(&server).company_details().await.unwrap();
    assert_eq!(company.company_name, "Gokul Dairy Distributors");
}

#[tokio::test]
async fn submit_posts_recalculated_inward_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/inward"))
        .and(header("authorization", bearer().as_str()))
        .and(body_partial_json(json!({"invoiceNo": "INW-001"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"_id": "in-9", "invoiceNo": "INW-001", "amount": "1000.00"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut entry = common::inward(dec!(18));
    // Stale figures from the form must not reach the backend.
    entry.amount = dec!(1);
    entry.product_details[0].total_amount = dec!(1);

    let saved = TransactionService::new(common::api_client(&server))
        .submit_inward(entry)
        .await
        .unwrap();
    assert_eq!(saved.id.as_deref(), Some("in-9"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let decimal = |v: &Value| Decimal::from_str(v.as_str().unwrap()).unwrap();
    assert_eq!(decimal(&body["amount"]), dec!(1000));
    assert_eq!(decimal(&body["productDetails"][0]["gstAmount"]), dec!(180));
    assert_eq!(decimal(&body["productDetails"][0]["totalAmount"]), dec!(1180));
    assert_eq!(body["productDetails"][0]["productId"], "prod-toned-milk");
    assert_eq!(body["supplierDetails"]["_id"], "sup-1");
}

#[tokio::test]
async fn submit_patches_existing_outward_entry() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/outward/out-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "out-42", "invoiceNo": "OUT-042", "total": "2084.00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entry = OutwardTransaction {
        id: Some("out-42".into()),
        ..common::outward()
    };
    let saved = TransactionService::new(common::api_client(&server))
        .submit_outward(entry)
        .await
        .unwrap();
    assert_eq!(saved.total, dec!(2084));
}

#[tokio::test]
async fn resaving_a_fetched_entry_keeps_its_payment_type() {
    let server = MockServer::start().await;
    let mut fetched = serde_json::to_value(common::outward()).unwrap();
    fetched["_id"] = json!("out-43");
    fetched["paymentType"] = json!("Cheque");
    Mock::given(method("GET"))
        .and(path("/api/outward/out-43"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": fetched })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/outward/out-43"))
        .and(body_partial_json(json!({"paymentType": "Cheque"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "out-43", "paymentType": "Cheque"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api_client(&server);
    let entry = api.get::<OutwardTransaction>("out-43").await.unwrap();
    let saved = TransactionService::new(api).submit_outward(entry).await.unwrap();
    assert_eq!(saved.payment_type.to_string(), "Cheque");
}

#[tokio::test]
async fn oversized_entry_is_refused_before_sending() {
    let server = MockServer::start().await;
    let mut entry = common::inward(dec!(18));
    entry.product_details[0].quantity = Decimal::MAX;

    let result = TransactionService::new(common::api_client(&server))
        .submit_inward(entry)
        .await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn staff_session_cannot_create_products() {
    let server = MockServer::start().await;
    let api = ApiClient::new(&server.uri(), Duration::from_secs(1))
        .unwrap()
        .with_session(
            Session::new(common::TEST_TOKEN)
                .with_role(dairy_ledger::models::UserRole::Staff),
        );

    assert_matches!(
        api.create(&Product::default()).await,
        Err(ServiceError::Forbidden(_))
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}
