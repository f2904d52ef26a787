#![allow(dead_code)]

use std::time::Duration;

use dairy_ledger::models::{
    CompanyDetails, Customer, InwardTransaction, LineItem, OutwardTransaction, PaymentType,
    ProductRef, Supplier, Transport,
};
use dairy_ledger::services::api_client::{ApiClient, Session};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// Client pointed at a mock backend with a bearer token.
pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(2))
        .expect("mock server URI is valid")
        .with_session(Session::new(TEST_TOKEN))
}

pub fn line(name: &str, quantity: Decimal, rate: Decimal, gst: Decimal) -> LineItem {
    LineItem {
        product_id: ProductRef::Id(format!("prod-{}", name.to_ascii_lowercase().replace(' ', "-"))),
        product_name: name.to_string(),
        quantity,
        product_rate: rate,
        gst_percentage: gst,
        ..Default::default()
    }
}

pub fn company() -> CompanyDetails {
    CompanyDetails {
        company_name: "Gokul Dairy Distributors".into(),
        address: "Shivaji Road, Kolhapur".into(),
        gst_number: "27AAPFU0939F1ZV".into(),
        mobile: "9822012345".into(),
        email: "accounts@gokuldairy.test".into(),
        ..Default::default()
    }
}

pub fn supplier() -> Supplier {
    Supplier {
        id: Some("sup-1".into()),
        supplier_name: "Krishna Dairy Farm".into(),
        supplier_mobile: "9876543210".into(),
        supplier_address: "Pune, MH".into(),
        ..Default::default()
    }
}

pub fn customer() -> Customer {
    Customer {
        id: Some("cus-1".into()),
        customer_name: "Sai Sweets".into(),
        customer_mobile: "9123456780".into(),
        customer_address: "Nashik, MH".into(),
        ..Default::default()
    }
}

/// The canonical 10 x 100 @ 18% inward entry.
pub fn inward(gst: Decimal) -> InwardTransaction {
    InwardTransaction {
        invoice_no: "INW-001".into(),
        date: "2024-03-05".into(),
        source: "Krishna Dairy Farm".into(),
        destination: "Main Warehouse".into(),
        supplier_details: Some(supplier()),
        product_details: vec![line("Toned Milk", dec!(10), dec!(100), gst)],
        ..Default::default()
    }
}

pub fn outward() -> OutwardTransaction {
    OutwardTransaction {
        invoice_no: "OUT-042".into(),
        date: "2024-03-06".into(),
        source: "Main Warehouse".into(),
        customer_details: Some(customer()),
        transport_details: Some(Transport {
            transporter_name: "Patil Logistics".into(),
            vehicle_number: "MH09AB1234".into(),
            rental_cost: dec!(250),
            ..Default::default()
        }),
        product_details: vec![
            line("Toned Milk", dec!(10), dec!(100), dec!(5)),
            line("Paneer", dec!(2), dec!(350), dec!(12)),
        ],
        payment_type: PaymentType::Credit,
        ..Default::default()
    }
}
