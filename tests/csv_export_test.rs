mod common;

use dairy_ledger::models::{InwardTransaction, OutwardTransaction, Supplier};
use dairy_ledger::services::csv_export::{to_csv, write_csv, CsvRecord};
use rust_decimal_macros::dec;
use tempfile::TempDir;

#[test]
fn inward_rows_carry_gst_split_and_amount() {
    let mut entry = common::inward(dec!(18));
    entry.recalculate().unwrap();

    let csv = to_csv(&[entry]);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], InwardTransaction::headers().join(","));
    assert_eq!(
        lines[1],
        "INW-001,2024-03-05,Krishna Dairy Farm,Krishna Dairy Farm,Main Warehouse,Toned Milk x 10,1000.00,180.00,0.00,1000.00"
    );
}

#[test]
fn outward_rows_list_products_and_payment() {
    let mut entry = common::outward();
    entry.recalculate().unwrap();

    let row = entry.row();
    assert_eq!(row[2], "Sai Sweets");
    assert_eq!(row[4], "Toned Milk x 10; Paneer x 2");
    assert_eq!(row[8], "2084.00");
    assert_eq!(row[9], "Credit");
    assert_eq!(row.len(), OutwardTransaction::headers().len());
}

#[tokio::test]
async fn written_file_keeps_quoted_address_in_one_column() {
    let dir = TempDir::new().unwrap();
    let suppliers = vec![
        common::supplier(),
        Supplier {
            supplier_name: "Shree \"Gau\" Farms".into(),
            supplier_address: "Satara".into(),
            ..Default::default()
        },
    ];

    let path = write_csv(dir.path(), "supplier", &suppliers).await.unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("supplier-") && name.ends_with(".csv"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines[1], "Krishna Dairy Farm,9876543210,,\"Pune, MH\",,,");
    assert_eq!(lines[2], "\"Shree \"\"Gau\"\" Farms\",,,Satara,,,");
}
