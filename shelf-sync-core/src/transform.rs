use serde::Serialize;
use tracing::info;

use crate::spreadsheet::SourceRow;

/// Command the price-sync service applies to every record we send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncCommand {
    #[serde(rename = "COMPLETE_UPDATE")]
    CompleteUpdate,
}

/// One item as the price-sync service expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncRecord {
    #[serde(rename = "IIS_COMMAND")]
    pub command: SyncCommand,
    pub sku: String,
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub ean: String,
    #[serde(rename = "price1")]
    pub price: f64,
}

/// Map rows to records in file order. Rows without an item id are dropped;
/// every other malformed value degrades to a default.
pub fn build_records(rows: &[SourceRow]) -> Vec<SyncRecord> {
    let records: Vec<SyncRecord> = rows.iter().filter_map(to_record).collect();
    info!(rows = rows.len(), items = records.len(), "Items prepared");
    records
}

fn to_record(row: &SourceRow) -> Option<SyncRecord> {
    let sku = trimmed(&row.item_id);
    if sku.is_empty() {
        return None;
    }

    Some(SyncRecord {
        command: SyncCommand::CompleteUpdate,
        sku,
        item_name: trimmed(&row.item_name),
        ean: derive_ean(&trimmed(&row.item_number), &trimmed(&row.primary_upc)),
        price: parse_price(row.unit_price.as_deref()),
    })
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Combine item number and primary UPC into the service's `ean` field.
pub fn derive_ean(item_number: &str, primary_upc: &str) -> String {
    match (item_number.is_empty(), primary_upc.is_empty()) {
        (false, false) => format!("{item_number},{primary_upc}"),
        (false, true) => item_number.to_string(),
        (true, false) => primary_upc.to_string(),
        (true, true) => String::new(),
    }
}

/// Unit price as a number; absent, unparsable or non-finite prices become 0.0.
pub fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}
