#![allow(dead_code)]

use std::fmt::{self, Write as FmtWrite};
use std::path::Path;
use std::sync::{Arc, Mutex};

use rust_xlsxwriter::Workbook;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

use shelf_sync_core::config::{StoreIdentity, SyncConfig};

pub const HEADERS: [&str; 5] = ["ItemID", "ItemName", "ItemNumber", "PrimaryUpc", "UnitPrice"];

pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Write a single-sheet workbook with a header row followed by `rows`.
pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Cell<'_>>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, col as u16, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, col as u16, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

/// `n` well-formed price rows with ids SKU1..=SKUn.
pub fn price_rows(n: usize) -> Vec<Vec<Cell<'static>>> {
    (1..=n)
        .map(|i| {
            vec![
                Cell::Number(1000.0 + i as f64),
                Cell::Text("Gala Apples"),
                Cell::Text("4133"),
                Cell::Number(33383000012.0),
                Cell::Number(1.99),
            ]
        })
        .collect()
}

pub fn test_config(watch_folder: &Path, batch_size: usize) -> SyncConfig {
    let mut config = SyncConfig::new(
        watch_folder,
        StoreIdentity {
            customer_code: "eastwest".into(),
            store_code: "teststore".into(),
        },
    );
    config.batch_size = std::num::NonZeroUsize::new(batch_size).unwrap();
    config
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub text: String,
}

pub type Events = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer that records every event's level and fields as `name=value` text.
struct EventCollector {
    events: Events,
}

struct FieldText(String);

impl Visit for FieldText {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl<S> Layer<S> for EventCollector
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut text = FieldText(String::new());
        event.record(&mut text);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            text: text.0,
        });
    }
}

/// Collect events emitted on this thread until the guard drops.
pub fn capture_events() -> (Events, tracing::subscriber::DefaultGuard) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    (events, guard)
}
