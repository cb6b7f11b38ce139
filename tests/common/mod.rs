#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use motoshop_rs::models::{Notice, Product, StoreEvent, StoreEventKind};
use motoshop_rs::repositories::{FileStorage, KeyValueStorage, MemoryStorage};
use motoshop_rs::services::{CartStore, Notifier};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Store wired to inspectable storage, listeners and notices
pub struct TestEnvironment {
    pub store: Arc<CartStore>,
    pub storage: Arc<dyn KeyValueStorage>,
    pub events: Arc<Mutex<Vec<StoreEvent>>>,
    pub notices: Arc<RecordingNotifier>,
    _dir: Option<TempDir>,
}

impl TestEnvironment {
    pub fn in_memory() -> Self {
        Self::build(Arc::new(MemoryStorage::new()), None)
    }

    pub fn on_disk() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let storage = FileStorage::open(dir.path()).expect("open file storage");
        Self::build(Arc::new(storage), Some(dir))
    }

    /// Another store over the same storage, like a second browser tab
    pub fn second_store(&self) -> CartStore {
        CartStore::new(self.storage.clone())
    }

    pub fn event_kinds(&self) -> Vec<StoreEventKind> {
        self.events.lock().unwrap().iter().map(StoreEvent::kind).collect()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn raw_entry(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).expect("read raw entry")
    }

    fn build(storage: Arc<dyn KeyValueStorage>, dir: Option<TempDir>) -> Self {
        let notices = Arc::new(RecordingNotifier::default());
        let store = CartStore::new(storage.clone()).with_notifier(notices.clone());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        Self {
            store: Arc::new(store),
            storage,
            events,
            notices,
            _dir: dir,
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

pub fn honda_cb500f() -> Product {
    Product::new(101, "Honda CB500F", dec!(6899.00))
        .with_discount(dec!(5))
        .with_image("/storage/products/cb500f.jpg")
}

pub fn ducati_monster() -> Product {
    Product::new(102, "Ducati Monster", dec!(12490.00))
}

pub fn arai_helmet() -> Product {
    Product::new(201, "Arai RX-7V helmet", dec!(100)).with_discount(dec!(10))
}

pub fn riding_gloves() -> Product {
    Product::new(202, "Riding gloves", dec!(50))
}

/// Product records in the different shapes the catalog pages produce
pub fn catalog_payloads() -> Vec<Value> {
    vec![
        json!({
            "id": 101,
            "name": "Honda CB500F",
            "price": 6899.0,
            "discountPercent": 5,
            "image": "/storage/products/cb500f.jpg"
        }),
        json!({
            "productId": "102",
            "title": "Ducati Monster",
            "basePrice": "12490.00"
        }),
        json!({
            "product_id": 201,
            "productName": "Arai RX-7V helmet",
            "base_price": 100,
            "discount": "10",
            "thumbnail": "arai.png"
        }),
    ]
}
