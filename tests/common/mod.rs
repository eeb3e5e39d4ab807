#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bugnest::config::{EnvConfig, PaymentConfig};
use bugnest::db::database_service::DatabaseService;
use bugnest::types::error::AppError;
use bugnest::utils::gateway::{sign, signature_matches, GatewayOrder, OrderRequest, PaymentGateway};
use bugnest::utils::media::MediaStore;
use tempfile::TempDir;

pub mod client;

pub const TEST_KEY_ID: &str = "rzp_test_key";
pub const TEST_KEY_SECRET: &str = "test_secret_for_signatures";

/// Stands in for the payment provider: hands out sequential order ids and
/// checks signatures with the test secret.
pub struct FakeGateway {
    orders: AtomicUsize,
    pub fail: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway {
            orders: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        FakeGateway {
            orders: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn sign(order_id: &str, payment_id: &str) -> String {
        sign(TEST_KEY_SECRET, order_id, payment_id)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> &str {
        TEST_KEY_ID
    }

    async fn create_order(&self, order: OrderRequest) -> Result<GatewayOrder, AppError> {
        if self.fail {
            return Err(AppError::Gateway("HTTP 503 Service Unavailable".to_string()));
        }
        let n = self.orders.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            id: format!("order_test_{n}"),
            amount: order.amount,
            currency: order.currency,
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature_matches(TEST_KEY_SECRET, order_id, payment_id, signature)
    }
}

pub struct TestContext {
    pub db: Arc<DatabaseService>,
    pub media: MediaStore,
    pub config: EnvConfig,
    pub gateway: Arc<dyn PaymentGateway>,
    pub media_root: PathBuf,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> TestContext {
        Self::with_gateway(Arc::new(FakeGateway::new())).await
    }

    pub async fn with_gateway(gateway: Arc<dyn PaymentGateway>) -> TestContext {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("bugnest.db").display());

        let db = Arc::new(
            DatabaseService::new(&db_url)
                .await
                .expect("Failed to initialize DatabaseService"),
        );

        let media_root = dir.path().join("media");
        let config = get_test_config(&db_url, &media_root);
        let media = MediaStore::new(&media_root, config.max_upload_bytes)
            .await
            .expect("Failed to initialize media store");

        TestContext {
            db,
            media,
            config,
            gateway,
            media_root,
            _dir: dir,
        }
    }
}

pub fn get_test_config(db_url: &str, media_root: &std::path::Path) -> EnvConfig {
    EnvConfig {
        port: 8080,
        db_url: db_url.to_string(),
        media_root: media_root.to_path_buf(),
        max_upload_bytes: 64 * 1024,
        session_ttl_hours: 24,
        payment: PaymentConfig {
            key_id: TEST_KEY_ID.to_string(),
            key_secret: TEST_KEY_SECRET.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            currency: "INR".to_string(),
            basic_price: 9900,
            premium_price: 19900,
            plan_duration_days: 30,
        },
    }
}
