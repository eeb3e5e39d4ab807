use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} not set")]
    Missing(&'static str),
    #[error("environment variable {key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub port: u16,
    pub db_url: String,
    pub media_root: PathBuf,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i64,
    pub payment: PaymentConfig,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub currency: String,
    pub basic_price: i64,
    pub premium_price: i64,
    pub plan_duration_days: i64,
}

impl EnvConfig {
    fn get_env(key: &'static str) -> Result<String, ConfigError> {
        env::var(key).map_err(|_| ConfigError::Missing(key))
    }

    fn get_env_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(key) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            Err(_) => Ok(default),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let db_url = Self::get_env("DATABASE_URL")?;
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());

        Ok(EnvConfig {
            port: Self::get_env_or("PORT", 8080)?,
            db_url,
            media_root: PathBuf::from(media_root),
            max_upload_bytes: Self::get_env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            session_ttl_hours: Self::get_env_or("SESSION_TTL_HOURS", 24 * 14)?,
            payment: PaymentConfig {
                key_id: Self::get_env("PAYMENT_KEY_ID")?,
                key_secret: Self::get_env("PAYMENT_KEY_SECRET")?,
                api_base: env::var("PAYMENT_API_BASE")
                    .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
                currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
                basic_price: Self::get_env_or("PLAN_BASIC_PRICE", 9900)?,
                premium_price: Self::get_env_or("PLAN_PREMIUM_PRICE", 19900)?,
                plan_duration_days: Self::get_env_or("PLAN_DURATION_DAYS", 30)?,
            },
        })
    }
}

impl PaymentConfig {
    /// Price in minor currency units, `None` for the free plan.
    pub fn price_of(&self, plan: entity::subscription::Plan) -> Option<i64> {
        use entity::subscription::Plan;
        match plan {
            Plan::Free => None,
            Plan::Basic => Some(self.basic_price),
            Plan::Premium => Some(self.premium_price),
        }
    }
}
