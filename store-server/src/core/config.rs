use crate::auth::JwtConfig;
use crate::utils::{HOUR_MS, MINUTE_MS};

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/store-server | Work directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (dev fallback) | HS256 signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
/// | JWT_ISSUER | store-server | Token issuer |
/// | LOW_STOCK_THRESHOLD | 5 | Default low-stock threshold |
/// | QR_PAYMENT_TIMEOUT_MINUTES | 30 | Auto-cancel window for QR / e-wallet orders |
/// | COD_PAYMENT_TIMEOUT_HOURS | 24 | Auto-cancel window for cash-on-delivery orders |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// JWT validation settings
    pub jwt: JwtConfig,
    /// Default low-stock threshold when neither variant nor product sets one
    pub low_stock_threshold: i64,
    /// Payment window for instant methods (vietqr, momo, stripe), minutes
    pub qr_payment_timeout_minutes: i64,
    /// Payment window for cash on delivery, hours
    pub cod_payment_timeout_hours: i64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/store-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::from_env(),
            low_stock_threshold: std::env::var("LOW_STOCK_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            qr_payment_timeout_minutes: std::env::var("QR_PAYMENT_TIMEOUT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            cod_payment_timeout_hours: std::env::var("COD_PAYMENT_TIMEOUT_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        }
    }

    /// Path of the embedded database under the work directory
    pub fn db_path(&self) -> String {
        format!("{}/data", self.work_dir)
    }

    /// Instant-payment auto-cancel window in milliseconds
    pub fn instant_timeout_ms(&self) -> i64 {
        self.qr_payment_timeout_minutes * MINUTE_MS
    }

    /// Cash-on-delivery auto-cancel window in milliseconds
    pub fn cod_timeout_ms(&self) -> i64 {
        self.cod_payment_timeout_hours * HOUR_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;

    fn test_config() -> Config {
        Config {
            work_dir: "/tmp/store".into(),
            http_port: 3000,
            environment: "development".into(),
            jwt: JwtConfig {
                secret: "test-secret-at-least-32-bytes-long!!".into(),
                expiration_minutes: 60,
                issuer: "store-server".into(),
            },
            low_stock_threshold: 5,
            qr_payment_timeout_minutes: 30,
            cod_payment_timeout_hours: 24,
        }
    }

    #[test]
    fn test_timeout_windows_in_millis() {
        let config = test_config();
        assert_eq!(config.instant_timeout_ms(), 30 * 60 * 1000);
        assert_eq!(config.cod_timeout_ms(), 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_db_path_under_work_dir() {
        assert_eq!(test_config().db_path(), "/tmp/store/data");
    }
}
