use std::env;

/// Runtime configuration. Business policy values (shipping fee tiers, metro
/// zone keyword, cashback rate) are environment-driven with the production
/// defaults baked in, so deployments can retune them without a release.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Monthly cashback rate in basis points of the purchase amount.
    pub cashback_rate_bps: i64,
    /// Case-insensitive substring that marks an address as metro-zone.
    pub metro_zone_keyword: String,
    pub metro_shipping_fee: i64,
    pub standard_shipping_fee: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let cashback_rate_bps = env_i64("CASHBACK_RATE_BPS", 500);
        let metro_zone_keyword =
            env::var("METRO_ZONE_KEYWORD").unwrap_or_else(|_| "dhaka".to_string());
        let metro_shipping_fee = env_i64("METRO_SHIPPING_FEE", 60);
        let standard_shipping_fee = env_i64("STANDARD_SHIPPING_FEE", 130);

        Ok(Self {
            database_url,
            host,
            port,
            cashback_rate_bps,
            metro_zone_keyword,
            metro_shipping_fee,
            standard_shipping_fee,
        })
    }

    pub fn shipping_policy(&self) -> crate::pricing::ShippingPolicy {
        crate::pricing::ShippingPolicy {
            metro_keyword: self.metro_zone_keyword.clone(),
            metro_fee: self.metro_shipping_fee,
            standard_fee: self.standard_shipping_fee,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
