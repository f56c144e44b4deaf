use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use handroll_order::{ShopSettings, MAX_ADJUSTMENT};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shop: ShopSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // HANDROLL_SHOP__TARGET_PHONE=... sets shop.target_phone
            .add_source(
                Environment::with_prefix("HANDROLL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Defaults overlaid with an inline TOML document.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Shipping and discount are applied to every order, so they must be sane here.
    fn validated(self) -> Result<Self, ConfigError> {
        for (key, amount) in [("shop.shipping_cost", self.shop.shipping_cost), ("shop.discount", self.shop.discount)] {
            if !(0..=MAX_ADJUSTMENT).contains(&amount) {
                return Err(ConfigError::Message(format!(
                    "{} must be between 0 and {}, got {}",
                    key, MAX_ADJUSTMENT, amount
                )));
            }
        }
        Ok(self)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.port", 8080)?
            .set_default("shop.business_name", "Arma Tu Handroll")?
            .set_default("shop.target_phone", "931327744")?
            .set_default("shop.messaging_app", "standard")?
            .set_default("shop.shipping_cost", 0)?
            .set_default("shop.discount", 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handroll_order::MessagingApp;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.shop.business_name, "Arma Tu Handroll");
        assert_eq!(config.shop.messaging_app, MessagingApp::Standard);
        assert_eq!(config.shop.shipping_cost, 0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let raw = r#"
            [server]
            port = 9090

            [shop]
            target_phone = "+56 9 8765 4321"
            messaging_app = "business"
            shipping_cost = 1500
        "#;

        let config = Config::from_toml(raw).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.shop.target_phone, "+56 9 8765 4321");
        assert_eq!(config.shop.messaging_app, MessagingApp::Business);
        assert_eq!(config.shop.shipping_cost, 1500);
        assert_eq!(config.shop.discount, 0);
    }

    #[test]
    fn test_rejects_out_of_range_adjustments() {
        let negative = Config::from_toml("[shop]\ndiscount = -1\n").unwrap_err();
        assert!(negative.to_string().contains("shop.discount"));

        let huge = Config::from_toml("[shop]\nshipping_cost = 9223372036854775807\n").unwrap_err();
        assert!(huge.to_string().contains("shop.shipping_cost"));
    }
}
