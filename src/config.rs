use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::domain::calc::CalcInputs;
use crate::shared::types::{Exchange, Fiat, Selectors, Stablecoin};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderCfg {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for ProviderCfg {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub path: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            path: "peerspread_state.json".to_string(),
        }
    }
}

/// Seed values for the live calculation and market scope
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsCfg {
    pub investment: f64,
    pub buy_rate: f64,
    pub sell_rate: f64,
    pub fee_percent: f64,
    pub exchange: Exchange,
    pub stablecoin: Stablecoin,
    pub fiat: Fiat,
}

impl Default for DefaultsCfg {
    fn default() -> Self {
        Self {
            investment: 100_000.0,
            buy_rate: 86.50,
            sell_rate: 87.20,
            fee_percent: 0.1,
            exchange: Exchange::Binance,
            stablecoin: Stablecoin::Usdt,
            fiat: Fiat::Kgs,
        }
    }
}

impl DefaultsCfg {
    pub fn inputs(&self) -> CalcInputs {
        CalcInputs {
            investment: self.investment,
            buy_rate: self.buy_rate,
            sell_rate: self.sell_rate,
            fee_percent: self.fee_percent,
        }
    }

    pub fn selectors(&self) -> Selectors {
        Selectors::new(self.exchange, self.stablecoin, self.fiat)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderCfg,
    pub storage: StorageCfg,
    pub defaults: DefaultsCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse peerspread config")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_a_file() {
        let cfg = Config::default();
        assert_eq!(cfg.provider.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.defaults.investment, 100_000.0);
        assert_eq!(cfg.defaults.selectors(), Selectors::default());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let raw = r#"
            [provider]
            model = "gemini-2.5-pro"

            [defaults]
            investment = 250000.0
            exchange = "OKX"
            fiat = "KZT"
        "#;
        let cfg: Config = toml::from_str(raw).unwrap();

        assert_eq!(cfg.provider.model, "gemini-2.5-pro");
        // untouched sections keep their defaults
        assert_eq!(cfg.provider.timeout_ms, 30_000);
        assert_eq!(cfg.storage.path, "peerspread_state.json");
        assert_eq!(cfg.defaults.investment, 250_000.0);
        assert_eq!(cfg.defaults.exchange, Exchange::Okx);
        assert_eq!(cfg.defaults.fiat, Fiat::Kzt);
        assert_eq!(cfg.defaults.stablecoin, Stablecoin::Usdt);
    }

    #[test]
    fn test_inputs_are_seeded_from_defaults() {
        let inputs = DefaultsCfg::default().inputs();
        assert_eq!(inputs.buy_rate, 86.50);
        assert_eq!(inputs.sell_rate, 87.20);
        assert_eq!(inputs.fee_percent, 0.1);
    }
}
