//! Gemini-backed market data provider
//!
//! Talks to the generateContent endpoint with a JSON response mime type and
//! parses the candidate text into typed payloads. Every transport, status,
//! or schema problem maps to a `ProviderError` so the fallback layer can
//! take over.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::MarketDataProvider;
use crate::config::ProviderCfg;
use crate::domain::calc::spread;
use crate::domain::market::{MarketInsight, MarketOffer, OfferEfficiency, RatePair, RiskLevel};
use crate::shared::errors::ProviderError;
use crate::shared::types::Selectors;

/// Response envelope of the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: String,
}

/// Rates payload requested from the model
#[derive(Debug, Deserialize)]
struct RatesDto {
    buy: f64,
    sell: f64,
}

/// Offer payload; field names follow the requested schema
#[derive(Debug, Deserialize)]
struct OfferDto {
    bank: String,
    #[serde(rename = "buyRate")]
    buy_rate: f64,
    #[serde(rename = "sellRate")]
    sell_rate: f64,
    spread: f64,
    efficiency: OfferEfficiency,
}

/// Insight payload
#[derive(Debug, Deserialize)]
struct InsightDto {
    summary: String,
    tips: Vec<String>,
    #[serde(rename = "riskLevel")]
    risk_level: RiskLevel,
}

/// Gemini generateContent client
pub struct GeminiProvider {
    http_client: Client,
    base_url: String,
    model: String,
    api_key_env: String,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn from_config(cfg: &ProviderCfg) -> Self {
        Self {
            http_client: Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key_env: cfg.api_key_env.clone(),
            timeout: Duration::from_millis(cfg.timeout_ms),
        }
    }

    /// The key is resolved per request so a missing key degrades into the
    /// normal provider-failure path instead of blocking startup.
    fn api_key(&self) -> Result<String, ProviderError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey(self.api_key_env.clone()))
    }

    /// POST one prompt and return the first candidate's text.
    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key()?
        );
        debug!("Requesting market data from model {}", self.model);

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let envelope: GenerateContentResponse = response.json().await?;
        extract_text(envelope)
    }
}

#[async_trait]
impl MarketDataProvider for GeminiProvider {
    async fn get_rates(&self, selectors: &Selectors) -> Result<RatePair, ProviderError> {
        let prompt = format!(
            "Find the current average P2P exchange rates for {coin} against {fiat} \
             on {exchange} P2P right now. Two numbers are needed: the average buy \
             price and the average sell price of {coin} in {fiat}. Respond strictly \
             as JSON: {{\"buy\": number, \"sell\": number}}.",
            coin = selectors.stablecoin.as_str(),
            fiat = selectors.fiat.as_str(),
            exchange = selectors.exchange.as_str(),
        );

        let dto: RatesDto = parse_payload(&self.generate(prompt).await?)?;
        let rates = RatePair::new(dto.buy, dto.sell);
        if !rates.is_valid() {
            return Err(ProviderError::InvalidResponse(format!(
                "rates must be positive numbers, got buy={} sell={}",
                dto.buy, dto.sell
            )));
        }
        Ok(rates)
    }

    async fn get_offers(&self, selectors: &Selectors) -> Result<Vec<MarketOffer>, ProviderError> {
        let prompt = format!(
            "Find current P2P quotes for {coin}/{fiat} on {exchange} across the \
             major banks and payment methods of the {fiat} region. For each method \
             take the best buy price and the best sell price from live listings. \
             Return a JSON list of 5 objects: [{{\"bank\": \"Name\", \"buyRate\": \
             number, \"sellRate\": number, \"spread\": number, \"efficiency\": \
             \"Excellent\" | \"Good\" | \"Fair\"}}]. The spread is \
             ((sellRate - buyRate) / buyRate) * 100. Sort by descending spread.",
            coin = selectors.stablecoin.as_str(),
            fiat = selectors.fiat.as_str(),
            exchange = selectors.exchange.as_str(),
        );

        let dtos: Vec<OfferDto> = parse_payload(&self.generate(prompt).await?)?;
        if dtos.is_empty() {
            return Err(ProviderError::InvalidResponse("empty offer list".to_string()));
        }
        Ok(dtos.into_iter().map(MarketOffer::from).collect())
    }

    async fn get_insight(
        &self,
        buy_rate: f64,
        sell_rate: f64,
        selectors: &Selectors,
    ) -> Result<MarketInsight, ProviderError> {
        let prompt = format!(
            "Analyze the current P2P market situation for {pair}. Buy price: \
             {buy} {fiat}. Sell price: {sell} {fiat}. The spread is {spread:.2}%. \
             Give a short summary, 3 tips for a trader, and rate the risk level \
             (Low, Medium, High). Respond as JSON: {{\"summary\": string, \
             \"tips\": [string], \"riskLevel\": string}}.",
            pair = selectors.pair(),
            buy = buy_rate,
            sell = sell_rate,
            fiat = selectors.fiat.as_str(),
            spread = spread::spread_percent(buy_rate, sell_rate),
        );

        let dto: InsightDto = parse_payload(&self.generate(prompt).await?)?;
        if dto.tips.is_empty() {
            return Err(ProviderError::InvalidResponse("insight carries no tips".to_string()));
        }
        Ok(MarketInsight {
            summary: dto.summary,
            tips: dto.tips,
            risk_level: dto.risk_level,
        })
    }
}

impl From<OfferDto> for MarketOffer {
    fn from(dto: OfferDto) -> Self {
        MarketOffer {
            label: dto.bank,
            buy_rate: dto.buy_rate,
            sell_rate: dto.sell_rate,
            spread_percent: dto.spread,
            efficiency: dto.efficiency,
        }
    }
}

/// First candidate text, or an invalid-response error
fn extract_text(envelope: GenerateContentResponse) -> Result<String, ProviderError> {
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| ProviderError::InvalidResponse("no candidates in response".to_string()))
}

/// Parse the model's JSON payload, tolerating a markdown code fence.
fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
