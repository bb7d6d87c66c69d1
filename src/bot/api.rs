use std::{collections::HashMap, time::Duration};

use reqwest::header;
use serde::Deserialize;

/* API contains the logic for calling external APIs.
 * Links the bot with the exchange rates it reports.
 * Used only when composing reports, never by the processor.
 */

pub const DEFAULT_RATES_API_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Request error: {0}")]
    RequestError(reqwest::Error),
    #[error("Currency {0} not found")]
    CurrencyNotFound(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(request_error: reqwest::Error) -> ApiError {
        ApiError::RequestError(request_error)
    }
}

// Exchange rates of one base currency, keyed by uppercase code.
#[derive(Clone, Debug, PartialEq)]
pub struct Rates {
    pub date: Option<String>,
    pub values: HashMap<String, f64>,
}

// Response body: the date, plus a single map named after the lowercase base.
#[derive(Deserialize)]
struct RatesResponse {
    date: Option<String>,
    #[serde(flatten)]
    conversions: HashMap<String, HashMap<String, f64>>,
}

// Reads the rates of a base currency out of a response body.
fn parse_rates(body: &str, base: &str) -> Result<Rates, ApiError> {
    let response: RatesResponse = serde_json::from_str(body)
        .map_err(|_| ApiError::CurrencyNotFound(base.to_uppercase()))?;
    let conversions = response
        .conversions
        .get(&base.to_lowercase())
        .ok_or_else(|| ApiError::CurrencyNotFound(base.to_uppercase()))?;

    Ok(Rates {
        date: response.date,
        values: conversions
            .iter()
            .map(|(code, value)| (code.to_uppercase(), *value))
            .collect(),
    })
}

pub struct RatesApi {
    client: reqwest::Client,
    base_url: String,
}

impl RatesApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut h = header::HeaderMap::new();
        h.insert(
            "Accept",
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(h)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // Fetches today's rates against a base currency.
    pub async fn fetch_rates(&self, base: &str) -> Result<Rates, ApiError> {
        let url = format!("{}/{}.json", self.base_url, base.to_lowercase());
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_rates(&body, base)
    }
}
