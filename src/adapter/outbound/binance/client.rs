//! Signed Binance REST client.
//!
//! Every account endpoint is a `SIGNED` request: the query string carries
//! `timestamp` and `recvWindow`, and an HMAC-SHA256 of the full query string
//! (hex encoded) is appended as `signature`. The API key travels in the
//! `X-MBX-APIKEY` header.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use super::dto::ApiErrorBody;
use super::settings::{BinanceConfig, BinanceCredentials};
use crate::error::{ExchangeError, Result};

type HmacSha256 = Hmac<Sha256>;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// HTTP client for signed Binance endpoints.
pub struct BinanceClient {
    http: HttpClient,
    base_url: String,
    recv_window_ms: u64,
    credentials: BinanceCredentials,
}

impl BinanceClient {
    #[must_use]
    pub fn from_config(config: &BinanceConfig, credentials: BinanceCredentials) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            recv_window_ms: config.recv_window_ms,
            credentials,
        }
    }

    /// Signed `GET`.
    pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.signed(Method::GET, path, params).await
    }

    /// Signed `POST`.
    pub async fn post<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.signed(Method::POST, path, params).await
    }

    async fn signed<T>(&self, method: Method, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let query = self.signed_query(params, timestamp)?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        url.set_query(Some(query.as_str()));

        debug!(method = %method, path, "Sending signed request");

        let response = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, path, &body).into());
        }

        serde_json::from_str(&body).map_err(|err| {
            ExchangeError::MalformedResponse {
                endpoint: path.to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }

    fn signed_query(&self, params: &[(&str, String)], timestamp: i64) -> Result<String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("recvWindow", &self.recv_window_ms.to_string());
        query.append_pair("timestamp", &timestamp.to_string());
        let query = query.finish();

        let signature = sign(&self.credentials.api_secret, &query)?;
        Ok(format!("{query}&signature={signature}"))
    }
}

/// Hex-encoded HMAC-SHA256 of `payload`.
fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| ExchangeError::AuthFailed(format!("unusable API secret: {err}")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn api_error(status: reqwest::StatusCode, path: &str, body: &str) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { code: -2014 | -2015, msg }) => ExchangeError::AuthFailed(msg),
        Ok(ApiErrorBody { code, msg }) => ExchangeError::Api { code, message: msg },
        Err(_) if status == reqwest::StatusCode::UNAUTHORIZED => {
            ExchangeError::AuthFailed(format!("{path}: {status}"))
        }
        Err(_) => ExchangeError::Api {
            code: i64::from(status.as_u16()),
            message: format!("{path}: {status}"),
        },
    }
}
