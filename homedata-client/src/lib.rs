use std::time::Duration;

use homedata_api_types::{PropertyLookupResponse, SeriesRequest, TimeSeriesResponse};
use log::{debug, info};
use reqwest::{header::HeaderValue, Client, Url};
use serde_json::Value;
use thiserror::Error;

pub use reqwest::StatusCode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{message} (status {status})")]
    Api { status: StatusCode, message: String },
}

impl Error {
    /// Builds the error the backend reports with an `{"error": ...}` body.
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> Result<Self, Error> {
        // relative joins drop the last path segment unless it ends in a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            base_url,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl ToString) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

/// Client for the rental data and property lookup endpoints.
#[derive(Debug, Clone)]
pub struct HomedataClient {
    client: Client,
    base_url: Url,
}

impl HomedataClient {
    const RENTAL_DATA_PATH: &'static str = "homedata/rental-data-json/";
    const PROPERTY_LOOKUP_PATH: &'static str = "nyc-lookup-tool/";

    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(HomedataClient {
            client,
            base_url: config.base_url,
        })
    }

    pub fn rental_data_url(&self, request: &SeriesRequest) -> Result<Url, Error> {
        let mut url = self.base_url.join(Self::RENTAL_DATA_PATH)?;
        url.query_pairs_mut()
            .append_pair("data", request.data_type.as_str())
            .append_pair("bedrooms", request.bedroom.as_str())
            .append_pair("area", &request.neighborhood)
            .append_pair(
                "seasonal",
                if request.seasonal_mode.requests_seasonal() {
                    "true"
                } else {
                    "false"
                },
            );
        Ok(url)
    }

    pub fn property_lookup_url(&self, address: &str, zip_code: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(Self::PROPERTY_LOOKUP_PATH)?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("zip_code", zip_code);
        Ok(url)
    }

    /// Fetches the monthly series for one data type, bedroom and area.
    pub async fn rental_data(&self, request: &SeriesRequest) -> Result<TimeSeriesResponse, Error> {
        let url = self.rental_data_url(request)?;
        info!("getting rental data: {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_time_series(status, &body)
    }

    pub async fn property_lookup(
        &self,
        address: &str,
        zip_code: &str,
    ) -> Result<PropertyLookupResponse, Error> {
        let url = self.property_lookup_url(address, zip_code)?;
        info!("looking up property: {url}");
        let response = self
            .client
            .get(url)
            .header("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode_property_lookup(status, &body)
    }
}

fn error_message(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}

/// Turns a rental data response into either the series payload or the error
/// the backend reported.
pub fn decode_time_series(status: StatusCode, body: &str) -> Result<TimeSeriesResponse, Error> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(Error::api(
                status,
                format!("HTTP error! status: {}", status.as_u16()),
            ))
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(message) = error_message(&value) {
        return Err(Error::api(status, message));
    }
    if !status.is_success() {
        return Err(Error::api(status, "Failed to fetch data"));
    }
    let response: TimeSeriesResponse = serde_json::from_value(value)?;
    debug!("decoded {} areas", response.areas.len());
    Ok(response)
}

/// Lookup failures still carry a `{success: false, error}` body, so the body
/// is decoded whatever the status.
pub fn decode_property_lookup(
    status: StatusCode,
    body: &str,
) -> Result<PropertyLookupResponse, Error> {
    match serde_json::from_str(body) {
        Ok(response) => Ok(response),
        Err(_) if !status.is_success() => Err(Error::api(
            status,
            format!("HTTP error! status: {}", status.as_u16()),
        )),
        Err(e) => Err(e.into()),
    }
}
