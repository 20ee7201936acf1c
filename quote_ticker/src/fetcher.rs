//! Retrieving daily-series payloads from the upstream API.
//!
//! A `Fetcher` returns either the payload fragment for one symbol (possibly empty when
//! the response carried no series) or a `FetchError`. The split matters to the poll
//! loop: "no data" goes to the parser, a failed connection does not.
use std::time::Duration;

use log::{debug, info, warn};
use quote_parser::Symbol;
use quote_parser::api::{self, DAILY_FUNCTION, QUERY_PATH};
use reqwest::blocking::{Client, Response};
use reqwest::tls::TlsInfo;

use crate::error::FetchError;
use crate::pin::{CertificatePin, PinPolicy};

/// Source of raw quote payloads.
pub trait Fetcher {
    /// Fetches the most recent daily fragment for `symbol`.
    fn fetch(&self, symbol: &Symbol) -> Result<String, FetchError>;
}

/// Blocking HTTPS client for the daily-series API.
pub struct HttpFetcher {
    client: Client,
    query_url: String,
    api_key: String,
    pin: Option<CertificatePin>,
}

impl HttpFetcher {
    /// Builds a client for `base_url` (scheme and host, e.g. `https://www.alphavantage.co`).
    ///
    /// An enforced pin is installed in the TLS handshake and requires an `https` URL.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        pin: Option<CertificatePin>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .tls_info(pin.is_some());
        if let Some(pin) = pin.as_ref().filter(|p| p.policy() == PinPolicy::Enforce) {
            if !base_url.starts_with("https://") {
                return Err(FetchError::PinRequiresHttps(base_url.to_string()));
            }
            builder = builder.use_preconfigured_tls(pin.tls_config()?);
        }
        Ok(Self {
            client: builder.build()?,
            query_url: query_url(base_url),
            api_key: api_key.to_string(),
            pin,
        })
    }

    fn inspect_certificate(&self, response: &Response) {
        let Some(pin) = self.pin.as_ref().filter(|p| p.policy() == PinPolicy::Warn) else {
            return;
        };
        let certificate = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(TlsInfo::peer_certificate);
        pin.inspect(certificate);
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, symbol: &Symbol) -> Result<String, FetchError> {
        info!("Requesting {} for {}", self.query_url, symbol);
        let response = self
            .client
            .get(&self.query_url)
            .query(&[
                ("function", DAILY_FUNCTION),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()?;
        self.inspect_certificate(&response);

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        if let Some(notice) = api::upstream_notice(&body) {
            warn!("Upstream notice for {}: {}", symbol, notice);
        }
        let fragment = api::daily_fragment(&body);
        debug!("Response fragment for {}: {}", symbol, fragment);
        Ok(fragment.to_string())
    }
}

fn query_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), QUERY_PATH)
}
