use crate::core::models::Metric;
use crate::core::transmit::MetricEncoder;
use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode, redirect, retry};
use std::time::Duration;
use tracing::{debug, trace};

pub struct PushResponse {
    pub status: StatusCode,
    /// The record echoed back by the server with its current value,
    /// only read on a success status
    pub echoed: Option<Metric>,
}

/// Pushes single metrics to the server json surface
pub struct MetricClient {
    client: Client,
    update_url: String,
    gzip: bool,
}

impl MetricClient {
    fn init_client() -> Result<Client, anyhow::Error> {
        reqwest::ClientBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "-agent/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(1))
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .retry(retry::never())
            .redirect(redirect::Policy::none())
            .tcp_nodelay(true)
            .gzip(true)
            .build()
            .map_err(anyhow::Error::from)
    }

    /// Builds the client eagerly so a broken tls/dns setup
    /// fails agent startup rather than every push
    pub fn new(address: &str, gzip: bool) -> Result<Self, anyhow::Error> {
        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address.trim_end_matches('/'))
        };

        Ok(MetricClient {
            client: Self::init_client()?,
            update_url: format!("{base}/update/"),
            gzip,
        })
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }

    /// Push one metric.
    ///
    /// # Behavior
    /// Returns an error if encoding or sending fails, but does not
    /// return an error on completed http requests regardless of status
    /// code, callers decide what a non success status means
    pub async fn push(&self, metric: &Metric) -> Result<PushResponse, anyhow::Error> {
        let encoded = MetricEncoder::encode(metric, self.gzip)?;

        let mut headers = HeaderMap::new();
        for header in encoded.headers {
            headers.insert(
                HeaderName::from_static(header.key),
                HeaderValue::from_static(header.value),
            );
        }

        let res = self
            .client
            .post(&self.update_url)
            .headers(headers)
            .body(encoded.data)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to push {} to {}: {}", metric.id, self.update_url, e))?;

        let status = res.status();

        if !status.is_success() {
            debug!("Non success status {} for {}", status, metric.id);
            return Ok(PushResponse {
                status,
                echoed: None,
            });
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| anyhow!("Failed to read push response for {}: {}", metric.id, e))?;

        let echoed = match serde_json::from_slice::<Metric>(&bytes) {
            Ok(metric) => Some(metric),
            Err(e) => {
                trace!("Unreadable echo for {}: {}", metric.id, e);
                None
            }
        };

        Ok(PushResponse { status, echoed })
    }
}
