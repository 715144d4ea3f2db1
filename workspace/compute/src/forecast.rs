use std::time::Duration;

use async_trait::async_trait;
use polars::prelude::DataFrame;
use reqwest::Client;
use tracing::{info, instrument};

use crate::error::Result;
use crate::providers::ForecastProvider;
use crate::table::{Observation, observations_to_table};

/// Fetches the forecast horizon from an HTTP endpoint returning a JSON array of rows.
#[derive(Clone, Debug)]
pub struct HttpForecastProvider {
    client: Client,
    url: String,
}

impl HttpForecastProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ForecastProvider for HttpForecastProvider {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_horizon(&self) -> Result<DataFrame> {
        info!("Downloading forecast from {}", self.url);

        let rows: Vec<Observation> = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("Forecast horizon has {} rows", rows.len());
        observations_to_table(&rows)
    }
}
