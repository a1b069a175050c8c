use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::json;

use super::config::GraphQlConf;
use super::model::transform;
use crate::record::DecodedRecord;
use crate::sink::{EventSink, SinkError, SinkResult, SkipReason};

/// One `addProduct` mutation per event, list-of-one input.
const MUTATION: &str =
    "mutation AddProduct($input: [AddProductInput!]!) { addProduct(input: $input) { product { id } } }";

/// Hard ceiling on the mutation round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GraphQlSink {
    http: reqwest::Client,
    url: String,
}

impl GraphQlSink {
    pub fn new(conf: &GraphQlConf) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: conf.url.clone(),
        })
    }
}

#[async_trait]
impl EventSink for GraphQlSink {
    fn name(&self) -> &'static str {
        "graphql"
    }

    fn route(&self, record: &DecodedRecord) -> Result<(), SkipReason> {
        if record.text("product_id").is_none() && record.text("id").is_none() {
            return Err(SkipReason::NoProductInfo);
        }
        Ok(())
    }

    async fn write(&self, record: &DecodedRecord) -> SinkResult<()> {
        let entity = transform(record)?;
        let body = json!({
            "query": MUTATION,
            "variables": { "input": [entity] },
        });

        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SinkError::Response {
                status: status.as_u16(),
                body: text,
            });
        }
        // 2xx with the echoed id; useful when chasing reference-data drift.
        debug!("graphql write acknowledged: {text}");
        Ok(())
    }
}
