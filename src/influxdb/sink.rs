use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::config::InfluxConf;
use super::model::transform;
use crate::record::DecodedRecord;
use crate::sink::{EventSink, SinkError, SinkResult, SkipReason};

struct InfluxClient {
    http: reqwest::Client,
    write_url: String,
    token: String,
}

/// Pushes metric points to the InfluxDB v2 write endpoint.
///
/// If the endpoint or token is missing at startup the sink comes up
/// disabled: logged once here, then every record routes to a permanent
/// skip and no write is ever attempted.
pub struct InfluxSink {
    client: Option<InfluxClient>,
}

impl InfluxSink {
    pub fn new(conf: &InfluxConf) -> Self {
        if conf.url.trim().is_empty() || conf.token.trim().is_empty() {
            warn!("influxdb sink disabled: endpoint or token not configured");
            return Self { client: None };
        }
        let http = match reqwest::Client::builder()
            .timeout(Duration::from_secs(conf.write_timeout_secs))
            .build()
        {
            Ok(http) => http,
            Err(e) => {
                warn!("influxdb sink disabled: http client init failed: {e}");
                return Self { client: None };
            }
        };
        let write_url = format!(
            "{}/api/v2/write?org={}&bucket={}&precision=ns",
            conf.url.trim_end_matches('/'),
            conf.org,
            conf.bucket
        );
        Self {
            client: Some(InfluxClient {
                http,
                write_url,
                token: conf.token.clone(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl EventSink for InfluxSink {
    fn name(&self) -> &'static str {
        "influxdb"
    }

    fn route(&self, record: &DecodedRecord) -> Result<(), SkipReason> {
        if self.client.is_none() {
            return Err(SkipReason::SinkDisabled);
        }
        if record.number("value").is_none() {
            return Err(SkipReason::NoNumericValue);
        }
        Ok(())
    }

    async fn write(&self, record: &DecodedRecord) -> SinkResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or(SinkError::Skip(SkipReason::SinkDisabled))?;
        let point = transform(record)?;
        let line = point.to_line_protocol();
        debug!("influxdb write: {line}");

        let response = client
            .http
            .post(&client.write_url)
            .header("Authorization", format!("Token {}", client.token))
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Response {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::decode;

    fn record(json: &str) -> DecodedRecord {
        decode(
            "factory/data/sensor1",
            json.as_bytes(),
            "2024-01-01T00:00:00Z".parse().unwrap(),
        )
        .unwrap()
    }

    fn enabled_conf() -> InfluxConf {
        InfluxConf {
            url: "http://127.0.0.1:8086".into(),
            token: "secret".into(),
            ..InfluxConf::default()
        }
    }

    #[test]
    fn unconfigured_sink_is_permanently_disabled() {
        let sink = InfluxSink::new(&InfluxConf::default());
        assert!(!sink.is_enabled());
        assert_eq!(
            sink.route(&record(r#"{"value": 1.0}"#)).unwrap_err(),
            SkipReason::SinkDisabled
        );
    }

    #[test]
    fn routing_requires_a_numeric_value() {
        let sink = InfluxSink::new(&enabled_conf());
        assert!(sink.route(&record(r#"{"value": 23.5}"#)).is_ok());
        assert_eq!(
            sink.route(&record(r#"{"value": "23.5"}"#)).unwrap_err(),
            SkipReason::NoNumericValue
        );
        assert_eq!(
            sink.route(&record(r#"{"metric": "temperature"}"#))
                .unwrap_err(),
            SkipReason::NoNumericValue
        );
    }

    #[test]
    fn write_url_carries_org_bucket_and_precision() {
        let sink = InfluxSink::new(&enabled_conf());
        let url = &sink.client.as_ref().unwrap().write_url;
        assert_eq!(
            url,
            "http://127.0.0.1:8086/api/v2/write?org=factory&bucket=machine_metrics&precision=ns"
        );
    }
}
