use std::time::Duration;

use async_trait::async_trait;
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

use super::config::MariaDbConf;
use super::model::{MaterialEvent, transform};
use crate::record::DecodedRecord;
use crate::sink::{EventSink, SinkError, SinkResult, SkipReason};

/// Writes [`MaterialEvent`] rows with one short-lived connection per write.
/// A broken or stuck connection on one message can therefore never poison a
/// session reused by later messages; throughput is traded for that
/// isolation.
pub struct MariaDbSink {
    options: MySqlConnectOptions,
    insert_sql: String,
    write_timeout: Duration,
}

impl MariaDbSink {
    pub fn new(conf: &MariaDbConf) -> anyhow::Result<Self> {
        let options = conf.url.parse::<MySqlConnectOptions>()?;
        let insert_sql = format!(
            "INSERT INTO {} (scanner_id, product_id, material_id, event_type, scanned_at) \
             VALUES (?, ?, ?, ?, ?)",
            quote_identifier(&conf.table)
        );
        Ok(Self {
            options,
            insert_sql,
            write_timeout: Duration::from_secs(conf.write_timeout_secs),
        })
    }

    async fn insert(&self, event: &MaterialEvent) -> SinkResult<()> {
        let mut conn = MySqlConnection::connect_with(&self.options).await?;
        let result = sqlx::query(&self.insert_sql)
            .bind(&event.scanner_id)
            .bind(&event.product_id)
            .bind(&event.material_id)
            .bind(&event.event_type)
            .bind(&event.scanned_at)
            .execute(&mut conn)
            .await;
        // Single statement, autocommitted. Close errors after a completed
        // insert don't change the outcome.
        let _ = conn.close().await;
        result?;
        Ok(())
    }
}

#[async_trait]
impl EventSink for MariaDbSink {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn route(&self, record: &DecodedRecord) -> Result<(), SkipReason> {
        for key in ["scanner_id", "product_id", "material_id"] {
            if record.text(key).is_none() {
                return Err(SkipReason::MissingKey(key));
            }
        }
        Ok(())
    }

    async fn write(&self, record: &DecodedRecord) -> SinkResult<()> {
        let event = transform(record)?;
        tokio::time::timeout(self.write_timeout, self.insert(&event))
            .await
            .map_err(|_| SinkError::Timeout)?
    }
}

/// Quote a MySQL identifier, escaping embedded backticks.
fn quote_identifier(input: &str) -> String {
    format!("`{}`", input.replace('`', "``"))
}
