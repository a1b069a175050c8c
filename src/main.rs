use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};

use uns_bridge::config::BridgeConfig;
use uns_bridge::dispatch::Dispatcher;
use uns_bridge::graphql::GraphQlSink;
use uns_bridge::influxdb::InfluxSink;
use uns_bridge::mariadb::MariaDbSink;
use uns_bridge::mqtt::MqttSource;
use uns_bridge::record::decode;
use uns_bridge::sink::EventSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BridgeConfig::from_env();
    info!(
        "uns bridge starting: broker {}:{}, filter {}",
        config.mqtt.host, config.mqtt.port, config.mqtt.topic_filter
    );

    let mariadb = Arc::new(MariaDbSink::new(&config.mariadb)?) as Arc<dyn EventSink>;
    let influxdb = Arc::new(InfluxSink::new(&config.influxdb)) as Arc<dyn EventSink>;
    let graphql = Arc::new(GraphQlSink::new(&config.graphql)?) as Arc<dyn EventSink>;
    let dispatcher = Dispatcher::new(vec![mariadb, influxdb, graphql], config.queue_depth);

    let mut source = MqttSource::connect(&config.mqtt);
    loop {
        let message = source.recv().await;
        debug!(
            "message on {} ({} bytes)",
            message.topic,
            message.payload.len()
        );

        // Decode failures drop the message; nothing is queued or re-delivered.
        let record = match decode(&message.topic, &message.payload, Utc::now()) {
            Ok(record) => record,
            Err(e) => {
                warn!("dropping message on {}: {e}", message.topic);
                continue;
            }
        };

        // Enqueue in delivery order, then collect outcomes off the hot path
        // so one slow store never stalls the subscription.
        let pending = dispatcher.route(Arc::new(record)).await;
        let topic = message.topic;
        tokio::spawn(async move {
            let outcome = pending.outcome().await;
            if outcome.has_failure() {
                warn!("{topic}: {outcome}");
            } else {
                info!("{topic}: {outcome}");
            }
        });
    }
}
