//! Simulated factory publisher: emits one machine payload every two seconds
//! to a topic under the bridge's filter. Useful for soaking the pipeline
//! against a local broker.

use std::time::Duration;

use chrono::Utc;
use log::{info, warn};
use rand::Rng;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use serde_json::json;

use uns_bridge::config::env_str;
use uns_bridge::mqtt::MqttConf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let conf = MqttConf::from_env();
    let topic = env_str("BRIDGE_PUBLISH_TOPIC").unwrap_or_else(|| "factory/data/sensor1".into());

    let mut options = MqttOptions::new("factory-publisher", conf.host.clone(), conf.port);
    options.set_keep_alive(Duration::from_secs(conf.keep_alive_secs));
    let (client, mut eventloop) = AsyncClient::new(options, 16);

    tokio::spawn(async move {
        loop {
            if let Err(e) = eventloop.poll().await {
                warn!("mqtt connection error: {e}");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    info!("publishing to {topic} on {}:{}", conf.host, conf.port);
    loop {
        let temperature: f64 = rand::rng().random_range(60.0..90.0);
        let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let payload = json!({
            "factory_id": "F001",
            "factory_name": "Burger Factory",
            "factory_location": "Berlin",

            "machine_id": "M101",
            "machine_name": "Burger Former",
            "model": "CB-500",
            "status": "Active",

            "metric": "temperature",
            "value": temperature,
            "unit": "°C",
            "timestamp": now,

            "product_id": "P9001",
            "product_name": "Classic Burger",
            "product_type": "Food",
            "createdAt": now,
            "materials": [
                { "id": "MAT01", "name": "Beef Patty", "type": "Ingredient" },
                { "id": "MAT02", "name": "Bun", "type": "Ingredient" }
            ],
        });

        match client
            .publish(topic.clone(), QoS::AtMostOnce, false, serde_json::to_vec(&payload)?)
            .await
        {
            Ok(()) => info!("sent temperature={temperature:.1} to {topic}"),
            Err(e) => warn!("publish to {topic} failed: {e}"),
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}
