//! Environment-sourced configuration. Every knob has a default; the bridge
//! comes up against a local stack with no configuration at all.

use std::str::FromStr;

use crate::dispatch::DEFAULT_QUEUE_DEPTH;
use crate::graphql::GraphQlConf;
use crate::influxdb::InfluxConf;
use crate::mariadb::MariaDbConf;
use crate::mqtt::MqttConf;

pub fn env_str(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_str(key)?.parse().ok()
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub mqtt: MqttConf,
    pub mariadb: MariaDbConf,
    pub influxdb: InfluxConf,
    pub graphql: GraphQlConf,
    /// Per-sink worker queue depth. A full queue back-pressures the
    /// transport loop rather than dropping records.
    pub queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttConf::default(),
            mariadb: MariaDbConf::default(),
            influxdb: InfluxConf::default(),
            graphql: GraphQlConf::default(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        Self {
            mqtt: MqttConf::from_env(),
            mariadb: MariaDbConf::from_env(),
            influxdb: InfluxConf::from_env(),
            graphql: GraphQlConf::from_env(),
            queue_depth: env_parse("BRIDGE_QUEUE_DEPTH").unwrap_or(DEFAULT_QUEUE_DEPTH),
        }
    }
}
