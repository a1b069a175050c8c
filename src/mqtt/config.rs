use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::config::{env_parse, env_str};

#[derive(Educe, Deserialize, Serialize, PartialEq, Clone)]
#[educe(Debug, Default)]
pub struct MqttConf {
    #[educe(Default = "localhost")]
    pub host: String,
    #[educe(Default = 1883)]
    pub port: u16,
    /// UNS-style topic filter covering every factory publisher.
    #[educe(Default = "factory/#")]
    pub topic_filter: String,
    #[educe(Default = "uns-bridge")]
    pub client_id: String,
    #[educe(Default = 60)]
    pub keep_alive_secs: u64,
}

impl MqttConf {
    pub fn from_env() -> Self {
        let mut conf = Self::default();
        if let Some(s) = env_str("BRIDGE_MQTT_HOST") {
            conf.host = s;
        }
        if let Some(p) = env_parse::<u16>("BRIDGE_MQTT_PORT") {
            conf.port = p;
        }
        if let Some(s) = env_str("BRIDGE_MQTT_TOPIC") {
            conf.topic_filter = s;
        }
        if let Some(s) = env_str("BRIDGE_MQTT_CLIENT_ID") {
            conf.client_id = s;
        }
        if let Some(n) = env_parse::<u64>("BRIDGE_MQTT_KEEPALIVE_SECS") {
            conf.keep_alive_secs = n;
        }
        conf
    }
}
