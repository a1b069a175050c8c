use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::config::{env_parse, env_str};

/// Time-series store settings. With no endpoint or token configured the
/// sink stays disabled for the process lifetime and every record is skipped
/// rather than failed.
#[derive(Educe, Deserialize, Serialize, PartialEq, Clone)]
#[educe(Debug, Default)]
pub struct InfluxConf {
    pub url: String,
    #[educe(Default = "factory")]
    pub org: String,
    pub token: String,
    #[educe(Default = "machine_metrics")]
    pub bucket: String,
    #[educe(Default = 5)]
    pub write_timeout_secs: u64,
}

impl InfluxConf {
    pub fn from_env() -> Self {
        let mut conf = Self::default();
        if let Some(s) = env_str("BRIDGE_INFLUX_URL") {
            conf.url = s;
        }
        if let Some(s) = env_str("BRIDGE_INFLUX_ORG") {
            conf.org = s;
        }
        if let Some(s) = env_str("BRIDGE_INFLUX_TOKEN") {
            conf.token = s;
        }
        if let Some(s) = env_str("BRIDGE_INFLUX_BUCKET") {
            conf.bucket = s;
        }
        if let Some(n) = env_parse::<u64>("BRIDGE_INFLUX_TIMEOUT_SECS") {
            conf.write_timeout_secs = n;
        }
        conf
    }
}
