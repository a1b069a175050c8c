use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::config::env_str;

#[derive(Educe, Deserialize, Serialize, PartialEq, Clone)]
#[educe(Debug, Default)]
pub struct GraphQlConf {
    #[educe(Default = "http://localhost:8080/graphql")]
    pub url: String,
}

impl GraphQlConf {
    pub fn from_env() -> Self {
        let mut conf = Self::default();
        if let Some(s) = env_str("BRIDGE_GRAPHQL_URL") {
            conf.url = s;
        }
        conf
    }
}
