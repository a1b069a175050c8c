//! MQTT subscription transport. Thin by design: reconnection policy lives
//! in the client library, the pipeline only consumes delivered messages.

pub mod config;
mod source;

pub use config::MqttConf;
pub use source::MqttSource;
