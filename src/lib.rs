//! UNS bridge: consumes factory events from an MQTT unified namespace and
//! persists them into heterogeneous downstream stores.
//!
//! Pipeline: [`record::decode`] turns a topic+payload pair into a
//! [`DecodedRecord`]; the [`Dispatcher`] routes it to every applicable sink
//! (relational event log, time-series metrics, graph reference data), each
//! with its own pure transform, write call and isolated failure handling.

pub mod config;
pub mod dispatch;
pub mod graphql;
pub mod influxdb;
pub mod mariadb;
pub mod mqtt;
pub mod record;
pub mod sink;

pub use config::BridgeConfig;
pub use dispatch::{DispatchOutcome, Dispatcher, PendingDispatch};
pub use record::{DecodeError, DecodedRecord, InboundMessage, decode};
pub use sink::{EventSink, SinkError, SinkOutcome, SkipReason};
