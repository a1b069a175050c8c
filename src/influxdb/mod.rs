//! Time-series sink: machine metrics as InfluxDB v2 line protocol.

pub mod config;
mod model;
mod sink;

pub use config::InfluxConf;
pub use model::{MEASUREMENT, MetricPoint, transform};
pub use sink::InfluxSink;
