//! Relational event-log sink: one `material_event` row per scan event.

pub mod config;
mod model;
mod sink;

pub use config::MariaDbConf;
pub use model::{MaterialEvent, transform};
pub use sink::MariaDbSink;
