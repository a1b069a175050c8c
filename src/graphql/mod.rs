//! Graph/reference-data sink: product entities pushed through a GraphQL
//! mutation endpoint.

pub mod config;
mod model;
mod sink;

pub use config::GraphQlConf;
pub use model::{NodeRef, ProductEntity, transform};
pub use sink::GraphQlSink;
