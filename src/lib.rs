pub mod config;
pub mod error;
pub mod ingest;
pub mod graph;
pub mod rdf;
pub mod views;
pub mod corpus;
pub mod pipeline;

pub use config::Config;
pub use error::{KgError, Result};
pub use graph::{materialize, Graph, GraphBuilder, MaterializeOptions, Materialized, Namespace, Term, Triple};
pub use rdf::Turtle;
