//! RDF serialization formats.
//!
//! - Turtle (human-readable, prefixed)

mod turtle;

pub use turtle::Turtle;
