//! Schema generation.
//!
//! This module hosts the generation engine: [`SchemaGenerator`] walks a
//! structural type model, maps each declared field to a schema type, wires
//! argument records and resolver bindings, and registers every generated
//! type for installation into a dynamic schema.
//!
//! ## Components
//!
//! - `generator` - The synthesizer and struct walker (recursion root)
//! - `mapper` - The per-field type mapping decision tree and the argument
//!   builder

mod generator;
mod mapper;

pub use generator::SchemaGenerator;
