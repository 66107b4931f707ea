//! Schema inference module
//!
//! Two views of the scraped records are inferred:
//!
//! - **Schema descriptor**: a running fold over the records tracking each
//!   top-level field's type tag and whether it is optional. Written as
//!   `schema.json`.
//! - **Type schema**: a JSON Schema (draft-07) document covering nested
//!   programs, courses and degrees. Written as `type_schema.json`.

mod accumulator;
mod type_schema;
mod types;

pub use accumulator::{infer_schema, observe, SchemaAccumulator};
pub use type_schema::{JsonType, PropertySchema, TypeKeyword, TypeSchema, TypeSchemaBuilder};
pub use types::{ConflictPolicy, FieldType, InferredSchema, SchemaDescriptor, TypeTag};

#[cfg(test)]
mod tests;
