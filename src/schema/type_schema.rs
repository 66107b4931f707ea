//! JSON Schema (draft-07) generation for the scraped data file
//!
//! Unlike [`SchemaAccumulator`](super::SchemaAccumulator), which only tracks
//! top-level field tags, this walks nested sequences and mappings so the
//! emitted document describes programs, courses and degrees as well.

use crate::record::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// JSON Schema primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// Merge two scalar types, returning the more general one
    fn widen(self, other: JsonType) -> JsonType {
        match (self, other) {
            (a, b) if a == b => a,
            (JsonType::Integer, JsonType::Number) | (JsonType::Number, JsonType::Integer) => {
                JsonType::Number
            }
            // Incompatible types fall back to string
            _ => JsonType::String,
        }
    }
}

/// Type keyword: a single type, or a type plus `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(JsonType),
    Multiple(Vec<JsonType>),
}

impl TypeKeyword {
    fn new(json_type: JsonType, nullable: bool) -> Self {
        if nullable && json_type != JsonType::Null {
            TypeKeyword::Multiple(vec![json_type, JsonType::Null])
        } else {
            TypeKeyword::Single(json_type)
        }
    }

    /// Check if `null` is allowed
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeKeyword::Single(t) => *t == JsonType::Null,
            TypeKeyword::Multiple(types) => types.contains(&JsonType::Null),
        }
    }

    /// The non-null type, if any
    pub fn primary_type(&self) -> Option<JsonType> {
        match self {
            TypeKeyword::Single(t) => Some(*t),
            TypeKeyword::Multiple(types) => types.iter().copied().find(|t| *t != JsonType::Null),
        }
    }
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub json_type: Option<TypeKeyword>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySchema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
}

/// Top-level schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    #[serde(rename = "$schema")]
    pub schema: String,

    pub title: String,

    #[serde(rename = "type")]
    pub json_type: JsonType,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

impl TypeSchema {
    /// Get a property
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    /// Check if a property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

// ============================================================================
// Shapes: the accumulating state behind a schema
// ============================================================================

#[derive(Debug, Clone, Default)]
struct Shape {
    nullable: bool,
    kind: Option<Kind>,
}

#[derive(Debug, Clone)]
enum Kind {
    Scalar(JsonType),
    Array(Box<Shape>),
    Object(ObjectShape),
}

#[derive(Debug, Clone, Default)]
struct ObjectShape {
    /// Number of mappings observed
    count: usize,
    fields: BTreeMap<String, Shape>,
    /// Number of mappings each field appeared in
    seen: BTreeMap<String, usize>,
}

impl Shape {
    fn observe(&mut self, value: &FieldValue) {
        match value {
            FieldValue::Null => self.nullable = true,
            FieldValue::Boolean(_) => self.observe_scalar(JsonType::Boolean),
            FieldValue::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    self.observe_scalar(JsonType::Integer);
                } else {
                    self.observe_scalar(JsonType::Number);
                }
            }
            FieldValue::String(_) => self.observe_scalar(JsonType::String),
            FieldValue::Sequence(items) => match self.kind {
                None => {
                    let mut item_shape = Shape::default();
                    items.iter().for_each(|item| item_shape.observe(item));
                    self.kind = Some(Kind::Array(Box::new(item_shape)));
                }
                Some(Kind::Array(ref mut item_shape)) => {
                    items.iter().for_each(|item| item_shape.observe(item));
                }
                Some(_) => self.kind = Some(Kind::Scalar(JsonType::String)),
            },
            FieldValue::Mapping(map) => match self.kind {
                None => {
                    let mut object = ObjectShape::default();
                    object.observe(map.iter().map(|(k, v)| (k.as_str(), v)));
                    self.kind = Some(Kind::Object(object));
                }
                Some(Kind::Object(ref mut object)) => {
                    object.observe(map.iter().map(|(k, v)| (k.as_str(), v)));
                }
                Some(_) => self.kind = Some(Kind::Scalar(JsonType::String)),
            },
        }
    }

    fn observe_scalar(&mut self, json_type: JsonType) {
        self.kind = Some(match &self.kind {
            None => Kind::Scalar(json_type),
            Some(Kind::Scalar(existing)) => Kind::Scalar(existing.widen(json_type)),
            // Scalar mixed with a container
            Some(_) => Kind::Scalar(JsonType::String),
        });
    }

    fn build(&self, force_nullable: bool) -> PropertySchema {
        let nullable = self.nullable || force_nullable;
        let mut schema = PropertySchema {
            json_type: None,
            properties: None,
            required: Vec::new(),
            items: None,
        };

        match &self.kind {
            None => {
                // Only nulls seen, or the item shape of an always-empty array
                if self.nullable {
                    schema.json_type = Some(TypeKeyword::Single(JsonType::Null));
                }
            }
            Some(Kind::Scalar(t)) => schema.json_type = Some(TypeKeyword::new(*t, nullable)),
            Some(Kind::Array(items)) => {
                schema.json_type = Some(TypeKeyword::new(JsonType::Array, nullable));
                let item_schema = items.build(false);
                if item_schema.json_type.is_some() {
                    schema.items = Some(Box::new(item_schema));
                }
            }
            Some(Kind::Object(object)) => {
                schema.json_type = Some(TypeKeyword::new(JsonType::Object, nullable));
                let (properties, required) = object.build();
                schema.properties = Some(properties);
                schema.required = required;
            }
        }

        schema
    }
}

impl ObjectShape {
    fn observe<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (&'a str, &'a FieldValue)>,
    {
        self.count += 1;
        for (name, value) in fields {
            *self.seen.entry(name.to_string()).or_insert(0) += 1;
            self.fields
                .entry(name.to_string())
                .or_default()
                .observe(value);
        }
    }

    fn build(&self) -> (BTreeMap<String, PropertySchema>, Vec<String>) {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();

        for (name, shape) in &self.fields {
            let always_present = self.seen.get(name).copied().unwrap_or(0) == self.count;
            let property = shape.build(!always_present);
            if always_present && !shape.nullable {
                required.push(name.clone());
            }
            properties.insert(name.clone(), property);
        }

        (properties, required)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`TypeSchema`] from every record of the data file
#[derive(Debug, Clone)]
pub struct TypeSchemaBuilder {
    title: String,
    root: ObjectShape,
}

impl TypeSchemaBuilder {
    /// Create a builder for a schema with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            root: ObjectShape::default(),
        }
    }

    /// Add one record
    pub fn observe(&mut self, record: &Record) {
        self.root.observe(record.iter());
    }

    /// Add every record
    #[must_use]
    pub fn with_records<'a, I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.observe(record);
        }
        self
    }

    /// Number of records observed
    pub fn record_count(&self) -> usize {
        self.root.count
    }

    /// Produce the schema document
    pub fn build(&self) -> TypeSchema {
        let (properties, required) = self.root.build();
        TypeSchema {
            schema: DRAFT_07.to_string(),
            title: self.title.clone(),
            json_type: JsonType::Object,
            properties,
            required,
            additional_properties: true,
        }
    }
}
