//! Schema descriptor types

use crate::record::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Type tag of a single observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::String => write!(f, "string"),
            TypeTag::Number => write!(f, "number"),
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Array => write!(f, "Array"),
            TypeTag::Object => write!(f, "Object"),
        }
    }
}

/// How to reconcile a field observed with a different type than recorded
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// The most recently observed type replaces the recorded one
    #[default]
    Overwrite,
    /// Fail with a type conflict error
    Error,
    /// Keep every observed type as a union (`string|number`)
    WidenToUnion,
}

/// Inferred type of one field: one or more tags, possibly optional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// Observed tags in first-seen order, never empty
    tags: Vec<TypeTag>,
    optional: bool,
    /// Only null has been seen; the `Object` tag is a placeholder
    null_only: bool,
}

impl FieldType {
    /// A required field of a single type
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tags: vec![tag],
            optional: false,
            null_only: false,
        }
    }

    /// An optional field of a single type
    pub fn optional(tag: TypeTag) -> Self {
        Self {
            optional: true,
            ..Self::new(tag)
        }
    }

    /// A required field typed from its first observed value.
    ///
    /// Null is tagged `Object`, until a concrete value replaces it.
    pub fn for_value(value: &FieldValue) -> Self {
        Self {
            null_only: value.is_null(),
            ..Self::new(value.type_tag())
        }
    }

    /// Check if only null values have been observed
    pub fn is_null_only(&self) -> bool {
        self.null_only
    }

    /// Observed tags in first-seen order
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    /// Check if this field is optional
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Mark this field optional
    pub fn make_optional(&mut self) {
        self.optional = true;
    }

    /// Check if `tag` is one of the recorded tags
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Replace all recorded tags with `tag`, keeping optionality
    pub fn replace(&mut self, tag: TypeTag) {
        self.tags.clear();
        self.tags.push(tag);
        self.null_only = false;
    }

    /// Add `tag` to the union if not already present
    pub fn widen(&mut self, tag: TypeTag) {
        if !self.contains(tag) {
            self.tags.push(tag);
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let union = self
            .tags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|");
        if self.optional {
            write!(f, "Optional<{union}>")
        } else {
            f.write_str(&union)
        }
    }
}

/// Running schema state threaded through [`observe`](super::observe)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub(crate) field_types: BTreeMap<String, FieldType>,
    pub(crate) optional_fields: BTreeSet<String>,
    /// Fingerprint of the last reconciled key set. `None` until the first record.
    pub(crate) signature: Option<String>,
}

impl SchemaDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no record has been observed yet
    pub fn is_empty(&self) -> bool {
        self.signature.is_none()
    }

    /// Inferred type of a field
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.field_types.get(name)
    }

    /// All inferred field types
    pub fn field_types(&self) -> &BTreeMap<String, FieldType> {
        &self.field_types
    }

    /// Fields absent from at least one observed record
    pub fn optional_fields(&self) -> &BTreeSet<String> {
        &self.optional_fields
    }

    /// Check if a field is known to be optional
    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_fields.contains(name)
    }

    /// Fingerprint of the last reconciled key set
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Drop the fingerprint and produce the persisted schema shape
    pub fn finalize(self) -> InferredSchema {
        InferredSchema {
            optional_keys: self.optional_fields.into_iter().collect(),
            data_type: self
                .field_types
                .into_iter()
                .map(|(name, ty)| (name, ty.to_string()))
                .collect(),
        }
    }
}

/// Finalized schema as written to `schema.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredSchema {
    #[serde(rename = "optionalKeys")]
    pub optional_keys: Vec<String>,
    #[serde(rename = "dataType")]
    pub data_type: BTreeMap<String, String>,
}

impl InferredSchema {
    /// Type string of a field
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.data_type.get(name).map(String::as_str)
    }

    /// Check if a field is listed as optional
    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_keys.iter().any(|k| k == name)
    }

    /// Check if nothing was inferred
    pub fn is_empty(&self) -> bool {
        self.optional_keys.is_empty() && self.data_type.is_empty()
    }
}
